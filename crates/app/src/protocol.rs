//! Host text protocol for the headless server loop.
//!
//! Newline-delimited JSON: one command per stdin line, one response per
//! stdout line. The I/O loop lives in `host_mode.rs`.

use serde::{Deserialize, Serialize};

use conversion::host::PlayerId;

// ---------------------------------------------------------------------------
// Commands (stdin -> server)
// ---------------------------------------------------------------------------

/// A single command read from stdin. The `cmd` field is the discriminator.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum HostCommand {
    /// Connect a player and give them a planner.
    #[serde(rename = "join")]
    Join {
        player: PlayerId,
        name: String,
        #[serde(default)]
        locale: Option<String>,
    },

    /// Grant a permission to a player.
    #[serde(rename = "grant")]
    Grant {
        player: PlayerId,
        permission: String,
    },

    /// Revoke a permission from a player.
    #[serde(rename = "revoke")]
    Revoke {
        player: PlayerId,
        permission: String,
    },

    /// Place a structure with the player's planner and run one tick.
    #[serde(rename = "build")]
    Build {
        player: PlayerId,
        prefab: String,
        position: [f32; 3],
        /// Quaternion `[x, y, z, w]`; identity when omitted.
        #[serde(default)]
        rotation: Option<[f32; 4]>,
    },

    /// Run a chat command as the player and run one tick.
    #[serde(rename = "chat")]
    Chat {
        player: PlayerId,
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },

    /// Advance the server by `ticks` frames.
    #[serde(rename = "step")]
    Step { ticks: u64 },

    /// List every placed structure.
    #[serde(rename = "structures")]
    Structures,

    /// Unload the plugin and end the session.
    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (server -> stdout)
// ---------------------------------------------------------------------------

/// Every response carries the protocol version, the tick it was produced on,
/// the notifications raised while handling the command, and a tagged payload.
#[derive(Debug, Serialize)]
pub struct HostResponse {
    pub protocol_version: u32,
    pub tick: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "ok")]
    Ok,

    /// A `build` placed this entity.
    #[serde(rename = "built")]
    Built { entity: u64 },

    #[serde(rename = "step_complete")]
    StepComplete,

    #[serde(rename = "structures")]
    Structures { structures: Vec<StructureInfo> },

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "goodbye")]
    Goodbye,
}

/// One placed structure as reported by `structures`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StructureInfo {
    pub entity: u64,
    pub prefab: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub owner: PlayerId,
}

/// Outbound plugin events, with entities as their raw bits.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event")]
pub enum Notification {
    #[serde(rename = "chat_reply")]
    ChatReply { player: PlayerId, message: String },

    #[serde(rename = "structure_replaced")]
    StructureReplaced {
        original: u64,
        replacement: u64,
        destination: String,
        owner: PlayerId,
    },

    #[serde(rename = "entity_built")]
    EntityBuilt { planner: u64, built: u64 },

    #[serde(rename = "item_deployed")]
    ItemDeployed { planner: u64, deployed: u64 },

    #[serde(rename = "deployed")]
    Deployed { deployed: u64, player: PlayerId },
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Upper bound on a single `step`.
pub const MAX_STEP_TICKS: u64 = 10_000;

pub fn make_response(
    tick: u64,
    notifications: Vec<Notification>,
    payload: ResponsePayload,
) -> HostResponse {
    HostResponse {
        protocol_version: PROTOCOL_VERSION,
        tick,
        notifications,
        payload,
    }
}
