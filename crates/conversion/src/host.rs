//! The slice of the host game the plugin touches: players, the building tool,
//! placed structures, and the events that flow between them.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// =============================================================================
// Identity
// =============================================================================

/// Platform user id of a player (Steam-style 64-bit id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Components
// =============================================================================

/// A connected player.
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Locale code used for chat replies, e.g. "en".
    pub locale: String,
}

/// The building plan tool. `owner` points at the player entity holding it;
/// a dropped or orphaned planner has none.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Planner {
    pub owner: Option<Entity>,
}

/// Prefab identifier of a placed structure.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Prefab(pub String);

/// Player who owns a placed structure.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub PlayerId);

/// Components for a placed structure.
pub fn structure_bundle(
    prefab: impl Into<String>,
    position: Vec3,
    rotation: Quat,
    owner: PlayerId,
) -> (Prefab, Transform, OwnerId) {
    (
        Prefab(prefab.into()),
        Transform::from_translation(position).with_rotation(rotation),
        OwnerId(owner),
    )
}

// =============================================================================
// Inbound events
// =============================================================================

/// A structure was placed with a planner.
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityBuilt {
    pub planner: Entity,
    pub built: Entity,
}

/// A player typed a chat command (name without the leading slash).
#[derive(Event, Debug, Clone)]
pub struct ChatCommand {
    pub player: Entity,
    pub command: String,
    pub args: Vec<String>,
}

// =============================================================================
// Outbound events
// =============================================================================

/// A deployable item was placed from a planner.
#[derive(Event, Debug, Clone, Copy)]
pub struct ItemDeployed {
    pub planner: Entity,
    pub deployed: Entity,
}

/// A deployable finished placement for `player`.
#[derive(Event, Debug, Clone, Copy)]
pub struct Deployed {
    pub deployed: Entity,
    pub player: PlayerId,
}

/// A barricade was destroyed and `replacement` spawned in its place.
#[derive(Event, Debug, Clone)]
pub struct StructureReplaced {
    pub original: Entity,
    pub replacement: Entity,
    pub destination: String,
    pub owner: PlayerId,
}

/// A chat line sent privately to one player.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub player: PlayerId,
    pub message: String,
}

/// Registers every host event type.
pub struct HostEventsPlugin;

impl Plugin for HostEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EntityBuilt>()
            .add_event::<ChatCommand>()
            .add_event::<ItemDeployed>()
            .add_event::<Deployed>()
            .add_event::<StructureReplaced>()
            .add_event::<ChatReply>();
    }
}
