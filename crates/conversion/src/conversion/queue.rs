use bevy::prelude::*;

use crate::host::PlayerId;

/// A replacement captured at build time and carried out on a later tick.
///
/// Position, rotation and owner are copied out of the world when the build
/// event is seen because the original is gone by the time the wall spawns.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReplacement {
    pub original: Entity,
    pub planner: Entity,
    pub destination: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub owner: PlayerId,
    /// Tick the build event was handled on. Never executed on this tick.
    pub queued_on: u64,
}

/// Replacements waiting for the next tick. Dropping this resource (plugin
/// unload) abandons everything still queued.
#[derive(Resource, Debug, Default)]
pub struct PendingReplacements {
    pending: Vec<PendingReplacement>,
}

impl PendingReplacements {
    pub fn push(&mut self, replacement: PendingReplacement) {
        self.pending.push(replacement);
    }

    /// Remove and return, in queue order, every entry queued before `current_tick`.
    pub fn drain_due(&mut self, current_tick: u64) -> Vec<PendingReplacement> {
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|p| p.queued_on < current_tick);
        self.pending = waiting;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
