//! Build-event reaction and the deferred barricade -> wall swap.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::config::USE_PERMISSION;
use crate::enablement::EnablementStore;
use crate::host::{
    structure_bundle, Deployed, EntityBuilt, ItemDeployed, Planner, Player, Prefab,
    StructureReplaced,
};
use crate::permissions::Permissions;
use crate::replacement::ReplacementTable;
use crate::TickCounter;

use super::queue::{PendingReplacement, PendingReplacements};

/// Runtime switches for the conversion, set from the plugin.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ConversionSettings {
    /// Re-send `EntityBuilt`, `ItemDeployed` and `Deployed` for the new wall
    /// so other observers treat it as the placed structure.
    pub reannounce_builds: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            reannounce_builds: true,
        }
    }
}

/// Reads build events and queues a replacement for each barricade placed by
/// a permitted, opted-in player. Never touches the world itself: destroying
/// the structure inside the tick that announced it is left to
/// [`apply_pending_replacements`].
#[allow(clippy::too_many_arguments)]
pub fn queue_barricade_replacements(
    mut built: EventReader<EntityBuilt>,
    tick: Res<TickCounter>,
    table: Res<ReplacementTable>,
    store: Res<EnablementStore>,
    permissions: Res<Permissions>,
    mut pending: ResMut<PendingReplacements>,
    planners: Query<&Planner>,
    players: Query<&Player>,
    structures: Query<(&Prefab, &Transform)>,
) {
    for event in built.read() {
        let Ok(planner) = planners.get(event.planner) else {
            continue;
        };
        let Some(Ok(player)) = planner.owner.map(|owner| players.get(owner)) else {
            continue;
        };

        if !permissions.has_permission(player.id, USE_PERMISSION) {
            continue;
        }
        if !store.get(player.id) {
            continue;
        }

        let Ok((prefab, transform)) = structures.get(event.built) else {
            continue;
        };
        let Some(destination) = table.destination_for(&prefab.0) else {
            continue;
        };

        debug!(
            "Queued {} -> {} for player {} on tick {}",
            prefab.0, destination, player.id, tick.0
        );
        pending.push(PendingReplacement {
            original: event.built,
            planner: event.planner,
            destination: destination.to_string(),
            position: transform.translation,
            rotation: transform.rotation,
            owner: player.id,
            queued_on: tick.0,
        });
    }
}

/// Destroys each due original, then spawns its replacement with the captured
/// transform and owner.
///
/// A replacement whose original has already vanished is dropped. Re-announced
/// events that need the planner are skipped if the planner is gone.
#[allow(clippy::too_many_arguments)]
pub fn apply_pending_replacements(
    mut commands: Commands,
    tick: Res<TickCounter>,
    settings: Res<ConversionSettings>,
    mut pending: ResMut<PendingReplacements>,
    originals: Query<(), With<Prefab>>,
    planners: Query<(), With<Planner>>,
    mut built: EventWriter<EntityBuilt>,
    mut item_deployed: EventWriter<ItemDeployed>,
    mut deployed: EventWriter<Deployed>,
    mut replaced: EventWriter<StructureReplaced>,
) {
    let due = pending.drain_due(tick.0);
    if due.is_empty() {
        return;
    }

    let mut consumed: HashSet<Entity> = HashSet::new();
    for job in due {
        if originals.get(job.original).is_err() || !consumed.insert(job.original) {
            debug!("Original {:?} gone before replacement, skipping", job.original);
            continue;
        }

        commands.entity(job.original).despawn();
        let replacement = commands
            .spawn(structure_bundle(
                job.destination.clone(),
                job.position,
                job.rotation,
                job.owner,
            ))
            .id();

        replaced.send(StructureReplaced {
            original: job.original,
            replacement,
            destination: job.destination,
            owner: job.owner,
        });

        if !settings.reannounce_builds {
            continue;
        }
        if planners.get(job.planner).is_ok() {
            built.send(EntityBuilt {
                planner: job.planner,
                built: replacement,
            });
            item_deployed.send(ItemDeployed {
                planner: job.planner,
                deployed: replacement,
            });
        }
        deployed.send(Deployed {
            deployed: replacement,
            player: job.owner,
        });
    }
}
