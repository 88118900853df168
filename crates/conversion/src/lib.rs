//! Barricade-to-Wall: turns placed barricades into high external walls.
//!
//! When a player who holds `barricadetowall.use` and has the feature switched
//! on places a barricade listed in the config, the barricade is destroyed on
//! the next tick and the matching wall is spawned in its place, owned by that
//! player. `/barricade` toggles the feature per player.
//!
//! - **[config]** / **[config_migrate]**: config file and its version migration
//! - **[replacement]**: source -> destination prefab table
//! - **[enablement]**: persisted per-player toggle
//! - **[conversion]**: build-event handler and the next-tick swap
//! - **[toggle_command]**: the chat command
//! - **[lifecycle]**: load on startup, unload on exit
//! - **[host]**, **[permissions]**, **[localization]**: what the host provides

use std::path::PathBuf;

use bevy::prelude::*;

pub mod config;
pub mod config_migrate;
pub mod conversion;
pub mod enablement;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod localization;
pub mod permissions;
pub mod replacement;
pub mod toggle_command;
pub mod version;

#[cfg(test)]
pub mod test_harness;

use conversion::{apply_pending_replacements, queue_barricade_replacements, ConversionSettings};
use lifecycle::{load_plugin, unload_on_exit, PluginLoaded, PluginPaths};
use localization::Localizer;
use permissions::Permissions;
use toggle_command::handle_toggle_command;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Number of frames run so far, advanced at the start of every frame.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCounter(pub u64);

pub fn advance_tick(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

/// Ordering of plugin systems within a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BarricadeSet {
    /// PreUpdate: carry out replacements queued on earlier ticks.
    ApplyPending,
    /// Update: react to this frame's build events and chat commands.
    React,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Adds the conversion to an app.
///
/// Hosts can insert their own [`Permissions`], [`Localizer`] or a preset
/// [`config::BarricadeConfig`] before adding the plugin; otherwise in-process
/// defaults are used.
pub struct BarricadeToWallPlugin {
    /// Directory for `BarricadeToWall.json` config. `None` keeps config in memory.
    pub config_dir: Option<PathBuf>,
    /// Directory for `BarricadeToWall.json` player data. `None` keeps it in memory.
    pub data_dir: Option<PathBuf>,
    /// See [`ConversionSettings::reannounce_builds`].
    pub reannounce_builds: bool,
}

impl Default for BarricadeToWallPlugin {
    fn default() -> Self {
        Self {
            config_dir: None,
            data_dir: None,
            reannounce_builds: true,
        }
    }
}

impl Plugin for BarricadeToWallPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(host::HostEventsPlugin)
            .init_resource::<TickCounter>()
            .init_resource::<Permissions>()
            .init_resource::<Localizer>()
            .insert_resource(PluginPaths {
                config_dir: self.config_dir.clone(),
                data_dir: self.data_dir.clone(),
            })
            .insert_resource(ConversionSettings {
                reannounce_builds: self.reannounce_builds,
            })
            .add_systems(Startup, load_plugin)
            .add_systems(First, advance_tick)
            .add_systems(
                PreUpdate,
                apply_pending_replacements
                    .in_set(BarricadeSet::ApplyPending)
                    .run_if(resource_exists::<PluginLoaded>),
            )
            .add_systems(
                Update,
                // Builds see the toggle state from before this frame's commands.
                (queue_barricade_replacements, handle_toggle_command)
                    .chain()
                    .in_set(BarricadeSet::React)
                    .run_if(resource_exists::<PluginLoaded>),
            )
            .add_systems(Last, unload_on_exit);
    }
}
