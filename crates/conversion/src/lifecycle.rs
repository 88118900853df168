//! Plugin load and unload.
//!
//! All plugin state lives in world resources inserted by [`load_plugin`] and
//! removed by [`unload_plugin`]. Between the two, [`PluginLoaded`] is present
//! and the plugin's systems run; outside that window they are skipped.

use std::path::PathBuf;

use bevy::prelude::*;
use storage::DataFile;

use crate::config::{BarricadeConfig, PLUGIN_NAME, USE_PERMISSION};
use crate::config_migrate::{load_config, migrate_config, MigrationReport};
use crate::conversion::PendingReplacements;
use crate::enablement::EnablementStore;
use crate::error::PluginError;
use crate::permissions::Permissions;
use crate::replacement::ReplacementTable;

/// Where the plugin keeps its files. `None` keeps that part in memory only.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginPaths {
    pub config_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl PluginPaths {
    pub fn config_file(&self) -> Option<DataFile> {
        self.config_dir
            .as_ref()
            .map(|dir| DataFile::in_dir(dir, PLUGIN_NAME))
    }

    pub fn data_file(&self) -> Option<DataFile> {
        self.data_dir
            .as_ref()
            .map(|dir| DataFile::in_dir(dir, PLUGIN_NAME))
    }
}

/// Marker present while the plugin is loaded.
#[derive(Resource, Debug, Default)]
pub struct PluginLoaded;

/// Everything produced by a successful load.
#[derive(Debug)]
pub struct PluginState {
    pub config: BarricadeConfig,
    pub table: ReplacementTable,
    pub store: EnablementStore,
    pub migration: Option<MigrationReport>,
}

/// Load config and data.
///
/// With a config directory the file is read, migrated and rewritten. Without
/// one, `preset` (or the defaults) is migrated in memory.
pub fn load_plugin_state(
    paths: &PluginPaths,
    preset: Option<BarricadeConfig>,
) -> Result<PluginState, PluginError> {
    let (config, migration) = match paths.config_file() {
        Some(file) => load_config(&file).map_err(PluginError::Config)?,
        None => {
            let mut config = preset.unwrap_or_default();
            let report = migrate_config(&mut config);
            (config, report)
        }
    };

    if config.chat_command.trim().is_empty() {
        return Err(PluginError::InvalidConfig(
            "\"Chat Command\" must not be empty".to_string(),
        ));
    }

    let store = match paths.data_file() {
        Some(file) => {
            EnablementStore::load(file, config.enable_by_default).map_err(PluginError::Data)?
        }
        None => EnablementStore::in_memory(config.enable_by_default),
    };

    let table = ReplacementTable::from_config(&config);
    if let Some(rule) = table.chained_rule() {
        return Err(PluginError::InvalidConfig(format!(
            "replacement \"{}\" -> \"{}\" targets a prefab that is itself replaced",
            rule.source, rule.destination
        )));
    }

    Ok(PluginState {
        table,
        config,
        store,
        migration,
    })
}

/// Startup system: build plugin state and register the use permission.
///
/// On failure the error is logged and the plugin stays unloaded.
pub fn load_plugin(world: &mut World) {
    world
        .get_resource_or_insert_with(Permissions::default)
        .register(USE_PERMISSION);

    let paths = world
        .get_resource::<PluginPaths>()
        .cloned()
        .unwrap_or_default();
    let preset = world.remove_resource::<BarricadeConfig>();

    let state = match load_plugin_state(&paths, preset) {
        Ok(state) => state,
        Err(e) => {
            error!("{PLUGIN_NAME} failed to load: {e}");
            return;
        }
    };

    info!(
        "{PLUGIN_NAME} loaded: {} replacement rule(s), {} stored player preference(s), command /{}",
        state.table.len(),
        state.store.len(),
        state.config.chat_command
    );

    world.insert_resource(state.config);
    world.insert_resource(state.table);
    world.insert_resource(state.store);
    world.insert_resource(PendingReplacements::default());
    world.insert_resource(PluginLoaded);
}

/// Drop all plugin state. Queued replacements are abandoned.
pub fn unload_plugin(world: &mut World) {
    if world.remove_resource::<PluginLoaded>().is_none() {
        return;
    }
    world.remove_resource::<BarricadeConfig>();
    world.remove_resource::<ReplacementTable>();
    world.remove_resource::<EnablementStore>();
    if let Some(pending) = world.remove_resource::<PendingReplacements>() {
        if !pending.is_empty() {
            debug!("Dropping {} pending replacement(s) on unload", pending.len());
        }
    }
    info!("{PLUGIN_NAME} unloaded");
}

/// Last-schedule system: unload when the app is exiting.
pub fn unload_on_exit(mut exits: EventReader<AppExit>, mut commands: Commands) {
    if exits.read().next().is_some() {
        commands.queue(unload_plugin);
    }
}
