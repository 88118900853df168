// ---------------------------------------------------------------------------
// Config migration: ordered version thresholds applied on load
// ---------------------------------------------------------------------------
//
// Each step names the first release that no longer needs it. A config whose
// stored version sorts below that threshold gets the step applied. Steps run in
// threshold order and the version is stamped to CURRENT_VERSION at the end.

use bevy::log::{debug, warn};
use storage::{DataFile, StorageError};

use crate::config::{BarricadeConfig, CURRENT_VERSION};
use crate::version::PluginVersion;

/// One migration: rewrites parts of `config` from the shipped `defaults`.
pub(crate) struct MigrationStep {
    pub applies_below: PluginVersion,
    pub description: &'static str,
    pub migrate_fn: fn(&mut BarricadeConfig, &BarricadeConfig),
}

/// What the migration did to a loaded config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub original_version: PluginVersion,
    pub final_version: PluginVersion,
    pub step_descriptions: Vec<&'static str>,
}

impl MigrationReport {
    pub fn steps_applied(&self) -> usize {
        self.step_descriptions.len()
    }
}

pub(crate) struct MigrationRegistry {
    steps: Vec<MigrationStep>,
    current_version: PluginVersion,
}

impl MigrationRegistry {
    /// # Panics
    ///
    /// Panics if two steps share a threshold or a threshold is newer than
    /// `current_version` (such a step would run on every load).
    pub fn new(mut steps: Vec<MigrationStep>, current_version: PluginVersion) -> Self {
        let mut seen = std::collections::HashSet::new();
        for step in &steps {
            assert!(
                seen.insert(step.applies_below),
                "Duplicate migration threshold {}",
                step.applies_below
            );
            assert!(
                step.applies_below <= current_version,
                "Migration threshold {} is newer than current version {}",
                step.applies_below,
                current_version
            );
        }
        steps.sort_by_key(|s| s.applies_below);
        Self {
            steps,
            current_version,
        }
    }

    /// Bring `config` up to the current version. Returns `None` when it was
    /// already current (or newer, which is left alone).
    pub fn migrate(&self, config: &mut BarricadeConfig) -> Option<MigrationReport> {
        let original_version = config.parsed_version();
        if original_version >= self.current_version {
            return None;
        }

        let defaults = BarricadeConfig::default();
        let mut step_descriptions = Vec::new();
        for step in &self.steps {
            if original_version < step.applies_below {
                (step.migrate_fn)(config, &defaults);
                step_descriptions.push(step.description);
            }
        }

        config.version = self.current_version.to_string();

        Some(MigrationReport {
            original_version,
            final_version: self.current_version,
            step_descriptions,
        })
    }

    #[cfg(test)]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

pub(crate) fn build_migration_registry() -> MigrationRegistry {
    let steps = vec![
        MigrationStep {
            applies_below: PluginVersion::new(1, 0, 0),
            description: "Pre-release config, replace everything with defaults",
            migrate_fn: |config, defaults| *config = defaults.clone(),
        },
        MigrationStep {
            applies_below: PluginVersion::new(1, 1, 0),
            description: "Add per-player toggle: reset Chat Command and Enable By Default",
            migrate_fn: |config, defaults| {
                config.chat_command = defaults.chat_command.clone();
                config.enable_by_default = defaults.enable_by_default;
            },
        },
    ];
    MigrationRegistry::new(steps, CURRENT_VERSION)
}

/// Apply all pending migrations to an in-memory config.
pub fn migrate_config(config: &mut BarricadeConfig) -> Option<MigrationReport> {
    build_migration_registry().migrate(config)
}

/// Load the config file, migrating and rewriting it.
///
/// A missing file yields the defaults. The file is always written back so new
/// fields and the stamped version land on disk.
pub fn load_config(
    file: &DataFile,
) -> Result<(BarricadeConfig, Option<MigrationReport>), StorageError> {
    let mut config = match file.load::<BarricadeConfig>()? {
        Some(config) => config,
        None => {
            debug!(
                "No config at {}, writing defaults",
                file.path().display()
            );
            BarricadeConfig::default()
        }
    };

    let report = if config.parsed_version() < CURRENT_VERSION {
        warn!("Config changes detected! Updating...");
        let report = migrate_config(&mut config);
        if let Some(report) = &report {
            warn!(
                "Config update complete! Updated from version {} to {}",
                report.original_version, report.final_version
            );
        }
        report
    } else {
        None
    };

    file.save(&config)?;
    Ok((config, report))
}
