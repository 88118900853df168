//! Plugin configuration as stored in `BarricadeToWall.json`.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::version::PluginVersion;

/// Name used for the config and data file stems.
pub const PLUGIN_NAME: &str = "BarricadeToWall";

/// Version this build writes into the config file.
pub const CURRENT_VERSION: PluginVersion = PluginVersion::new(1, 1, 0);

/// Capability a player needs both for the toggle command and for conversion.
pub const USE_PERMISSION: &str = "barricadetowall.use";

pub const DEFAULT_CHAT_COMMAND: &str = "barricade";
pub const DEFAULT_ENABLE_BY_DEFAULT: bool = false;

pub const WOOD_BARRICADE: &str =
    "assets/prefabs/deployable/barricades/barricade.cover.wood_double.prefab";
pub const STONE_BARRICADE: &str = "assets/prefabs/deployable/barricades/barricade.stone.prefab";
pub const HIGH_WOOD_WALL: &str =
    "assets/prefabs/building/wall.external.high.wood/wall.external.high.wood.prefab";
pub const HIGH_STONE_WALL: &str =
    "assets/prefabs/building/wall.external.high.stone/wall.external.high.stone.prefab";

/// Barricade prefab -> wall prefab pairs shipped with the plugin.
pub fn default_replacements() -> BTreeMap<String, String> {
    BTreeMap::from([
        (WOOD_BARRICADE.to_string(), HIGH_WOOD_WALL.to_string()),
        (STONE_BARRICADE.to_string(), HIGH_STONE_WALL.to_string()),
    ])
}

/// Operator-editable settings.
///
/// Fields missing from the file deserialize to their shipped defaults, except
/// `Version`, which stays empty so the migration treats the file as pre-1.0.0.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarricadeConfig {
    #[serde(rename = "Version", default)]
    pub version: String,

    #[serde(rename = "Enable By Default", default = "default_enable_by_default")]
    pub enable_by_default: bool,

    #[serde(rename = "Chat Command", default = "default_chat_command")]
    pub chat_command: String,

    #[serde(rename = "Barricade Replacements", default = "default_replacements")]
    pub barricade_replacements: BTreeMap<String, String>,
}

fn default_enable_by_default() -> bool {
    DEFAULT_ENABLE_BY_DEFAULT
}

fn default_chat_command() -> String {
    DEFAULT_CHAT_COMMAND.to_string()
}

impl Default for BarricadeConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            enable_by_default: DEFAULT_ENABLE_BY_DEFAULT,
            chat_command: DEFAULT_CHAT_COMMAND.to_string(),
            barricade_replacements: default_replacements(),
        }
    }
}

impl BarricadeConfig {
    /// Parsed `Version` field; unparseable versions read as 0.0.0.
    pub fn parsed_version(&self) -> PluginVersion {
        PluginVersion::parse_lenient(&self.version)
    }

    /// Whether `command` (as typed by a player, without the slash) invokes the toggle.
    pub fn is_toggle_command(&self, command: &str) -> bool {
        command
            .trim_start_matches('/')
            .eq_ignore_ascii_case(&self.chat_command)
    }
}
