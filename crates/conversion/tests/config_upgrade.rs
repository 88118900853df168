//! Upgrading an on-disk config from older plugin versions, through the
//! public loading API only.

use std::fs;
use std::path::{Path, PathBuf};

use conversion::config::{BarricadeConfig, CURRENT_VERSION, HIGH_STONE_WALL, STONE_BARRICADE};
use conversion::lifecycle::{load_plugin_state, PluginPaths};
use conversion::version::PluginVersion;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("barricade_upgrade_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn paths(dir: &Path) -> PluginPaths {
    PluginPaths {
        config_dir: Some(dir.to_path_buf()),
        data_dir: Some(dir.join("data")),
    }
}

#[test]
fn upgrade_from_1_0_0_resets_command_and_default_only() {
    let dir = scratch("from_1_0_0");
    fs::write(
        dir.join("BarricadeToWall.json"),
        r#"{
            "Version": "1.0.0",
            "Enable By Default": true,
            "Chat Command": "x",
            "Barricade Replacements": {
                "assets/prefabs/deployable/barricades/barricade.stone.prefab": "assets/prefabs/building/wall.external.high.stone/wall.external.high.stone.prefab"
            }
        }"#,
    )
    .unwrap();

    let state = load_plugin_state(&paths(&dir), None).unwrap();

    assert_eq!(state.config.version, CURRENT_VERSION.to_string());
    assert_eq!(state.config.chat_command, "barricade");
    assert!(!state.config.enable_by_default);
    assert_eq!(state.table.len(), 1);
    assert_eq!(state.table.destination_for(STONE_BARRICADE), Some(HIGH_STONE_WALL));

    let report = state.migration.expect("1.0.0 should be migrated");
    assert_eq!(report.original_version, PluginVersion::new(1, 0, 0));
    assert_eq!(report.steps_applied(), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn config_without_version_is_fully_reset() {
    let dir = scratch("no_version");
    fs::write(
        dir.join("BarricadeToWall.json"),
        r#"{ "Chat Command": "mine", "Barricade Replacements": {} }"#,
    )
    .unwrap();

    let state = load_plugin_state(&paths(&dir), None).unwrap();

    assert_eq!(state.config, BarricadeConfig::default());
    assert_eq!(state.table.len(), 2);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn current_config_loads_unchanged_and_is_rewritten() {
    let dir = scratch("current");
    let mut config = BarricadeConfig::default();
    config.chat_command = "b2w".to_string();
    config.enable_by_default = true;
    fs::write(
        dir.join("BarricadeToWall.json"),
        serde_json::to_string(&config).unwrap(),
    )
    .unwrap();

    let state = load_plugin_state(&paths(&dir), None).unwrap();
    assert_eq!(state.config, config);
    assert!(state.migration.is_none());
    assert!(state.store.default_enabled());

    // Written back pretty-printed.
    let text = fs::read_to_string(dir.join("BarricadeToWall.json")).unwrap();
    assert!(text.contains('\n'));

    let _ = fs::remove_dir_all(&dir);
}
