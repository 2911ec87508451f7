//! Config file round trips

use ellipsekit_settings::{ClearPolicy, Config, SettingsError};
use tempfile::TempDir;

#[test]
fn test_toml_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::new();
    config.ring.number_of_waypoints = 24;
    config.ring.vertical_radius = 0.08;
    config.sync.clear_policy = ClearPolicy::AllChildren;
    config.sync.settle_delay_ms = 50;
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = Config::new();
    config.sync.point_name_prefix = "Ring".to_string();
    config.save_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"pointNamePrefix\": \"Ring\""));
    assert!(content.contains("\"numberOfWaypoints\": 16"));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.sync.point_name_prefix, "Ring");
}

#[test]
fn test_load_rejects_invalid_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{ "ring": { "toolSpeed": 0.0 } }"#).unwrap();

    let result = Config::load_from_file(&path);
    assert!(matches!(result, Err(SettingsError::InvalidSetting { .. })));
}

#[test]
fn test_load_or_default_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_malformed_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[ring\nnumberOfWaypoints = ").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}
