use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wayfinder_core::{ConfigError, ConfigManager, Direction, WayfinderConfig};

#[test]
fn test_create_and_load_default_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    ConfigManager::create_default_config(&config_path).unwrap();
    assert!(config_path.exists());

    let manager = ConfigManager::load_from(&config_path).unwrap();
    assert_eq!(manager.config_path(), Some(config_path.as_path()));
    assert_eq!(manager.config().llm.max_retries, 2);
}

#[test]
fn test_load_custom_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("wayfinder.toml");
    fs::write(
        &config_path,
        r#"
[map]
doors_path = "maps/level2/doors.txt"
connectivity_path = "maps/level2/connectivity.txt"
strict_ids = true

[logging]
format = "compact"
"#,
    )
    .unwrap();

    let manager = ConfigManager::load_from(&config_path).unwrap();
    let config = manager.config();
    assert_eq!(
        config.map.doors_path,
        PathBuf::from("maps/level2/doors.txt")
    );
    assert!(config.map.strict_ids);
    assert_eq!(config.logging.format, "compact");
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigManager::load_from(&temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_invalid_toml_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[map\ndoors_path = ").unwrap();

    let result = ConfigManager::load_from(&config_path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_config_serializes_without_api_key() {
    let mut config = WayfinderConfig::default();
    config.llm.api_key = Some("secret".to_string());
    config.navigation.default_orientation = Direction::West;

    let json = serde_json::to_string(&config).unwrap();
    assert!(!json.contains("secret"));
    assert!(json.contains("\"west\""));
}
