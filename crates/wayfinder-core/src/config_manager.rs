use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::Direction;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for Wayfinder
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WayfinderConfig {
    /// Where the building map is read from
    #[serde(default)]
    pub map: MapConfig,

    /// Start position used when none (or an unknown one) is given
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Chat-completion endpoint that turns prompts into directions
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Door list: `<name> <WALL>` per line
    #[serde(default = "default_doors_path")]
    pub doors_path: PathBuf,

    /// Connectivity list: `<name> <north> <south> <west> <east>` per line
    #[serde(default = "default_connectivity_path")]
    pub connectivity_path: PathBuf,

    /// Reject duplicate door names instead of keeping the first one
    #[serde(default)]
    pub strict_ids: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            doors_path: default_doors_path(),
            connectivity_path: default_connectivity_path(),
            strict_ids: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_start")]
    pub default_start: String,

    #[serde(default = "default_orientation")]
    pub default_orientation: Direction,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_start: default_start(),
            default_orientation: default_orientation(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// OpenAI-compatible chat-completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL, without the `/chat/completions` suffix
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key; usually supplied through OPENAI_API_KEY rather than the file
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Reply length cap; directions are a handful of sentences
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: Option<usize>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_secs: default_llm_timeout_secs(),
            max_retries: default_llm_max_retries(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
        }
    }
}

fn default_llm_max_tokens() -> Option<usize> {
    Some(200)
}
fn default_doors_path() -> PathBuf {
    PathBuf::from("data/all_doors.txt")
}
fn default_connectivity_path() -> PathBuf {
    PathBuf::from("data/door_connectivity.txt")
}
fn default_start() -> String {
    "maindoor".to_string()
}
fn default_orientation() -> Direction {
    crate::DEFAULT_ORIENTATION
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_llm_model() -> String {
    "gpt-4".to_string()
}
fn default_llm_timeout_secs() -> u64 {
    60
}
fn default_llm_max_retries() -> u32 {
    2
}
fn default_llm_temperature() -> f32 {
    0.2
}

/// Configuration manager: environment, then config file, then defaults
pub struct ConfigManager {
    config: WayfinderConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.wayfinder.toml)
    /// 3. Sensible defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        let (config, config_path) = Self::load_config_file()?;
        Self::finish(config, config_path)
    }

    /// Load from an explicit file; environment variables still win.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_dotenv();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let config = Self::read_toml_file(path)?;
        Self::finish(config, Some(path.to_path_buf()))
    }

    fn finish(
        config: WayfinderConfig,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config = Self::apply_env_overrides(config);
        Self::validate_config(&config)?;

        info!(
            config_file = ?config_path,
            doors = %config.map.doors_path.display(),
            connectivity = %config.map.connectivity_path.display(),
            "configuration loaded"
        );

        Ok(Self {
            config,
            config_path,
        })
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".wayfinder.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .wayfinder.env: {}", e);
                }
            }
        }
    }

    /// Search order:
    /// 1. ./.wayfinder.toml
    /// 2. ~/.wayfinder/config.toml
    /// 3. Defaults
    fn load_config_file() -> Result<(WayfinderConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".wayfinder.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".wayfinder").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((WayfinderConfig::default(), None))
    }

    fn read_toml_file(path: &Path) -> Result<WayfinderConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_env_overrides(mut config: WayfinderConfig) -> WayfinderConfig {
        if let Ok(path) = std::env::var("WAYFINDER_DOORS_FILE") {
            config.map.doors_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("WAYFINDER_CONNECTIVITY_FILE") {
            config.map.connectivity_path = PathBuf::from(path);
        }
        if let Ok(strict) = std::env::var("WAYFINDER_STRICT_IDS") {
            config.map.strict_ids = strict.to_lowercase() == "true" || strict == "1";
        }

        if let Ok(start) = std::env::var("WAYFINDER_START") {
            config.navigation.default_start = start;
        }
        if let Ok(orientation) = std::env::var("WAYFINDER_ORIENTATION") {
            config.navigation.default_orientation = Direction::parse_or_default(&orientation);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.logging.level = level;
        }

        if let Ok(url) = std::env::var("WAYFINDER_LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("WAYFINDER_LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.api_key = Some(key);
        }

        config
    }

    fn validate_config(config: &WayfinderConfig) -> Result<(), ConfigError> {
        if config.map.doors_path.as_os_str().is_empty()
            || config.map.connectivity_path.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "map.doors_path and map.connectivity_path must not be empty".to_string(),
            ));
        }

        if config.navigation.default_start.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "navigation.default_start must not be empty".to_string(),
            ));
        }

        // RUST_LOG may carry a full filter directive; only plain levels are checked
        let level = config.logging.level.as_str();
        if !level.contains('=') && !level.contains(',') {
            match level {
                "trace" | "debug" | "info" | "warn" | "error" => {}
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        other
                    )))
                }
            }
        }

        match config.logging.format.as_str() {
            "pretty" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, compact",
                    other
                )))
            }
        }

        if !(0.0..=2.0).contains(&config.llm.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid llm.temperature: {}. Must be between 0.0 and 2.0",
                config.llm.temperature
            )));
        }

        Ok(())
    }

    pub fn config(&self) -> &WayfinderConfig {
        &self.config
    }

    /// Path of the config file that was loaded, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Write a default config file
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = WayfinderConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WayfinderConfig::default();
        assert_eq!(config.navigation.default_start, "maindoor");
        assert_eq!(config.navigation.default_orientation, Direction::East);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.map.strict_ids);
        assert_eq!(config.map.doors_path, PathBuf::from("data/all_doors.txt"));
        assert_eq!(
            config.map.connectivity_path,
            PathBuf::from("data/door_connectivity.txt")
        );
        assert_eq!(config.llm.max_tokens, Some(200));
    }

    #[test]
    fn test_config_validation() {
        let config = WayfinderConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());

        let mut bad_config = config.clone();
        bad_config.logging.format = "xml".to_string();
        assert!(ConfigManager::validate_config(&bad_config).is_err());

        let mut bad_config = config.clone();
        bad_config.map.doors_path = PathBuf::new();
        assert!(ConfigManager::validate_config(&bad_config).is_err());

        let mut directive = config;
        directive.logging.level = "wayfinder_graph=debug".to_string();
        assert!(ConfigManager::validate_config(&directive).is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: WayfinderConfig = toml::from_str(
            r#"
            [navigation]
            default_orientation = "north"
            "#,
        )
        .unwrap();
        assert_eq!(config.navigation.default_orientation, Direction::North);
        assert_eq!(config.navigation.default_start, "maindoor");
        assert_eq!(config.map.doors_path, PathBuf::from("data/all_doors.txt"));
        assert_eq!(config.llm.max_tokens, Some(200));
    }
}
