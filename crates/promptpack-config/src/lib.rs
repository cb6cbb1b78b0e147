#![deny(unsafe_code)]

//! Configuration loading and validation for promptpack.
//!
//! Loads TOML configuration files and validates them against expected schemas.
//! Provides the [`AppConfig`] type as the central configuration structure. All
//! fields have defaults, so a missing `promptpack.toml` is not an error.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where instruction and exclusion stores live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Interactive UI tuning.
    #[serde(default)]
    pub ui: UiConfig,

    /// Directory browsing behavior.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// Storage locations for persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the custom-instructions and exclusion stores.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    ".promptpack".to_string()
}

/// Interactive UI tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event-loop tick interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// How long toast notifications stay on screen, in milliseconds.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

fn default_tick_rate_ms() -> u64 {
    250
}

fn default_toast_duration_ms() -> u64 {
    3000
}

/// Directory browsing behavior.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Whether the directory walk follows symbolic links.
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Directory prefilled into the browse prompt at startup.
    #[serde(default)]
    pub default_directory: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.data_dir must not be empty".to_string(),
            ));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.tick_rate_ms must be non-zero".to_string(),
            ));
        }
        if self.ui.toast_duration_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.toast_duration_ms must be non-zero".to_string(),
            ));
        }
        if let Some(dir) = &self.browse.default_directory {
            if dir.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "browse.default_directory must not be blank when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.data_dir, ".promptpack");
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert_eq!(config.ui.toast_duration_ms, 3000);
        assert!(!config.browse.follow_symlinks);
        assert!(config.browse.default_directory.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = "";
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.storage.data_dir, ".promptpack");
        assert_eq!(config.ui.toast_duration_ms, 3000);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [storage]
            data_dir = "/var/lib/promptpack"

            [ui]
            tick_rate_ms = 100
            toast_duration_ms = 1500

            [browse]
            follow_symlinks = true
            default_directory = "/home/me/project"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/promptpack");
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.ui.toast_duration_ms, 1500);
        assert!(config.browse.follow_symlinks);
        assert_eq!(
            config.browse.default_directory.as_deref(),
            Some("/home/me/project")
        );
    }

    #[test]
    fn test_validation_rejects_empty_data_dir() {
        let toml = r#"
            [storage]
            data_dir = ""
        "#;
        let result = AppConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_tick_rate() {
        let toml = r#"
            [ui]
            tick_rate_ms = 0
        "#;
        let result = AppConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_toast_duration() {
        let toml = r#"
            [ui]
            toast_duration_ms = 0
        "#;
        let result = AppConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_blank_default_directory() {
        let toml = r#"
            [browse]
            default_directory = "   "
        "#;
        let result = AppConfig::parse(toml);
        assert!(result.is_err());
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("promptpack.toml");
        tokio::fs::write(&path, b"[ui]\ntick_rate_ms = 50\n")
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.ui.tick_rate_ms, 50);
        assert_eq!(config.storage.data_dir, ".promptpack");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/file.toml")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(result.is_err());
    }

    // ── Error display ─────────────────────────────────────────────────

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
