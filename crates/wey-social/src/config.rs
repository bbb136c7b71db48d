//! Configuration for the social graph engines
//!
//! Loaded from TOML. Every field has a default so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Configuration for the social graph service
///
/// # Examples
///
/// ```
/// use wey_social::SocialConfig;
///
/// let config = SocialConfig::from_toml_str("message_weight = 3.0").unwrap();
/// assert_eq!(config.message_weight, 3.0);
/// assert_eq!(config.database_path, "wey.db");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialConfig {
    /// SQLite database file
    /// Default: "wey.db"
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Score added to a pair's connection for each message
    /// Default: 2.0
    #[serde(default = "default_message_weight")]
    pub message_weight: f64,

    /// Tracing filter directive used when `RUST_LOG` is unset
    /// Default: "info"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Notification dispatch settings
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Notification dispatch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Dispatch events to the notification worker
    /// Default: true
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bound of the event channel; events are dropped when it is full
    /// Default: 256
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_database_path() -> String {
    "wey.db".to_string()
}

fn default_message_weight() -> f64 {
    2.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            message_weight: default_message_weight(),
            log_level: default_log_level(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl SocialConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SocialConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.message_weight.is_finite() || self.message_weight < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "message_weight must be a non-negative number, got {}",
                self.message_weight
            )));
        }
        if self.notifications.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notifications.channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SocialConfig::default();
        assert_eq!(config.database_path, "wey.db");
        assert_eq!(config.message_weight, 2.0);
        assert_eq!(config.log_level, "info");
        assert!(config.notifications.enabled);
        assert_eq!(config.notifications.channel_capacity, 256);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            database_path = "/var/lib/wey/graph.db"
            message_weight = 1.5
            log_level = "debug"

            [notifications]
            enabled = false
            channel_capacity = 16
        "#;

        let config = SocialConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.database_path, "/var/lib/wey/graph.db");
        assert_eq!(config.message_weight, 1.5);
        assert_eq!(config.log_level, "debug");
        assert!(!config.notifications.enabled);
        assert_eq!(config.notifications.channel_capacity, 16);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SocialConfig::from_toml_str("").unwrap();
        assert_eq!(config.message_weight, 2.0);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = SocialConfig::from_toml_str("message_weight = -1.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = SocialConfig::from_toml_str("[notifications]\nchannel_capacity = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wey.toml");
        std::fs::write(&path, "database_path = \"graph.db\"\n").unwrap();

        let config = SocialConfig::from_file(&path).unwrap();
        assert_eq!(config.database_path, "graph.db");
    }

    #[test]
    fn test_missing_file() {
        let result = SocialConfig::from_file("/definitely/not/here/wey.toml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
