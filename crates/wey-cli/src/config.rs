//! Configuration resolution for the CLI.
//!
//! Precedence: `--config` (or `WEY_CONFIG`), then `wey.toml` in the working
//! directory, then built-in defaults. `--db` (or `WEY_DB`) overrides the
//! database path from whichever source won.

use crate::error::Result;
use std::path::Path;
use wey_social::SocialConfig;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "wey.toml";

/// Resolve the effective configuration.
pub fn load(config_path: Option<&str>, db_override: Option<&str>) -> Result<SocialConfig> {
    let mut config = match config_path {
        Some(path) => SocialConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            SocialConfig::from_file(DEFAULT_CONFIG_FILE)?
        }
        None => SocialConfig::default(),
    };

    if let Some(db) = db_override {
        config.database_path = db.to_string();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "database_path = \"custom.db\"\nmessage_weight = 3.0\n").unwrap();

        let config = load(path.to_str(), None).unwrap();
        assert_eq!(config.database_path, "custom.db");
        assert_eq!(config.message_weight, 3.0);
    }

    #[test]
    fn test_db_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "database_path = \"custom.db\"\n").unwrap();

        let config = load(path.to_str(), Some("other.db")).unwrap();
        assert_eq!(config.database_path, "other.db");
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load(Some("/nonexistent/wey.toml"), None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
