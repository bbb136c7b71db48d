//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] wey_social::ConfigError),

    /// Database could not be opened or initialised
    #[error("Store error: {0}")]
    Store(#[from] wey_store::StoreError),

    /// Social graph operation failed
    #[error(transparent)]
    Social(#[from] wey_social::SocialError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
