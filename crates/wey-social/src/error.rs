//! Error types for social graph operations

use thiserror::Error;

/// Result type alias for social graph operations
pub type Result<T> = std::result::Result<T, SocialError>;

/// Errors that can occur in the workflow, scoring and graph engines
///
/// Duplicate requests are not errors; see [`crate::SendOutcome::Duplicate`].
#[derive(Error, Debug)]
pub enum SocialError {
    /// Referenced identity or request does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Self-referential request or interaction, or a malformed weight
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    /// Removal attempted on a pair that are not friends
    #[error("Not friends")]
    NotFriends,

    /// Persistence failure, surfaced unmodified and never retried
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SocialError {
    /// Wrap a store error, preserving it as the source
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SocialError::StoreUnavailable(Box::new(err))
    }
}
