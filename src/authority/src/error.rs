//! Error types for the authority registry

use thiserror::Error;

use crate::host::HostPatternError;

/// Authority registry errors
///
/// Lookups never produce these; an unknown grantee is `None`. Only
/// installing a new generation can fail.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// Two entries share the same (username, host pattern) key
    #[error("Duplicate identity: '{username}'@'{host}'")]
    DuplicateIdentity {
        /// Username of the repeated identity
        username: String,
        /// Normalized host pattern of the repeated identity
        host: String,
    },

    /// Host pattern could not be parsed
    #[error("Invalid host pattern: {0}")]
    InvalidHostPattern(#[from] HostPatternError),

    /// Privilege loader failed to produce a mapping
    #[error("Loader error: {0}")]
    Loader(String),
}

/// Result type for authority operations
pub type Result<T> = std::result::Result<T, AuthorityError>;
