use thiserror::Error;

/// Unified error type for cut-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Malformed version: {0}")]
    MalformedVersion(String),

    #[error("Invalid increment: {0}")]
    InvalidIncrement(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Invalid selection: {0}")]
    Selection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Unknown template placeholder: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in cut-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a malformed-version error with context
    pub fn malformed_version(msg: impl Into<String>) -> Self {
        ReleaseError::MalformedVersion(msg.into())
    }

    /// Create an invalid-increment error with context
    pub fn invalid_increment(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidIncrement(msg.into())
    }

    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        ReleaseError::Precondition(msg.into())
    }

    /// Create a selection error with context
    pub fn selection(msg: impl Into<String>) -> Self {
        ReleaseError::Selection(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }
}
