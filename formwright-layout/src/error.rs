//! Error types for layout decoding, editing and configuration

use thiserror::Error;

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur outside of normalization.
///
/// Normalization itself never fails: structural problems become warnings and
/// unresolved references become report errors. These variants cover input that
/// cannot be turned into a layout tree at all.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A JSON element could not be decoded into a layout node
    #[error("invalid layout element at {path}: {reason}")]
    InvalidElement { path: String, reason: String },

    /// A size attribute was not a positive number
    #[error("invalid size.{attribute} at {path}: {value}")]
    InvalidSize {
        path: String,
        attribute: &'static str,
        value: String,
    },

    /// Insertion target group does not exist at top level
    #[error("group not found: {code}")]
    GroupNotFound { code: String },

    /// Configuration value out of range
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for LayoutError {
    fn from(err: figment::Error) -> Self {
        LayoutError::Config(Box::new(err))
    }
}
