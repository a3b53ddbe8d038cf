//! Error types for storage operations.

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by storage adapters and the identifier codec.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No entry exists under the given key.
    #[error("entry not found: {0}")]
    NotFound(String),

    /// An entry exists but its blob could not be decoded.
    #[error("corrupt entry '{key}': {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    /// A record could not be encoded for storage.
    #[error("failed to encode entry '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An identifier carries no recognized lifetime-tier suffix.
    #[error("session identifier '{0}' has no recognized lifetime suffix")]
    UnrecognizedId(String),

    /// The configured lifetime tiers violate the naming invariant.
    #[error("invalid lifetime tier set: {0}")]
    InvalidTierSet(String),
}
