//! Session error types.

use tessera_store::StoreError;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by the session store and its settings.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The repository failed the construction-time access probe.
    #[error("session repository '{0}' is not readable and writable")]
    RepositoryUnavailable(String),

    /// The requested lifetime tier is not configured.
    #[error("unknown session lifetime '{0}'")]
    UnknownTier(String),

    /// The sweep-trigger threshold must be positive.
    #[error("garbage collector run rate must be at least 1")]
    InvalidRunRate,

    /// A required lifetime tier has no TTL configured.
    #[error("no TTL configured for required lifetime '{0}'")]
    MissingTier(&'static str),

    /// Failed to read a settings file.
    #[error("failed to read settings file '{path}': {source}")]
    ReadSettings {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse settings.
    #[error("failed to parse settings: {0}")]
    ParseSettings(#[from] toml::de::Error),

    /// Storage layer failure, propagated untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}
