//! Transport boundary for externalizing session identifiers.
//!
//! The session store never touches a live request or response. Whatever
//! carries the identifier to the client — a cookie header, a custom header,
//! a token field — sits behind this trait, and the store only tells it when
//! the reference changes.

use chrono::{DateTime, Utc};

/// External-reference channel for session identifiers.
///
/// Implementations publish outgoing state (e.g. queue a `Set-Cookie`
/// header) and own their error handling; the store has nothing useful to
/// do with a failed publish.
pub trait Transport: Send + Sync {
    /// Publish or refresh the external session reference.
    fn set_external_reference(&self, name: &str, value: &str, expires_at: DateTime<Utc>);

    /// Invalidate the external session reference.
    fn clear_external_reference(&self, name: &str);
}

/// A no-op transport for embeddings without an external reference channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransport;

impl Transport for NoTransport {
    fn set_external_reference(&self, _name: &str, _value: &str, _expires_at: DateTime<Utc>) {}

    fn clear_external_reference(&self, _name: &str) {}
}
