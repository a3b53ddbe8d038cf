//! Storage adapter contract.
//!
//! This module defines the capability contract that decouples the session
//! layer from the persistence medium. Any backend that can check access,
//! read, save, erase, and sweep entries is compatible: a directory of
//! files, a key-value store, a relational table.

use std::fmt;

use crate::error::Result;
use crate::record::Record;
use crate::tier::TierSet;

/// Reserved storage key for the sweep-scheduling log record.
///
/// The leading dot keeps the record inside the hidden-entry namespace, so
/// a sweep never classifies it as a session.
pub const SESSION_LOG_KEY: &str = ".sesslog";

/// Opaque handle identifying where session entries live.
///
/// A directory path for the file adapter; a connection string for a
/// database adapter. The session layer passes it through verbatim and
/// never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository(String);

impl Repository {
    /// Wrap a backend-specific handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The raw handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Repository {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

impl From<String> for Repository {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

/// Outcome of a best-effort expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries considered for expiry.
    pub examined: usize,

    /// Entries removed because their age reached their tier's TTL.
    pub removed: usize,

    /// Entries left alone: unrecognizable tier, unreadable metadata, or a
    /// failed deletion.
    pub skipped: usize,
}

/// Capability contract for a session repository backend.
///
/// All operations are blocking and may be called from any worker thread;
/// implementations hold no per-call state. No operation is retried by the
/// caller, and none carries a timeout contract — networked backends should
/// add their own as a non-breaking extension.
pub trait StorageAdapter: Send + Sync {
    /// Whether the repository is currently readable and writable.
    ///
    /// Called once at session construction to fail fast.
    fn check_access(&self, repository: &Repository) -> bool;

    /// Whether an entry exists under the given key.
    fn exists(&self, repository: &Repository, key: &str) -> Result<bool>;

    /// Read and decode the entry under the given key.
    ///
    /// Fails with [`StoreError::NotFound`] if the entry is absent and
    /// [`StoreError::Corrupt`] if its blob cannot be decoded, so callers
    /// can tell "never existed" from "data integrity problem".
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    /// [`StoreError::Corrupt`]: crate::StoreError::Corrupt
    fn read(&self, repository: &Repository, key: &str) -> Result<Record>;

    /// Encode and write the record under the given key, overwriting any
    /// existing entry.
    fn save(&self, repository: &Repository, key: &str, record: &Record) -> Result<()>;

    /// Delete the entry under the given key.
    ///
    /// Returns `Ok(false)` when the key did not exist; absence is not an
    /// error.
    fn erase(&self, repository: &Repository, key: &str) -> Result<bool>;

    /// Sweep the repository, deleting every tier-expired entry.
    ///
    /// Enumerates all entries except the reserved log record and entries
    /// hidden by adapter convention, classifies each by its tier suffix
    /// (entries with no recognizable tier are skipped, never deleted), and
    /// deletes those whose last-modified age has reached their tier's TTL.
    /// Best-effort: per-entry failures are logged and skipped, and an entry
    /// vanishing mid-sweep counts as already removed.
    fn collect_garbage(&self, repository: &Repository, tiers: &TierSet) -> SweepReport;
}
