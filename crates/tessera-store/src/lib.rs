//! Storage layer for the Tessera session store.
//!
//! This crate provides everything below the session surface:
//! - The [`StorageAdapter`] contract that abstracts the persistence medium
//! - A reference file-backed adapter ([`FileAdapter`])
//! - The composite-identifier codec ([`id`]) and lifetime-tier registry
//!   ([`TierSet`])
//! - The [`Record`] key-value bundle persisted for each session
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_store::{FileAdapter, Repository, StorageAdapter};
//!
//! let adapter = FileAdapter::new();
//! let repo = Repository::new("/var/lib/app/sessions");
//! let record = adapter.read(&repo, "d41d8cd98f00b204e9800998ecf8427eshort")?;
//! ```

mod adapter;
mod error;
mod file;
pub mod id;
mod record;
mod tier;

pub use adapter::{Repository, SESSION_LOG_KEY, StorageAdapter, SweepReport};
pub use error::{Result, StoreError};
pub use file::FileAdapter;
pub use record::{Key, Record};
pub use tier::{TierSet, TierSpec};
