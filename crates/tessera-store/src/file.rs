//! Reference file-backed adapter.
//!
//! One file per session, named exactly as the composite identifier, inside
//! the repository directory; contents are a single JSON object. Entry age
//! for the expiry sweep comes from the filesystem modification time.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::adapter::{Repository, StorageAdapter, SweepReport};
use crate::error::{Result, StoreError};
use crate::record::Record;
use crate::tier::TierSet;

/// File-backed session repository adapter.
///
/// Stateless; a single instance can serve any number of repositories
/// concurrently. Entries whose name begins with `.` are hidden from sweeps,
/// which also covers the reserved log record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileAdapter;

impl FileAdapter {
    /// Create a new file adapter.
    pub fn new() -> Self {
        Self
    }

    fn entry_path(&self, repository: &Repository, key: &str) -> PathBuf {
        Path::new(repository.as_str()).join(key)
    }
}

impl StorageAdapter for FileAdapter {
    fn check_access(&self, repository: &Repository) -> bool {
        let path = Path::new(repository.as_str());
        match fs::metadata(path) {
            Ok(meta) => {
                meta.is_dir() && !meta.permissions().readonly() && fs::read_dir(path).is_ok()
            }
            Err(_) => false,
        }
    }

    fn exists(&self, repository: &Repository, key: &str) -> Result<bool> {
        Ok(self.entry_path(repository, key).is_file())
    }

    fn read(&self, repository: &Repository, key: &str) -> Result<Record> {
        let path = self.entry_path(repository, key);
        let blob = fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(key.to_string())
            } else {
                StoreError::Io(e)
            }
        })?;
        serde_json::from_slice(&blob).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            source: e,
        })
    }

    fn save(&self, repository: &Repository, key: &str, record: &Record) -> Result<()> {
        let blob = serde_json::to_vec(record).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;
        fs::write(self.entry_path(repository, key), blob)?;
        Ok(())
    }

    fn erase(&self, repository: &Repository, key: &str) -> Result<bool> {
        match fs::remove_file(self.entry_path(repository, key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn collect_garbage(&self, repository: &Repository, tiers: &TierSet) -> SweepReport {
        let mut report = SweepReport::default();

        let entries = match fs::read_dir(repository.as_str()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(repository = %repository, error = %e, "expiry sweep could not enumerate repository");
                return report;
            }
        };

        let now = Utc::now();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(repository = %repository, error = %e, "unreadable directory entry, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                report.skipped += 1;
                continue;
            };

            // Hidden entries, including the sweep log record.
            if name.starts_with('.') {
                continue;
            }

            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(entry = name, error = %e, "unreadable entry metadata, skipping");
                    report.skipped += 1;
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }

            report.examined += 1;

            let Some((_, tier)) = tiers.match_suffix(name) else {
                debug!(entry = name, "no recognizable tier suffix, leaving entry alone");
                report.skipped += 1;
                continue;
            };

            let modified: DateTime<Utc> = match meta.modified() {
                Ok(modified) => modified.into(),
                Err(e) => {
                    warn!(entry = name, error = %e, "no modification time, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            if now - modified >= Duration::seconds(tier.ttl_secs as i64) {
                match fs::remove_file(entry.path()) {
                    Ok(()) => {
                        debug!(entry = name, tier = %tier.name, "removed expired session entry");
                        report.removed += 1;
                    }
                    // Vanished mid-sweep: another session already erased it.
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        report.removed += 1;
                    }
                    Err(e) => {
                        warn!(entry = name, error = %e, "failed to remove expired entry");
                        report.skipped += 1;
                    }
                }
            }
        }

        info!(
            repository = %repository,
            examined = report.examined,
            removed = report.removed,
            skipped = report.skipped,
            "expiry sweep completed"
        );

        report
    }
}
