//! Counter-based sweep scheduling.
//!
//! Every session start ticks a counter held in a singleton log record in
//! the repository. When the counter reaches the configured run rate, a
//! full expiry sweep runs and the counter resets. The read-increment-write
//! cycle is a check-then-act sequence, so it runs under a per-repository
//! lock shared by every collector in the process.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use tessera_store::{
    Record, Repository, SESSION_LOG_KEY, StorageAdapter, StoreError, SweepReport, TierSet,
};

use crate::error::{Result, SessionError};

/// Key in the log record holding the session-start counter.
const STARTS_KEY: &str = "starts";

/// Decides, once per session start, whether to trigger a full expiry sweep.
///
/// Sweeping is maintenance, never a precondition: a failed sweep does not
/// abort the counter write, and callers are expected to log rather than
/// fail a session save when [`run`](GarbageCollector::run) errors.
pub struct GarbageCollector {
    adapter: Arc<dyn StorageAdapter>,
    repository: Repository,
    tiers: TierSet,
    run_rate: u32,
}

impl GarbageCollector {
    /// Create a collector for a repository.
    ///
    /// A `run_rate` of 1 sweeps on every invocation; 0 is rejected here,
    /// not deferred to the first run.
    pub fn new(
        adapter: Arc<dyn StorageAdapter>,
        repository: Repository,
        tiers: TierSet,
        run_rate: u32,
    ) -> Result<Self> {
        if run_rate == 0 {
            return Err(SessionError::InvalidRunRate);
        }
        Ok(Self {
            adapter,
            repository,
            tiers,
            run_rate,
        })
    }

    /// Count one session start, sweeping if the threshold is reached.
    ///
    /// Returns the sweep report when a sweep ran. The result reflects the
    /// counter write: sweep failures on individual entries never mask it.
    pub fn run(&self) -> Result<Option<SweepReport>> {
        let lock = repository_lock(&self.repository);
        let _guard = lock.lock();

        let mut starts = self.load_starts()?;
        starts += 1;

        let report = if starts >= u64::from(self.run_rate) {
            let report = self.adapter.collect_garbage(&self.repository, &self.tiers);
            starts = 0;
            Some(report)
        } else {
            debug!(
                repository = %self.repository,
                starts,
                run_rate = self.run_rate,
                "sweep threshold not reached"
            );
            None
        };

        let mut log = Record::new();
        log.insert(STARTS_KEY, starts);
        self.adapter.save(&self.repository, SESSION_LOG_KEY, &log)?;

        Ok(report)
    }

    /// Read the start counter, creating the log record on first use.
    ///
    /// A corrupt log record is maintenance state gone bad, not session
    /// data: it is recreated at zero with a warning instead of failing the
    /// run.
    fn load_starts(&self) -> Result<u64> {
        match self.adapter.read(&self.repository, SESSION_LOG_KEY) {
            Ok(log) => Ok(log.get(STARTS_KEY).and_then(Value::as_u64).unwrap_or(0)),
            Err(StoreError::NotFound(_)) => {
                let mut log = Record::new();
                log.insert(STARTS_KEY, 0u64);
                self.adapter.save(&self.repository, SESSION_LOG_KEY, &log)?;
                Ok(0)
            }
            Err(StoreError::Corrupt { .. }) => {
                warn!(
                    repository = %self.repository,
                    "sweep log record corrupt, resetting counter"
                );
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Per-repository locks serializing the counter's read-increment-write
/// cycle across all sessions in the process.
fn repository_lock(repository: &Repository) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<String, Arc<Mutex<()>>>>> = OnceLock::new();
    let locks = LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    locks
        .lock()
        .entry(repository.as_str().to_string())
        .or_default()
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_store::{FileAdapter, TierSpec};

    fn setup(run_rate: u32) -> (tempfile::TempDir, GarbageCollector, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path().to_string_lossy());
        let tiers = TierSet::new(vec![
            TierSpec::new("short", 60),
            TierSpec::new("long", 3600),
        ])
        .unwrap();
        let gc = GarbageCollector::new(
            Arc::new(FileAdapter::new()),
            repo.clone(),
            tiers,
            run_rate,
        )
        .unwrap();
        (dir, gc, repo)
    }

    fn read_starts(repo: &Repository) -> u64 {
        let log = FileAdapter::new().read(repo, SESSION_LOG_KEY).unwrap();
        log.get(STARTS_KEY).and_then(Value::as_u64).unwrap()
    }

    #[test]
    fn test_zero_run_rate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tiers = TierSet::new(vec![TierSpec::new("short", 60)]).unwrap();
        let result = GarbageCollector::new(
            Arc::new(FileAdapter::new()),
            Repository::new(dir.path().to_string_lossy()),
            tiers,
            0,
        );
        assert!(matches!(result, Err(SessionError::InvalidRunRate)));
    }

    #[test]
    fn test_log_created_on_first_run() {
        let (_dir, gc, repo) = setup(10);
        assert!(!FileAdapter::new().exists(&repo, SESSION_LOG_KEY).unwrap());

        gc.run().unwrap();
        assert_eq!(read_starts(&repo), 1);
    }

    #[test]
    fn test_counter_reaches_threshold_then_resets() {
        let (_dir, gc, repo) = setup(5);

        for expected in 1..5 {
            assert!(gc.run().unwrap().is_none());
            assert_eq!(read_starts(&repo), expected);
        }

        // Fifth start reaches the threshold: sweep runs, counter resets.
        assert!(gc.run().unwrap().is_some());
        assert_eq!(read_starts(&repo), 0);
    }

    #[test]
    fn test_run_rate_one_sweeps_every_time() {
        let (_dir, gc, repo) = setup(1);
        assert!(gc.run().unwrap().is_some());
        assert!(gc.run().unwrap().is_some());
        assert_eq!(read_starts(&repo), 0);
    }

    #[test]
    fn test_corrupt_log_resets_counter() {
        let (dir, gc, repo) = setup(10);
        std::fs::write(dir.path().join(SESSION_LOG_KEY), b"not json").unwrap();

        gc.run().unwrap();
        assert_eq!(read_starts(&repo), 1);
    }
}
