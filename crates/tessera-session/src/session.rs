//! The public session surface.
//!
//! A [`Session`] owns one in-memory record, loaded from the repository at
//! construction when a resumed identifier is supplied, and persisted on
//! [`save`](Session::save). It composes the storage adapter, the garbage
//! collector, and the transport boundary; each collaborator stays behind
//! its own seam.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use tessera_store::{Key, Record, Repository, StorageAdapter, StoreError, TierSet, id};

use crate::config::{DEFAULT_TIER, Settings};
use crate::error::{Result, SessionError};
use crate::gc::GarbageCollector;
use crate::transport::Transport;

/// A single logical session bound to a repository.
///
/// One instance per request; the in-memory record is never shared across
/// threads. The repository itself may be shared by any number of
/// concurrent sessions.
pub struct Session {
    adapter: Arc<dyn StorageAdapter>,
    transport: Arc<dyn Transport>,
    settings: Settings,
    tiers: TierSet,
    gc: GarbageCollector,
    repository: Repository,
    token: String,
    lifetime: String,
    persisted_id: Option<String>,
    record: Record,
}

impl Session {
    /// Open a session against a repository.
    ///
    /// `resumed` is the identifier recovered by the caller's transport
    /// layer (e.g. a cookie value), or `None` for a new session. A resumed
    /// identifier with no recognizable tier suffix, or with no stored
    /// entry, silently degrades to a new session; a stored entry that
    /// exists but cannot be decoded surfaces as an error.
    pub fn open(
        adapter: Arc<dyn StorageAdapter>,
        transport: Arc<dyn Transport>,
        settings: Settings,
        resumed: Option<&str>,
    ) -> Result<Self> {
        settings.validate()?;
        let tiers = settings.tier_set()?;
        let repository = Repository::new(settings.repository.clone());

        if !adapter.check_access(&repository) {
            return Err(SessionError::RepositoryUnavailable(
                repository.to_string(),
            ));
        }

        let gc = GarbageCollector::new(
            Arc::clone(&adapter),
            repository.clone(),
            tiers.clone(),
            settings.run_rate,
        )?;

        let mut session = Self {
            adapter,
            transport,
            settings,
            tiers,
            gc,
            repository,
            token: id::generate_token(),
            lifetime: DEFAULT_TIER.to_string(),
            persisted_id: None,
            record: Record::new(),
        };

        if let Some(resumed) = resumed {
            session.resume(resumed)?;
        }

        Ok(session)
    }

    fn resume(&mut self, resumed: &str) -> Result<()> {
        let (token, tier) = match id::split(resumed, &self.tiers) {
            Ok(parts) => parts,
            Err(e) => {
                debug!(error = %e, "resumed identifier rejected, starting a new session");
                return Ok(());
            }
        };
        let token = token.to_string();
        let tier_name = tier.name.clone();

        match self.adapter.read(&self.repository, resumed) {
            Ok(record) => {
                self.token = token;
                self.lifetime = tier_name;
                self.persisted_id = Some(resumed.to_string());
                self.record = record;
                debug!(session_id = resumed, "session resumed");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                debug!(session_id = resumed, "no stored entry for resumed identifier");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a value, or `default` when the key is absent.
    pub fn get(&self, key: impl Into<Key>, default: impl Into<Value>) -> Value {
        self.record
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Insert or overwrite a value.
    pub fn put(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        self.record.insert(key, value);
    }

    /// Overwrite a value only if the key is present.
    pub fn update(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.record.contains(key.clone()) {
            self.record.insert(key, value);
            true
        } else {
            false
        }
    }

    /// Whether the key is present.
    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.record.contains(key)
    }

    /// Get a value and remove it, or `default` when the key is absent.
    pub fn pull(&mut self, key: impl Into<Key>, default: impl Into<Value>) -> Value {
        self.record.remove(key).unwrap_or_else(|| default.into())
    }

    /// Remove a value. Returns `false` when the key was absent.
    pub fn delete(&mut self, key: impl Into<Key>) -> bool {
        self.record.remove(key).is_some()
    }

    /// Snapshot of the full record.
    ///
    /// The returned copy is detached; mutating it cannot corrupt the
    /// session's state.
    pub fn all(&self) -> Record {
        self.record.clone()
    }

    /// Set the lifetime tier for the next first save.
    ///
    /// The tier of an already-persisted session is fixed by its
    /// identifier; this only affects sessions that have not been
    /// persisted yet.
    pub fn set_lifetime(&mut self, tier: &str) -> Result<()> {
        if !self.tiers.contains(tier) {
            return Err(SessionError::UnknownTier(tier.to_string()));
        }
        self.lifetime = tier.to_string();
        Ok(())
    }

    /// The current lifetime tier.
    pub fn lifetime(&self) -> &str {
        &self.lifetime
    }

    /// The composite identifier this session is persisted under, if any.
    pub fn id(&self) -> Option<&str> {
        self.persisted_id.as_deref()
    }

    /// The name under which the transport externalizes the identifier.
    pub fn cookie_name(&self) -> &str {
        &self.settings.cookie_name
    }

    /// The repository this session is bound to.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// The configured lifetime tiers.
    pub fn tiers(&self) -> &TierSet {
        &self.tiers
    }

    /// The settings this session was opened with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Persist the session and refresh its external reference.
    ///
    /// Runs the garbage collector first; a failed run is logged and never
    /// blocks the save. An empty session that has never been persisted is
    /// a no-op success. Otherwise the record is written under the existing
    /// identifier, or under a freshly minted `token + tier` identifier for
    /// a first save, and the transport receives the identifier with an
    /// expiry of now plus the tier's TTL.
    pub fn save(&mut self) -> Result<()> {
        if let Err(e) = self.gc.run() {
            warn!(error = %e, "garbage collector run failed");
        }

        if self.record.is_empty() && self.persisted_id.is_none() {
            debug!("empty unsaved session, nothing to persist");
            return Ok(());
        }

        let (session_id, tier_name, ttl_secs) = match &self.persisted_id {
            Some(existing) => {
                let (_, tier) = id::split(existing, &self.tiers)?;
                (existing.clone(), tier.name.clone(), tier.ttl_secs)
            }
            None => {
                let tier = self.tiers.get(&self.lifetime).ok_or_else(|| {
                    SessionError::UnknownTier(self.lifetime.clone())
                })?;
                (
                    id::composite(&self.token, &tier.name),
                    tier.name.clone(),
                    tier.ttl_secs,
                )
            }
        };

        self.adapter.save(&self.repository, &session_id, &self.record)?;
        self.persisted_id = Some(session_id.clone());
        self.lifetime = tier_name;

        let expires_at = Utc::now() + Duration::seconds(ttl_secs as i64);
        self.transport
            .set_external_reference(&self.settings.cookie_name, &session_id, expires_at);

        debug!(session_id = %session_id, "session persisted");
        Ok(())
    }

    /// Rotate the session identifier, preserving the tier and contents.
    ///
    /// For a persisted session: erases the old entry, invalidates the old
    /// external reference, and re-saves under a fresh token with the same
    /// tier. For a new session, only the token is refreshed.
    pub fn regenerate(&mut self) -> Result<()> {
        match self.persisted_id.clone() {
            Some(old_id) => {
                let (_, tier) = id::split(&old_id, &self.tiers)?;
                let tier_name = tier.name.clone();
                let ttl_secs = tier.ttl_secs;

                self.adapter.erase(&self.repository, &old_id)?;
                self.transport
                    .clear_external_reference(&self.settings.cookie_name);

                self.token = id::generate_token();
                let new_id = id::composite(&self.token, &tier_name);
                self.adapter.save(&self.repository, &new_id, &self.record)?;
                self.persisted_id = Some(new_id.clone());
                self.lifetime = tier_name;

                let expires_at = Utc::now() + Duration::seconds(ttl_secs as i64);
                self.transport
                    .set_external_reference(&self.settings.cookie_name, &new_id, expires_at);

                debug!(old_id = %old_id, new_id = %new_id, "session identifier rotated");
            }
            None => {
                self.token = id::generate_token();
            }
        }
        Ok(())
    }

    /// Erase the session everywhere and reset to a fresh unsaved state.
    ///
    /// Idempotent: clearing an already-cleared session is a safe no-op.
    pub fn clear(&mut self) -> Result<()> {
        if let Some(session_id) = self.persisted_id.clone() {
            self.adapter.erase(&self.repository, &session_id)?;
            self.transport
                .clear_external_reference(&self.settings.cookie_name);
            self.persisted_id = None;
            debug!(session_id = %session_id, "session entry erased");
        }

        self.record.clear();
        self.lifetime = DEFAULT_TIER.to_string();
        self.token = id::generate_token();
        Ok(())
    }
}
