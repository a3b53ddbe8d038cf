//! Session and sweep settings.
//!
//! Settings can be built in code with the `with_*` methods or loaded from
//! a TOML file. The `[[tier]]` array-of-tables preserves declaration
//! order, which is also the tier detection order.
//!
//! ```toml
//! repository = "/var/lib/app/sessions"
//! cookie_name = "sess"
//! run_rate = 25
//!
//! [[tier]]
//! name = "short"
//! ttl_secs = 3600
//!
//! [[tier]]
//! name = "long"
//! ttl_secs = 1209600
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_store::{TierSet, TierSpec};

use crate::error::{Result, SessionError};

/// Default name for the external session reference.
pub const DEFAULT_COOKIE_NAME: &str = "sess";

/// Tier assigned to new sessions until changed.
pub const DEFAULT_TIER: &str = "short";

/// Tier for long-lived sessions; must always be configured.
pub const LONG_TIER: &str = "long";

/// Default sweep-trigger threshold: sweep every 25 session starts.
pub const DEFAULT_RUN_RATE: u32 = 25;

/// Default short-tier TTL: one hour.
pub const DEFAULT_SHORT_TTL_SECS: u64 = 3600;

/// Default long-tier TTL: two weeks.
pub const DEFAULT_LONG_TTL_SECS: u64 = 1_209_600;

/// Configuration for a session store and its garbage collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Repository handle, passed verbatim to the storage adapter.
    pub repository: String,

    /// Name under which the transport externalizes the identifier.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Number of session starts between expiry sweeps.
    pub run_rate: u32,

    /// Lifetime tiers in detection order.
    #[serde(rename = "tier", default)]
    pub tiers: Vec<TierSpec>,
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

impl Settings {
    /// Create settings for a repository with default cookie name, run rate,
    /// and short/long tiers.
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            cookie_name: default_cookie_name(),
            run_rate: DEFAULT_RUN_RATE,
            tiers: vec![
                TierSpec::new(DEFAULT_TIER, DEFAULT_SHORT_TTL_SECS),
                TierSpec::new(LONG_TIER, DEFAULT_LONG_TTL_SECS),
            ],
        }
    }

    /// Set the external reference name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the sweep-trigger threshold. `1` sweeps on every session start.
    pub fn with_run_rate(mut self, run_rate: u32) -> Self {
        self.run_rate = run_rate;
        self
    }

    /// Set a tier's TTL, appending the tier if it is not configured yet.
    pub fn with_tier(mut self, name: impl Into<String>, ttl_secs: u64) -> Self {
        let name = name.into();
        match self.tiers.iter_mut().find(|t| t.name == name) {
            Some(tier) => tier.ttl_secs = ttl_secs,
            None => self.tiers.push(TierSpec::new(name, ttl_secs)),
        }
        self
    }

    /// Build the validated tier set.
    pub fn tier_set(&self) -> Result<TierSet> {
        Ok(TierSet::new(self.tiers.clone())?)
    }

    /// Validate the settings.
    ///
    /// Rejects a zero run rate, a tier set missing the required `short` or
    /// `long` tiers, and tier names that violate the recoverability
    /// invariant. Run at session construction, never deferred to first use.
    pub fn validate(&self) -> Result<()> {
        if self.run_rate == 0 {
            return Err(SessionError::InvalidRunRate);
        }
        for required in [DEFAULT_TIER, LONG_TIER] {
            if !self.tiers.iter().any(|t| t.name == required) {
                return Err(SessionError::MissingTier(required));
            }
        }
        self.tier_set()?;
        Ok(())
    }
}

/// Load and validate settings from a TOML file.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let contents = std::fs::read_to_string(path).map_err(|e| SessionError::ReadSettings {
        path: path.display().to_string(),
        source: e,
    })?;
    let settings: Settings = toml::from_str(&contents)?;
    settings.validate()?;
    Ok(settings)
}
