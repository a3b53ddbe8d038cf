//! Lifetime tiers for session classification.
//!
//! Every session belongs to exactly one tier, and the tier name is embedded
//! verbatim as the suffix of the session's storage key. The [`TierSet`]
//! constructor enforces the naming invariant that keeps those suffixes
//! recoverable.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A named lifetime class and its entry TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Tier name, embedded verbatim as the identifier suffix.
    pub name: String,

    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
}

impl TierSpec {
    /// Create a new tier spec.
    pub fn new(name: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            name: name.into(),
            ttl_secs,
        }
    }
}

/// Ordered, validated set of lifetime tiers.
///
/// Construction rejects tier sets whose names would make composite
/// identifiers ambiguous: names must be non-empty, unique, must not begin
/// with `.` (reserved for hidden entries), and no name may be a suffix of
/// another. Suffix detection iterates in the configured order, so results
/// are deterministic.
#[derive(Debug, Clone)]
pub struct TierSet {
    tiers: Vec<TierSpec>,
}

impl TierSet {
    /// Validate and build a tier set.
    pub fn new(tiers: Vec<TierSpec>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(StoreError::InvalidTierSet(
                "at least one tier is required".into(),
            ));
        }

        for tier in &tiers {
            if tier.name.is_empty() {
                return Err(StoreError::InvalidTierSet(
                    "tier names must be non-empty".into(),
                ));
            }
            if tier.name.starts_with('.') {
                return Err(StoreError::InvalidTierSet(format!(
                    "tier name '{}' would collide with hidden entries",
                    tier.name
                )));
            }
        }

        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                if a.name == b.name {
                    return Err(StoreError::InvalidTierSet(format!(
                        "duplicate tier name '{}'",
                        a.name
                    )));
                }
                if a.name.ends_with(&b.name) || b.name.ends_with(&a.name) {
                    return Err(StoreError::InvalidTierSet(format!(
                        "tier names '{}' and '{}' are suffix-ambiguous",
                        a.name, b.name
                    )));
                }
            }
        }

        Ok(Self { tiers })
    }

    /// Look up a tier by name.
    pub fn get(&self, name: &str) -> Option<&TierSpec> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// Whether a tier with this name is configured.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over the tiers in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, TierSpec> {
        self.tiers.iter()
    }

    /// Number of configured tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the set holds no tiers. Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Find the tier whose name is a suffix of `id`, returning the token
    /// part and the matched tier.
    ///
    /// The match must leave a non-empty token. Returns `None` when no
    /// configured tier matches; the naming invariant guarantees at most one
    /// can.
    pub fn match_suffix<'a>(&self, id: &'a str) -> Option<(&'a str, &TierSpec)> {
        self.tiers.iter().find_map(|tier| {
            let token = id.strip_suffix(tier.name.as_str())?;
            if token.is_empty() {
                None
            } else {
                Some((token, tier))
            }
        })
    }
}
