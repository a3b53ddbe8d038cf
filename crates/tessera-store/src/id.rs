//! Composite session identifiers.
//!
//! A session's storage key is its random token immediately followed by its
//! lifetime-tier name, with no separator: `<token><tier>`. Tokens come from
//! the OS CSPRNG via UUIDv4, and the [`TierSet`] naming invariant keeps the
//! tier suffix unambiguously recoverable.

use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::tier::{TierSet, TierSpec};

/// Generate a fresh session token: 32 lowercase hex characters.
///
/// Statistically unique and unguessable across concurrent callers.
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Build a composite identifier from a token and a tier name.
pub fn composite(token: &str, tier: &str) -> String {
    format!("{token}{tier}")
}

/// Split a composite identifier into its token and tier.
///
/// Tier names are tried in the configured order; the match must leave a
/// non-empty token. Fails with [`StoreError::UnrecognizedId`] when no
/// configured tier name is a suffix of `id`.
pub fn split<'a>(id: &'a str, tiers: &'a TierSet) -> Result<(&'a str, &'a TierSpec)> {
    tiers
        .match_suffix(id)
        .ok_or_else(|| StoreError::UnrecognizedId(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> TierSet {
        TierSet::new(vec![
            TierSpec::new("short", 3600),
            TierSpec::new("long", 1_209_600),
        ])
        .unwrap()
    }

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_split_recovers_every_tier() {
        let tiers = tiers();
        for tier in tiers.iter() {
            let token = generate_token();
            let id = composite(&token, &tier.name);
            let (recovered_token, recovered_tier) = split(&id, &tiers).unwrap();
            assert_eq!(recovered_token, token);
            assert_eq!(recovered_tier.name, tier.name);
        }
    }

    #[test]
    fn test_split_rejects_unknown_suffix() {
        let tiers = tiers();
        let id = composite(&generate_token(), "medium");
        assert!(matches!(
            split(&id, &tiers),
            Err(StoreError::UnrecognizedId(_))
        ));
    }

    #[test]
    fn test_split_rejects_bare_tier_name() {
        let tiers = tiers();
        assert!(matches!(
            split("long", &tiers),
            Err(StoreError::UnrecognizedId(_))
        ));
    }
}
