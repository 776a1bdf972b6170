//! Account identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account identity as assigned by the surrounding application runtime.
///
/// The vault treats identities as opaque strings: it never derives, signs or
/// otherwise interprets them. Both depositors and the pool's own account are
/// addressed this way.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account identity from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this identity is well-formed (non-empty).
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_raw_string() {
        let id = AccountId::new("depositor-1");
        assert_eq!(id.as_str(), "depositor-1");
        assert_eq!(id.to_string(), "depositor-1");
    }

    #[test]
    fn empty_identity_is_invalid() {
        assert!(!AccountId::new("").is_valid());
        assert!(AccountId::new("a").is_valid());
    }
}
