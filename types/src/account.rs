//! Account identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An opaque, unique user identifier issued by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Longest identifier accepted, in bytes.
    pub const MAX_LEN: usize = 128;

    /// Create an account id, validating that it is non-empty, bounded and free
    /// of whitespace and control characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty()
            || s.len() > Self::MAX_LEN
            || s.chars().any(|c| c.is_control() || c.is_whitespace())
        {
            return Err(TypesError::InvalidAccountId(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opaque_ids() {
        let id = AccountId::new("u_9fK2xQ").unwrap();
        assert_eq!(id.as_str(), "u_9fK2xQ");
    }

    #[test]
    fn rejects_empty_whitespace_and_oversized() {
        assert!(AccountId::new("").is_err());
        assert!(AccountId::new("a b").is_err());
        assert!(AccountId::new("line\nbreak").is_err());
        assert!(AccountId::new("x".repeat(AccountId::MAX_LEN + 1)).is_err());
        assert!(AccountId::new("x".repeat(AccountId::MAX_LEN)).is_ok());
    }
}
