//! Validated identifiers for API resources.
//!
//! Identifiers are interpolated into request paths, so anything that could
//! escape a single path segment is rejected at construction time.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_ID_LEN: usize = 128;

/// Identifier of a gift, challenge, tenant, or activity record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawId", into = "String")]
pub struct ResourceId(String);

/// Reason a candidate identifier was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidResourceId {
    /// Identifier was empty or whitespace.
    #[error("resource id is empty")]
    Empty,
    /// Identifier exceeded the maximum length.
    #[error("resource id is too long")]
    TooLong {
        /// Length of the rejected value.
        len: usize,
    },
    /// Identifier contained a character that is not path-safe.
    #[error("resource id contains an invalid character")]
    InvalidChar {
        /// Offending character.
        found: char,
    },
}

impl ResourceId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    /// Returns [`InvalidResourceId`] when the value is empty, longer than 128
    /// bytes, or contains characters outside `[A-Za-z0-9_.:-]`.
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidResourceId> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InvalidResourceId::Empty);
        }
        if value.len() > MAX_ID_LEN {
            return Err(InvalidResourceId::TooLong { len: value.len() });
        }
        if let Some(found) = value
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':')))
        {
            return Err(InvalidResourceId::InvalidChar { found });
        }
        Ok(Self(value))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<ResourceId> for String {
    fn from(value: ResourceId) -> Self {
        value.0
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<&str> for ResourceId {
    type Error = InvalidResourceId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl TryFrom<RawId> for ResourceId {
    type Error = InvalidResourceId;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        match value {
            RawId::Text(text) => Self::parse(text),
            RawId::Number(number) => Ok(Self::from(number)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_path_safe_ids() {
        for candidate in ["1", "gift-42", "org_1", "auth0:abc.def"] {
            assert!(ResourceId::parse(candidate).is_ok(), "{candidate}");
        }
    }

    #[test]
    fn parse_rejects_path_breaking_ids() {
        assert_eq!(ResourceId::parse("  "), Err(InvalidResourceId::Empty));
        assert_eq!(
            ResourceId::parse("../admin"),
            Err(InvalidResourceId::InvalidChar { found: '/' })
        );
        assert_eq!(
            ResourceId::parse("a?b"),
            Err(InvalidResourceId::InvalidChar { found: '?' })
        );
        assert!(matches!(
            ResourceId::parse("x".repeat(200)),
            Err(InvalidResourceId::TooLong { len: 200 })
        ));
    }
}
