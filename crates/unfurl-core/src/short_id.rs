use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated short identifier for a resolved media link.
///
/// Short ids are exactly 7 characters drawn from the 62-symbol
/// alphanumeric alphabet (`[A-Za-z0-9]`), giving an address space of
/// roughly 3.5e12 identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(String);

/// Fixed length of every short id.
pub const SHORT_ID_LEN: usize = 7;

/// The alphabet short ids are drawn from.
pub const SHORT_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

impl ShortId {
    /// Creates a new `ShortId` after validating length and alphabet.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a `ShortId` without validation.
    ///
    /// Use this only for ids produced by trusted internal sources
    /// (e.g. the id generator, which only samples the valid alphabet).
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates the full short URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(id: &str) -> Result<(), CoreError> {
        if id.len() != SHORT_ID_LEN {
            return Err(CoreError::InvalidShortId(format!(
                "length must be {}, got {}",
                SHORT_ID_LEN,
                id.len()
            )));
        }

        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidShortId(format!(
                "must contain only alphanumeric characters: '{}'",
                id
            )));
        }

        Ok(())
    }
}

impl Display for ShortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(ShortId::new("abc1234").is_ok());
        assert!(ShortId::new("AbCdEf0").is_ok());
        assert!(ShortId::new("0000000").is_ok());
    }

    #[test]
    fn wrong_length() {
        assert!(ShortId::new("abc123").is_err());
        assert!(ShortId::new("abc12345").is_err());
        assert!(ShortId::new("").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortId::new("abc-123").is_err());
        assert!(ShortId::new("abc 123").is_err());
        assert!(ShortId::new("abc/123").is_err());
    }

    #[test]
    fn display_round_trip() {
        let id = ShortId::new("xYz9876").unwrap();
        assert_eq!(id.to_string(), "xYz9876");
        assert_eq!(id.as_str(), "xYz9876");
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let id = ShortId::new("abc1234").unwrap();
        assert_eq!(id.to_url("https://unf.rl"), "https://unf.rl/abc1234");
        assert_eq!(id.to_url("https://unf.rl/"), "https://unf.rl/abc1234");
    }

    #[test]
    fn serde_is_transparent() {
        let id = ShortId::new("abc1234").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc1234\"");
        let back: ShortId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
