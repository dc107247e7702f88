//! Field addresses used on the command line
//!
//! Format:
//! - `bucket` addresses a whole bucket
//! - `bucket.key` addresses one entry inside a bucket
//!
//! Parsing splits on the first `.` only, so `users.alice.home` addresses the
//! key `alice.home` in bucket `users`. A bucket whose own name contains `.`
//! cannot be addressed as a whole; there is no escaping syntax.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the bucket and key parts of an address
pub const SEPARATOR: char = '.';

#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("Invalid field address '{0}': bucket name is empty")]
    EmptyBucket(String),

    #[error("Invalid field address '{0}': key is empty")]
    EmptyKey(String),
}

/// A parsed `bucket` or `bucket.key` address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldAddress {
    bucket: String,
    key: Option<String>,
}

impl FieldAddress {
    /// Addresses a whole bucket
    pub fn bucket(name: impl Into<String>) -> Self {
        Self {
            bucket: name.into(),
            key: None,
        }
    }

    /// Addresses a single entry
    pub fn entry(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: Some(key.into()),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns true if the address names a single entry
    pub fn is_entry(&self) -> bool {
        self.key.is_some()
    }
}

impl fmt::Display for FieldAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}{}{}", self.bucket, SEPARATOR, key),
            None => write!(f, "{}", self.bucket),
        }
    }
}

impl FromStr for FieldAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(SEPARATOR) {
            Some(("", _)) => Err(AddressError::EmptyBucket(s.to_string())),
            Some((_, "")) => Err(AddressError::EmptyKey(s.to_string())),
            Some((bucket, key)) => Ok(Self::entry(bucket, key)),
            None if s.is_empty() => Err(AddressError::EmptyBucket(s.to_string())),
            None => Ok(Self::bucket(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bucket_only() {
        let addr: FieldAddress = "users".parse().unwrap();
        assert_eq!(addr.bucket_name(), "users");
        assert_eq!(addr.key(), None);
        assert!(!addr.is_entry());
    }

    #[test]
    fn parses_bucket_and_key() {
        let addr: FieldAddress = "users.alice".parse().unwrap();
        assert_eq!(addr.bucket_name(), "users");
        assert_eq!(addr.key(), Some("alice"));
        assert!(addr.is_entry());
    }

    #[test]
    fn splits_on_first_separator_only() {
        let addr: FieldAddress = "users.alice.home".parse().unwrap();
        assert_eq!(addr.bucket_name(), "users");
        assert_eq!(addr.key(), Some("alice.home"));
    }

    #[test]
    fn rejects_empty_segments() {
        assert_eq!(
            "".parse::<FieldAddress>(),
            Err(AddressError::EmptyBucket(String::new()))
        );
        assert!(matches!(
            ".alice".parse::<FieldAddress>(),
            Err(AddressError::EmptyBucket(_))
        ));
        assert!(matches!(
            "users.".parse::<FieldAddress>(),
            Err(AddressError::EmptyKey(_))
        ));
    }

    #[test]
    fn display_matches_input() {
        assert_eq!(FieldAddress::entry("users", "alice").to_string(), "users.alice");
        assert_eq!(FieldAddress::bucket("users").to_string(), "users");
    }
}
