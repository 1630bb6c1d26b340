// ABOUTME: S3-compatible bucket name validation.
// ABOUTME: Enforces the DNS-style naming rules that virtual-hosted origins rely on.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BucketNameError {
    #[error("bucket name must be between 3 and 63 characters, got {0}")]
    BadLength(usize),

    #[error("bucket name must start and end with a lowercase letter or digit")]
    BadBoundary,

    #[error("bucket name must be lowercase")]
    NotLowercase,

    #[error("bucket name cannot contain consecutive dots")]
    ConsecutiveDots,

    #[error("invalid character in bucket name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    pub fn new(value: &str) -> Result<Self, BucketNameError> {
        let len = value.chars().count();
        if !(3..=63).contains(&len) {
            return Err(BucketNameError::BadLength(len));
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(BucketNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '.' {
                return Err(BucketNameError::InvalidChar(c));
            }
        }

        let boundary_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
        if !boundary_ok(value.chars().next()) || !boundary_ok(value.chars().last()) {
            return Err(BucketNameError::BadBoundary);
        }

        if value.contains("..") {
            return Err(BucketNameError::ConsecutiveDots);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
