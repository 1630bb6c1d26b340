// ABOUTME: Release version identifier used verbatim as a storage key prefix.
// ABOUTME: Orders by semver precedence, padding short numeric versions, else naturally.

use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("version cannot be empty")]
    Empty,

    #[error("version exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("invalid character in version: '{0}'")]
    InvalidChar(char),
}

/// An immutable release identifier such as `1.2.3`.
///
/// All artifacts of a release live under [`Version::prefix`] (`v1.2.3/`).
/// A leading `v` in the input is stripped, so `v1.2.3` and `1.2.3` are the
/// same release.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(value: &str) -> Result<Self, VersionError> {
        let value = value.trim();
        let value = value.strip_prefix('v').unwrap_or(value);

        if value.is_empty() {
            return Err(VersionError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(VersionError::TooLong);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_' | '+'))
        {
            return Err(VersionError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    /// Parse a storage common prefix such as `v1.2.3/`.
    ///
    /// Returns `None` for prefixes that were not written by a release.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        let inner = prefix.strip_suffix('/').unwrap_or(prefix);
        let rest = inner.strip_prefix('v')?;
        if !rest.starts_with(|c: char| c.is_ascii_digit()) || rest.contains('/') {
            return None;
        }
        Self::new(rest).ok()
    }

    /// Parse a CDN origin path such as `/v1.2.3`.
    pub fn from_origin_path(path: &str) -> Option<Self> {
        Self::from_prefix(path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key namespace for this release, with trailing delimiter.
    pub fn prefix(&self) -> String {
        format!("v{}/", self.0)
    }

    /// Storage key for a file of this release.
    pub fn key_for(&self, relative_path: &str) -> String {
        format!("v{}/{}", self.0, relative_path.trim_start_matches('/'))
    }

    /// CDN origin path pointing at this release.
    pub fn origin_path(&self) -> String {
        format!("/v{}", self.0)
    }

    /// Semver form, with `5` read as `5.0.0` and `1.10` as `1.10.0`.
    fn semver(&self) -> Option<semver::Version> {
        if let Ok(parsed) = semver::Version::parse(&self.0) {
            return Some(parsed);
        }

        let split = self.0.find(['-', '+']).unwrap_or(self.0.len());
        let (core, suffix) = self.0.split_at(split);
        let parts = core.split('.').count();
        let numeric = core
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
        if !numeric || parts > 2 {
            return None;
        }

        let padded = format!("{core}{}{suffix}", ".0".repeat(3 - parts));
        semver::Version::parse(&padded).ok()
    }
}

/// Component of a non-semver version, compared numerically where possible.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Number(u128),
    Text(&'a str),
}

fn segments(value: &str) -> impl Iterator<Item = Segment<'_>> {
    value
        .split(['.', '-', '_', '+'])
        .map(|part| match part.parse::<u128>() {
            Ok(n) => Segment::Number(n),
            Err(_) => Segment::Text(part),
        })
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.semver(), other.semver()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            // Semver releases sort above anything that is not semver.
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => segments(&self.0)
                .cmp(segments(&other.0))
                .then_with(|| self.0.cmp(&other.0)),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_v() {
        assert_eq!(Version::new("v1.2.3").unwrap().as_str(), "1.2.3");
    }

    #[test]
    fn semver_ordering_is_numeric() {
        let a = Version::new("1.10.0").unwrap();
        let b = Version::new("1.9.0").unwrap();
        assert!(a > b);
    }

    #[test]
    fn prerelease_sorts_below_release() {
        let pre = Version::new("2.0.0-rc.1").unwrap();
        let rel = Version::new("2.0.0").unwrap();
        assert!(pre < rel);
    }

    #[test]
    fn bare_numbers_order_numerically() {
        let v = |raw| Version::new(raw).unwrap();
        assert!(v("20") > v("19"));
        assert!(v("10") > v("9"));
        assert!(v("2") < v("19"));
        assert!(v("1.10") > v("1.9"));
        assert!(v("3-rc.1") < v("3"));
    }

    #[test]
    fn padded_form_is_distinct_but_adjacent() {
        let short = Version::new("5").unwrap();
        let full = Version::new("5.0.0").unwrap();
        assert_ne!(short, full);
        assert_ne!(short.cmp(&full), Ordering::Equal);
        assert!(short < Version::new("5.0.1").unwrap());
    }

    #[test]
    fn non_semver_segments_compare_naturally() {
        let v = |raw| Version::new(raw).unwrap();
        assert!(v("build_10") > v("build_9"));
        assert!(v("01.2") < v("01.10"));
    }

    #[test]
    fn from_prefix_rejects_foreign_prefixes() {
        assert!(Version::from_prefix("assets/").is_none());
        assert!(Version::from_prefix("vendor/").is_none());
        assert!(Version::from_prefix("v1.0.0/nested/").is_none());
        assert_eq!(
            Version::from_prefix("v1.0.0/").unwrap().as_str(),
            "1.0.0"
        );
    }
}
