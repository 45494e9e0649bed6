//! The global "major.minor" release version.
//!
//! The version of record lives in a repository-tracked YAML file
//! (`{version: "X.Y"}`). Reading is soft: anything unexpected reads as `0.0`.
//! Bumping is a pure transform ([`bump`]) sandwiched between a
//! [`VersionStore`] load and save.

pub mod bump;
pub(crate) mod store;

pub use bump::{BumpKind, BumpOutcome, BumpPolicy, bump};
pub use store::{VersionFile, VersionStore};

use std::fmt;
use std::str::FromStr;

/// A `(major, minor)` pair of non-negative integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const ZERO: Version = Version { major: 0, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse leniently: malformed input yields `0.0`.
    pub fn parse_or_zero(s: &str) -> Self {
        s.parse().unwrap_or(Self::ZERO)
    }
}

/// Error returned when a string is not `<int>.<int>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version '{}': expected <major>.<minor>", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(err)?;
        let major = major.parse::<u32>().map_err(|_| err())?;
        let minor = minor.parse::<u32>().map_err(|_| err())?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
