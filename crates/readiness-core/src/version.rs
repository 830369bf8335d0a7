use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("version string '{0}' does not have the form X.Y.Z")]
    Malformed(String),
    #[error("component '{component}' in '{raw}' is not a valid integer")]
    InvalidComponent { raw: String, component: String },
}

/// A semantic `{major, minor, patch}` version with total ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    /// Three-way comparison, exposed separately from `Ord` because the
    /// rule registry (C3) reasons about it by name in its own doc comments.
    pub fn compare(&self, other: &Version) -> Ordering {
        self.cmp(other)
    }

    pub fn is_greater_than(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(VersionParseError::Malformed(s.to_string()));
        }

        let parse_component = |raw: &str| {
            raw.parse::<u32>()
                .map_err(|_| VersionParseError::InvalidComponent {
                    raw: s.to_string(),
                    component: raw.to_string(),
                })
        };

        Ok(Version {
            major: parse_component(parts[0])?,
            minor: parse_component(parts[1])?,
            patch: parse_component(parts[2])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_version() {
        let v: Version = "12.4.3".parse().unwrap();
        assert_eq!(v, Version::new(12, 4, 3));
    }

    #[test]
    fn rejects_malformed_version() {
        assert!("12.4".parse::<Version>().is_err());
        assert!("12.4.x".parse::<Version>().is_err());
    }

    #[test]
    fn total_ordering_is_lexicographic_by_component() {
        let a: Version = "11.5.9".parse().unwrap();
        let b: Version = "12.0.0".parse().unwrap();
        assert!(b.is_greater_than(&a));
        assert!(a < b);
    }

    #[test]
    fn major_accessor_matches_field() {
        let v: Version = "13.2.1".parse().unwrap();
        assert_eq!(v.major(), 13);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let v: Version = "9.1.0".parse().unwrap();
        assert_eq!(v.to_string(), "9.1.0");
    }
}
