use std::fmt;
use std::ops::RangeInclusive;

/// Host-platform major versions this registry carries rule sets for.
/// Mirrors the versions a TYPO3-style CMS rule catalog would ship: anything
/// older is "not a supported major" and yields an empty applicable set.
pub const SUPPORTED_MAJORS: RangeInclusive<u32> = 8..=13;

/// A named group of transformations. `Generic` and `CodeQuality` are
/// always-candidate sets; `Version(v)` carries the rules specific to
/// upgrading into major `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSetId {
    Generic,
    CodeQuality,
    Version(u32),
}

impl fmt::Display for RuleSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSetId::Generic => write!(f, "generic"),
            RuleSetId::CodeQuality => write!(f, "code_quality"),
            RuleSetId::Version(v) => write!(f, "v{}", v),
        }
    }
}

pub fn is_supported_major(major: u32) -> bool {
    SUPPORTED_MAJORS.contains(&major)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_set_naming_convention() {
        assert_eq!(RuleSetId::Version(12).to_string(), "v12");
        assert_eq!(RuleSetId::Generic.to_string(), "generic");
        assert_eq!(RuleSetId::CodeQuality.to_string(), "code_quality");
    }

    #[test]
    fn supported_majors_cover_the_known_range() {
        assert!(is_supported_major(12));
        assert!(!is_supported_major(99));
    }
}
