use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of change categories a refactoring analysis can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    BreakingChange,
    Deprecation,
    MethodSignature,
    ClassRemoval,
    InterfaceChange,
    ConfigurationChange,
    AnnotationChange,
    BestPractice,
    Performance,
    Security,
    CodeStyle,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 11] = [
        ChangeKind::BreakingChange,
        ChangeKind::ClassRemoval,
        ChangeKind::InterfaceChange,
        ChangeKind::MethodSignature,
        ChangeKind::ConfigurationChange,
        ChangeKind::Deprecation,
        ChangeKind::AnnotationChange,
        ChangeKind::BestPractice,
        ChangeKind::Performance,
        ChangeKind::Security,
        ChangeKind::CodeStyle,
    ];

    /// Estimated manual-fix minutes, authoritative per spec §4.1.
    pub fn estimated_minutes(&self) -> u32 {
        match self {
            ChangeKind::BreakingChange => 60,
            ChangeKind::ClassRemoval => 45,
            ChangeKind::InterfaceChange => 30,
            ChangeKind::MethodSignature => 20,
            ChangeKind::ConfigurationChange => 15,
            ChangeKind::Deprecation => 10,
            ChangeKind::AnnotationChange => 5,
            ChangeKind::BestPractice => 8,
            ChangeKind::Performance => 12,
            ChangeKind::Security => 25,
            ChangeKind::CodeStyle => 3,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ChangeKind::BreakingChange | ChangeKind::ClassRemoval => "Breaking Changes",
            ChangeKind::InterfaceChange | ChangeKind::MethodSignature => "API Changes",
            ChangeKind::ConfigurationChange | ChangeKind::AnnotationChange => "Configuration",
            ChangeKind::Deprecation => "Deprecations",
            ChangeKind::BestPractice | ChangeKind::CodeStyle => "Code Quality",
            ChangeKind::Performance => "Performance",
            ChangeKind::Security => "Security",
        }
    }

    pub fn requires_manual(&self) -> bool {
        matches!(
            self,
            ChangeKind::BreakingChange
                | ChangeKind::ClassRemoval
                | ChangeKind::InterfaceChange
                | ChangeKind::MethodSignature
                | ChangeKind::ConfigurationChange
        )
    }

    /// Total map: every `ChangeKind` has exactly one `Severity` (testable
    /// property #1 in spec §8).
    pub fn severity(&self) -> Severity {
        match self {
            ChangeKind::BreakingChange | ChangeKind::ClassRemoval => Severity::Critical,
            ChangeKind::Deprecation | ChangeKind::InterfaceChange | ChangeKind::MethodSignature => {
                Severity::Warning
            }
            ChangeKind::ConfigurationChange | ChangeKind::AnnotationChange | ChangeKind::Security => {
                Severity::Info
            }
            ChangeKind::BestPractice | ChangeKind::Performance | ChangeKind::CodeStyle => {
                Severity::Suggestion
            }
        }
    }
}

/// The closed set of finding severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    // Declaration order doubles as the canonical sort order required by
    // spec §5 (critical -> warning -> info -> suggestion).
    Critical,
    Warning,
    Info,
    Suggestion,
}

impl Severity {
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Critical => 1.0,
            Severity::Warning => 0.6,
            Severity::Info => 0.2,
            Severity::Suggestion => 0.1,
        }
    }

    pub fn requires_immediate_action(&self) -> bool {
        matches!(self, Severity::Critical)
    }

    pub fn is_deprecation(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Suggestion => "suggestion",
        };
        write!(f, "{}", label)
    }
}
