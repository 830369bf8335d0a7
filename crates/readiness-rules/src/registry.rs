use crate::rule_set::{is_supported_major, RuleSetId};
use readiness_core::{ChangeKind, Severity, Version};
use regex::Regex;
use std::sync::OnceLock;

/// Namespace prefix carried by rules that originate from this platform's own
/// rule vendor, as opposed to a third-party or community rule set.
const VENDOR_NAMESPACE_PREFIX: &str = "Cms\\Rector\\";

fn version_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\[Vv](\d+)\\").expect("static regex is valid"))
}

/// Applicable rule sets for upgrading from `from` to `to`, per spec §4.3's
/// set-selection algorithm.
pub fn applicable_rule_sets(from: Version, to: Version) -> Vec<RuleSetId> {
    if from == to {
        return vec![RuleSetId::Generic, RuleSetId::CodeQuality];
    }

    if from.is_greater_than(&to) {
        return Vec::new();
    }

    if !is_supported_major(from.major()) {
        return Vec::new();
    }

    let mut sets = Vec::new();
    for v in (from.major() + 1)..=to.major() {
        sets.push(RuleSetId::Version(v));
    }
    sets.push(RuleSetId::Generic);

    if from.major() != to.major() {
        sets.push(RuleSetId::CodeQuality);
    }

    sets
}

/// A rule's inferred severity, change kind, and (derived) effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleClassification {
    pub change_kind: ChangeKind,
    pub severity: Severity,
}

impl RuleClassification {
    fn new(change_kind: ChangeKind, severity: Severity) -> Self {
        Self {
            change_kind,
            severity,
        }
    }

    pub fn estimated_minutes(&self) -> u32 {
        self.change_kind.estimated_minutes()
    }
}

/// Pattern-based, order-sensitive classification of a rule identifier into
/// `(severity, change_kind)` (spec §4.3). The Refactor Driver (C4) keeps an
/// identical copy of this logic for when the tool's rule set has drifted
/// ahead of what this registry knows about (see `classify_rule` callers in
/// the refactor-driver crate).
pub fn classify_rule(rule_id: &str) -> RuleClassification {
    let has_remove = rule_id.contains("Remove");
    let has_method = rule_id.contains("Method");
    let has_class = rule_id.contains("Class");
    let has_breaking = rule_id.contains("Breaking");

    if has_remove && has_method {
        return RuleClassification::new(ChangeKind::MethodSignature, Severity::Critical);
    }
    if has_remove && has_class {
        return RuleClassification::new(ChangeKind::ClassRemoval, Severity::Critical);
    }
    if has_remove || has_breaking {
        return RuleClassification::new(ChangeKind::BreakingChange, Severity::Critical);
    }
    if rule_id.contains("Substitute") || rule_id.contains("Replace") {
        return RuleClassification::new(ChangeKind::Deprecation, Severity::Warning);
    }
    if rule_id.contains("Migrate") {
        return RuleClassification::new(ChangeKind::ConfigurationChange, Severity::Info);
    }
    if let Some(caps) = version_token_regex().captures(rule_id) {
        let major: u32 = caps[1].parse().unwrap_or(0);
        if major >= 12 {
            return RuleClassification::new(ChangeKind::BreakingChange, Severity::Critical);
        }
        if major == 10 || major == 11 {
            return RuleClassification::new(ChangeKind::Deprecation, Severity::Warning);
        }
    }
    if rule_id.contains("CodeQuality") || rule_id.contains("General") {
        return RuleClassification::new(ChangeKind::BestPractice, Severity::Info);
    }

    RuleClassification::new(ChangeKind::Deprecation, Severity::Warning)
}

/// Whether a rule identifier matches either the platform's vendor
/// namespace or a recognized version token.
pub fn is_known_rule(rule_id: &str) -> bool {
    rule_id.starts_with(VENDOR_NAMESPACE_PREFIX) || version_token_regex().is_match(rule_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn equal_versions_return_generic_and_code_quality_only() {
        let sets = applicable_rule_sets(v("12.4.0"), v("12.4.0"));
        assert_eq!(sets, vec![RuleSetId::Generic, RuleSetId::CodeQuality]);
    }

    #[test]
    fn downgrade_returns_empty() {
        assert!(applicable_rule_sets(v("13.0.0"), v("12.0.0")).is_empty());
    }

    #[test]
    fn unsupported_source_major_returns_empty() {
        assert!(applicable_rule_sets(v("3.0.0"), v("12.0.0")).is_empty());
    }

    #[test]
    fn same_major_upgrade_skips_code_quality_set() {
        // scenario S6
        let sets = applicable_rule_sets(v("12.0.0"), v("12.4.0"));
        assert_eq!(sets, vec![RuleSetId::Generic]);
    }

    #[test]
    fn cross_major_upgrade_includes_intermediate_versions_and_code_quality() {
        // scenario S6
        let sets = applicable_rule_sets(v("11.5.0"), v("13.0.0"));
        assert_eq!(
            sets,
            vec![
                RuleSetId::Version(12),
                RuleSetId::Version(13),
                RuleSetId::Generic,
                RuleSetId::CodeQuality,
            ]
        );
    }

    #[test]
    fn remove_and_method_classifies_as_critical_method_signature() {
        let c = classify_rule("RemoveMethodCallRector");
        assert_eq!(c.change_kind, ChangeKind::MethodSignature);
        assert_eq!(c.severity, Severity::Critical);
    }

    #[test]
    fn remove_and_class_classifies_as_critical_class_removal() {
        let c = classify_rule("RemoveClassFoo");
        assert_eq!(c.change_kind, ChangeKind::ClassRemoval);
        assert_eq!(c.severity, Severity::Critical);
    }

    #[test]
    fn bare_remove_classifies_as_breaking_change() {
        let c = classify_rule("RemoveSomethingRector");
        assert_eq!(c.change_kind, ChangeKind::BreakingChange);
    }

    #[test]
    fn substitute_classifies_as_deprecation() {
        let c = classify_rule("SubstituteOldApiRector");
        assert_eq!(c.change_kind, ChangeKind::Deprecation);
        assert_eq!(c.severity, Severity::Warning);
    }

    #[test]
    fn migrate_classifies_as_configuration_change() {
        let c = classify_rule("MigrateTypoScriptRector");
        assert_eq!(c.change_kind, ChangeKind::ConfigurationChange);
    }

    #[test]
    fn high_version_token_classifies_as_breaking_change() {
        let c = classify_rule(r"Cms\Rector\Set\V12\SomeRector");
        assert_eq!(c.change_kind, ChangeKind::BreakingChange);
        assert_eq!(c.severity, Severity::Critical);
    }

    #[test]
    fn v10_and_v11_tokens_classify_as_deprecation() {
        let c10 = classify_rule(r"Cms\Rector\Set\V10\SomeRector");
        let c11 = classify_rule(r"Cms\Rector\Set\V11\SomeRector");
        assert_eq!(c10.change_kind, ChangeKind::Deprecation);
        assert_eq!(c11.change_kind, ChangeKind::Deprecation);
    }

    #[test]
    fn code_quality_or_general_classifies_as_best_practice() {
        let c = classify_rule("CodeQualityImproveRector");
        assert_eq!(c.change_kind, ChangeKind::BestPractice);
        assert_eq!(c.severity, Severity::Info);
    }

    #[test]
    fn unmatched_rule_defaults_to_deprecation_warning() {
        let c = classify_rule("SomeUnrelatedRector");
        assert_eq!(c.change_kind, ChangeKind::Deprecation);
        assert_eq!(c.severity, Severity::Warning);
    }

    #[test]
    fn known_rule_predicate_matches_vendor_prefix_or_version_token() {
        assert!(is_known_rule(r"Cms\Rector\Set\V12\SomeRector"));
        assert!(!is_known_rule("SomeThirdPartyRector"));
    }

    #[test]
    fn order_matters_remove_and_breaking_together_is_still_remove_class_if_class_present() {
        // "Remove" + "Class" must win over the generic "Remove" OR "Breaking" arm.
        let c = classify_rule("RemoveBreakingClassRector");
        assert_eq!(c.change_kind, ChangeKind::ClassRemoval);
    }
}
