//! Rule Registry (C3): maps a target-version range to applicable rule sets
//! and classifies individual rule identifiers into a change kind and
//! severity.

pub mod registry;
pub mod rule_set;

pub use registry::{applicable_rule_sets, classify_rule, is_known_rule, RuleClassification};
pub use rule_set::{is_supported_major, RuleSetId, SUPPORTED_MAJORS};
