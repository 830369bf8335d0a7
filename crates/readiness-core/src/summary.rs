use crate::taxonomy::ChangeKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Coarse-grained upgrade risk bucket derived from the readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// `readiness >= 8 -> low`, `>= 6 -> medium`, `>= 3 -> high`, else
    /// `critical` (spec §4.5).
    pub fn from_readiness(readiness: f64) -> Self {
        if readiness >= 8.0 {
            RiskLevel::Low
        } else if readiness >= 6.0 {
            RiskLevel::Medium
        } else if readiness >= 3.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{}", label)
    }
}

/// The aggregated view of a stream of findings across one or more
/// extensions: three overlapping lenses (severity counts, by-file, by-rule)
/// plus the derived complexity/readiness/risk metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedSummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub suggestion: usize,
    pub affected_files: usize,
    pub total_files: usize,
    pub by_rule: HashMap<String, usize>,
    pub by_file: HashMap<String, usize>,
    pub by_kind: HashMap<ChangeKind, usize>,
    pub complexity: f64,
    pub est_fix_minutes: u64,
}

impl AggregatedSummary {
    pub fn empty() -> Self {
        Self {
            total: 0,
            critical: 0,
            warning: 0,
            info: 0,
            suggestion: 0,
            affected_files: 0,
            total_files: 0,
            by_rule: HashMap::new(),
            by_file: HashMap::new(),
            by_kind: HashMap::new(),
            complexity: 0.0,
            est_fix_minutes: 0,
        }
    }

    /// Top-N entries from `by_file`/`by_rule`, sorted by descending count
    /// with ties broken lexically (spec §4.5).
    pub fn top_n(map: &HashMap<String, usize>, n: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|(key_a, count_a), (key_b, count_b)| count_b.cmp(count_a).then_with(|| key_a.cmp(key_b)));
        entries.truncate(n);
        entries
    }
}

impl Default for AggregatedSummary {
    fn default() -> Self {
        Self::empty()
    }
}
