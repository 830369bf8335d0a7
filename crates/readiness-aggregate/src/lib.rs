//! Result Aggregator (C5): groups a Finding stream into three overlapping
//! lenses and derives complexity, readiness, and risk-level scores.

use readiness_core::{AggregatedSummary, Finding, RiskLevel, Severity, RISK_SCORE_MAX, RISK_SCORE_MIN};
use std::collections::HashSet;

/// Canonical ordering for aggregated lenses (spec §5): severity
/// critical -> warning -> info -> suggestion, ties by `(file, line, rule_id)`.
pub fn canonical_order(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
}

/// Builds the three-lens summary and its derived scores from a stream of
/// findings plus the total number of source files considered.
pub fn aggregate(findings: &[Finding], total_files: usize) -> AggregatedSummary {
    let mut summary = AggregatedSummary::empty();
    summary.total = findings.len();
    summary.total_files = total_files;

    let mut files = HashSet::new();
    for finding in findings {
        match finding.severity {
            Severity::Critical => summary.critical += 1,
            Severity::Warning => summary.warning += 1,
            Severity::Info => summary.info += 1,
            Severity::Suggestion => summary.suggestion += 1,
        }
        *summary.by_rule.entry(finding.rule_id.clone()).or_insert(0) += 1;
        *summary.by_file.entry(finding.file.clone()).or_insert(0) += 1;
        *summary.by_kind.entry(finding.change_kind).or_insert(0) += 1;
        files.insert(finding.file.clone());
    }
    summary.affected_files = files.len();
    summary.est_fix_minutes = findings.iter().map(|f| f.change_kind.estimated_minutes() as u64).sum();
    summary.complexity = complexity_score(findings, &summary);
    summary
}

/// Weighted sum of four [0,1]-normalized factors, scaled to [0,10] and
/// rounded to one decimal (spec §4.5).
fn complexity_score(findings: &[Finding], summary: &AggregatedSummary) -> f64 {
    if findings.is_empty() {
        return 0.0;
    }

    let rule_diversity = (summary.by_rule.len() as f64 / 10.0).min(1.0) * 0.3;
    let file_spread = (summary.by_file.len() as f64 / 20.0).min(1.0) * 0.2;

    let severity_counts = [summary.critical, summary.warning, summary.info, summary.suggestion];
    let severity_mix = shannon_entropy_normalized(&severity_counts) * 0.3;

    let manual = findings.iter().filter(|f| f.change_kind.requires_manual()).count() as f64;
    let manual_intervention_ratio = (manual / findings.len() as f64) * 0.2;

    let raw = rule_diversity + file_spread + severity_mix + manual_intervention_ratio;
    round_one_decimal(raw * 10.0)
}

/// Shannon entropy over a discrete distribution, base 2, normalized by
/// `log2(4) = 2` (the maximum entropy across four severity buckets).
fn shannon_entropy_normalized(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();
    entropy / 2.0
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `10 - (0.8*critical + 0.3*warning + 0.1*info + complexity/2 +
/// (affected/total_files)*2)`, clamped to `[1,10]` (spec §4.5).
pub fn readiness_score(summary: &AggregatedSummary) -> f64 {
    let affected_ratio = if summary.total_files > 0 {
        summary.affected_files as f64 / summary.total_files as f64
    } else {
        0.0
    };

    let penalty = 0.8 * summary.critical as f64
        + 0.3 * summary.warning as f64
        + 0.1 * summary.info as f64
        + summary.complexity / 2.0
        + affected_ratio * 2.0;

    (10.0 - penalty).clamp(RISK_SCORE_MIN, RISK_SCORE_MAX)
}

pub fn risk_level(readiness: f64) -> RiskLevel {
    RiskLevel::from_readiness(readiness)
}
