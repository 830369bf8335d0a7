use readiness_aggregate::{aggregate, readiness_score, risk_level};
use readiness_core::{AggregatedSummary, Finding, RiskLevel};
use readiness_pipeline::ExtensionReport;

/// The whole-run view the CLI renders: per-extension analyzer results plus
/// one engine-wide readiness verdict pooled from every analyzer's findings.
pub struct EngineReport {
    pub extension_reports: Vec<ExtensionReport>,
    pub summary: AggregatedSummary,
    pub readiness: f64,
    pub risk_level: RiskLevel,
}

pub fn build_report(extension_reports: Vec<ExtensionReport>) -> EngineReport {
    let mut findings: Vec<Finding> = Vec::new();
    let mut total_files: usize = 0;

    for report in &extension_reports {
        for result in &report.results {
            if let Some(raw) = result.metrics.get("findings") {
                if let Ok(mut extracted) = serde_json::from_value::<Vec<Finding>>(raw.clone()) {
                    findings.append(&mut extracted);
                }
            }
            if result.analyzer_name == "lines-of-code" {
                if let Some(files) = result.metrics.get("files").and_then(|v| v.as_u64()) {
                    total_files += files as usize;
                }
            }
        }
    }

    let summary = aggregate(&findings, total_files);
    let readiness = readiness_score(&summary);
    let risk = risk_level(readiness);

    EngineReport {
        extension_reports,
        summary,
        readiness,
        risk_level: risk,
    }
}

pub fn render_text(report: &EngineReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "readiness: {:.1}/10  risk: {}  findings: {}  est. fix time: {}m\n\n",
        report.readiness, report.risk_level, report.summary.total, report.summary.est_fix_minutes
    ));

    for extension_report in &report.extension_reports {
        out.push_str(&format!("{}:\n", extension_report.extension_key));
        for result in &extension_report.results {
            let status = if result.successful { "ok" } else { "failed" };
            out.push_str(&format!("  [{status}] {} risk={:.1}\n", result.analyzer_name, result.risk_score));
            if let Some(error) = &result.error {
                out.push_str(&format!("    error: {error}\n"));
            }
            for recommendation in &result.recommendations {
                out.push_str(&format!("    - {recommendation}\n"));
            }
        }
    }

    out
}

pub fn render_json(report: &EngineReport) -> serde_json::Value {
    serde_json::json!({
        "readiness": report.readiness,
        "risk_level": report.risk_level,
        "summary": report.summary,
        "extensions": report.extension_reports.iter().map(|r| serde_json::json!({
            "extension_key": r.extension_key,
            "results": r.results,
        })).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness_core::AnalysisResult;

    #[test]
    fn empty_pipeline_run_yields_perfect_readiness() {
        let report = build_report(Vec::new());
        assert_eq!(report.readiness, 10.0);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn text_rendering_includes_every_extension_and_analyzer() {
        let extension_reports = vec![ExtensionReport {
            extension_key: "news".to_string(),
            results: vec![AnalysisResult::success("lines-of-code", "news", 3.0)],
        }];
        let report = build_report(extension_reports);
        let text = render_text(&report);
        assert!(text.contains("news:"));
        assert!(text.contains("lines-of-code"));
    }
}
