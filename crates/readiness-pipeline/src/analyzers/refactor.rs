use crate::analyzer::Analyzer;
use async_trait::async_trait;
use readiness_core::{AnalysisContext, AnalysisResult, Extension};
use readiness_refactor::RefactorDriver;
use readiness_rules::applicable_rule_sets;
use std::path::PathBuf;
use tracing::warn;

/// Which slice of the extension tree a refactor-backed analyzer drives the
/// external tool against. Both variants share the Refactor Driver contract
/// (spec §4.6: "a second refactoring driver for template/config files
/// following the same contract").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefactorTarget {
    Code,
    TemplatesAndConfig,
}

impl RefactorTarget {
    fn analyzer_name(&self) -> &'static str {
        match self {
            RefactorTarget::Code => "refactor-driver-code",
            RefactorTarget::TemplatesAndConfig => "refactor-driver-templates-config",
        }
    }
}

/// Locates an extension's path and runs the Refactor Driver against it,
/// translating the resulting `DriverReport` into an `AnalysisResult`.
pub struct RefactorAnalyzer {
    binary_path: String,
    work_dir: PathBuf,
    target: RefactorTarget,
}

impl RefactorAnalyzer {
    pub fn new(binary_path: impl Into<String>, work_dir: PathBuf, target: RefactorTarget) -> Self {
        Self {
            binary_path: binary_path.into(),
            work_dir,
            target,
        }
    }

    fn extension_path(&self, extension: &Extension, context: &AnalysisContext) -> PathBuf {
        context
            .custom_paths
            .get(&format!("extension_path:{}", extension.key))
            .map(PathBuf::from)
            .unwrap_or_else(|| context.installation_path.join("vendor").join(&extension.key))
    }
}

#[async_trait]
impl Analyzer for RefactorAnalyzer {
    fn name(&self) -> &str {
        self.target.analyzer_name()
    }

    fn description(&self) -> &str {
        match self.target {
            RefactorTarget::Code => "dry-run refactoring pass over PHP source files",
            RefactorTarget::TemplatesAndConfig => "dry-run refactoring pass over templates and configuration files",
        }
    }

    fn supports(&self, _extension: &Extension) -> bool {
        true
    }

    fn has_required_tools(&self) -> bool {
        which_binary_exists(&self.binary_path)
    }

    async fn do_analyze(&self, extension: &Extension, context: &AnalysisContext) -> AnalysisResult {
        if !self.has_required_tools() {
            warn!(binary = self.binary_path, "refactor binary not available");
            return AnalysisResult::failure(self.name(), &extension.key, 8.0, "refactoring tool not found on PATH")
                .with_recommendation("manual code review recommended");
        }

        let rule_sets = applicable_rule_sets(context.current_version.clone(), context.target_version.clone());
        let extension_path = self.extension_path(extension, context);
        let driver = RefactorDriver::new(self.binary_path.clone());

        let report = driver.run(extension, &extension_path, context, &rule_sets, &self.work_dir);

        if report.errors.iter().any(|e| e.contains("timed out")) {
            return AnalysisResult::failure(self.name(), &extension.key, 8.0, report.errors.join("; "))
                .with_recommendation("manual code review recommended");
        }

        if !report.successful() && report.exit_code.map(|c| c != 0).unwrap_or(true) && !report.errors.is_empty() {
            return AnalysisResult::failure(self.name(), &extension.key, 6.0, report.errors.join("; "));
        }

        let critical = report.findings.iter().filter(|f| f.severity == readiness_core::Severity::Critical).count();
        let risk_score = 10.0 - (critical as f64 * 0.5).min(9.0);

        let mut result = AnalysisResult::success(self.name(), &extension.key, risk_score.max(1.0))
            .with_metric("processed_files", serde_json::json!(report.findings.len()))
            .with_metric("elapsed_s", serde_json::json!(report.elapsed_s))
            .with_metric("finding_count", serde_json::json!(report.findings.len()))
            .with_metric("findings", serde_json::to_value(&report.findings).unwrap_or(serde_json::Value::Null));

        if !report.findings.is_empty() {
            result = result.with_recommendation(format!("{} findings require review before upgrading", report.findings.len()));
        }

        result
    }
}

fn which_binary_exists(binary: &str) -> bool {
    if binary.contains('/') {
        return std::path::Path::new(binary).exists();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(binary).exists()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness_core::ExtensionKind;
    use tempfile::TempDir;

    fn extension() -> Extension {
        Extension::new("news", "News", "1.0.0".parse().unwrap(), ExtensionKind::ThirdParty)
    }

    fn context(path: PathBuf) -> AnalysisContext {
        AnalysisContext::new("11.5.0".parse().unwrap(), "13.0.0".parse().unwrap(), path)
    }

    #[tokio::test]
    async fn missing_binary_yields_failure_with_manual_review_recommendation() {
        let temp = TempDir::new().unwrap();
        let analyzer = RefactorAnalyzer::new("definitely-not-a-real-refactor-binary-xyz", temp.path().to_path_buf(), RefactorTarget::Code);
        let result = analyzer.do_analyze(&extension(), &context(temp.path().to_path_buf())).await;

        assert!(!result.successful);
        assert!(result.recommendations.iter().any(|r| r.contains("manual code review")));
    }

    #[test]
    fn target_names_are_distinct() {
        assert_ne!(RefactorTarget::Code.analyzer_name(), RefactorTarget::TemplatesAndConfig.analyzer_name());
    }
}
