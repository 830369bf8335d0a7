use crate::analyzer::Analyzer;
use async_trait::async_trait;
use readiness_core::{AnalysisContext, AnalysisResult, Extension};
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: &[&str] = &["php", "phtml", "html", "yaml", "yml"];

/// Walks the extension's source tree counting lines per file. A large
/// extension raises risk independent of what the Refactor Driver finds,
/// since even clean findings still take longer to hand-verify.
pub struct LinesOfCodeAnalyzer;

impl LinesOfCodeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn count(&self, root: &std::path::Path) -> (usize, u64) {
        let mut files = 0usize;
        let mut lines = 0u64;

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let is_source = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
                .unwrap_or(false);
            if !is_source {
                continue;
            }
            if let Ok(content) = std::fs::read_to_string(entry.path()) {
                files += 1;
                lines += content.lines().count() as u64;
            }
        }

        (files, lines)
    }
}

impl Default for LinesOfCodeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for LinesOfCodeAnalyzer {
    fn name(&self) -> &str {
        "lines-of-code"
    }

    fn description(&self) -> &str {
        "walks the extension's source tree and sizes it by file and line count"
    }

    fn supports(&self, _extension: &Extension) -> bool {
        true
    }

    async fn do_analyze(&self, extension: &Extension, context: &AnalysisContext) -> AnalysisResult {
        let root = context
            .custom_paths
            .get(&format!("extension_path:{}", extension.key))
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| context.installation_path.join("vendor").join(&extension.key));

        if !root.exists() {
            return AnalysisResult::success(self.name(), &extension.key, 5.0)
                .with_metric("files", serde_json::json!(0))
                .with_metric("lines", serde_json::json!(0))
                .with_recommendation("extension path not found; size could not be estimated");
        }

        let (files, lines) = self.count(&root);

        // Larger codebases carry proportionally more manual-review risk,
        // capped so a handful of generated templates doesn't look fatal.
        let risk_score = 1.0 + (lines as f64 / 2000.0).min(9.0);

        AnalysisResult::success(self.name(), &extension.key, risk_score)
            .with_metric("files", serde_json::json!(files))
            .with_metric("lines", serde_json::json!(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness_core::ExtensionKind;
    use tempfile::TempDir;

    fn extension() -> Extension {
        Extension::new("news", "News", "1.0.0".parse().unwrap(), ExtensionKind::ThirdParty)
    }

    #[tokio::test]
    async fn counts_php_files_under_the_extension_root() {
        let temp = TempDir::new().unwrap();
        let ext_dir = temp.path().join("vendor").join("news");
        std::fs::create_dir_all(&ext_dir).unwrap();
        std::fs::write(ext_dir.join("Foo.php"), "line1\nline2\nline3\n").unwrap();
        std::fs::write(ext_dir.join("ignored.txt"), "not counted\n").unwrap();

        let mut ctx = AnalysisContext::new("11.5.0".parse().unwrap(), "13.0.0".parse().unwrap(), temp.path().to_path_buf());
        ctx.custom_paths.insert("extension_path:news".to_string(), ext_dir.display().to_string());

        let analyzer = LinesOfCodeAnalyzer::new();
        let result = analyzer.do_analyze(&extension(), &ctx).await;

        assert!(result.successful);
        assert_eq!(result.metrics.get("files"), Some(&serde_json::json!(1)));
        assert_eq!(result.metrics.get("lines"), Some(&serde_json::json!(3)));
    }

    #[tokio::test]
    async fn missing_extension_path_degrades_without_failing() {
        let temp = TempDir::new().unwrap();
        let ctx = AnalysisContext::new("11.5.0".parse().unwrap(), "13.0.0".parse().unwrap(), temp.path().to_path_buf());

        let analyzer = LinesOfCodeAnalyzer::new();
        let result = analyzer.do_analyze(&extension(), &ctx).await;

        assert!(result.successful);
        assert_eq!(result.metrics.get("files"), Some(&serde_json::json!(0)));
    }
}
