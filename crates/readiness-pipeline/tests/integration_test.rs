use async_trait::async_trait;
use readiness_cache::AnalysisCacheStore;
use readiness_core::{AnalysisContext, AnalysisResult, Extension, ExtensionKind};
use readiness_pipeline::{Analyzer, CachedAnalyzer, Pipeline, RefactorAnalyzer, RefactorTarget};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

struct CountingAnalyzer {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Analyzer for CountingAnalyzer {
    fn name(&self) -> &str {
        "counting-analyzer"
    }

    fn description(&self) -> &str {
        "test double that counts invocations"
    }

    fn supports(&self, _extension: &Extension) -> bool {
        true
    }

    async fn do_analyze(&self, extension: &Extension, _context: &AnalysisContext) -> AnalysisResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AnalysisResult::success(self.name(), &extension.key, 3.0)
    }
}

fn extension() -> Extension {
    Extension::new("news", "News", "1.0.0".parse().unwrap(), ExtensionKind::ThirdParty)
}

/// Refactor Driver invoked against an empty directory (no binary present):
/// the analyzer degrades to a well-formed failure rather than panicking,
/// and the pipeline still returns a report.
#[tokio::test]
async fn scenario_s2_refactor_analyzer_over_an_empty_directory() {
    let temp = TempDir::new().unwrap();
    let ext_dir = temp.path().join("vendor").join("news");
    std::fs::create_dir_all(&ext_dir).unwrap();

    let mut context = AnalysisContext::new("11.5.0".parse().unwrap(), "13.0.0".parse().unwrap(), temp.path().to_path_buf());
    context.custom_paths.insert("extension_path:news".to_string(), ext_dir.display().to_string());

    let cache = Arc::new(Mutex::new(AnalysisCacheStore::open(temp.path().join("cache")).unwrap()));
    let analyzer = RefactorAnalyzer::new("definitely-not-a-real-refactor-binary-xyz", temp.path().to_path_buf(), RefactorTarget::Code);
    let pipeline = Pipeline::new().with_analyzer(Arc::new(CachedAnalyzer::new(analyzer, cache)));

    let report = pipeline.run(&extension(), &context).await;

    assert_eq!(report.results.len(), 1);
    let result = &report.results[0];
    assert!(!result.successful);
    assert!(result.recommendations.iter().any(|r| r.contains("manual code review")));
}

/// S5: two consecutive `pipeline.run` calls within the TTL window produce
/// identical results and only the first call actually invokes the
/// analyzer's `do_analyze`.
#[tokio::test]
async fn scenario_s5_repeated_pipeline_run_reuses_the_cache() {
    let temp = TempDir::new().unwrap();
    let context = AnalysisContext::new("11.5.0".parse().unwrap(), "13.0.0".parse().unwrap(), temp.path().to_path_buf());

    let cache = Arc::new(Mutex::new(AnalysisCacheStore::open(temp.path().join("cache")).unwrap()));
    let calls = Arc::new(AtomicUsize::new(0));
    let cached = Arc::new(CachedAnalyzer::new(CountingAnalyzer { calls: calls.clone() }, cache));
    let pipeline = Pipeline::new().with_analyzer(cached);

    let first = pipeline.run(&extension(), &context).await;
    let second = pipeline.run(&extension(), &context).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.results[0].risk_score, second.results[0].risk_score);
    assert_eq!(first.results[0].analyzer_name, second.results[0].analyzer_name);
}
