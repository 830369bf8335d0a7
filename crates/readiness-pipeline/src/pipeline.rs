use crate::cached::RunnableAnalyzer;
use readiness_core::{AnalysisContext, AnalysisResult, Extension};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Per-extension results from one pipeline run, in declared analyzer order.
#[derive(Debug, Clone)]
pub struct ExtensionReport {
    pub extension_key: String,
    pub results: Vec<AnalysisResult>,
}

/// Runs a declared, ordered set of analyzers over one or more extensions.
/// A per-analyzer failure never halts the pipeline (spec §4.6): it is
/// preserved as a `successful=false` entry in that extension's report.
pub struct Pipeline {
    analyzers: Vec<Arc<dyn RunnableAnalyzer>>,
    max_concurrency: usize,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            analyzers: Vec::new(),
            max_concurrency: 1,
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn RunnableAnalyzer>) -> Self {
        self.analyzers.push(analyzer);
        self
    }

    /// Upper bound on concurrently running extensions; callers should pass
    /// `min(cpu_cores, extensions.len())` (spec §5). Default is 1 (single
    /// threaded cooperative) unless overridden.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    async fn run_one(&self, extension: &Extension, context: &AnalysisContext) -> ExtensionReport {
        let mut results = Vec::with_capacity(self.analyzers.len());

        for analyzer in &self.analyzers {
            if !analyzer.supports(extension) {
                continue;
            }
            if !analyzer.has_required_tools() {
                results.push(
                    AnalysisResult::failure(analyzer.analyzer_name(), &extension.key, 8.0, "required tool unavailable")
                        .with_recommendation("manual code review recommended"),
                );
                continue;
            }
            debug!(analyzer = analyzer.analyzer_name(), extension = extension.key, "running analyzer");
            results.push(analyzer.analyze(extension, context).await);
        }

        ExtensionReport {
            extension_key: extension.key.clone(),
            results,
        }
    }

    pub async fn run(&self, extension: &Extension, context: &AnalysisContext) -> ExtensionReport {
        self.run_one(extension, context).await
    }

    /// Runs every extension, bounded to `max_concurrency` in flight at once.
    /// Extension order in the returned vec matches input order.
    pub async fn run_all(&self, extensions: &[Extension], context: &AnalysisContext) -> Vec<ExtensionReport> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(extensions.len());

        for extension in extensions {
            let permit = semaphore.clone();
            let extension = extension.clone();
            let context = context.clone();
            let analyzers = self.analyzers.clone();
            let max_concurrency = self.max_concurrency;

            handles.push(tokio::spawn(async move {
                let _permit = permit.acquire_owned().await.expect("semaphore never closed");
                let pipeline = Pipeline {
                    analyzers,
                    max_concurrency,
                };
                pipeline.run_one(&extension, &context).await
            }));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::warn!(error = %e, "analyzer task panicked");
                }
            }
        }
        reports
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cached::{CachedAnalyzer, RunnableAnalyzer as _};
    use crate::analyzer::Analyzer;
    use async_trait::async_trait;
    use readiness_cache::AnalysisCacheStore;
    use readiness_core::ExtensionKind;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    struct AlwaysFails;

    #[async_trait]
    impl Analyzer for AlwaysFails {
        fn name(&self) -> &str {
            "always-fails"
        }
        fn description(&self) -> &str {
            "test double"
        }
        fn supports(&self, _extension: &Extension) -> bool {
            true
        }
        async fn do_analyze(&self, extension: &Extension, _context: &AnalysisContext) -> AnalysisResult {
            AnalysisResult::failure(self.name(), &extension.key, 9.0, "boom")
        }
    }

    struct AlwaysSucceeds;

    #[async_trait]
    impl Analyzer for AlwaysSucceeds {
        fn name(&self) -> &str {
            "always-succeeds"
        }
        fn description(&self) -> &str {
            "test double"
        }
        fn supports(&self, _extension: &Extension) -> bool {
            true
        }
        async fn do_analyze(&self, extension: &Extension, _context: &AnalysisContext) -> AnalysisResult {
            AnalysisResult::success(self.name(), &extension.key, 2.0)
        }
    }

    fn cache() -> Arc<Mutex<AnalysisCacheStore>> {
        let temp = TempDir::new().unwrap();
        Arc::new(Mutex::new(AnalysisCacheStore::open(temp.path().to_path_buf()).unwrap()))
    }

    fn extension() -> Extension {
        Extension::new("news", "News", "1.0.0".parse().unwrap(), ExtensionKind::ThirdParty)
    }

    fn context() -> AnalysisContext {
        AnalysisContext::new("11.5.0".parse().unwrap(), "13.0.0".parse().unwrap(), "/opt/site".into())
    }

    #[tokio::test]
    async fn a_failing_analyzer_does_not_halt_the_pipeline() {
        let pipeline = Pipeline::new()
            .with_analyzer(Arc::new(CachedAnalyzer::new(AlwaysFails, cache())))
            .with_analyzer(Arc::new(CachedAnalyzer::new(AlwaysSucceeds, cache())));

        let report = pipeline.run(&extension(), &context()).await;

        assert_eq!(report.results.len(), 2);
        assert!(!report.results[0].successful);
        assert!(report.results[1].successful);
    }

    #[tokio::test]
    async fn run_all_preserves_extension_order() {
        let pipeline = Pipeline::new()
            .with_analyzer(Arc::new(CachedAnalyzer::new(AlwaysSucceeds, cache())))
            .with_max_concurrency(2);

        let extensions = vec![
            Extension::new("a", "A", "1.0.0".parse().unwrap(), ExtensionKind::ThirdParty),
            Extension::new("b", "B", "1.0.0".parse().unwrap(), ExtensionKind::ThirdParty),
            Extension::new("c", "C", "1.0.0".parse().unwrap(), ExtensionKind::ThirdParty),
        ];

        let reports = pipeline.run_all(&extensions, &context()).await;
        let keys: Vec<&str> = reports.iter().map(|r| r.extension_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
