use crate::analyzer::Analyzer;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use readiness_cache::AnalysisCacheStore;
use readiness_core::{AnalysisContext, AnalysisResult, Extension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// On-disk shape of a cached `AnalysisResult` (spec §4.7).
#[derive(Debug, Serialize, Deserialize)]
struct CachedPayload {
    analyzer_name: String,
    extension_key: String,
    metrics: std::collections::HashMap<String, serde_json::Value>,
    risk_score: f64,
    recommendations: Vec<String>,
    successful: bool,
    error: Option<String>,
    cached_at: DateTime<Utc>,
    cache_ttl: u64,
}

impl CachedPayload {
    fn from_result(result: &AnalysisResult, cache_ttl: u64) -> Self {
        Self {
            analyzer_name: result.analyzer_name.clone(),
            extension_key: result.extension_key.clone(),
            metrics: result.metrics.clone(),
            risk_score: result.risk_score,
            recommendations: result.recommendations.clone(),
            successful: result.successful,
            error: result.error.clone(),
            cached_at: Utc::now(),
            cache_ttl,
        }
    }

    fn into_result(self) -> AnalysisResult {
        AnalysisResult {
            analyzer_name: self.analyzer_name,
            extension_key: self.extension_key,
            metrics: self.metrics,
            risk_score: self.risk_score,
            recommendations: self.recommendations,
            successful: self.successful,
            error: self.error,
        }
    }
}

/// Stable cache key over the fields the spec names plus any
/// analyzer-specific extra component (e.g. the rule sets the Refactor
/// Driver resolved).
fn compute_cache_key(analyzer_name: &str, extension: &Extension, context: &AnalysisContext, extra: &serde_json::Value) -> String {
    let payload = serde_json::json!({
        "analyzer": analyzer_name,
        "extension_key": extension.key,
        "extension_version": extension.version.to_string(),
        "extension_kind": extension.kind,
        "extension_package_name": extension.package_name,
        "current_version": context.current_version.to_string(),
        "target_version": context.target_version.to_string(),
        "extra": extra,
    });

    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("analysis_{}_{}", analyzer_name, digest)
}

/// Object-safe face of a cached analyzer, so a [`crate::pipeline::Pipeline`]
/// can hold a heterogeneous `Vec<Box<dyn RunnableAnalyzer>>`.
#[async_trait]
pub trait RunnableAnalyzer: Send + Sync {
    fn analyzer_name(&self) -> &str;
    fn supports(&self, extension: &Extension) -> bool;
    fn has_required_tools(&self) -> bool;
    async fn analyze(&self, extension: &Extension, context: &AnalysisContext) -> AnalysisResult;
}

/// Wraps any [`Analyzer`] with the uniform caching shell described in
/// spec §4.7: compute a key, serve a fresh hit, otherwise call
/// `do_analyze` and cache only on success.
pub struct CachedAnalyzer<A: Analyzer> {
    inner: A,
    cache: Arc<Mutex<AnalysisCacheStore>>,
}

impl<A: Analyzer> CachedAnalyzer<A> {
    pub fn new(inner: A, cache: Arc<Mutex<AnalysisCacheStore>>) -> Self {
        Self { inner, cache }
    }

    /// Analyzer-specific extra key component. Default: no extra
    /// discrimination beyond the shared fields.
    fn extra_key_component(&self, _extension: &Extension) -> serde_json::Value {
        serde_json::Value::Null
    }

    pub async fn analyze(&self, extension: &Extension, context: &AnalysisContext) -> AnalysisResult {
        let cache_cfg = context.result_cache;
        let extra = self.extra_key_component(extension);
        let cache_key = compute_cache_key(self.inner.name(), extension, context, &extra);

        if cache_cfg.enabled {
            let mut store = self.cache.lock().await;
            if let Ok(Some(bytes)) = store.get(&cache_key) {
                if let Ok(payload) = serde_json::from_slice::<CachedPayload>(&bytes) {
                    debug!(cache_key, "cache hit, do_analyze skipped");
                    return payload.into_result();
                }
            }
        }

        let result = self.inner.do_analyze(extension, context).await;

        if cache_cfg.enabled && result.successful {
            let payload = CachedPayload::from_result(&result, cache_cfg.ttl_s);
            match serde_json::to_vec(&payload) {
                Ok(bytes) => {
                    let mut store = self.cache.lock().await;
                    if let Err(e) = store.put(&cache_key, &bytes, Some(cache_cfg.ttl_s)) {
                        warn!(error = %e, "failed to persist analysis cache entry");
                    }
                }
                Err(e) => warn!(error = %e, "failed to serialize analysis cache payload"),
            }
        }

        result
    }
}

#[async_trait]
impl<A: Analyzer> RunnableAnalyzer for CachedAnalyzer<A> {
    fn analyzer_name(&self) -> &str {
        self.inner.name()
    }

    fn supports(&self, extension: &Extension) -> bool {
        self.inner.supports(extension)
    }

    fn has_required_tools(&self) -> bool {
        self.inner.has_required_tools()
    }

    async fn analyze(&self, extension: &Extension, context: &AnalysisContext) -> AnalysisResult {
        CachedAnalyzer::analyze(self, extension, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness_core::ExtensionKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

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
            AnalysisResult::success(self.name(), &extension.key, 5.0)
        }
    }

    fn extension() -> Extension {
        Extension::new("news", "News", "1.2.3".parse().unwrap(), ExtensionKind::ThirdParty)
    }

    fn context() -> AnalysisContext {
        AnalysisContext::new("11.5.0".parse().unwrap(), "13.0.0".parse().unwrap(), "/opt/site".into())
    }

    #[tokio::test]
    async fn scenario_s5_second_call_within_ttl_does_not_invoke_do_analyze() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(Mutex::new(AnalysisCacheStore::open(temp.path().to_path_buf()).unwrap()));
        let calls = Arc::new(AtomicUsize::new(0));
        let analyzer = CachedAnalyzer::new(CountingAnalyzer { calls: calls.clone() }, store);

        let ext = extension();
        let ctx = context();

        let first = analyzer.analyze(&ext, &ctx).await;
        let second = analyzer.analyze(&ext, &ctx).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.risk_score, second.risk_score);
        assert_eq!(first.analyzer_name, second.analyzer_name);
    }

    #[tokio::test]
    async fn disabled_caching_invokes_do_analyze_every_time() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(Mutex::new(AnalysisCacheStore::open(temp.path().to_path_buf()).unwrap()));
        let calls = Arc::new(AtomicUsize::new(0));
        let analyzer = CachedAnalyzer::new(CountingAnalyzer { calls: calls.clone() }, store);

        let ext = extension();
        let mut ctx = context();
        ctx.result_cache.enabled = false;

        analyzer.analyze(&ext, &ctx).await;
        analyzer.analyze(&ext, &ctx).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_never_cached() {
        struct FailingAnalyzer {
            calls: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl Analyzer for FailingAnalyzer {
            fn name(&self) -> &str {
                "failing-analyzer"
            }

            fn description(&self) -> &str {
                "always fails"
            }

            fn supports(&self, _extension: &Extension) -> bool {
                true
            }

            async fn do_analyze(&self, extension: &Extension, _context: &AnalysisContext) -> AnalysisResult {
                self.calls.fetch_add(1, Ordering::SeqCst);
                AnalysisResult::failure(self.name(), &extension.key, 5.0, "boom")
            }
        }

        let temp = TempDir::new().unwrap();
        let store = Arc::new(Mutex::new(AnalysisCacheStore::open(temp.path().to_path_buf()).unwrap()));
        let calls = Arc::new(AtomicUsize::new(0));
        let analyzer = CachedAnalyzer::new(FailingAnalyzer { calls: calls.clone() }, store);

        let ext = extension();
        let ctx = context();

        analyzer.analyze(&ext, &ctx).await;
        analyzer.analyze(&ext, &ctx).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
