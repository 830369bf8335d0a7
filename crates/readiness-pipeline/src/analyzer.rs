use async_trait::async_trait;
use readiness_core::{AnalysisContext, AnalysisResult, Extension};

/// The raw analyzer contract (spec §4.6). `do_analyze` is the pure,
/// uncached computation; the cached-analyzer shell in [`crate::cached`]
/// composes around it rather than an analyzer base class inheriting it.
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn supports(&self, extension: &Extension) -> bool;

    fn required_tools(&self) -> &[&str] {
        &[]
    }

    fn has_required_tools(&self) -> bool {
        true
    }

    async fn do_analyze(&self, extension: &Extension, context: &AnalysisContext) -> AnalysisResult;
}
