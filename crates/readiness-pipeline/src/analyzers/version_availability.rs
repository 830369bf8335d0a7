use crate::analyzer::Analyzer;
use async_trait::async_trait;
use readiness_core::{AnalysisContext, AnalysisResult, Extension};
use readiness_registry_client::PackageRegistryClient;
use std::sync::Arc;

/// Consults external package registries to ask whether a newer version of
/// the extension exists for the target platform major (spec §4.6).
/// Queries registry A first, falling back to registry B, mirroring the
/// two-client tolerance described in spec §6.
pub struct VersionAvailabilityAnalyzer {
    primary: Arc<dyn PackageRegistryClient>,
    secondary: Arc<dyn PackageRegistryClient>,
}

impl VersionAvailabilityAnalyzer {
    pub fn new(primary: Arc<dyn PackageRegistryClient>, secondary: Arc<dyn PackageRegistryClient>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl Analyzer for VersionAvailabilityAnalyzer {
    fn name(&self) -> &str {
        "version-availability"
    }

    fn description(&self) -> &str {
        "checks external package registries for an available release targeting the upgrade destination"
    }

    fn supports(&self, extension: &Extension) -> bool {
        extension.package_name.is_some()
    }

    async fn do_analyze(&self, extension: &Extension, context: &AnalysisContext) -> AnalysisResult {
        let Some(package_name) = extension.package_name.as_deref() else {
            return AnalysisResult::success(self.name(), &extension.key, 5.0)
                .with_metric("available", serde_json::json!(false))
                .with_recommendation("no package name known; cannot check registry availability");
        };

        let target = context.target_version.to_string();

        let available = self.primary.has_version_for(package_name, &target).await
            || self.secondary.has_version_for(package_name, &target).await;

        let risk_score = if available { 2.0 } else { 7.0 };
        let mut result = AnalysisResult::success(self.name(), &extension.key, risk_score)
            .with_metric("available", serde_json::json!(available))
            .with_metric("package_name", serde_json::json!(package_name));

        if !available {
            result = result.with_recommendation(format!(
                "no published release of {package_name} targets platform {target}; verify with the maintainer before upgrading"
            ));
        }

        result
    }
}
