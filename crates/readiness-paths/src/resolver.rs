use crate::error::{PathResolverError, Result};
use crate::extension_strategy::ExtensionPathStrategy;
use crate::installed_packages_strategy::InstalledPackagesManifestStrategy;
use crate::package_states_strategy::PackageStateFileStrategy;
use crate::recovery::attempt_recovery;
use crate::strategy::PathStrategy;
use crate::vendor_strategy::VendorDirectoryStrategy;
use readiness_core::{PathKind, PathRequest, PathResponse};
use tracing::{debug, warn};

/// Consults a priority-ordered list of strategies until one resolves,
/// falling back to the recovery pipeline when the primary chain is
/// exhausted without success (spec §4.2).
pub struct PathResolver {
    strategies: Vec<Box<dyn PathStrategy>>,
}

impl PathResolver {
    pub fn with_builtin_strategies() -> Self {
        Self {
            strategies: vec![
                Box::new(ExtensionPathStrategy),
                Box::new(VendorDirectoryStrategy),
                Box::new(InstalledPackagesManifestStrategy),
                Box::new(PackageStateFileStrategy),
            ],
        }
    }

    pub fn new(strategies: Vec<Box<dyn PathStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolves a request against the priority-ordered strategy chain.
    /// `InvalidRequest` (spec §7) is the one case that propagates rather
    /// than becoming a `PathResponse { status: NotFound, .. }`: an
    /// extension-kind request with no extension identifier at all is a
    /// caller bug, not a resolution failure.
    pub fn resolve(&self, request: &PathRequest) -> Result<PathResponse> {
        if request.path_kind == PathKind::Extension && request.extension_ref.is_none() {
            return Err(PathResolverError::InvalidRequest(
                "extension path request requires an extension_ref".to_string(),
            ));
        }

        let mut candidates: Vec<&Box<dyn PathStrategy>> =
            self.strategies.iter().filter(|s| s.can_handle(request)).collect();
        candidates.sort_by(|a, b| {
            b.priority(request.path_kind, request.installation_kind)
                .cmp(&a.priority(request.path_kind, request.installation_kind))
        });

        let mut last_attempted: Vec<String> = Vec::new();

        for strategy in candidates {
            match strategy.resolve(request) {
                Ok(response) if response.is_ok() => {
                    debug!(strategy = strategy.name(), "path resolved");
                    return Ok(response);
                }
                Ok(response) => {
                    last_attempted = response.metadata.attempted_paths;
                }
                Err(err) => {
                    warn!(strategy = strategy.name(), error = %err, "strategy failed, trying recovery");
                }
            }
        }

        Ok(attempt_recovery(request, &last_attempted))
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::with_builtin_strategies()
    }
}
