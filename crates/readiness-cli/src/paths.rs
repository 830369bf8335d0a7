use readiness_core::{AnalysisContext, Extension, InstallationKind, PathKind, PathRequest, PathRequestConfig};
use readiness_paths::PathResolver;
use std::path::Path;
use tracing::warn;

/// Resolves each extension's on-disk root through the Path Resolver and
/// records it under `custom_paths["extension_path:{key}"]`, so analyzers
/// consult the strategy-resolved path instead of guessing `vendor/{key}`.
pub fn resolve_extension_paths(
    extensions: &[Extension],
    installation_path: &Path,
    installation_kind: InstallationKind,
    host_platform_major: u32,
    context: &mut AnalysisContext,
) {
    let resolver = PathResolver::with_builtin_strategies();

    for extension in extensions {
        let mut request_config = PathRequestConfig::new();
        if let Some(package_name) = &extension.package_name {
            request_config.custom_paths.insert("package_name".to_string(), package_name.clone());
        }

        let request = PathRequest::new(PathKind::Extension, installation_kind, installation_path.to_path_buf())
            .for_extension(extension.key.clone())
            .with_config(request_config)
            .with_host_platform_major(host_platform_major);

        match resolver.resolve(&request) {
            Ok(response) if response.is_ok() => {
                if let Some(resolved_path) = response.resolved_path {
                    context
                        .custom_paths
                        .insert(format!("extension_path:{}", extension.key), resolved_path.display().to_string());
                }
            }
            Ok(response) => {
                warn!(
                    extension = extension.key,
                    attempted = response.metadata.attempted_paths.len(),
                    "path resolver could not locate extension root, analyzers will fall back to vendor/{key}"
                );
            }
            Err(e) => {
                warn!(extension = extension.key, error = %e, "path resolver rejected extension path request");
            }
        }
    }
}
