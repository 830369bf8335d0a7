use crate::manifest;
use crate::priority::Priority;
use crate::strategy::PathStrategy;
use crate::validity::is_acceptable_directory;
use anyhow::Result;
use readiness_core::path_request::elapsed_seconds;
use readiness_core::{InstallationKind, PathKind, PathRequest, PathResponse, PathResponseMetadata};
use std::time::Instant;

/// Resolves `path_kind = vendor_dir` by reading `config.vendor-dir` from the
/// dependency manifest (spec §4.2, strategy 2). Absolute overrides in
/// `custom_paths["vendor-dir"]` are used verbatim, unjoined to the
/// installation root.
pub struct VendorDirectoryStrategy;

const SUPPORTED_PATH_KINDS: [PathKind; 1] = [PathKind::VendorDir];
const SUPPORTED_INSTALLATION_KINDS: [InstallationKind; 6] = [
    InstallationKind::DependencyStandard,
    InstallationKind::DependencyCustom,
    InstallationKind::LegacySource,
    InstallationKind::Containerized,
    InstallationKind::Custom,
    InstallationKind::AutoDetect,
];

impl PathStrategy for VendorDirectoryStrategy {
    fn name(&self) -> &'static str {
        "vendor_directory_strategy"
    }

    fn supported_path_kinds(&self) -> &'static [PathKind] {
        &SUPPORTED_PATH_KINDS
    }

    fn supported_installation_kinds(&self) -> &'static [InstallationKind] {
        &SUPPORTED_INSTALLATION_KINDS
    }

    fn priority(&self, _path_kind: PathKind, _installation_kind: InstallationKind) -> Priority {
        Priority::Normal
    }

    fn resolve(&self, request: &PathRequest) -> Result<PathResponse> {
        let start = Instant::now();

        let configured = request.config.custom_paths.get("vendor-dir").cloned();
        let vendor_dir = configured.unwrap_or_else(|| {
            let manifest = manifest::load_manifest(&request.installation_path);
            manifest::vendor_dir(manifest.as_ref())
        });

        let vendor_path = std::path::Path::new(&vendor_dir);
        let candidate = if vendor_path.is_absolute() {
            vendor_path.to_path_buf()
        } else {
            request.installation_path.join(vendor_path)
        };

        let attempted = vec![candidate.display().to_string()];
        let follow_symlinks = request.config.follow_symlinks;

        if is_acceptable_directory(&candidate, follow_symlinks) {
            let metadata = PathResponseMetadata {
                strategy_name: Some(self.name().to_string()),
                priority: Some(self.priority(request.path_kind, request.installation_kind).to_string()),
                attempted_paths: attempted,
                elapsed_s: elapsed_seconds(start),
            };
            return Ok(PathResponse::ok(candidate, metadata));
        }

        let metadata = PathResponseMetadata {
            strategy_name: Some(self.name().to_string()),
            priority: Some(self.priority(request.path_kind, request.installation_kind).to_string()),
            attempted_paths: attempted.clone(),
            elapsed_s: elapsed_seconds(start),
        };
        Ok(PathResponse::not_found(attempted, Vec::new(), metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_default_vendor_directory_without_a_manifest() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("vendor")).unwrap();

        let request = PathRequest::new(PathKind::VendorDir, InstallationKind::DependencyStandard, temp.path().to_path_buf());
        let response = VendorDirectoryStrategy.resolve(&request).unwrap();
        assert!(response.is_ok());
    }

    #[test]
    fn absolute_custom_override_is_used_verbatim() {
        let temp = TempDir::new().unwrap();
        let absolute = temp.path().join("elsewhere");
        std::fs::create_dir(&absolute).unwrap();

        let mut config = readiness_core::PathRequestConfig::new();
        config
            .custom_paths
            .insert("vendor-dir".to_string(), absolute.display().to_string());
        let request = PathRequest::new(PathKind::VendorDir, InstallationKind::DependencyStandard, temp.path().to_path_buf())
            .with_config(config);

        let response = VendorDirectoryStrategy.resolve(&request).unwrap();
        assert_eq!(response.resolved_path.unwrap(), absolute);
    }
}
