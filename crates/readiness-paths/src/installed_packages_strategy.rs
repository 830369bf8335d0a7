use crate::manifest;
use crate::priority::Priority;
use crate::strategy::PathStrategy;
use anyhow::Result;
use readiness_core::path_request::elapsed_seconds;
use readiness_core::{InstallationKind, PathKind, PathRequest, PathResponse, PathResponseMetadata};
use std::time::Instant;

/// Resolves `path_kind = composer_installed` to `{vendor_dir}/host/installed.json`
/// (spec §4.2, strategy 3).
pub struct InstalledPackagesManifestStrategy;

const SUPPORTED_PATH_KINDS: [PathKind; 1] = [PathKind::ComposerInstalled];
const SUPPORTED_INSTALLATION_KINDS: [InstallationKind; 6] = [
    InstallationKind::DependencyStandard,
    InstallationKind::DependencyCustom,
    InstallationKind::LegacySource,
    InstallationKind::Containerized,
    InstallationKind::Custom,
    InstallationKind::AutoDetect,
];

impl PathStrategy for InstalledPackagesManifestStrategy {
    fn name(&self) -> &'static str {
        "installed_packages_manifest_strategy"
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
        let manifest = manifest::load_manifest(&request.installation_path);
        let vendor_dir = manifest::vendor_dir(manifest.as_ref());
        let candidate = request
            .installation_path
            .join(&vendor_dir)
            .join("host")
            .join("installed.json");

        let attempted = vec![candidate.display().to_string()];
        let metadata = PathResponseMetadata {
            strategy_name: Some(self.name().to_string()),
            priority: Some(self.priority(request.path_kind, request.installation_kind).to_string()),
            attempted_paths: attempted.clone(),
            elapsed_s: elapsed_seconds(start),
        };

        if candidate.is_file() {
            Ok(PathResponse::ok(candidate, metadata))
        } else {
            Ok(PathResponse::not_found(attempted, Vec::new(), metadata))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_installed_json_under_vendor_host() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("vendor/host");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("installed.json"), "[]").unwrap();

        let request = PathRequest::new(
            PathKind::ComposerInstalled,
            InstallationKind::DependencyStandard,
            temp.path().to_path_buf(),
        );
        let response = InstalledPackagesManifestStrategy.resolve(&request).unwrap();
        assert!(response.is_ok());
    }

    #[test]
    fn missing_file_is_not_found_not_an_error() {
        let temp = TempDir::new().unwrap();
        let request = PathRequest::new(
            PathKind::ComposerInstalled,
            InstallationKind::DependencyStandard,
            temp.path().to_path_buf(),
        );
        let response = InstalledPackagesManifestStrategy.resolve(&request).unwrap();
        assert!(!response.is_ok());
    }
}
