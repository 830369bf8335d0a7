use crate::manifest;
use crate::priority::Priority;
use crate::strategy::PathStrategy;
use anyhow::Result;
use readiness_core::path_request::elapsed_seconds;
use readiness_core::{InstallationKind, PathKind, PathRequest, PathResponse, PathResponseMetadata};
use std::time::Instant;

/// Resolves `path_kind = package_states` to `{web_dir}/conf/PackageStates.php`,
/// falling back to the legacy installation-root location (spec §4.2,
/// strategy 4).
pub struct PackageStateFileStrategy;

const SUPPORTED_PATH_KINDS: [PathKind; 1] = [PathKind::PackageStates];
const SUPPORTED_INSTALLATION_KINDS: [InstallationKind; 6] = [
    InstallationKind::DependencyStandard,
    InstallationKind::DependencyCustom,
    InstallationKind::LegacySource,
    InstallationKind::Containerized,
    InstallationKind::Custom,
    InstallationKind::AutoDetect,
];

impl PathStrategy for PackageStateFileStrategy {
    fn name(&self) -> &'static str {
        "package_state_file_strategy"
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
        let web_dir = manifest::web_dir(manifest.as_ref(), "public");

        let candidates = vec![
            request.installation_path.join(&web_dir).join("conf/PackageStates.php"),
            request.installation_path.join("conf/PackageStates.php"),
        ];

        let mut attempted = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            attempted.push(candidate.display().to_string());
            if candidate.is_file() {
                let metadata = PathResponseMetadata {
                    strategy_name: Some(self.name().to_string()),
                    priority: Some(self.priority(request.path_kind, request.installation_kind).to_string()),
                    attempted_paths: attempted,
                    elapsed_s: elapsed_seconds(start),
                };
                return Ok(PathResponse::ok(candidate.clone(), metadata));
            }
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
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn falls_back_to_legacy_root_location() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("conf")).unwrap();
        fs::write(temp.path().join("conf/PackageStates.php"), "<?php").unwrap();

        let request = PathRequest::new(
            PathKind::PackageStates,
            InstallationKind::LegacySource,
            temp.path().to_path_buf(),
        );
        let response = PackageStateFileStrategy.resolve(&request).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.resolved_path.unwrap(), temp.path().join("conf/PackageStates.php"));
    }

    #[test]
    fn prefers_web_dir_location_when_present() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("public/conf")).unwrap();
        fs::write(temp.path().join("public/conf/PackageStates.php"), "<?php").unwrap();

        let request = PathRequest::new(
            PathKind::PackageStates,
            InstallationKind::DependencyStandard,
            temp.path().to_path_buf(),
        );
        let response = PackageStateFileStrategy.resolve(&request).unwrap();
        assert_eq!(
            response.resolved_path.unwrap(),
            temp.path().join("public/conf/PackageStates.php")
        );
    }
}
