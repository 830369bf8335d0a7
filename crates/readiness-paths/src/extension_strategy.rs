use crate::manifest;
use crate::priority::Priority;
use crate::strategy::PathStrategy;
use crate::validity::is_valid_extension_dir;
use anyhow::Result;
use readiness_core::path_request::elapsed_seconds;
use readiness_core::{InstallationKind, PathKind, PathRequest, PathResponse, PathResponseMetadata};
use std::path::PathBuf;
use std::time::Instant;

/// Resolves `path_kind = extension` requests across every installation
/// layout this platform supports (spec §4.2, strategy 1).
pub struct ExtensionPathStrategy;

const SUPPORTED_PATH_KINDS: [PathKind; 1] = [PathKind::Extension];
const SUPPORTED_INSTALLATION_KINDS: [InstallationKind; 5] = [
    InstallationKind::DependencyStandard,
    InstallationKind::DependencyCustom,
    InstallationKind::LegacySource,
    InstallationKind::Containerized,
    InstallationKind::AutoDetect,
];

impl PathStrategy for ExtensionPathStrategy {
    fn name(&self) -> &'static str {
        "extension_path_resolution_strategy"
    }

    fn supported_path_kinds(&self) -> &'static [PathKind] {
        &SUPPORTED_PATH_KINDS
    }

    fn supported_installation_kinds(&self) -> &'static [InstallationKind] {
        &SUPPORTED_INSTALLATION_KINDS
    }

    fn priority(&self, _path_kind: PathKind, installation_kind: InstallationKind) -> Priority {
        match installation_kind {
            InstallationKind::DependencyStandard | InstallationKind::DependencyCustom => Priority::Highest,
            InstallationKind::Containerized => Priority::High,
            InstallationKind::AutoDetect => Priority::Normal,
            InstallationKind::LegacySource => Priority::Low,
            InstallationKind::Custom => Priority::Lowest,
        }
    }

    fn resolve(&self, request: &PathRequest) -> Result<PathResponse> {
        let start = Instant::now();
        let key = request
            .extension_ref
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("extension path resolution requires extension_ref"))?;

        let sub_kind = match request.installation_kind {
            InstallationKind::AutoDetect => detect_installation_kind(&request.installation_path),
            other => other,
        };

        let candidates = match sub_kind {
            InstallationKind::DependencyStandard => dependency_candidates(request, key, "public"),
            InstallationKind::DependencyCustom => dependency_candidates(request, key, "web"),
            InstallationKind::LegacySource => legacy_candidates(request, key),
            InstallationKind::Containerized => containerized_candidates(request, key),
            InstallationKind::AutoDetect | InstallationKind::Custom => dependency_candidates(request, key, "public"),
        };

        let priority = self.priority(request.path_kind, sub_kind);
        Ok(evaluate(candidates, key, request, self.name(), priority, start))
    }
}

/// `auto_detect` picks a sub-strategy by inspecting directory structure
/// rather than trusting the declared installation kind.
fn detect_installation_kind(installation_path: &std::path::Path) -> InstallationKind {
    let manifest = manifest::load_manifest(installation_path);
    let web_dir = manifest::web_dir(manifest.as_ref(), "public");
    if installation_path.join(&web_dir).join("conf").is_dir() {
        InstallationKind::DependencyStandard
    } else if installation_path.join("typo3_src").is_dir() {
        InstallationKind::LegacySource
    } else {
        InstallationKind::DependencyCustom
    }
}

/// Minimum host platform major version for which the vendor namespace
/// (`{vendor_dir}/{package_name}` and `{vendor_dir}/host/cms-{key}`) is
/// searched at all; below it, only `{web_dir}/conf/ext/{key}` is tried.
const VENDOR_NAMESPACE_MIN_MAJOR: u32 = 12;

fn dependency_candidates(request: &PathRequest, key: &str, default_web_dir: &str) -> Vec<PathBuf> {
    let manifest = manifest::load_manifest(&request.installation_path);
    let vendor_dir = manifest::vendor_dir(manifest.as_ref());
    let web_dir = manifest::web_dir(manifest.as_ref(), default_web_dir);
    let root = &request.installation_path;

    let mut candidates = Vec::new();

    if request.host_platform_major.unwrap_or(0) >= VENDOR_NAMESPACE_MIN_MAJOR {
        let package_name = manifest::package_name(manifest.as_ref())
            .or_else(|| request.config.custom_paths.get("package_name").cloned());
        if let Some(package_name) = package_name {
            candidates.push(root.join(&vendor_dir).join(package_name));
        }
        candidates.push(root.join(&vendor_dir).join("host").join(format!("cms-{key}")));
        candidates.push(
            root.join(&vendor_dir)
                .join("host")
                .join(format!("cms-{}", key.replace('_', "-"))),
        );
    }
    candidates.push(root.join(&web_dir).join("conf/ext").join(key));
    candidates
}

fn legacy_candidates(request: &PathRequest, key: &str) -> Vec<PathBuf> {
    let root = &request.installation_path;
    let mut candidates = vec![root.join("conf/ext").join(key)];
    if let Some(typo3conf_dir) = request.config.custom_paths.get("typo3conf-dir") {
        candidates.push(root.join(typo3conf_dir).join("ext").join(key));
    } else {
        candidates.push(root.join("typo3conf/ext").join(key));
    }
    candidates
}

fn containerized_candidates(request: &PathRequest, key: &str) -> Vec<PathBuf> {
    let manifest = manifest::load_manifest(&request.installation_path);
    let web_dir = manifest::web_dir(manifest.as_ref(), "public");
    let mut candidates = vec![request
        .installation_path
        .join("app")
        .join(&web_dir)
        .join("conf/ext")
        .join(key)];
    candidates.extend(dependency_candidates(request, key, "public"));
    candidates
}

fn evaluate(
    candidates: Vec<PathBuf>,
    key: &str,
    request: &PathRequest,
    strategy_name: &str,
    priority: Priority,
    start: Instant,
) -> PathResponse {
    let follow_symlinks = request.config.follow_symlinks;
    let mut attempted = Vec::with_capacity(candidates.len());

    for candidate in &candidates {
        attempted.push(candidate.display().to_string());
        if is_valid_extension_dir(candidate, key, follow_symlinks) {
            let metadata = PathResponseMetadata {
                strategy_name: Some(strategy_name.to_string()),
                priority: Some(priority.to_string()),
                attempted_paths: attempted,
                elapsed_s: elapsed_seconds(start),
            };
            return PathResponse::ok(candidate.clone(), metadata);
        }
    }

    let metadata = PathResponseMetadata {
        strategy_name: Some(strategy_name.to_string()),
        priority: Some(priority.to_string()),
        attempted_paths: attempted.clone(),
        elapsed_s: elapsed_seconds(start),
    };
    PathResponse::not_found(attempted, Vec::new(), metadata)
}
