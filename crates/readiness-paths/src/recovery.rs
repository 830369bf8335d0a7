use crate::manifest;
use crate::validity::is_valid_extension_dir;
use readiness_core::{InstallationKind, PathKind, PathRequest, PathResponse, PathResponseMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Deployment roots recovery widens its search to when the primary chain
/// fails to resolve anything.
const COMMON_DEPLOYMENT_ROOTS: &[&str] = &["/app", "/var/www/html", "/usr/share/nginx/html", "/htdocs", "/public_html"];

/// Runs the named recovery steps in order, returning the first one that
/// resolves. Recovery only ever returns `ok` when a filesystem probe
/// actually succeeded; otherwise it accumulates suggestions and returns
/// `not_found`.
pub fn attempt_recovery(request: &PathRequest, primary_attempted: &[String]) -> PathResponse {
    let start = Instant::now();

    if let Some(response) = alternative_path_search(request) {
        return response;
    }
    if let Some(response) = fallback_to_default_paths(request) {
        return response;
    }

    let mut suggestions = custom_path_search(request);
    suggestions.extend(configuration_update_suggestion(request));
    suggestions.extend(installation_type_detection(request));

    let metadata = PathResponseMetadata {
        strategy_name: Some("recovery_pipeline".to_string()),
        priority: None,
        attempted_paths: primary_attempted.to_vec(),
        elapsed_s: readiness_core::path_request::elapsed_seconds(start),
    };
    PathResponse::not_found(suggestions, Vec::new(), metadata)
}

fn alternative_path_search(request: &PathRequest) -> Option<PathResponse> {
    let key = request.extension_ref.as_deref()?;
    if request.path_kind != PathKind::Extension {
        return None;
    }

    for root in COMMON_DEPLOYMENT_ROOTS {
        let candidate = Path::new(root).join("conf/ext").join(key);
        if is_valid_extension_dir(&candidate, key, request.config.follow_symlinks) {
            return Some(ok_response(candidate, "alternative_path_search"));
        }
    }
    None
}

fn fallback_to_default_paths(request: &PathRequest) -> Option<PathResponse> {
    let key = request.extension_ref.as_deref()?;
    if request.path_kind != PathKind::Extension {
        return None;
    }

    let defaults: [PathBuf; 2] = [
        request.installation_path.join("public/typo3conf/ext").join(key),
        request.installation_path.join("typo3conf/ext").join(key),
    ];
    for candidate in defaults {
        if is_valid_extension_dir(&candidate, key, request.config.follow_symlinks) {
            return Some(ok_response(candidate, "fallback_to_default_paths"));
        }
    }
    None
}

/// Requires at least two platform indicators (e.g. a manifest `type` that
/// matches the platform prefix AND a `Classes/`/`Resources/` subtree)
/// before suggesting a directory. Never returns `ok`: a plausible root is
/// still unverified, so it is surfaced only as a suggestion for the caller
/// (or a human) to confirm.
fn custom_path_search(request: &PathRequest) -> Vec<String> {
    let Some(key) = request.extension_ref.as_deref() else {
        return Vec::new();
    };

    let mut suggestions = Vec::new();
    for search_dir in &request.config.search_dirs {
        let candidate = Path::new(search_dir).join(key);
        if !candidate.is_dir() {
            continue;
        }

        let mut indicators = 0;
        if candidate.join("ext_emconf.php").is_file() {
            indicators += 1;
        }
        if candidate.join("Classes").is_dir() || candidate.join("Resources").is_dir() {
            indicators += 1;
        }
        if manifest::load_manifest(&candidate).is_some() {
            indicators += 1;
        }

        if indicators >= 2 {
            suggestions.push(candidate.display().to_string());
        }
    }
    suggestions
}

/// No I/O: returns human-facing hints about likely configuration fixes.
fn configuration_update_suggestion(request: &PathRequest) -> Vec<String> {
    let mut hints = Vec::new();
    if matches!(
        request.installation_kind,
        InstallationKind::DependencyStandard | InstallationKind::DependencyCustom
    ) {
        hints.push("check config.vendor-dir and extra.\"host/cms\".web-dir in composer.json".to_string());
    }
    hints
}

fn installation_type_detection(request: &PathRequest) -> Vec<String> {
    if request.installation_kind == InstallationKind::AutoDetect {
        Vec::new()
    } else {
        vec!["re-run path resolution with installation_kind=auto_detect".to_string()]
    }
}

fn ok_response(resolved_path: PathBuf, step: &str) -> PathResponse {
    let metadata = PathResponseMetadata {
        strategy_name: Some(format!("recovery:{step}")),
        priority: None,
        attempted_paths: vec![resolved_path.display().to_string()],
        elapsed_s: 0.0,
    };
    PathResponse::ok(resolved_path, metadata)
}
