use readiness_core::{Extension, ExtensionKind};
use readiness_paths::manifest;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Walks the installation's vendor directory for extension packages: any
/// `vendor/<org>/<package>` directory whose `composer.json` declares a
/// `cms-*` package type is treated as an installed extension.
pub fn discover_extensions(installation_path: &Path) -> Vec<Extension> {
    let root_manifest = manifest::load_manifest(installation_path);
    let vendor = manifest::vendor_dir(root_manifest.as_ref());
    let vendor_root = installation_path.join(&vendor);

    if !vendor_root.exists() {
        debug!(vendor = %vendor_root.display(), "vendor directory not found, no extensions discovered");
        return Vec::new();
    }

    let mut extensions = Vec::new();

    for entry in WalkDir::new(&vendor_root).min_depth(2).max_depth(2).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_dir() {
            continue;
        }

        let package_manifest = manifest::load_manifest(entry.path());
        let Some(package_type) = manifest::package_type(package_manifest.as_ref()) else {
            continue;
        };
        if !package_type.starts_with(manifest::PLATFORM_TYPE_PREFIX) {
            continue;
        }

        let Some(name) = manifest::package_name(package_manifest.as_ref()) else {
            continue;
        };

        let version_str = package_manifest
            .as_ref()
            .and_then(|m| m.get("version"))
            .and_then(|v| v.as_str())
            .unwrap_or("0.0.0");

        let version = match version_str.parse() {
            Ok(v) => v,
            Err(e) => {
                warn!(package = name, error = %e, "skipping extension with unparseable version");
                continue;
            }
        };

        let key = entry.file_name().to_string_lossy().to_string();

        extensions.push(Extension::new(key.clone(), key, version, ExtensionKind::ThirdParty).with_package_name(name));
    }

    extensions
}
