use serde_json::Value;
use std::path::Path;

/// Package-type prefix a valid extension's dependency manifest `type` field
/// must start with (e.g. `"cms-extension"`).
pub const PLATFORM_TYPE_PREFIX: &str = "cms-";

/// The key under `extra` that carries platform-specific manifest hints, e.g.
/// `extra."host/cms".web-dir`.
const PLATFORM_EXTRA_KEY: &str = "host/cms";

/// Reads and parses the installation's dependency manifest (`composer.json`
/// at the installation root), if present. Malformed or missing manifests
/// are not an error: every call site treats `None` as "use defaults".
pub fn load_manifest(installation_path: &Path) -> Option<Value> {
    let manifest_path = installation_path.join("composer.json");
    let content = std::fs::read_to_string(manifest_path).ok()?;
    serde_json::from_str(&content).ok()
}

/// `config.vendor-dir`, defaulting to `"vendor"`.
pub fn vendor_dir(manifest: Option<&Value>) -> String {
    manifest
        .and_then(|m| m.pointer("/config/vendor-dir"))
        .and_then(Value::as_str)
        .unwrap_or("vendor")
        .to_string()
}

/// `extra."host/cms".web-dir`, with a caller-supplied default (differs
/// between dependency_standard and dependency_custom installations).
pub fn web_dir(manifest: Option<&Value>, default: &str) -> String {
    manifest
        .and_then(|m| m.get("extra"))
        .and_then(|e| e.get(PLATFORM_EXTRA_KEY))
        .and_then(|p| p.get("web-dir"))
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Manifest `name` field, if present.
pub fn package_name(manifest: Option<&Value>) -> Option<String> {
    manifest
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Manifest `type` field, if present.
pub fn package_type(manifest: Option<&Value>) -> Option<String> {
    manifest
        .and_then(|m| m.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
