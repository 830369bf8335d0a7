use crate::extension::{InstallationKind, PathKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Knobs a caller can set to steer resolution without writing a new
/// strategy: custom overrides, extra search roots, and whether a resolved
/// path must actually exist on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathRequestConfig {
    #[serde(default)]
    pub custom_paths: BTreeMap<String, String>,
    #[serde(default)]
    pub search_dirs: Vec<String>,
    #[serde(default = "default_true")]
    pub validate_exists: bool,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_true() -> bool {
    true
}

impl PathRequestConfig {
    pub fn new() -> Self {
        Self {
            custom_paths: BTreeMap::new(),
            search_dirs: Vec::new(),
            validate_exists: true,
            follow_symlinks: false,
        }
    }
}

/// A request to resolve one installation-relative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRequest {
    pub path_kind: PathKind,
    pub installation_kind: InstallationKind,
    pub installation_path: PathBuf,
    pub extension_ref: Option<String>,
    pub config: PathRequestConfig,
    pub fallback_strategies: Vec<String>,
    /// The host platform's major version, when known. Drives the
    /// `dependency_standard`/`dependency_custom` candidate gate (major >= 12
    /// searches the vendor namespace; older majors search `web_dir/conf/ext`
    /// only).
    pub host_platform_major: Option<u32>,
}

impl PathRequest {
    pub fn new(path_kind: PathKind, installation_kind: InstallationKind, installation_path: PathBuf) -> Self {
        let fallback_strategies = path_kind
            .default_fallback_strategies()
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            path_kind,
            installation_kind,
            installation_path,
            extension_ref: None,
            config: PathRequestConfig::new(),
            fallback_strategies,
            host_platform_major: None,
        }
    }

    pub fn for_extension(mut self, extension_ref: impl Into<String>) -> Self {
        self.extension_ref = Some(extension_ref.into());
        self
    }

    pub fn with_host_platform_major(mut self, major: u32) -> Self {
        self.host_platform_major = Some(major);
        self
    }

    pub fn with_config(mut self, config: PathRequestConfig) -> Self {
        self.config = config;
        self
    }

    /// A stable cache key derived from every field (spec §3, invariant (ii)
    /// in §4.2: the same request always yields the same key). Serializes to
    /// canonical JSON via `BTreeMap`-backed config fields, so key order can
    /// never perturb the hash, then SHA-256s the bytes.
    pub fn cache_key(&self) -> String {
        let canonical =
            serde_json::to_vec(self).expect("PathRequest always serializes: no floats, no non-string map keys");
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("path_request_{}", hex::encode(hasher.finalize()))
    }
}

/// Whether resolution succeeded, was inconclusive, or hit an internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Ok,
    NotFound,
    Error,
}

/// Diagnostic metadata always attached to a `PathResponse`, regardless of
/// outcome (spec §4.2 invariant (iii): attempted paths are always returned).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathResponseMetadata {
    pub strategy_name: Option<String>,
    pub priority: Option<String>,
    pub attempted_paths: Vec<String>,
    pub elapsed_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResponse {
    pub status: PathStatus,
    pub resolved_path: Option<PathBuf>,
    pub suggested_paths: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub metadata: PathResponseMetadata,
}

impl PathResponse {
    pub fn ok(resolved_path: PathBuf, metadata: PathResponseMetadata) -> Self {
        Self {
            status: PathStatus::Ok,
            resolved_path: Some(resolved_path),
            suggested_paths: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            metadata,
        }
    }

    pub fn not_found(suggested_paths: Vec<String>, warnings: Vec<String>, metadata: PathResponseMetadata) -> Self {
        Self {
            status: PathStatus::NotFound,
            resolved_path: None,
            suggested_paths,
            warnings,
            errors: Vec::new(),
            metadata,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == PathStatus::Ok
    }
}

pub fn elapsed_seconds(start: std::time::Instant) -> f64 {
    let d: Duration = start.elapsed();
    d.as_secs_f64()
}
