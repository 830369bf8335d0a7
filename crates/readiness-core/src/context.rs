use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Enable flag and TTL for the cached-analyzer shell (C7). Defaults match
/// spec §4.7: caching on, one hour TTL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResultCacheConfig {
    pub enabled: bool,
    pub ttl_s: u64,
}

impl Default for ResultCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_s: 3600,
        }
    }
}

/// Everything an analyzer or the path resolver needs to know about the
/// upgrade being evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub current_version: Version,
    pub target_version: Version,
    pub installation_path: PathBuf,
    #[serde(default)]
    pub custom_paths: HashMap<String, String>,
    #[serde(default)]
    pub result_cache: ResultCacheConfig,
}

impl AnalysisContext {
    pub fn new(current_version: Version, target_version: Version, installation_path: PathBuf) -> Self {
        Self {
            current_version,
            target_version,
            installation_path,
            custom_paths: HashMap::new(),
            result_cache: ResultCacheConfig::default(),
        }
    }

    /// Language-runtime version hint derived from the target release, per
    /// spec §4.4's refactor-driver configuration rules.
    pub fn language_runtime_hint(&self) -> &'static str {
        if self.target_version.major() >= 13 {
            "8.2"
        } else if self.target_version.major() >= 12 {
            "8.1"
        } else {
            "8.0"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_runtime_hint_tracks_target_major() {
        let ctx = AnalysisContext::new(
            "11.5.0".parse().unwrap(),
            "13.0.0".parse().unwrap(),
            PathBuf::from("/opt/site"),
        );
        assert_eq!(ctx.language_runtime_hint(), "8.2");

        let ctx12 = AnalysisContext::new(
            "11.5.0".parse().unwrap(),
            "12.4.0".parse().unwrap(),
            PathBuf::from("/opt/site"),
        );
        assert_eq!(ctx12.language_runtime_hint(), "8.1");

        let ctx_old = AnalysisContext::new(
            "9.0.0".parse().unwrap(),
            "10.4.0".parse().unwrap(),
            PathBuf::from("/opt/site"),
        );
        assert_eq!(ctx_old.language_runtime_hint(), "8.0");
    }
}
