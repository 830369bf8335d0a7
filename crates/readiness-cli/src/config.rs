use readiness_core::InstallationKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub installation: InstallationConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub refactor: RefactorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstallationConfig {
    pub path: Option<String>,
    pub current_version: Option<String>,
    pub target_version: Option<String>,
    /// One of `dependency_standard`, `dependency_custom`, `legacy_source`,
    /// `containerized`, `custom`, `auto_detect`. Defaults to `auto_detect`
    /// when absent or unrecognized.
    pub kind: Option<String>,
}

impl InstallationConfig {
    pub fn installation_kind(&self) -> InstallationKind {
        match self.kind.as_deref() {
            Some("dependency_standard") => InstallationKind::DependencyStandard,
            Some("dependency_custom") => InstallationKind::DependencyCustom,
            Some("legacy_source") => InstallationKind::LegacySource,
            Some("containerized") => InstallationKind::Containerized,
            Some("custom") => InstallationKind::Custom,
            _ => InstallationKind::AutoDetect,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub max_concurrency: Option<usize>,
    pub registry_primary_url: Option<String>,
    pub registry_secondary_url: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            registry_primary_url: None,
            registry_secondary_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: Option<bool>,
    pub ttl_s: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            ttl_s: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorConfig {
    pub binary_path: Option<String>,
    pub memory_limit: Option<String>,
    pub debug: Option<bool>,
    pub clear_cache: Option<bool>,
    pub timeout_s: Option<u64>,
}

impl Default for RefactorConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            memory_limit: None,
            debug: None,
            clear_cache: None,
            timeout_s: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Config::load(path).unwrap_or_default(),
            None => Config::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.installation.path.is_none());
        assert!(config.cache.ttl_s.is_none());
    }

    #[test]
    fn unrecognized_installation_kind_falls_back_to_auto_detect() {
        let config = InstallationConfig {
            kind: Some("not-a-real-kind".to_string()),
            ..Default::default()
        };
        assert_eq!(config.installation_kind(), InstallationKind::AutoDetect);
    }

    #[test]
    fn recognized_installation_kind_is_parsed() {
        let config = InstallationConfig {
            kind: Some("dependency_standard".to_string()),
            ..Default::default()
        };
        assert_eq!(config.installation_kind(), InstallationKind::DependencyStandard);
    }

    #[test]
    fn partial_sections_fill_in_defaults_for_the_rest() {
        let toml = r#"
            [installation]
            path = "/opt/site"
            current_version = "11.5.0"
            target_version = "13.0.0"

            [refactor]
            binary_path = "rector"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.installation.path.as_deref(), Some("/opt/site"));
        assert_eq!(config.refactor.binary_path.as_deref(), Some("rector"));
        assert!(config.cache.enabled.is_none());
    }
}
