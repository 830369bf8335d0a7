use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Where an extension came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionKind {
    /// Ships with the host platform itself.
    System,
    /// Developed in-house, not published anywhere.
    Local,
    /// Installed through the platform's dependency manager.
    ThirdParty,
}

/// A single installable unit of functionality. Immutable once created;
/// identity is `key` alone (two `Extension`s with the same key are the same
/// extension at different points in time, never two distinct extensions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub key: String,
    pub display_name: String,
    pub version: Version,
    pub kind: ExtensionKind,
    pub package_name: Option<String>,
}

impl Extension {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, version: Version, kind: ExtensionKind) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            version,
            kind,
            package_name: None,
        }
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }
}

/// The deployment layout of the host installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallationKind {
    DependencyStandard,
    DependencyCustom,
    LegacySource,
    Containerized,
    Custom,
    AutoDetect,
}

/// The category of path being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathKind {
    Extension,
    VendorDir,
    PackageStates,
    ComposerInstalled,
}

impl PathKind {
    /// Ordered (highest priority first) list of built-in strategy
    /// identifiers applicable to this path kind, used as the default
    /// fallback chain when a caller does not supply its own.
    pub fn default_fallback_strategies(&self) -> &'static [&'static str] {
        match self {
            PathKind::Extension => &[
                "extension_path_resolution_strategy",
                "vendor_directory_strategy",
            ],
            PathKind::VendorDir => &["vendor_directory_strategy"],
            PathKind::PackageStates => &["package_state_file_strategy"],
            PathKind::ComposerInstalled => &["installed_packages_manifest_strategy"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_identity_is_key_not_version() {
        let v1 = Version::new(1, 0, 0);
        let v2 = Version::new(2, 0, 0);
        let a = Extension::new("news", "News", v1, ExtensionKind::ThirdParty);
        let b = Extension::new("news", "News", v2, ExtensionKind::ThirdParty);
        assert_eq!(a.key, b.key);
        assert_ne!(a.version, b.version);
    }

    #[test]
    fn extension_path_kind_lists_extension_strategy_first() {
        let strategies = PathKind::Extension.default_fallback_strategies();
        assert_eq!(strategies[0], "extension_path_resolution_strategy");
    }
}
