use crate::manifest::{self, PLATFORM_TYPE_PREFIX};
use std::path::Path;

/// A candidate directory is acceptable iff it exists as a directory, and
/// (when `follow_symlinks` is false) is not itself a symlink.
pub fn is_acceptable_directory(dir: &Path, follow_symlinks: bool) -> bool {
    let Ok(metadata) = std::fs::symlink_metadata(dir) else {
        return false;
    };

    if metadata.file_type().is_symlink() && !follow_symlinks {
        return false;
    }

    dir.is_dir()
}

/// A directory is a valid extension directory iff it is acceptable and at
/// least one of: it carries the legacy extension manifest, a dependency
/// manifest identifying it as `key`, or a `Classes/`/`Resources/` subtree.
pub fn is_valid_extension_dir(dir: &Path, key: &str, follow_symlinks: bool) -> bool {
    if !is_acceptable_directory(dir, follow_symlinks) {
        return false;
    }

    if dir.join("ext_emconf.php").is_file() {
        return true;
    }

    if let Some(m) = manifest::load_manifest(dir) {
        let name_matches = manifest::package_name(Some(&m))
            .map(|n| n.contains(key))
            .unwrap_or(false);
        let type_matches = manifest::package_type(Some(&m))
            .map(|t| t.starts_with(PLATFORM_TYPE_PREFIX))
            .unwrap_or(false);
        if name_matches || type_matches {
            return true;
        }
    }

    dir.join("Classes").is_dir() || dir.join("Resources").is_dir()
}
