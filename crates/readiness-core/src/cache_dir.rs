use std::path::PathBuf;

/// The engine's shared on-disk cache root (`~/.cache/readiness-engine` on
/// Linux/macOS, the platform equivalent elsewhere). Created if absent.
pub fn cache_dir() -> PathBuf {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("readiness-engine");

    let _ = std::fs::create_dir_all(&dir);

    dir
}

/// A named subdirectory within the engine's cache root, e.g.
/// `cache_subdir("analysis-results")`.
pub fn cache_subdir(name: &str) -> PathBuf {
    let dir = cache_dir().join(name);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_subdir_nests_under_cache_dir() {
        let root = cache_dir();
        let sub = cache_subdir("analysis-results");
        assert!(sub.starts_with(&root));
        assert!(sub.exists());
    }
}
