//! On-disk cache backing the Cached Analyzer Contract (C7).
//!
//! Values are opaque byte payloads (the cached-analyzer shell serializes its
//! own `AnalysisResult` JSON through this); this crate only owns the
//! key -> bytes -> expiry bookkeeping, content hashing and eviction.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub size_bytes: usize,
    pub file_path: PathBuf,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| Utc::now() > at).unwrap_or(false)
    }
}

/// A content-addressed, TTL-aware cache store rooted at one directory.
///
/// Cache idempotence (spec §8 testable property #4) follows from `get`
/// never invoking recomputation itself: callers are responsible for calling
/// `get` before doing the expensive work and `put` only on success.
pub struct AnalysisCacheStore {
    cache_dir: PathBuf,
    index: HashMap<String, CacheEntry>,
    index_path: PathBuf,
}

impl AnalysisCacheStore {
    pub fn open(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("failed to create cache directory: {}", cache_dir.display()))?;

        let index_path = cache_dir.join("index.json");
        let index = if index_path.exists() {
            Self::load_index(&index_path)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            cache_dir,
            index,
            index_path,
        })
    }

    fn load_index(path: &Path) -> Result<HashMap<String, CacheEntry>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read cache index from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse cache index JSON")
    }

    fn save_index(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.index).context("failed to serialize cache index")?;
        std::fs::write(&self.index_path, content)
            .with_context(|| format!("failed to write cache index to {}", self.index_path.display()))
    }

    pub fn calculate_hash(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }

    /// Fetch a still-fresh value. Expired entries are pruned and treated as
    /// a miss, never surfaced to the caller.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let expired = self.index.get(key).map(|e| e.is_expired()).unwrap_or(false);
        if expired {
            self.remove(key)?;
            return Ok(None);
        }

        let Some(entry) = self.index.get(key).cloned() else {
            return Ok(None);
        };

        if let Some(entry) = self.index.get_mut(key) {
            entry.last_accessed = Utc::now();
        }
        self.save_index()?;

        let data = std::fs::read(&entry.file_path)
            .with_context(|| format!("failed to read cached data from {}", entry.file_path.display()))?;
        Ok(Some(data))
    }

    /// Store a value, last-writer-wins on key collision (concurrent writers
    /// are safe because payloads for the same key are value-equal, per spec
    /// §5's locking section).
    pub fn put(&mut self, key: &str, data: &[u8], ttl_s: Option<u64>) -> Result<()> {
        let content_hash = Self::calculate_hash(data);
        let file_path = self.cache_dir.join(format!("{}.json", content_hash));

        std::fs::write(&file_path, data)
            .with_context(|| format!("failed to write cache payload to {}", file_path.display()))?;

        let expires_at = ttl_s.map(|secs| Utc::now() + chrono::Duration::seconds(secs as i64));

        if let Some(old_entry) = self.index.get(key) {
            let _ = std::fs::remove_file(&old_entry.file_path);
        }

        self.index.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                content_hash,
                created_at: Utc::now(),
                last_accessed: Utc::now(),
                expires_at,
                size_bytes: data.len(),
                file_path,
            },
        );

        self.save_index()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if let Some(entry) = self.index.remove(key) {
            let _ = std::fs::remove_file(&entry.file_path);
            self.save_index()?;
        }
        Ok(())
    }

    pub fn contains_fresh(&self, key: &str) -> bool {
        self.index.get(key).map(|e| !e.is_expired()).unwrap_or(false)
    }

    pub fn prune_expired(&mut self) -> Result<usize> {
        let expired_keys: Vec<String> = self
            .index
            .iter()
            .filter(|(_, e)| e.is_expired())
            .map(|(k, _)| k.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.remove(&key)?;
        }
        Ok(count)
    }

    pub fn clear(&mut self) -> Result<()> {
        for entry in self.index.values() {
            let _ = std::fs::remove_file(&entry.file_path);
        }
        self.index.clear();
        self.save_index()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
