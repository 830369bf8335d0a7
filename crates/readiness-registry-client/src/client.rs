use crate::error::{RegistryClientError, Result};
use crate::rate_limiter::RateLimiter;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The injected HTTP interface the version-availability analyzer consults
/// (spec §4.6). Network failures degrade to `false` rather than
/// propagating, per spec §7's NetworkError handling: "can this extension's
/// package even be found at the target version" is advisory, never fatal.
#[async_trait]
pub trait PackageRegistryClient: Send + Sync {
    async fn has_version_for(&self, identifier: &str, target_version: &str) -> bool;
}

#[derive(Debug, Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    versions: Vec<String>,
}

/// Queries a Composer-style package registry's `/p2/{identifier}.json`
/// endpoint for the list of published versions.
pub struct HttpRegistryClient {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl HttpRegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_rate_limit(base_url, 5.0)
    }

    pub fn with_rate_limit(base_url: impl Into<String>, requests_per_second: f64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("readiness-engine/0.1")
            .build()
            .expect("failed to build registry HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            rate_limiter: Arc::new(RateLimiter::new(requests_per_second)),
        }
    }

    const MAX_RATE_LIMIT_RETRIES: u32 = 4;

    async fn fetch_versions(&self, identifier: &str) -> Result<Vec<String>> {
        let url = format!("{}/p2/{}.json", self.base_url, urlencoding::encode(identifier));

        for attempt in 0..=Self::MAX_RATE_LIMIT_RETRIES {
            self.rate_limiter.wait_if_needed().await;
            debug!(url, attempt, "fetching registry versions");

            let response = self.client.get(&url).send().await?;
            match response.status() {
                status if status.is_success() => {
                    self.rate_limiter.reset_retry_count().await;
                    let parsed: VersionsResponse = response.json().await?;
                    return Ok(parsed.versions);
                }
                status if status.as_u16() == 429 => {
                    if attempt == Self::MAX_RATE_LIMIT_RETRIES {
                        return Err(RegistryClientError::RateLimited);
                    }
                    let backoff = self.rate_limiter.backoff().await;
                    warn!(url, attempt, ?backoff, "registry rate limited, backing off");
                    tokio::time::sleep(backoff).await;
                }
                status => return Err(RegistryClientError::UnexpectedStatus(status.as_u16())),
            }
        }
        unreachable!("loop returns on its last iteration")
    }
}

#[async_trait]
impl PackageRegistryClient for HttpRegistryClient {
    async fn has_version_for(&self, identifier: &str, target_version: &str) -> bool {
        match self.fetch_versions(identifier).await {
            Ok(versions) => versions.iter().any(|v| v == target_version),
            Err(e) => {
                warn!(identifier, error = %e, "registry probe failed, degrading to unavailable");
                false
            }
        }
    }
}

/// An offline, pre-seeded registry used for local or air-gapped analysis
/// and as a test double for `HttpRegistryClient`-backed analyzers.
pub struct StaticRegistryClient {
    known_versions: HashMap<String, Vec<String>>,
}

impl StaticRegistryClient {
    pub fn new(known_versions: HashMap<String, Vec<String>>) -> Self {
        Self { known_versions }
    }

    pub fn empty() -> Self {
        Self {
            known_versions: HashMap::new(),
        }
    }
}

#[async_trait]
impl PackageRegistryClient for StaticRegistryClient {
    async fn has_version_for(&self, identifier: &str, target_version: &str) -> bool {
        self.known_versions
            .get(identifier)
            .map(|versions| versions.iter().any(|v| v == target_version))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_client_reports_known_versions() {
        let mut map = HashMap::new();
        map.insert("vendor/news".to_string(), vec!["13.0.0".to_string()]);
        let client = StaticRegistryClient::new(map);

        assert!(client.has_version_for("vendor/news", "13.0.0").await);
        assert!(!client.has_version_for("vendor/news", "14.0.0").await);
        assert!(!client.has_version_for("vendor/unknown", "13.0.0").await);
    }

    #[tokio::test]
    async fn http_client_degrades_to_false_on_unreachable_host() {
        let client = HttpRegistryClient::with_rate_limit("http://127.0.0.1:0", 100.0);
        assert!(!client.has_version_for("vendor/news", "13.0.0").await);
    }
}
