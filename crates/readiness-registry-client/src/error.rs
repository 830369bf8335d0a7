use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("registry returned HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),

    #[error("rate limited by registry API")]
    RateLimited,
}

pub type Result<T> = std::result::Result<T, RegistryClientError>;
