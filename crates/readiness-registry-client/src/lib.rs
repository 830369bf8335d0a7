mod client;
mod error;
mod rate_limiter;

pub use client::{HttpRegistryClient, PackageRegistryClient, StaticRegistryClient};
pub use error::{RegistryClientError, Result};
pub use rate_limiter::RateLimiter;
