use thiserror::Error;

/// Errors the resolver surfaces directly, as opposed to a `NotFound`
/// `PathResponse` (spec §7: `PathNotFound` is recoverable and modeled as a
/// typed response, never an exception).
#[derive(Error, Debug)]
pub enum PathResolverError {
    #[error("invalid path request: {0}")]
    InvalidRequest(String),

    #[error("resolved path is not executable: {0}")]
    NotExecutable(String),
}

pub type Result<T> = std::result::Result<T, PathResolverError>;
