use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefactorError {
    #[error("failed to spawn refactor tool: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("refactor tool timed out after {timeout_s}s")]
    Timeout { timeout_s: u64 },

    #[error("failed to write refactor config: {0}")]
    ConfigWrite(#[source] std::io::Error),

    #[error("refactor tool exited with code {exit_code}: {stderr}")]
    NonZeroExit { exit_code: i32, stderr: String },

    #[error("failed to parse output: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, RefactorError>;
