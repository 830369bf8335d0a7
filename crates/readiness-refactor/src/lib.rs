//! Refactor Driver (C4): generates a dry-run configuration, invokes an
//! external refactoring tool as a timed subprocess, and synthesizes
//! Findings from whichever JSON schema variant it emits.

pub mod config;
pub mod driver;
pub mod error;
pub mod process;
pub mod schema;
pub mod state;

pub use config::{generate_config, RefactorConfig};
pub use driver::{DriverReport, RefactorDriver};
pub use error::{RefactorError, Result};
pub use process::{CommandWithTimeout, ProcessOutcome, DEFAULT_TIMEOUT};
pub use schema::parse_tool_output;
pub use state::DriverState;
