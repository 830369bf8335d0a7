//! Shared domain model for the upgrade readiness analyzer engine.
//!
//! Every other crate in this workspace builds on the types here: versions,
//! extensions, the installation/path taxonomy, the finding taxonomy, and the
//! request/response/result shapes the path resolver, rule registry,
//! refactor driver, aggregator and pipeline all pass between each other.

pub mod cache_dir;
pub mod context;
pub mod extension;
pub mod finding;
pub mod path_request;
pub mod result;
pub mod summary;
pub mod taxonomy;
pub mod version;

pub use cache_dir::{cache_dir, cache_subdir};
pub use context::{AnalysisContext, ResultCacheConfig};
pub use extension::{Extension, ExtensionKind, InstallationKind, PathKind};
pub use finding::{Finding, SuggestedFix};
pub use path_request::{PathRequest, PathRequestConfig, PathResponse, PathResponseMetadata, PathStatus};
pub use result::{AnalysisResult, RISK_SCORE_MAX, RISK_SCORE_MIN};
pub use summary::{AggregatedSummary, RiskLevel};
pub use taxonomy::{ChangeKind, Severity};
pub use version::{Version, VersionParseError};
