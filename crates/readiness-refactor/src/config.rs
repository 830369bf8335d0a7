use readiness_core::{AnalysisContext, Extension, ExtensionKind};
use readiness_rules::RuleSetId;
use serde::Serialize;
use std::path::PathBuf;

/// Always-present skip patterns, regardless of extension or target version.
const BASE_SKIP_PATTERNS: &[&str] = &[
    "*/vendor/*",
    "*/node_modules/*",
    "*/public/*",
    "*/.Build/*",
    "*/Documentation/*",
    "*/doc/*",
    "*/Configuration/TCA/Overrides/*",
];

/// The configuration file handed to the external refactor tool (spec §4.4).
#[derive(Debug, Clone, Serialize)]
pub struct RefactorConfig {
    pub paths: Vec<PathBuf>,
    pub sets: Vec<String>,
    pub language_version: String,
    pub parallel: bool,
    pub cache_directory: PathBuf,
    pub skip_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
}

/// `key` marks an extension as a test fixture when it contains "test" or
/// "fixture", case-insensitively — such extensions keep their `Tests/`
/// directories in scope rather than skipping them.
fn is_test_fixture(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.contains("test") || lower.contains("fixture")
}

pub fn generate_config(
    extension: &Extension,
    extension_path: &std::path::Path,
    context: &AnalysisContext,
    rule_sets: &[RuleSetId],
    cache_directory: PathBuf,
    memory_limit: Option<String>,
) -> RefactorConfig {
    let mut skip_patterns: Vec<String> = BASE_SKIP_PATTERNS.iter().map(|s| s.to_string()).collect();

    if !is_test_fixture(&extension.key) {
        skip_patterns.push("*/Tests/*".to_string());
    }
    if extension.kind == ExtensionKind::System {
        skip_patterns.push("*/Migrations/*".to_string());
    }

    RefactorConfig {
        paths: vec![extension_path.to_path_buf()],
        sets: rule_sets.iter().map(|s| s.to_string()).collect(),
        language_version: context.language_runtime_hint().to_string(),
        parallel: true,
        cache_directory,
        skip_patterns,
        memory_limit,
    }
}
