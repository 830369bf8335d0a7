use crate::config::{generate_config, RefactorConfig};
use crate::error::{RefactorError, Result};
use crate::process::CommandWithTimeout;
use crate::schema::parse_tool_output;
use crate::state::DriverState;
use readiness_core::{AnalysisContext, Extension, Finding};
use readiness_rules::RuleSetId;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const RAW_OUTPUT_PREVIEW_LEN: usize = 2000;

/// Everything diagnostics need from one invocation, regardless of outcome.
#[derive(Debug, Clone)]
pub struct DriverReport {
    pub findings: Vec<Finding>,
    pub errors: Vec<String>,
    pub elapsed_s: f64,
    pub exit_code: Option<i32>,
    pub raw_output_preview: String,
    /// Always `Finalized`: every invocation runs its lifecycle to the end.
    pub state: DriverState,
    /// The substantive outcome reached before `Parsed`/`Finalized`: tells
    /// apart a completed run (which may still have failed to parse) from a
    /// timeout or a failure to even launch the tool.
    pub outcome: DriverState,
}

impl DriverReport {
    pub fn successful(&self) -> bool {
        self.state.is_terminal()
            && matches!(self.outcome, DriverState::Completed)
            && self.exit_code.map(|c| c == 0).unwrap_or(false)
    }
}

/// Invokes an external refactoring tool in dry-run mode and turns its
/// output into Findings (spec §4.4, "the hardest subsystem").
pub struct RefactorDriver {
    pub binary_path: String,
    pub timeout: Duration,
    pub debug: bool,
    pub clear_cache: bool,
    pub memory_limit: Option<String>,
}

impl RefactorDriver {
    pub fn new(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            timeout: crate::process::DEFAULT_TIMEOUT,
            debug: false,
            clear_cache: false,
            memory_limit: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn run(
        &self,
        extension: &Extension,
        extension_path: &Path,
        context: &AnalysisContext,
        rule_sets: &[RuleSetId],
        work_dir: &Path,
    ) -> DriverReport {
        let state = DriverState::Idle.advance_to(DriverState::Configuring);

        let config = generate_config(
            extension,
            extension_path,
            context,
            rule_sets,
            work_dir.to_path_buf(),
            self.memory_limit.clone(),
        );

        let config_path = match self.write_config(&config, work_dir) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "failed to write refactor config");
                let state = state.advance_to(DriverState::Failed).advance_to(DriverState::Finalized);
                return DriverReport {
                    findings: Vec::new(),
                    errors: vec![e.to_string()],
                    elapsed_s: 0.0,
                    exit_code: None,
                    raw_output_preview: String::new(),
                    state,
                    outcome: DriverState::Failed,
                };
            }
        };
        let state = state.advance_to(DriverState::Launched);

        let report = self.invoke(&config_path, state);
        let _ = std::fs::remove_file(&config_path);
        report
    }

    fn write_config(&self, config: &RefactorConfig, work_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(work_dir).map_err(RefactorError::ConfigWrite)?;
        let config_path = work_dir.join(format!("rector_{}.json", uuid::Uuid::new_v4()));
        let content = serde_json::to_string_pretty(config).map_err(|e| RefactorError::Parse(e.to_string()))?;
        std::fs::write(&config_path, content).map_err(RefactorError::ConfigWrite)?;
        Ok(config_path)
    }

    fn invoke(&self, config_path: &Path, state: DriverState) -> DriverReport {
        let state = state.advance_to(DriverState::Running);
        let mut args: Vec<String> = vec![
            "process".to_string(),
            "--config".to_string(),
            config_path.display().to_string(),
            "--dry-run".to_string(),
            "--output-format".to_string(),
            "json".to_string(),
            "--no-progress-bar".to_string(),
        ];
        if let Some(limit) = &self.memory_limit {
            args.push("--memory-limit".to_string());
            args.push(limit.clone());
        }
        if self.debug {
            args.push("--debug".to_string());
        }
        if self.clear_cache {
            args.push("--clear-cache".to_string());
        }

        let outcome = CommandWithTimeout::new(&self.binary_path).args(&args).timeout(self.timeout).execute();

        match outcome {
            Ok(outcome) if outcome.timed_out => {
                let state = state.advance_to(DriverState::TimedOut).advance_to(DriverState::Finalized);
                DriverReport {
                    findings: Vec::new(),
                    errors: vec![format!("refactor tool timed out after {:?}", self.timeout)],
                    elapsed_s: outcome.elapsed_s,
                    exit_code: None,
                    raw_output_preview: String::new(),
                    state,
                    outcome: DriverState::TimedOut,
                }
            }
            Ok(outcome) => {
                let state = state.advance_to(DriverState::Completed);
                let preview: String = outcome.stdout.chars().take(RAW_OUTPUT_PREVIEW_LEN).collect();
                let report = match parse_tool_output(&outcome.stdout) {
                    Ok((findings, mut errors)) => {
                        debug!(count = findings.len(), "parsed refactor tool output");
                        if outcome.exit_code != Some(0) && !outcome.stderr.trim().is_empty() {
                            errors.push(outcome.stderr.clone());
                        }
                        (findings, errors)
                    }
                    Err(e) => (Vec::new(), vec![format!("Failed to parse output: {e}")]),
                };
                let state = state.advance_to(DriverState::Parsed).advance_to(DriverState::Finalized);
                DriverReport {
                    findings: report.0,
                    errors: report.1,
                    elapsed_s: outcome.elapsed_s,
                    exit_code: outcome.exit_code,
                    raw_output_preview: preview,
                    state,
                    outcome: DriverState::Completed,
                }
            }
            Err(e) => {
                let state = state.advance_to(DriverState::Failed).advance_to(DriverState::Finalized);
                DriverReport {
                    findings: Vec::new(),
                    errors: vec![e.to_string()],
                    elapsed_s: 0.0,
                    exit_code: None,
                    raw_output_preview: String::new(),
                    state,
                    outcome: DriverState::Failed,
                }
            }
        }
    }
}
