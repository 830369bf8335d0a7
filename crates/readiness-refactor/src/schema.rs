use crate::error::{RefactorError, Result};
use readiness_core::{Finding, SuggestedFix};
use readiness_rules::classify_rule;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ModernOutput {
    #[serde(default)]
    file_diffs: Vec<ModernFileDiff>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ModernFileDiff {
    file: String,
    #[serde(default)]
    applied_rectors: Vec<String>,
    #[serde(default)]
    diff: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyOutput {
    changed_files: Vec<LegacyChangedFile>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyChangedFile {
    Path(String),
    Detailed {
        file: String,
        #[serde(default)]
        applied_rectors: Vec<LegacyAppliedRector>,
    },
}

#[derive(Debug, Deserialize)]
struct LegacyAppliedRector {
    class: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    old: Option<String>,
    #[serde(default)]
    new: Option<String>,
}

/// Parses whichever of the two structural variants the tool emitted (spec
/// §4.4). Detection is a single sniff of the top-level keys, decided once
/// at the entry point rather than threaded through every call site.
pub fn parse_tool_output(raw: &str) -> Result<(Vec<Finding>, Vec<String>)> {
    let value: Value = serde_json::from_str(raw).map_err(|e| RefactorError::Parse(e.to_string()))?;

    if value.get("file_diffs").is_some() {
        let modern: ModernOutput = serde_json::from_value(value).map_err(|e| RefactorError::Parse(e.to_string()))?;
        Ok(parse_modern(modern))
    } else if value.get("changed_files").is_some() {
        let legacy: LegacyOutput = serde_json::from_value(value).map_err(|e| RefactorError::Parse(e.to_string()))?;
        Ok(parse_legacy(legacy))
    } else {
        Err(RefactorError::Parse("output matches neither the modern nor legacy schema".to_string()))
    }
}

fn parse_modern(modern: ModernOutput) -> (Vec<Finding>, Vec<String>) {
    let mut findings = Vec::new();
    for file_diff in &modern.file_diffs {
        let (old_code, new_code) = file_diff.diff.as_deref().map(split_diff).unwrap_or((None, None));
        for rule_id in &file_diff.applied_rectors {
            let classification = classify_rule(rule_id);
            let finding = Finding::new(
                file_diff.file.clone(),
                0,
                rule_id.clone(),
                format!("Code change detected by {rule_id}"),
                classification.severity,
                classification.change_kind,
            )
            .with_diff(old_code.clone(), new_code.clone());
            findings.push(with_fallback_fix(finding));
        }
    }
    (findings, collect_errors(&modern.errors))
}

fn parse_legacy(legacy: LegacyOutput) -> (Vec<Finding>, Vec<String>) {
    let mut findings = Vec::new();
    for entry in &legacy.changed_files {
        match entry {
            LegacyChangedFile::Path(file) => {
                let finding = Finding::new(
                    file.clone(),
                    0,
                    "unknown",
                    format!("File changed: {file}"),
                    readiness_core::Severity::Info,
                    readiness_core::ChangeKind::BestPractice,
                )
                .with_suggested_fix(SuggestedFix::Manual {
                    hint: "review this file manually; no rule detail was reported".to_string(),
                });
                findings.push(finding);
            }
            LegacyChangedFile::Detailed { file, applied_rectors } => {
                for rector in applied_rectors {
                    let classification = classify_rule(&rector.class);
                    let finding = Finding::new(
                        file.clone(),
                        rector.line.unwrap_or(0),
                        rector.class.clone(),
                        rector.message.clone().unwrap_or_else(|| format!("Code change detected by {}", rector.class)),
                        classification.severity,
                        classification.change_kind,
                    )
                    .with_diff(rector.old.clone(), rector.new.clone());
                    findings.push(with_fallback_fix(finding));
                }
            }
        }
    }
    (findings, collect_errors(&legacy.errors))
}

/// `Finding::with_diff` only sets `Replace` when old/new differ; everything
/// else still deserves a suggested fix, so fill in a manual hint here.
fn with_fallback_fix(finding: Finding) -> Finding {
    if finding.suggested_fix.is_some() {
        finding
    } else {
        finding.with_suggested_fix(SuggestedFix::Manual {
            hint: "no machine-readable replacement was reported".to_string(),
        })
    }
}

/// Splits a unified diff hunk into its removed/added bodies, ignoring the
/// `---`/`+++` file headers.
fn split_diff(diff: &str) -> (Option<String>, Option<String>) {
    let mut old_lines = Vec::new();
    let mut new_lines = Vec::new();

    for line in diff.lines() {
        if line.starts_with("---") || line.starts_with("+++") {
            continue;
        }
        if let Some(rest) = line.strip_prefix('-') {
            old_lines.push(rest);
        } else if let Some(rest) = line.strip_prefix('+') {
            new_lines.push(rest);
        }
    }

    let old = if old_lines.is_empty() { None } else { Some(old_lines.join("\n")) };
    let new = if new_lines.is_empty() { None } else { Some(new_lines.join("\n")) };
    (old, new)
}

/// Each error entry may be a bare string, `{message}`, `{error}`, or an
/// arbitrary object (fallback: re-encode as JSON).
fn collect_errors(errors: &[Value]) -> Vec<String> {
    errors
        .iter()
        .map(|e| match e {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("message")
                .or_else(|| map.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string()),
            other => other.to_string(),
        })
        .collect()
}
