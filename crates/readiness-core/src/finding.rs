use crate::taxonomy::{ChangeKind, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do about a finding, when the tool that produced it knows enough
/// to suggest it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestedFix {
    Replace { old: String, new: String },
    Manual { hint: String },
}

/// A single observation emitted by an analyzer about a specific file/line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    pub line: u32,
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub change_kind: ChangeKind,
    pub suggested_fix: Option<SuggestedFix>,
    pub old_code: Option<String>,
    pub new_code: Option<String>,
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
}

impl Finding {
    pub fn new(
        file: impl Into<String>,
        line: u32,
        rule_id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        change_kind: ChangeKind,
    ) -> Self {
        let mut finding = Self {
            file: file.into(),
            line,
            rule_id: rule_id.into(),
            message: message.into(),
            severity,
            change_kind,
            suggested_fix: None,
            old_code: None,
            new_code: None,
            context: HashMap::new(),
        };
        finding.reconcile_suggested_fix();
        finding
    }

    pub fn with_diff(mut self, old_code: Option<String>, new_code: Option<String>) -> Self {
        self.old_code = old_code;
        self.new_code = new_code;
        self.reconcile_suggested_fix();
        self
    }

    pub fn with_suggested_fix(mut self, fix: SuggestedFix) -> Self {
        self.suggested_fix = Some(fix);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Invariant from spec §3: if `old_code` and `new_code` are both present
    /// and differ, `suggested_fix` must be a `Replace` directive built from
    /// them. Re-derives the fix whenever the diff fields change so the
    /// invariant holds regardless of construction order.
    fn reconcile_suggested_fix(&mut self) {
        if let (Some(old), Some(new)) = (&self.old_code, &self.new_code) {
            if old != new {
                self.suggested_fix = Some(SuggestedFix::Replace {
                    old: old.clone(),
                    new: new.clone(),
                });
            }
        }
    }

    /// `priority = severity_weight / (1 + effort_hours/2)` per spec §3.
    pub fn priority(&self) -> f64 {
        let effort_hours = self.change_kind.estimated_minutes() as f64 / 60.0;
        self.severity.weight() / (1.0 + effort_hours / 2.0)
    }
}
