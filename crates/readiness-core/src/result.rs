use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The lower/upper bound risk scores must be clamped to (spec §3, §8 testable
/// property #7).
pub const RISK_SCORE_MIN: f64 = 1.0;
pub const RISK_SCORE_MAX: f64 = 10.0;

/// The outcome of running one analyzer against one extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analyzer_name: String,
    pub extension_key: String,
    pub metrics: HashMap<String, serde_json::Value>,
    pub risk_score: f64,
    pub recommendations: Vec<String>,
    pub successful: bool,
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn success(analyzer_name: impl Into<String>, extension_key: impl Into<String>, risk_score: f64) -> Self {
        Self {
            analyzer_name: analyzer_name.into(),
            extension_key: extension_key.into(),
            metrics: HashMap::new(),
            risk_score: risk_score.clamp(RISK_SCORE_MIN, RISK_SCORE_MAX),
            recommendations: Vec::new(),
            successful: true,
            error: None,
        }
    }

    pub fn failure(analyzer_name: impl Into<String>, extension_key: impl Into<String>, risk_score: f64, error: impl Into<String>) -> Self {
        Self {
            analyzer_name: analyzer_name.into(),
            extension_key: extension_key.into(),
            metrics: HashMap::new(),
            risk_score: risk_score.clamp(RISK_SCORE_MIN, RISK_SCORE_MAX),
            recommendations: Vec::new(),
            successful: false,
            error: Some(error.into()),
        }
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }
}
