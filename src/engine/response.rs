//! Response payloads.

use serde::{Deserialize, Serialize};

use crate::ga::GenerationStats;
use crate::models::{ConflictRecord, ScheduleEntry};
use crate::scheduler::TimetableKpi;

/// Non-fatal condition attached to a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineWarning {
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// A session kept a faculty or room placeholder.
    UnresolvedSession,
    /// The deadline or search budget cut the run short.
    Timeout,
}

impl EngineWarning {
    pub fn unresolved(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnresolvedSession,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Timeout,
            message: message.into(),
        }
    }
}

/// Result of a generate request.
///
/// On failure only `success`, `algorithm` and `error` are meaningful and
/// no schedule is included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub algorithm: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleEntry>,
    pub fitness_score: f64,
    #[serde(default)]
    pub conflicts: Vec<ConflictRecord>,
    #[serde(default)]
    pub warnings: Vec<EngineWarning>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generation_history: Vec<GenerationStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi: Option<TimetableKpi>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Failure payload: `success: false` with a human-readable cause.
    pub fn failure(algorithm: impl Into<String>, error: impl ToString) -> Self {
        Self {
            success: false,
            algorithm: algorithm.into(),
            schedule: Vec::new(),
            fitness_score: 0.0,
            conflicts: Vec::new(),
            warnings: Vec::new(),
            generation_history: Vec::new(),
            kpi: None,
            truncated: false,
            seed: None,
            error: Some(error.to_string()),
        }
    }
}

/// One strategy's line in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResult {
    pub algorithm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_score: Option<f64>,
    pub conflict_count: usize,
    #[serde(default)]
    pub conflicts: Vec<ConflictRecord>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a compare request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleEntry>,
    pub fitness_score: f64,
    #[serde(default)]
    pub conflicts: Vec<ConflictRecord>,
    #[serde(default)]
    pub warnings: Vec<EngineWarning>,
    #[serde(default)]
    pub all_results: Vec<AlgorithmResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompareResponse {
    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            best_algorithm: None,
            schedule: Vec::new(),
            fitness_score: 0.0,
            conflicts: Vec::new(),
            warnings: Vec::new(),
            all_results: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}
