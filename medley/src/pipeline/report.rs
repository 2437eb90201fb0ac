//! Run report: the ordered log of every invocation outcome.

use crate::context::RunIdentity;
use crate::core::{InputRef, InvocationStatus, StageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One attempted (stage, input) invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRecord {
    /// The originating stage.
    pub stage: String,
    /// What the stage was invoked against.
    pub input: InputRef,
    /// Success or error.
    pub status: InvocationStatus,
    /// Result payload (empty for failures).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub payload: HashMap<String, serde_json::Value>,
    /// Error description (failures only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration of the invocation in milliseconds.
    pub duration_ms: f64,
    /// When the invocation finished (UTC).
    pub timestamp: DateTime<Utc>,
}

impl InvocationRecord {
    /// Creates a success record.
    #[must_use]
    pub fn success(
        stage: impl Into<String>,
        input: InputRef,
        payload: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            stage: stage.into(),
            input,
            status: InvocationStatus::Success,
            payload,
            error: None,
            duration_ms: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Creates an error record.
    #[must_use]
    pub fn failure(stage: impl Into<String>, input: InputRef, error: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            input,
            status: InvocationStatus::Error,
            payload: HashMap::new(),
            error: Some(error.into()),
            duration_ms: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Creates a record from a stage result.
    #[must_use]
    pub fn from_result(stage: impl Into<String>, input: InputRef, result: StageResult) -> Self {
        match result.status {
            InvocationStatus::Success => Self::success(stage, input, result.payload),
            InvocationStatus::Error => Self::failure(
                stage,
                input,
                result.error.unwrap_or_else(|| "unspecified error".to_string()),
            ),
        }
    }

    /// Sets the invocation duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Returns true if the invocation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// How a stage fared across all of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// Every invocation succeeded.
    Full,
    /// Some invocations succeeded, some failed.
    Partial,
    /// Every invocation failed.
    Zero,
}

/// Per-stage roll-up of the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSummary {
    /// The stage name.
    pub stage: String,
    /// Number of attempted invocations.
    pub attempted: usize,
    /// Number of successful invocations.
    pub succeeded: usize,
    /// Number of failed invocations.
    pub failed: usize,
    /// The success bucket for this stage.
    pub outcome: StageOutcome,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// The run identity.
    pub identity: RunIdentity,
    /// Total invocation records.
    pub total_records: usize,
    /// Total failed invocations.
    pub total_failures: usize,
    /// Per-stage roll-ups, in first-invocation order.
    pub stages: Vec<StageSummary>,
}

impl RunSummary {
    /// Returns true if any invocation failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.total_failures > 0
    }
}

/// Ordered, append-only log of every invocation in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// The run identity.
    pub identity: RunIdentity,
    records: Vec<InvocationRecord>,
}

impl RunReport {
    /// Creates an empty report for a run.
    #[must_use]
    pub fn new(identity: RunIdentity) -> Self {
        Self {
            identity,
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, record: InvocationRecord) {
        self.records.push(record);
    }

    /// Returns every record, in invocation order.
    #[must_use]
    pub fn records(&self) -> &[InvocationRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was attempted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Folds the records into a per-stage summary.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for record in &self.records {
            let entry = counts.entry(record.stage.clone()).or_insert_with(|| {
                order.push(record.stage.clone());
                (0, 0)
            });
            if record.is_success() {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }

        let stages: Vec<StageSummary> = order
            .into_iter()
            .map(|stage| {
                let (succeeded, failed) = counts[&stage];
                let outcome = match (succeeded, failed) {
                    (0, _) => StageOutcome::Zero,
                    (_, 0) => StageOutcome::Full,
                    _ => StageOutcome::Partial,
                };
                StageSummary {
                    stage,
                    attempted: succeeded + failed,
                    succeeded,
                    failed,
                    outcome,
                }
            })
            .collect();

        RunSummary {
            identity: self.identity.clone(),
            total_records: self.records.len(),
            total_failures: self.records.iter().filter(|r| !r.is_success()).count(),
            stages,
        }
    }

    /// Serializes the report to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String, crate::MedleyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
