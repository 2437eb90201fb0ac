//! Stage result type with factory methods.

use super::InvocationStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a stage hands back to the executor.
///
/// On success the payload keys are merged into the run context for
/// downstream stages; on error the payload is ignored and only the
/// error description is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// Success or error.
    pub status: InvocationStatus,

    /// Result payload (successful invocations).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub payload: HashMap<String, serde_json::Value>,

    /// Error description (failed invocations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResult {
    /// Creates a successful result with a payload.
    #[must_use]
    pub fn ok(payload: HashMap<String, serde_json::Value>) -> Self {
        Self {
            status: InvocationStatus::Success,
            payload,
            error: None,
        }
    }

    /// Creates a successful result with no payload.
    #[must_use]
    pub fn ok_empty() -> Self {
        Self::ok(HashMap::new())
    }

    /// Creates a successful result with a single payload entry.
    #[must_use]
    pub fn ok_value(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut payload = HashMap::new();
        payload.insert(key.into(), value);
        Self::ok(payload)
    }

    /// Creates a failed result with an error description.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            status: InvocationStatus::Error,
            payload: HashMap::new(),
            error: Some(error.into()),
        }
    }

    /// Adds a payload entry.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Returns true if the result is successful.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl Default for StageResult {
    fn default() -> Self {
        Self::ok_empty()
    }
}
