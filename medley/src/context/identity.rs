//! Run identity for correlating a pipeline execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique ID for this run.
    pub run_id: Uuid,
    /// When the run started (UTC).
    pub started_at: DateTime<Utc>,
}

impl RunIdentity {
    /// Creates an identity with a fresh run ID and the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// Creates an identity with a specific run ID.
    #[must_use]
    pub fn with_run_id(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
        }
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities_are_distinct() {
        assert_ne!(RunIdentity::new().run_id, RunIdentity::new().run_id);
    }

    #[test]
    fn test_identity_round_trip() {
        let identity = RunIdentity::new();
        let json = serde_json::to_string(&identity).unwrap();
        let back: RunIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(identity.run_id, back.run_id);
    }
}
