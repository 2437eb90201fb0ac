//! Invocation status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of a single (stage, input) invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    /// The stage produced a payload.
    Success,
    /// The stage reported (or was caught raising) an error.
    Error,
}

impl InvocationStatus {
    /// Returns true if the invocation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(InvocationStatus::Success.to_string(), "success");
        assert_eq!(InvocationStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_status_serialize() {
        let json = serde_json::to_string(&InvocationStatus::Error).unwrap();
        assert_eq!(json, r#""error""#);
        let back: InvocationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InvocationStatus::Error);
    }
}
