//! Error types for the medley orchestrator.
//!
//! Configuration and cycle errors are fatal and surface before any stage
//! runs; per-invocation stage errors are not represented here because the
//! executor records them in the run report instead of propagating them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for medley operations.
#[derive(Debug, Error)]
pub enum MedleyError {
    /// A stage name was registered twice.
    #[error("{0}")]
    DuplicateStage(#[from] DuplicateStageError),

    /// A stage declared a dependency on a stage that does not exist.
    #[error("{0}")]
    UnknownDependency(#[from] UnknownDependencyError),

    /// A stage listed itself in its requirements.
    #[error("{0}")]
    SelfDependency(#[from] SelfDependencyError),

    /// The dependency graph contains at least one cycle.
    #[error("{0}")]
    Cycle(#[from] CycleError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MedleyError {
    /// Returns true for errors raised before any stage executes.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::DuplicateStage(_)
                | Self::UnknownDependency(_)
                | Self::SelfDependency(_)
                | Self::Cycle(_)
        )
    }
}

impl From<serde_json::Error> for MedleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Structured diagnostic attached to configuration and cycle errors.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorDetails {
    /// Error code (e.g. "MEDLEY-004-CYCLE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
}

impl ErrorDetails {
    /// Creates new error details.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }
}

/// Error raised when registering a stage name that already exists.
#[derive(Debug, Clone, Error)]
#[error("Duplicate stage name: '{name}' is already registered")]
pub struct DuplicateStageError {
    /// The conflicting stage name.
    pub name: String,
    /// Structured diagnostic.
    pub details: ErrorDetails,
}

impl DuplicateStageError {
    /// Creates a new duplicate stage error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let details = ErrorDetails::new(
            "MEDLEY-001-DUPLICATE",
            format!("Stage '{name}' registered more than once"),
        )
        .with_fix_hint("Give every registered stage a unique name.");
        Self { name, details }
    }
}

/// Error raised when a stage requires a name absent from the registry.
#[derive(Debug, Clone, Error)]
#[error("Stage '{stage}' requires unknown stage '{dependency}'")]
pub struct UnknownDependencyError {
    /// The stage declaring the dependency.
    pub stage: String,
    /// The missing dependency name.
    pub dependency: String,
    /// Structured diagnostic.
    pub details: ErrorDetails,
}

impl UnknownDependencyError {
    /// Creates a new unknown dependency error.
    #[must_use]
    pub fn new(stage: impl Into<String>, dependency: impl Into<String>) -> Self {
        let stage = stage.into();
        let dependency = dependency.into();
        let details = ErrorDetails::new(
            "MEDLEY-002-UNKNOWN_DEP",
            format!("Dependency '{dependency}' of stage '{stage}' is not registered"),
        )
        .with_fix_hint("Check for typos and make sure the required stage registers before the run.");
        Self {
            stage,
            dependency,
            details,
        }
    }
}

/// Error raised when a stage lists itself in its requirements.
#[derive(Debug, Clone, Error)]
#[error("Stage '{name}' cannot require itself")]
pub struct SelfDependencyError {
    /// The offending stage name.
    pub name: String,
    /// Structured diagnostic.
    pub details: ErrorDetails,
}

impl SelfDependencyError {
    /// Creates a new self dependency error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let details = ErrorDetails::new(
            "MEDLEY-003-SELF_DEP",
            format!("Stage '{name}' lists itself in requires"),
        )
        .with_fix_hint("Remove the stage's own name from its requires list.");
        Self { name, details }
    }
}

/// Error raised when the dependency graph is cyclic.
///
/// Carries every representative cycle the detector found; the first one
/// is used for the headline message.
#[derive(Debug, Clone, Error)]
#[error("Dependency cycle detected: {}", format_cycle(cycles.first()))]
pub struct CycleError {
    /// The cycles found, each closed (first stage repeated at the end).
    pub cycles: Vec<Vec<String>>,
    /// Structured diagnostic.
    pub details: ErrorDetails,
}

impl CycleError {
    /// Creates a new cycle error from the detected cycles.
    #[must_use]
    pub fn new(cycles: Vec<Vec<String>>) -> Self {
        let details = ErrorDetails::new(
            "MEDLEY-004-CYCLE",
            format!("{} dependency cycle(s) in the stage graph", cycles.len()),
        )
        .with_fix_hint("Remove one of the requires edges in the cycle to break it.");
        Self { cycles, details }
    }

    /// Returns every stage name that participates in a cycle.
    #[must_use]
    pub fn members(&self) -> Vec<String> {
        let mut members: Vec<String> = self.cycles.iter().flatten().cloned().collect();
        members.sort();
        members.dedup();
        members
    }
}

fn format_cycle(cycle: Option<&Vec<String>>) -> String {
    cycle.map_or_else(String::new, |c| c.join(" -> "))
}
