//! Canned stages and helpers for testing pipelines.
//!
//! Used by this crate's own tests and available to plugin authors who
//! want to exercise their registrations without real media.

use crate::core::{InputRef, StageResult};
use crate::stages::{Stage, StageCall};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A stage that always succeeds with a fixed payload.
#[derive(Debug, Clone, Default)]
pub struct StaticStage {
    payload: HashMap<String, serde_json::Value>,
}

impl StaticStage {
    /// Creates a stage with an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a payload entry.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}

#[async_trait]
impl Stage for StaticStage {
    async fn run(&self, _call: &StageCall<'_>) -> StageResult {
        StageResult::ok(self.payload.clone())
    }
}

/// A stage that always fails with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingStage {
    message: String,
}

impl FailingStage {
    /// Creates a failing stage.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Stage for FailingStage {
    async fn run(&self, _call: &StageCall<'_>) -> StageResult {
        StageResult::fail(self.message.clone())
    }
}

/// A stage that panics, for exercising the executor's panic boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingStage;

#[async_trait]
impl Stage for PanickingStage {
    async fn run(&self, _call: &StageCall<'_>) -> StageResult {
        panic!("stage exploded")
    }
}

/// A stage that records every input it was invoked with.
#[derive(Debug, Default)]
pub struct RecordingStage {
    calls: Mutex<Vec<InputRef>>,
    result: Option<StageResult>,
}

impl RecordingStage {
    /// Creates a recording stage that succeeds with an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the result returned on each invocation.
    #[must_use]
    pub fn with_result(mut self, result: StageResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Returns the inputs seen so far, in invocation order.
    #[must_use]
    pub fn seen(&self) -> Vec<InputRef> {
        self.calls.lock().clone()
    }

    /// Returns the number of invocations.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Stage for RecordingStage {
    async fn run(&self, call: &StageCall<'_>) -> StageResult {
        self.calls.lock().push(call.input.clone());
        self.result.clone().unwrap_or_else(StageResult::ok_empty)
    }
}
