//! Stage trait and invocation call.
//!
//! A stage is one independently-authored processing unit. The executor
//! assumes nothing about it beyond this contract: it receives a
//! [`StageCall`] and returns a [`StageResult`]. Internal faults must be
//! converted to `StageResult::fail`; the executor additionally guards
//! every invocation against panics that escape this rule.

use crate::context::RunContext;
use crate::core::{InputRef, StageResult};
use crate::pipeline::InvocationRecord;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

/// One invocation's view of the world.
#[derive(Debug)]
pub struct StageCall<'a> {
    /// The input the stage was dispatched against.
    pub input: &'a InputRef,
    /// Accumulated run report records; empty for per-file stages.
    pub batch: &'a [InvocationRecord],
    /// Directory the stage may write files into.
    pub out_dir: &'a Path,
    /// Shared run context; present only when the descriptor opted in.
    pub context: Option<&'a RunContext>,
}

impl<'a> StageCall<'a> {
    /// Returns the input file path, if dispatched per-file.
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        self.input.path()
    }

    /// Reads a key from the shared context, if the stage receives one.
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<serde_json::Value> {
        self.context.and_then(|ctx| ctx.get(key))
    }
}

/// Trait for pipeline stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Executes the stage against one invocation.
    async fn run(&self, call: &StageCall<'_>) -> StageResult;
}

/// A synchronous closure-backed stage.
pub struct FnStage<F>
where
    F: Fn(&StageCall<'_>) -> StageResult + Send + Sync,
{
    func: F,
}

impl<F> FnStage<F>
where
    F: Fn(&StageCall<'_>) -> StageResult + Send + Sync,
{
    /// Creates a stage from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnStage<F>
where
    F: Fn(&StageCall<'_>) -> StageResult + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage").finish()
    }
}

#[async_trait]
impl<F> Stage for FnStage<F>
where
    F: Fn(&StageCall<'_>) -> StageResult + Send + Sync,
{
    async fn run(&self, call: &StageCall<'_>) -> StageResult {
        (self.func)(call)
    }
}

/// A stage that succeeds without doing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStage;

#[async_trait]
impl Stage for NoOpStage {
    async fn run(&self, _call: &StageCall<'_>) -> StageResult {
        StageResult::ok_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn call_on<'a>(input: &'a InputRef) -> StageCall<'a> {
        StageCall {
            input,
            batch: &[],
            out_dir: Path::new("out"),
            context: None,
        }
    }

    #[tokio::test]
    async fn test_fn_stage() {
        let stage = FnStage::new(|call: &StageCall<'_>| {
            StageResult::ok_value("seen", serde_json::json!(call.input.to_string()))
        });
        let input = InputRef::File(PathBuf::from("a.wav"));
        let result = stage.run(&call_on(&input)).await;
        assert!(result.is_success());
        assert_eq!(result.payload.get("seen"), Some(&serde_json::json!("a.wav")));
    }

    #[tokio::test]
    async fn test_noop_stage() {
        let input = InputRef::Batch;
        let result = NoOpStage.run(&call_on(&input)).await;
        assert!(result.is_success());
        assert!(result.payload.is_empty());
    }

    #[test]
    fn test_context_value_without_context() {
        let input = InputRef::Batch;
        assert!(call_on(&input).context_value("tempo").is_none());
    }
}
