//! Execution order resolution and pipeline execution.
//!
//! This module provides:
//! - The execution order resolver (phase grouping + topological sort)
//! - The sequential pipeline executor with failure isolation
//! - The run report and its per-stage summary

mod executor;
mod report;
mod resolver;


pub use executor::{PipelineExecutor, RunOutcome};
pub use report::{InvocationRecord, RunReport, RunSummary, StageOutcome, StageSummary};
pub use resolver::resolve_execution_order;
