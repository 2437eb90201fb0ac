//! Sequential pipeline executor with per-invocation failure isolation.

use super::report::{InvocationRecord, RunReport};
use super::resolver::resolve_execution_order;
use crate::collect::FileSet;
use crate::context::{RunContext, RunIdentity};
use crate::core::{InputRef, InvocationMode, StageResult};
use crate::registry::{StageDescriptor, StageRegistry};
use crate::stages::StageCall;
use crate::MedleyError;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// What a completed run hands back.
#[derive(Debug)]
pub struct RunOutcome {
    /// The full invocation log.
    pub report: RunReport,
    /// The final shared context.
    pub context: RunContext,
}

/// Runs every registered stage, over every applicable input, in resolved
/// order.
///
/// Execution is strictly sequential: one stage, one input, one
/// invocation at a time, so a later stage observes every context entry
/// written by earlier stages and never a partial write. A failing
/// invocation is logged and recorded but never halts the run;
/// configuration and cycle errors abort before the first invocation.
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    out_dir: PathBuf,
}

impl PipelineExecutor {
    /// Creates an executor writing stage outputs under `out_dir`.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Executes the pipeline.
    ///
    /// # Errors
    ///
    /// Pre-flight configuration or cycle errors from the resolver, or an
    /// IO error creating the output directory. Stage failures are not
    /// errors here; they land in the report.
    pub async fn run(
        &self,
        registry: &StageRegistry,
        files: &FileSet,
    ) -> Result<RunOutcome, MedleyError> {
        let order = resolve_execution_order(registry)?;
        std::fs::create_dir_all(&self.out_dir)?;

        let identity = RunIdentity::new();
        info!(
            run_id = %identity.run_id,
            stages = order.len(),
            "pipeline started"
        );

        let context = RunContext::new();
        let mut report = RunReport::new(identity);

        for name in &order {
            let Some(descriptor) = registry.get(name) else {
                // The order came from this registry; a miss is a bug.
                return Err(MedleyError::Internal(format!(
                    "resolved stage '{name}' missing from registry"
                )));
            };

            info!(stage = %name, category = %descriptor.category, "running stage");
            match descriptor.mode {
                InvocationMode::PerFile => {
                    for path in files.matching(&descriptor.category) {
                        let record = self
                            .invoke(descriptor, InputRef::File(path.clone()), &[], &context)
                            .await;
                        absorb(record, &context, &mut report);
                    }
                }
                InvocationMode::Batch => {
                    let batch = report.records().to_vec();
                    let record = self
                        .invoke(descriptor, InputRef::Batch, &batch, &context)
                        .await;
                    absorb(record, &context, &mut report);
                }
            }
        }

        let summary = report.summary();
        info!(
            run_id = %report.identity.run_id,
            records = summary.total_records,
            failures = summary.total_failures,
            "pipeline finished"
        );

        Ok(RunOutcome { report, context })
    }

    /// Invokes one stage against one input, under a panic boundary.
    async fn invoke(
        &self,
        descriptor: &StageDescriptor,
        input: InputRef,
        batch: &[InvocationRecord],
        context: &RunContext,
    ) -> InvocationRecord {
        let call = StageCall {
            input: &input,
            batch,
            out_dir: &self.out_dir,
            context: descriptor.wants_context.then_some(context),
        };

        let started = Instant::now();
        let result = match AssertUnwindSafe(descriptor.runner.run(&call))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => StageResult::fail(format!(
                "stage panicked: {}",
                panic_message(panic.as_ref())
            )),
        };
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        InvocationRecord::from_result(&descriptor.name, input, result).with_duration_ms(duration_ms)
    }
}

/// Records the outcome and, on success, merges the payload into the
/// shared context. The merge order follows (stage order, input order).
fn absorb(record: InvocationRecord, context: &RunContext, report: &mut RunReport) {
    if record.is_success() {
        context.merge(&record);
        info!(stage = %record.stage, input = %record.input, "stage succeeded");
    } else {
        warn!(
            stage = %record.stage,
            input = %record.input,
            error = record.error.as_deref().unwrap_or("unknown"),
            "stage failed"
        );
    }
    report.push(record);
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic.downcast_ref::<&str>().map_or_else(
        || {
            panic
                .downcast_ref::<String>()
                .cloned()
                .unwrap_or_else(|| "unknown panic".to_string())
        },
        |s| (*s).to_string(),
    )
}
