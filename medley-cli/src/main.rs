//! Medley pipeline runner.
//!
//! Collects audio, MIDI and MusicXML inputs from their directories,
//! registers the built-in stage set, runs the pipeline and writes the
//! master report. Analysis plugins register themselves through
//! `register_stages`; the orchestration itself lives in the `medley`
//! crate.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use medley::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for the medley runner
#[derive(Parser, Debug)]
#[command(name = "medley")]
#[command(about = "Media analysis pipeline runner")]
#[command(version)]
struct Args {
    /// Directory containing audio inputs (wav, flac, mp3)
    #[arg(long, env = "MEDLEY_AUDIO_DIR")]
    audio_dir: PathBuf,

    /// Directory containing MIDI inputs
    #[arg(long, env = "MEDLEY_MIDI_DIR")]
    midi_dir: PathBuf,

    /// Directory containing MusicXML inputs
    #[arg(long, env = "MEDLEY_MUSICXML_DIR")]
    musicxml_dir: PathBuf,

    /// Directory stage outputs and the master report are written to
    #[arg(long, env = "MEDLEY_OUT_DIR")]
    out_dir: PathBuf,

    /// List registered stages in resolved order and exit
    #[arg(long)]
    list: bool,
}

/// Batch stage that snapshots the accumulated run into its payload.
///
/// Runs last (report category, final phase); the written master report
/// itself is produced by the runner after the pipeline completes.
#[derive(Debug, Clone, Copy, Default)]
struct MasterReportStage;

#[async_trait]
impl Stage for MasterReportStage {
    async fn run(&self, call: &StageCall<'_>) -> StageResult {
        let failed = call.batch.iter().filter(|r| !r.is_success()).count();
        StageResult::ok_empty()
            .with_entry("report_records", serde_json::json!(call.batch.len()))
            .with_entry("report_failures", serde_json::json!(failed))
    }
}

/// Registers the built-in stage set.
///
/// Analysis plugins live outside the orchestrator; this is where a
/// deployment wires its own descriptors in.
fn register_stages(registry: &mut StageRegistry) -> Result<()> {
    registry
        .register(
            StageDescriptor::new("master_report", InputCategory::report(), Arc::new(MasterReportStage))
                .with_phase(9)
                .batch(),
        )
        .context("registering built-in stages")?;
    Ok(())
}

fn print_stage_list(registry: &StageRegistry, order: &[String]) {
    println!("Registered stages:");
    for (i, name) in order.iter().enumerate() {
        if let Some(d) = registry.get(name) {
            let requires = if d.requires.is_empty() {
                String::new()
            } else {
                format!("  requires {}", d.requires.join(", "))
            };
            println!(
                "  {:2}. {:<22} phase {}  [{}]{requires}",
                i + 1,
                d.name,
                d.phase,
                d.category
            );
        }
    }
}

/// One summary line per resolved stage. Stages whose category matched
/// no collected files still show up, as "0/0 (no inputs)".
fn summary_lines(order: &[String], summary: &RunSummary) -> Vec<String> {
    order
        .iter()
        .map(|name| {
            summary.stages.iter().find(|s| &s.stage == name).map_or_else(
                || format!("  {name:<22} 0/0 succeeded (no inputs)"),
                |stage| {
                    let bucket = match stage.outcome {
                        StageOutcome::Full => "full",
                        StageOutcome::Partial => "partial",
                        StageOutcome::Zero => "zero",
                    };
                    format!(
                        "  {:<22} {}/{} succeeded ({bucket})",
                        stage.stage, stage.succeeded, stage.attempted
                    )
                },
            )
        })
        .collect()
}

fn print_summary(order: &[String], summary: &RunSummary) {
    println!("\nRun {} finished:", summary.identity.run_id);
    for line in summary_lines(order, summary) {
        println!("{line}");
    }
    if summary.has_failures() {
        println!("  {} invocation(s) failed; see the master report.", summary.total_failures);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medley=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut registry = StageRegistry::new();
    register_stages(&mut registry)?;

    let order = resolve_execution_order(&registry).context("resolving execution order")?;
    if args.list {
        print_stage_list(&registry, &order);
        return Ok(());
    }

    let files = FileSet::from_media_dirs(&args.audio_dir, &args.midi_dir, &args.musicxml_dir)
        .context("collecting input files")?;
    info!(files = files.len(), stages = order.len(), "inputs collected");

    let executor = PipelineExecutor::new(&args.out_dir);
    let outcome = executor
        .run(&registry, &files)
        .await
        .context("pipeline run failed")?;

    let report_path = args.out_dir.join("master_report.json");
    std::fs::write(&report_path, outcome.report.to_json()?)
        .with_context(|| format!("writing {}", report_path.display()))?;
    info!(report = %report_path.display(), "master report written");

    print_summary(&order, &outcome.report.summary());
    println!("\nAll done! Master report at {}", report_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_master_report_stage_counts_records() {
        let batch = vec![
            InvocationRecord::success("beats", InputRef::Batch, std::collections::HashMap::new()),
            InvocationRecord::failure("key", InputRef::Batch, "bad"),
        ];
        let input = InputRef::Batch;
        let call = StageCall {
            input: &input,
            batch: &batch,
            out_dir: std::path::Path::new("out"),
            context: None,
        };
        let result = MasterReportStage.run(&call).await;
        assert_eq!(result.payload.get("report_records"), Some(&serde_json::json!(2)));
        assert_eq!(result.payload.get("report_failures"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn test_summary_lists_stages_with_no_inputs() {
        let mut report = RunReport::new(RunIdentity::new());
        report.push(InvocationRecord::success(
            "beats",
            InputRef::Batch,
            std::collections::HashMap::new(),
        ));
        let summary = report.summary();

        // "melody" resolved but matched no files, so it has no records.
        let order = vec!["beats".to_string(), "melody".to_string()];
        let lines = summary_lines(&order, &summary);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("beats"));
        assert!(lines[0].contains("1/1"));
        assert!(lines[1].contains("melody"));
        assert!(lines[1].contains("0/0"));
        assert!(lines[1].contains("no inputs"));
    }

    #[test]
    fn test_built_in_registry_resolves() {
        let mut registry = StageRegistry::new();
        register_stages(&mut registry).unwrap();
        let order = resolve_execution_order(&registry).unwrap();
        assert_eq!(order, vec!["master_report".to_string()]);
    }
}
