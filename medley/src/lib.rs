//! # Medley
//!
//! A plugin pipeline orchestrator for media analysis workflows.
//!
//! Medley runs a set of independently-authored processing stages over
//! collections of input media files:
//!
//! - **Stage registry**: stages self-register a descriptor (name, input
//!   category, phase, requirements, callable) before the run
//! - **Order resolution**: one deterministic total order honoring phase
//!   grouping and declared dependencies, with cycle detection as a
//!   pre-flight gate
//! - **Shared context**: run-scoped key/value state populated from
//!   successful stage payloads, last-write-wins
//! - **Failure isolation**: a failing (stage, file) invocation is logged
//!   and recorded, and the run continues
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medley::prelude::*;
//!
//! let mut registry = StageRegistry::new();
//! registry.register(
//!     StageDescriptor::new("beats", InputCategory::audio(), Arc::new(BeatStage))
//! )?;
//! registry.register(
//!     StageDescriptor::new("melody", InputCategory::midi(), Arc::new(MelodyStage))
//!         .with_phase(2)
//!         .with_required("beats")
//!         .with_context(),
//! )?;
//!
//! let files = FileSet::from_media_dirs(audio_dir, midi_dir, xml_dir)?;
//! let outcome = PipelineExecutor::new(out_dir).run(&registry, &files).await?;
//! println!("{}", outcome.report.to_json()?);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod collect;
pub mod context;
pub mod core;
pub mod errors;
pub mod graph;
pub mod pipeline;
pub mod registry;
pub mod stages;
pub mod testing;

pub use errors::MedleyError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collect::{collect_files, FileSet};
    pub use crate::context::{RunContext, RunIdentity};
    pub use crate::core::{InputCategory, InputRef, InvocationMode, InvocationStatus, StageResult};
    pub use crate::errors::{
        CycleError, DuplicateStageError, ErrorDetails, MedleyError, SelfDependencyError,
        UnknownDependencyError,
    };
    pub use crate::graph::DependencyGraph;
    pub use crate::pipeline::{
        resolve_execution_order, InvocationRecord, PipelineExecutor, RunOutcome, RunReport,
        RunSummary, StageOutcome, StageSummary,
    };
    pub use crate::registry::{StageDescriptor, StageRegistry};
    pub use crate::stages::{FnStage, NoOpStage, Stage, StageCall};
}
