//! Stratograph Pipeline - multi-phase collection runner
//!
//! An integration is a sequence of named phases, each holding one or more
//! work functions that collect entities and relationships from some
//! provider. Phases run strictly in order so later phases can read earlier
//! phases' flushed data; work functions within a phase run with bounded
//! concurrency, each against its own fresh collector.
//!
//! ## Modules
//!
//! - [`context`] - run metadata and the per-work-function context
//! - [`phase`] - phase and work function definitions
//! - [`runner`] - the pipeline runner

pub mod context;
pub mod phase;
pub mod runner;

pub use context::{CollectionJob, IntegrationDefinition, IntegrationInstance, RunContext, WorkContext};
pub use phase::{Phase, WorkFn, WorkFuture};
pub use runner::{CollectionPipeline, PipelineOptions, PrepareFuture};
