//! Video analysis pipeline.
//!
//! This crate provides:
//! - The run orchestrator: sample, classify sequentially, aggregate, persist
//! - The pure summary aggregator
//! - Run stage reporting

pub mod aggregate;
pub mod config;
pub mod error;
pub mod progress;
pub mod runner;

pub use aggregate::summarize;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use progress::{ProgressReporter, RunStage, TracingReporter};
pub use runner::{analyze_video, AnalysisOutcome};
