//! Run stage reporting.

use std::fmt;

use tracing::info;

/// Stages of one pipeline run.
///
/// A run moves `Sampling → Classifying(i/n) → Aggregating → Persisting →
/// Done`. `Failed` is terminal and reachable from `Sampling` only: a video
/// that cannot be opened aborts the run before anything is persisted,
/// while per-frame classification errors are recorded as skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStage {
    Sampling,
    Classifying { current: u64, total: u64 },
    Aggregating,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStage::Sampling => write!(f, "sampling"),
            RunStage::Classifying { current, total } => {
                write!(f, "classifying {current}/{total}")
            }
            RunStage::Aggregating => write!(f, "aggregating"),
            RunStage::Persisting => write!(f, "persisting"),
            RunStage::Done => write!(f, "done"),
            RunStage::Failed => write!(f, "failed"),
        }
    }
}

/// Sink for run progress; the console/CLI collaborator decides how to
/// surface it.
pub trait ProgressReporter: Send + Sync {
    fn stage(&self, _stage: &RunStage) {}
    fn log(&self, _message: &str) {}
}

/// Reporter that emits progress through `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn stage(&self, stage: &RunStage) {
        info!("Pipeline stage: {stage}");
    }

    fn log(&self, message: &str) {
        info!("{message}");
    }
}
