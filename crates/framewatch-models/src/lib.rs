//! Shared data models for the Framewatch backend.
//!
//! This crate provides Serde-serializable types for:
//! - Per-frame classification results
//! - Analysis summaries and the persisted analysis document
//! - Frame timestamp token encoding/decoding

pub mod document;
pub mod frame;
pub mod summary;
pub mod timestamp;

// Re-export common types
pub use document::{AnalysisDocument, VideoMeta};
pub use frame::FrameResult;
pub use summary::{AnalysisSummary, HighestScoreFrame};
pub use timestamp::{format_timestamp_token, timestamp_from_filename};
