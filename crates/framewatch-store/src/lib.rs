//! On-disk analysis document store.
//!
//! This crate provides:
//! - One `{id}_analysis.json` document per video under the output directory
//! - Atomic full-replace writes (temp file + rename)
//! - Distinct not-found vs corrupt read errors
//! - Path helpers for the per-video frames directory and thumbnail

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{valid_video_id, AnalysisStore};
