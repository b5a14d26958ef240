//! Pipeline configuration.

use std::path::PathBuf;

/// Tunables consumed by one analysis run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding analysis documents and frame directories
    pub output_dir: PathBuf,
    /// Sampling interval in seconds
    pub interval_seconds: f64,
    /// Optional cap on frames classified per run
    pub frame_limit: Option<usize>,
    /// Frame image filename prefix
    pub frame_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("analysis_results"),
            interval_seconds: 5.0,
            frame_limit: None,
            frame_prefix: "frame".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            interval_seconds: std::env::var("SAMPLE_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.interval_seconds),
            frame_limit: std::env::var("FRAME_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok()),
            frame_prefix: std::env::var("FRAME_PREFIX").unwrap_or(defaults.frame_prefix),
        }
    }
}
