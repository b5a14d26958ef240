//! Aggregated analysis summary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single highest-scoring frame of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestScoreFrame {
    pub filename: String,
    pub score: i64,
    pub tags: Vec<String>,
    pub description: String,
}

impl HighestScoreFrame {
    /// Sentinel used when no frame was analyzed.
    pub fn none() -> Self {
        Self {
            filename: String::new(),
            score: 0,
            tags: Vec::new(),
            description: String::new(),
        }
    }
}

/// Summary derived from the per-frame result mapping.
///
/// A summary is a pure function of the frame mapping; see
/// `framewatch_pipeline::aggregate::summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_frames: u64,
    pub nsfw_frames: u64,
    pub nsfw_percentage: f64,
    pub average_nsfw_score: f64,
    pub tag_distribution: BTreeMap<String, u64>,
    pub highest_score_frame: HighestScoreFrame,
    pub analysis_time: DateTime<Utc>,
}
