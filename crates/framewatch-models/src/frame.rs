//! Per-frame classification results.

use serde::{Deserialize, Serialize};

/// Result of classifying one sampled frame.
///
/// `nsfw_score` and `is_nsfw` both come verbatim from the classifier. They
/// may disagree (flag set with a low score); neither is derived from the
/// other and no clamping is applied here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// Frame image filename (carries the embedded timestamp token)
    pub filename: String,

    /// Playback timestamp, `HH:MM:SS.mmm`, derived from the filename
    pub timestamp: String,

    /// 1-based sequence number in sampling order
    pub frame_number: u32,

    /// Classifier score, conventionally 0-100 but not validated
    pub nsfw_score: i64,

    /// Classifier-asserted flag
    pub is_nsfw: bool,

    /// Free-form classifier tags, in classifier order
    #[serde(default)]
    pub tags: Vec<String>,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Any additional classifier-supplied fields, passed through unmodified
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
