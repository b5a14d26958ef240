//! The persisted analysis document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::frame::FrameResult;
use crate::summary::AnalysisSummary;

/// Metadata about the analyzed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    /// Source video filename
    pub filename: String,
    /// Sampling interval used, in seconds
    pub interval_seconds: f64,
    /// Number of frames written by the sampler
    pub frames_extracted: u64,
    /// Number of frames successfully classified (entries in `frames`)
    pub frames_analyzed: u64,
    /// When the document was generated
    pub analysis_time: DateTime<Utc>,
}

/// One analysis document per video, keyed by the video's file stem.
///
/// Created wholesale by a single pipeline run and immutable once written;
/// re-analysis replaces the whole document. Invariant:
/// `video_info.frames_analyzed == frames.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    pub video_info: VideoMeta,
    pub analysis_summary: AnalysisSummary,
    /// Frame filename -> classification result
    pub frames: BTreeMap<String, FrameResult>,
}

impl AnalysisDocument {
    pub fn new(
        video_info: VideoMeta,
        analysis_summary: AnalysisSummary,
        frames: BTreeMap<String, FrameResult>,
    ) -> Self {
        debug_assert_eq!(video_info.frames_analyzed, frames.len() as u64);
        Self {
            video_info,
            analysis_summary,
            frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::HighestScoreFrame;

    #[test]
    fn test_document_round_trip() {
        let mut frames = BTreeMap::new();
        frames.insert(
            "frame_00_00_00_000.jpg".to_string(),
            FrameResult {
                filename: "frame_00_00_00_000.jpg".to_string(),
                timestamp: "00:00:00.000".to_string(),
                frame_number: 1,
                nsfw_score: 5,
                is_nsfw: false,
                tags: vec!["indoor".to_string()],
                description: "A desk".to_string(),
                extra: serde_json::Map::new(),
            },
        );

        let doc = AnalysisDocument {
            video_info: VideoMeta {
                filename: "clip.mp4".to_string(),
                interval_seconds: 5.0,
                frames_extracted: 1,
                frames_analyzed: 1,
                analysis_time: Utc::now(),
            },
            analysis_summary: AnalysisSummary {
                total_frames: 1,
                nsfw_frames: 0,
                nsfw_percentage: 0.0,
                average_nsfw_score: 5.0,
                tag_distribution: BTreeMap::from([("indoor".to_string(), 1)]),
                highest_score_frame: HighestScoreFrame {
                    filename: "frame_00_00_00_000.jpg".to_string(),
                    score: 5,
                    tags: vec!["indoor".to_string()],
                    description: "A desk".to_string(),
                },
                analysis_time: Utc::now(),
            },
            frames,
        };

        let json = serde_json::to_string(&doc).unwrap();
        let back: AnalysisDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
