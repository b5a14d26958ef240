//! Summary aggregation.

use std::collections::BTreeMap;

use chrono::Utc;

use framewatch_models::{AnalysisSummary, FrameResult, HighestScoreFrame};

/// Fold the per-frame result mapping into a summary.
///
/// Pure apart from stamping `analysis_time`. Frames are visited in
/// ascending `frame_number` order so the highest-score pick is
/// deterministic: on equal scores the earliest frame wins.
pub fn summarize(frames: &BTreeMap<String, FrameResult>) -> AnalysisSummary {
    let mut ordered: Vec<&FrameResult> = frames.values().collect();
    ordered.sort_by_key(|f| f.frame_number);

    let total_frames = ordered.len() as u64;
    let nsfw_frames = ordered.iter().filter(|f| f.is_nsfw).count() as u64;

    let nsfw_percentage = if total_frames > 0 {
        nsfw_frames as f64 / total_frames as f64 * 100.0
    } else {
        0.0
    };

    let average_nsfw_score = if total_frames > 0 {
        let sum: i64 = ordered.iter().map(|f| f.nsfw_score).sum();
        round2(sum as f64 / total_frames as f64)
    } else {
        0.0
    };

    let mut tag_distribution: BTreeMap<String, u64> = BTreeMap::new();
    for frame in &ordered {
        for tag in &frame.tags {
            *tag_distribution.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    let mut best: Option<&FrameResult> = None;
    for frame in &ordered {
        // Strict comparison keeps the first maximum.
        if best.map_or(true, |b| frame.nsfw_score > b.nsfw_score) {
            best = Some(frame);
        }
    }

    let highest_score_frame = match best {
        Some(frame) => HighestScoreFrame {
            filename: frame.filename.clone(),
            score: frame.nsfw_score,
            tags: frame.tags.clone(),
            description: frame.description.clone(),
        },
        None => HighestScoreFrame::none(),
    };

    AnalysisSummary {
        total_frames,
        nsfw_frames,
        nsfw_percentage,
        average_nsfw_score,
        tag_distribution,
        highest_score_frame,
        analysis_time: Utc::now(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(name: &str, number: u32, score: i64, nsfw: bool, tags: &[&str]) -> FrameResult {
        FrameResult {
            filename: name.to_string(),
            timestamp: "00:00:00.000".to_string(),
            frame_number: number,
            nsfw_score: score,
            is_nsfw: nsfw,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: format!("frame {number}"),
            extra: serde_json::Map::new(),
        }
    }

    fn mapping(frames: Vec<FrameResult>) -> BTreeMap<String, FrameResult> {
        frames
            .into_iter()
            .map(|f| (f.filename.clone(), f))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_sentinel_summary() {
        let summary = summarize(&BTreeMap::new());

        assert_eq!(summary.total_frames, 0);
        assert_eq!(summary.nsfw_frames, 0);
        assert_eq!(summary.nsfw_percentage, 0.0);
        assert_eq!(summary.average_nsfw_score, 0.0);
        assert!(summary.tag_distribution.is_empty());
        assert_eq!(summary.highest_score_frame.filename, "");
        assert_eq!(summary.highest_score_frame.score, 0);
        assert_eq!(summary.highest_score_frame.description, "");
    }

    #[test]
    fn test_counts_percentage_and_mean() {
        let frames = mapping(vec![
            frame("a.jpg", 1, 10, false, &["indoor"]),
            frame("b.jpg", 2, 20, true, &["indoor", "person"]),
            frame("c.jpg", 3, 33, true, &["person"]),
        ]);

        let summary = summarize(&frames);

        assert_eq!(summary.total_frames, 3);
        assert_eq!(summary.nsfw_frames, 2);
        assert!((summary.nsfw_percentage - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.average_nsfw_score, 21.0);
        assert_eq!(summary.tag_distribution["indoor"], 2);
        assert_eq!(summary.tag_distribution["person"], 2);
    }

    #[test]
    fn test_mean_rounds_to_two_decimals() {
        let frames = mapping(vec![
            frame("a.jpg", 1, 10, false, &[]),
            frame("b.jpg", 2, 10, false, &[]),
            frame("c.jpg", 3, 11, false, &[]),
        ]);

        // 31 / 3 = 10.333... -> 10.33
        assert_eq!(summarize(&frames).average_nsfw_score, 10.33);
    }

    #[test]
    fn test_highest_score_frame() {
        let frames = mapping(vec![
            frame("a.jpg", 1, 10, false, &[]),
            frame("b.jpg", 2, 90, true, &["explicit"]),
            frame("c.jpg", 3, 40, false, &[]),
        ]);

        let top = summarize(&frames).highest_score_frame;
        assert_eq!(top.filename, "b.jpg");
        assert_eq!(top.score, 90);
        assert_eq!(top.tags, vec!["explicit"]);
    }

    #[test]
    fn test_tie_break_prefers_lower_frame_number() {
        // Key order deliberately disagrees with frame numbering to prove
        // the tie-break iterates by sequence, not by map order.
        let frames = mapping(vec![
            frame("z_first.jpg", 1, 70, true, &[]),
            frame("a_second.jpg", 2, 70, true, &[]),
        ]);

        let top = summarize(&frames).highest_score_frame;
        assert_eq!(top.filename, "z_first.jpg");
    }

    #[test]
    fn test_flag_counted_independently_of_score() {
        // A frame may be flagged with a low score; the count follows the
        // flag, never an inferred threshold.
        let frames = mapping(vec![frame("a.jpg", 1, 5, true, &[])]);

        let summary = summarize(&frames);
        assert_eq!(summary.nsfw_frames, 1);
        assert_eq!(summary.nsfw_percentage, 100.0);
        assert_eq!(summary.average_nsfw_score, 5.0);
    }
}
