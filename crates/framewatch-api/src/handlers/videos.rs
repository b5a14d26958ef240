//! Video discovery handlers.
//!
//! Directory scans are performed fresh on every request; nothing is
//! cached, so a pipeline run finishing between two requests is visible
//! immediately.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use framewatch_models::FrameResult;

use crate::error::ApiResult;
use crate::state::AppState;

/// Extensions recognized as video files.
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "wmv"];

/// Number of tags reported per video.
const TOP_TAG_COUNT: usize = 3;

/// Videos response.
#[derive(Serialize)]
pub struct VideosResponse {
    pub videos: Vec<VideoEntry>,
}

/// One discovered video with its analysis status.
#[derive(Serialize)]
pub struct VideoEntry {
    pub id: String,
    pub filename: String,
    pub size_mb: f64,
    pub has_analysis: bool,
    pub video_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_nsfw_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_frames: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_tags: Option<Vec<String>>,
}

/// List all videos and their analysis status.
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<Json<VideosResponse>> {
    let mut videos = Vec::new();

    for (filename, size_bytes) in scan_video_dir(&state).await {
        let id = file_stem(&filename);
        let video_path = state.config.video_dir.join(&filename);

        let mut entry = VideoEntry {
            id: id.clone(),
            filename,
            size_mb: round2(size_bytes as f64 / (1024.0 * 1024.0)),
            has_analysis: state.store.exists(&id).await,
            video_path: video_path.to_string_lossy().to_string(),
            nsfw_percentage: None,
            average_nsfw_score: None,
            total_frames: None,
            highest_score: None,
            analysis_time: None,
            top_tags: None,
        };

        if entry.has_analysis {
            match state.store.read(&id).await {
                Ok(doc) => {
                    let summary = &doc.analysis_summary;
                    entry.nsfw_percentage = Some(summary.nsfw_percentage);
                    entry.average_nsfw_score = Some(summary.average_nsfw_score);
                    entry.total_frames = Some(summary.total_frames);
                    entry.highest_score = Some(summary.highest_score_frame.score);
                    entry.analysis_time = Some(doc.video_info.analysis_time);
                    entry.top_tags = Some(top_tags(doc.frames.values()));
                }
                Err(e) => {
                    // A damaged document leaves the summary fields off
                    // without hiding the video itself.
                    warn!("Failed to read analysis for '{}': {}", entry.id, e);
                }
            }
        }

        videos.push(entry);
    }

    Ok(Json(VideosResponse { videos }))
}

/// Lightweight enumeration response.
#[derive(Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoName>,
}

#[derive(Serialize)]
pub struct VideoName {
    pub id: String,
    pub name: String,
}

/// List videos for dropdown selection.
pub async fn video_list(State(state): State<AppState>) -> ApiResult<Json<VideoListResponse>> {
    let videos = scan_video_dir(&state)
        .await
        .into_iter()
        .map(|(filename, _)| VideoName {
            id: file_stem(&filename),
            name: filename,
        })
        .collect();

    Ok(Json(VideoListResponse { videos }))
}

/// Scan the video directory for recognized files, sorted by filename.
///
/// A missing directory is an empty listing, not an error.
async fn scan_video_dir(state: &AppState) -> Vec<(String, u64)> {
    let mut found = Vec::new();

    let mut entries = match tokio::fs::read_dir(&state.config.video_dir).await {
        Ok(entries) => entries,
        Err(_) => return found,
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let filename = entry.file_name().to_string_lossy().to_string();
        let is_video = filename
            .rsplit('.')
            .next()
            .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_video {
            continue;
        }

        let size = entry.metadata().await.map(|m| m.len()).unwrap_or(0);
        found.push((filename, size));
    }

    found.sort();
    found
}

fn file_stem(filename: &str) -> String {
    std::path::Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Top tags by frequency across all frames, count descending then tag
/// ascending so the cut is deterministic.
fn top_tags<'a>(frames: impl Iterator<Item = &'a FrameResult>) -> Vec<String> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for frame in frames {
        for tag in &frame.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(TOP_TAG_COUNT)
        .map(|(tag, _)| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_tags(number: u32, tags: &[&str]) -> FrameResult {
        FrameResult {
            filename: format!("frame_{number}.jpg"),
            timestamp: "00:00:00.000".to_string(),
            frame_number: number,
            nsfw_score: 0,
            is_nsfw: false,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: String::new(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_top_tags_ranked_by_frequency() {
        let frames = vec![
            frame_with_tags(1, &["person", "indoor"]),
            frame_with_tags(2, &["person", "outdoor"]),
            frame_with_tags(3, &["person", "indoor", "night"]),
        ];

        let top = top_tags(frames.iter());
        assert_eq!(top, vec!["person", "indoor", "night"]);
    }

    #[test]
    fn test_top_tags_tie_breaks_alphabetically() {
        let frames = vec![frame_with_tags(1, &["zebra", "apple", "mango", "kiwi"])];

        let top = top_tags(frames.iter());
        assert_eq!(top, vec!["apple", "kiwi", "mango"]);
    }

    #[test]
    fn test_top_tags_empty() {
        let frames: Vec<FrameResult> = Vec::new();
        assert!(top_tags(frames.iter()).is_empty());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(12.3456), 12.35);
    }
}
