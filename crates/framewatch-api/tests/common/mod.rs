//! Shared fixtures for API integration tests.

use std::collections::BTreeMap;
use std::path::Path;

use axum::Router;
use chrono::Utc;
use tempfile::TempDir;

use framewatch_api::{create_router, ApiConfig, AppState};
use framewatch_models::{
    AnalysisDocument, AnalysisSummary, FrameResult, HighestScoreFrame, VideoMeta,
};
use framewatch_store::AnalysisStore;

/// A router wired to throwaway video and output directories.
pub struct TestApp {
    pub router: Router,
    pub video_dir: TempDir,
    pub output_dir: TempDir,
}

pub fn test_app() -> TestApp {
    let video_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let config = ApiConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        video_dir: video_dir.path().to_path_buf(),
        output_dir: output_dir.path().to_path_buf(),
        cors_origins: vec!["*".to_string()],
    };

    TestApp {
        router: create_router(AppState::new(config)),
        video_dir,
        output_dir,
    }
}

impl TestApp {
    pub fn store(&self) -> AnalysisStore {
        AnalysisStore::new(self.output_dir.path())
    }

    pub fn write_video(&self, filename: &str, bytes: &[u8]) {
        std::fs::write(self.video_dir.path().join(filename), bytes).unwrap();
    }

    pub fn frames_dir(&self, video_id: &str) -> std::path::PathBuf {
        self.output_dir.path().join(format!("{video_id}_frames"))
    }
}

pub fn frame(number: u32, filename: &str, score: i64, tags: &[&str]) -> FrameResult {
    FrameResult {
        filename: filename.to_string(),
        timestamp: "00:00:05.000".to_string(),
        frame_number: number,
        nsfw_score: score,
        is_nsfw: score >= 70,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        description: format!("frame {number}"),
        extra: serde_json::Map::new(),
    }
}

pub fn sample_document(frames: Vec<FrameResult>) -> AnalysisDocument {
    let total = frames.len() as u64;
    let nsfw = frames.iter().filter(|f| f.is_nsfw).count() as u64;

    let frames: BTreeMap<String, FrameResult> = frames
        .into_iter()
        .map(|f| (f.filename.clone(), f))
        .collect();

    AnalysisDocument {
        video_info: VideoMeta {
            filename: "clip.mp4".to_string(),
            interval_seconds: 5.0,
            frames_extracted: total,
            frames_analyzed: total,
            analysis_time: Utc::now(),
        },
        analysis_summary: AnalysisSummary {
            total_frames: total,
            nsfw_frames: nsfw,
            nsfw_percentage: if total == 0 {
                0.0
            } else {
                (nsfw as f64 / total as f64) * 100.0
            },
            average_nsfw_score: 12.5,
            tag_distribution: BTreeMap::new(),
            highest_score_frame: HighestScoreFrame::none(),
            analysis_time: Utc::now(),
        },
        frames,
    }
}

pub fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"jpeg").unwrap();
}
