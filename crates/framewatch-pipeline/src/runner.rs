//! Run orchestration.
//!
//! One run is strictly sequential: frames are sampled once, then
//! classified one at a time, then folded into a summary and persisted as
//! a whole document. A frame whose classification fails is recorded as a
//! skip; the run still completes and the document distinguishes frames
//! sampled from frames analyzed.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use tokio::fs;
use tracing::{info, warn};

use framewatch_media::{generate_thumbnail, sample_frames};
use framewatch_models::{timestamp_from_filename, AnalysisDocument, FrameResult, VideoMeta};
use framewatch_store::AnalysisStore;
use framewatch_vlm::Classifier;

use crate::aggregate::summarize;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::progress::{ProgressReporter, RunStage};

/// Result of one completed run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub video_id: String,
    pub frames_extracted: u64,
    pub frames_skipped: u64,
    pub document: AnalysisDocument,
}

/// Analyze one video end to end and persist the resulting document.
pub async fn analyze_video(
    classifier: &dyn Classifier,
    store: &AnalysisStore,
    config: &PipelineConfig,
    video_path: &Path,
    progress: &dyn ProgressReporter,
) -> PipelineResult<AnalysisOutcome> {
    let video_id = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| PipelineError::InvalidVideoPath(video_path.to_path_buf()))?;
    let video_filename = video_path
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| video_id.clone());

    let frames_dir = store.frames_dir(&video_id);

    progress.stage(&RunStage::Sampling);
    let frames_extracted = sample_frames(
        video_path,
        &frames_dir,
        config.interval_seconds,
        &config.frame_prefix,
    )
    .await?;

    if frames_extracted == 0 {
        progress.stage(&RunStage::Failed);
        return Err(PipelineError::VideoUnreadable(video_path.to_path_buf()));
    }

    let mut frame_files = list_frame_files(&frames_dir).await?;
    if let Some(limit) = config.frame_limit {
        frame_files.truncate(limit);
        progress.log(&format!(
            "Frame cap applied: classifying {} of {} sampled frames",
            frame_files.len(),
            frames_extracted
        ));
    }

    let (frames, frames_skipped) =
        classify_frames(classifier, &frames_dir, &frame_files, progress).await;

    progress.stage(&RunStage::Aggregating);
    let summary = summarize(&frames);

    let document = AnalysisDocument::new(
        VideoMeta {
            filename: video_filename,
            interval_seconds: config.interval_seconds,
            frames_extracted,
            frames_analyzed: frames.len() as u64,
            analysis_time: Utc::now(),
        },
        summary,
        frames,
    );

    progress.stage(&RunStage::Persisting);
    store.write(&video_id, &document).await?;

    // Best-effort dedicated thumbnail; the API falls back to the first
    // sampled frame without one.
    let thumb_path = store.thumbnail_path(&video_id);
    if !fs::try_exists(&thumb_path).await.unwrap_or(false) {
        if let Err(e) = generate_thumbnail(video_path, &thumb_path).await {
            warn!("Thumbnail generation failed for '{video_id}': {e}");
        }
    }

    progress.stage(&RunStage::Done);
    info!(
        "Analyzed '{}': {} sampled, {} classified, {} skipped",
        video_id,
        frames_extracted,
        document.frames.len(),
        frames_skipped
    );

    Ok(AnalysisOutcome {
        video_id,
        frames_extracted,
        frames_skipped,
        document,
    })
}

/// Sampled frame images, lexically sorted (timestamp order).
async fn list_frame_files(frames_dir: &Path) -> PipelineResult<Vec<String>> {
    let mut files = Vec::new();
    let mut entries = fs::read_dir(frames_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_lowercase().ends_with(".jpg") && !name.starts_with('.') {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Classify frames one at a time, skipping failures.
async fn classify_frames(
    classifier: &dyn Classifier,
    frames_dir: &Path,
    frame_files: &[String],
    progress: &dyn ProgressReporter,
) -> (BTreeMap<String, FrameResult>, u64) {
    let total = frame_files.len() as u64;
    let mut frames = BTreeMap::new();
    let mut skipped = 0u64;

    for (index, filename) in frame_files.iter().enumerate() {
        let sequence = index as u64 + 1;
        progress.stage(&RunStage::Classifying {
            current: sequence,
            total,
        });

        match classifier.classify(&frames_dir.join(filename)).await {
            Ok(classification) => {
                let result = FrameResult {
                    filename: filename.clone(),
                    timestamp: timestamp_from_filename(filename)
                        .unwrap_or_else(|| filename.clone()),
                    frame_number: sequence as u32,
                    nsfw_score: classification.nsfw_score,
                    is_nsfw: classification.is_nsfw,
                    tags: classification.tags,
                    description: classification.description,
                    extra: classification.extra,
                };
                frames.insert(filename.clone(), result);
            }
            Err(e) => {
                warn!("Classification failed for '{filename}', skipping: {e}");
                skipped += 1;
            }
        }
    }

    (frames, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use framewatch_vlm::{Classification, VlmError, VlmResult};

    use crate::progress::TracingReporter;

    /// Classifier that replays a scripted sequence of outcomes.
    struct ScriptedClassifier {
        script: Mutex<Vec<VlmResult<Classification>>>,
    }

    impl ScriptedClassifier {
        fn new(script: Vec<VlmResult<Classification>>) -> Self {
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl Classifier for ScriptedClassifier {
        async fn classify(&self, _image_path: &Path) -> VlmResult<Classification> {
            self.script.lock().unwrap().remove(0)
        }
    }

    fn verdict(score: i64, nsfw: bool) -> VlmResult<Classification> {
        Ok(Classification {
            nsfw_score: score,
            is_nsfw: nsfw,
            tags: vec!["scene".to_string()],
            description: "a frame".to_string(),
            extra: serde_json::Map::new(),
        })
    }

    async fn frames_fixture(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"jpeg").await.unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_classification_error_is_a_skip_not_an_abort() {
        let dir = frames_fixture(&[
            "frame_00_00_00_000.jpg",
            "frame_00_00_05_000.jpg",
            "frame_00_00_10_000.jpg",
        ])
        .await;
        let files = list_frame_files(dir.path()).await.unwrap();

        let classifier = ScriptedClassifier::new(vec![
            verdict(10, false),
            Err(VlmError::Malformed("no JSON object in reply".to_string())),
            verdict(30, true),
        ]);

        let (frames, skipped) =
            classify_frames(&classifier, dir.path(), &files, &TracingReporter).await;

        assert_eq!(frames.len(), 2);
        assert_eq!(skipped, 1);
        // Sequence numbers follow sampling order even across the skip.
        assert_eq!(frames["frame_00_00_00_000.jpg"].frame_number, 1);
        assert_eq!(frames["frame_00_00_10_000.jpg"].frame_number, 3);
        assert_eq!(
            frames["frame_00_00_10_000.jpg"].timestamp,
            "00:00:10.000"
        );
    }

    #[tokio::test]
    async fn test_all_failures_still_yield_an_empty_mapping() {
        let dir = frames_fixture(&["frame_00_00_00_000.jpg"]).await;
        let files = list_frame_files(dir.path()).await.unwrap();

        let classifier = ScriptedClassifier::new(vec![Err(VlmError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })]);

        let (frames, skipped) =
            classify_frames(&classifier, dir.path(), &files, &TracingReporter).await;

        assert!(frames.is_empty());
        assert_eq!(skipped, 1);
    }

    #[tokio::test]
    async fn test_frame_files_are_sorted_lexically() {
        let dir = frames_fixture(&[
            "frame_00_01_00_000.jpg",
            "frame_00_00_00_000.jpg",
            "notes.txt",
        ])
        .await;

        let files = list_frame_files(dir.path()).await.unwrap();
        assert_eq!(
            files,
            vec!["frame_00_00_00_000.jpg", "frame_00_01_00_000.jpg"]
        );
    }

    #[tokio::test]
    async fn test_unreadable_video_aborts_without_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnalysisStore::new(dir.path().join("out"));
        let config = PipelineConfig {
            output_dir: dir.path().join("out"),
            ..PipelineConfig::default()
        };

        let classifier = ScriptedClassifier::new(vec![]);
        let err = analyze_video(
            &classifier,
            &store,
            &config,
            &dir.path().join("missing.mp4"),
            &TracingReporter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::VideoUnreadable(_)));
        assert!(!store.exists("missing").await);
    }
}
