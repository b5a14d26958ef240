//! Analysis document store operations.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use framewatch_models::AnalysisDocument;

use crate::error::{StoreError, StoreResult};

/// Filesystem store for analysis documents.
///
/// Layout, per video stem, under the output directory:
/// `{id}_analysis.json`, `{id}_frames/` and optionally `{id}_thumb.jpg`.
#[derive(Debug, Clone)]
pub struct AnalysisStore {
    output_dir: PathBuf,
}

impl AnalysisStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the analysis document for a video.
    pub fn analysis_path(&self, video_id: &str) -> PathBuf {
        self.output_dir.join(format!("{video_id}_analysis.json"))
    }

    /// Directory holding the sampled frame images for a video.
    pub fn frames_dir(&self, video_id: &str) -> PathBuf {
        self.output_dir.join(format!("{video_id}_frames"))
    }

    /// Path of the dedicated thumbnail for a video.
    pub fn thumbnail_path(&self, video_id: &str) -> PathBuf {
        self.output_dir.join(format!("{video_id}_thumb.jpg"))
    }

    /// Whether an analysis document exists for the video.
    pub async fn exists(&self, video_id: &str) -> bool {
        valid_video_id(video_id) && fs::try_exists(self.analysis_path(video_id)).await.unwrap_or(false)
    }

    /// Write the document for a video, replacing any previous one.
    ///
    /// The document is serialized to a sibling temp file and renamed into
    /// place, so concurrent readers see either the old or the new complete
    /// file, never a partial one.
    pub async fn write(&self, video_id: &str, document: &AnalysisDocument) -> StoreResult<()> {
        fs::create_dir_all(&self.output_dir).await?;

        let json =
            serde_json::to_vec_pretty(document).map_err(StoreError::Serialize)?;

        let final_path = self.analysis_path(video_id);
        let tmp_path = final_path.with_extension("json.tmp");

        fs::write(&tmp_path, &json).await?;
        fs::rename(&tmp_path, &final_path).await?;

        debug!(
            "Wrote analysis document for '{}' ({} frames)",
            video_id,
            document.frames.len()
        );
        Ok(())
    }

    /// Read the document for a video.
    pub async fn read(&self, video_id: &str) -> StoreResult<AnalysisDocument> {
        if !valid_video_id(video_id) {
            return Err(StoreError::NotFound(video_id.to_string()));
        }

        let path = self.analysis_path(video_id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(video_id.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            video_id: video_id.to_string(),
            source,
        })
    }
}

/// Video ids are file stems; anything that could traverse out of the
/// output directory can never have been written by the pipeline. Public
/// because the API layer builds frame and thumbnail paths from ids taken
/// straight out of query strings.
pub fn valid_video_id(video_id: &str) -> bool {
    !video_id.is_empty()
        && !video_id.contains('/')
        && !video_id.contains('\\')
        && !video_id.contains("..")
}
