//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The video could not be opened or decoded; no document is written.
    #[error("Video cannot be opened or decoded: {0}")]
    VideoUnreadable(PathBuf),

    #[error("Invalid video path: {0}")]
    InvalidVideoPath(PathBuf),

    #[error("Media error: {0}")]
    Media(#[from] framewatch_media::MediaError),

    #[error("Store error: {0}")]
    Store(#[from] framewatch_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
