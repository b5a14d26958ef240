//! Store error types.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No analysis document exists for the video.
    #[error("No analysis found for video '{0}'")]
    NotFound(String),

    /// A document exists but cannot be deserialized. Kept distinct from
    /// `NotFound` so callers never conflate "never analyzed" with a
    /// damaged store.
    #[error("Analysis document for video '{video_id}' is corrupt: {source}")]
    Corrupt {
        video_id: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(serde_json::Error),
}
