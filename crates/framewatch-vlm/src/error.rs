//! Classifier client error types.
//!
//! The taxonomy stays distinct on purpose: the pipeline's skip-vs-abort
//! policy and its logs depend on telling a network failure from a non-2xx
//! reply from an unparsable body.

use std::path::PathBuf;

use thiserror::Error;

pub type VlmResult<T> = Result<T, VlmError>;

#[derive(Debug, Error)]
pub enum VlmError {
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Connection failure or timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Classifier returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply carried no parsable JSON object.
    #[error("Malformed classifier response: {0}")]
    Malformed(String),

    #[error("Invalid prompt template: {0}")]
    Template(String),
}
