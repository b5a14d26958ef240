//! Client for the external vision-language classifier.
//!
//! This crate provides:
//! - Prompt rendering from an external JSON template
//! - A one-shot HTTP client for an OpenAI-compatible chat endpoint
//! - Tolerant JSON extraction from free-text model replies
//! - The `Classifier` trait the pipeline depends on

pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod types;

pub use client::{Classifier, VlmClient, VlmClientConfig};
pub use error::{VlmError, VlmResult};
pub use extract::{extract_json_object, ExtractedJson};
pub use prompt::PromptTemplate;
pub use types::Classification;
