//! Classifier HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VlmError, VlmResult};
use crate::extract::{extract_json_object, ExtractedJson};
use crate::prompt::PromptTemplate;
use crate::types::Classification;

/// Capability the pipeline depends on: classify one frame image.
///
/// Keeping this behind a trait lets tests substitute a deterministic fake
/// for the external endpoint.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image_path: &Path) -> VlmResult<Classification>;
}

/// Configuration for the classifier client.
#[derive(Debug, Clone)]
pub struct VlmClientConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Per-call deadline
    pub timeout: Duration,
}

impl Default for VlmClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234".to_string(),
            model: "local-vlm".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl VlmClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("VLM_ENDPOINT").unwrap_or(defaults.base_url),
            model: std::env::var("VLM_MODEL").unwrap_or(defaults.model),
            timeout: Duration::from_secs(
                std::env::var("VLM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Chat-completion request payload.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// Chat-completion response envelope.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// One-shot client for the external vision-language classifier.
///
/// Issues exactly one synchronous call per frame with a bounded timeout;
/// there is no retry and no backoff. Failure handling lives with the
/// caller, which records failed frames as skipped.
pub struct VlmClient {
    http: Client,
    config: VlmClientConfig,
    prompt_text: String,
}

impl VlmClient {
    /// Create a new client with a pre-rendered prompt.
    pub fn new(config: VlmClientConfig, template: &PromptTemplate) -> VlmResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VlmError::Network)?;

        Ok(Self {
            http,
            config,
            prompt_text: template.render(),
        })
    }
}

#[async_trait]
impl Classifier for VlmClient {
    async fn classify(&self, image_path: &Path) -> VlmResult<Classification> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|source| VlmError::ImageRead {
                path: image_path.to_path_buf(),
                source,
            })?;
        let encoded = STANDARD.encode(&bytes);

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: &self.prompt_text,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{encoded}"),
                        },
                    },
                ],
            }],
            temperature: 0.1,
            max_tokens: 500,
        };

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(VlmError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let envelope: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| VlmError::Malformed(format!("invalid response envelope: {e}")))?;
        let content = envelope
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| VlmError::Malformed("response carried no choices".to_string()))?;

        let value = match extract_json_object(content) {
            Some(ExtractedJson::Strict(value)) => value,
            Some(ExtractedJson::Fallback(value)) => {
                debug!(
                    "Recovered JSON object from prose reply for {}",
                    image_path.display()
                );
                value
            }
            None => {
                return Err(VlmError::Malformed(format!(
                    "no JSON object in reply: {}",
                    truncate(content, 200)
                )));
            }
        };

        serde_json::from_value(value)
            .map_err(|e| VlmError::Malformed(format!("reply object missing required fields: {e}")))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
