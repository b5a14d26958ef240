//! Prompt template loading and rendering.
//!
//! The template is an external JSON document owned by operators; this
//! crate treats its sections as opaque blobs and only assembles them into
//! the instruction text sent with every frame.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{VlmError, VlmResult};

/// Section key inside the template document.
const TEMPLATE_SECTION: &str = "nsfw_analysis";

/// The prompt template for frame classification.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptTemplate {
    /// Role/instruction preamble
    pub role: String,
    /// Example category labels
    #[serde(default)]
    pub example_categories: Vec<String>,
    /// Scoring rubric, rendered verbatim as JSON
    pub scoring_rules: Value,
    /// Output schema description, rendered verbatim as JSON
    pub output_format: Value,
}

impl PromptTemplate {
    /// Load the template from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> VlmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VlmError::Template(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse the template from a JSON string.
    pub fn from_json(raw: &str) -> VlmResult<Self> {
        let doc: Value = serde_json::from_str(raw)
            .map_err(|e| VlmError::Template(format!("not valid JSON: {e}")))?;
        let section = doc
            .get(TEMPLATE_SECTION)
            .ok_or_else(|| VlmError::Template(format!("missing '{TEMPLATE_SECTION}' section")))?;
        serde_json::from_value(section.clone())
            .map_err(|e| VlmError::Template(format!("invalid '{TEMPLATE_SECTION}' section: {e}")))
    }

    /// Render the full instruction text for one classification request.
    pub fn render(&self) -> String {
        let examples = self
            .example_categories
            .iter()
            .map(|cat| format!("  - {cat}"))
            .collect::<Vec<_>>()
            .join("\n");

        let scoring = serde_json::to_string_pretty(&self.scoring_rules).unwrap_or_default();
        let output = serde_json::to_string_pretty(&self.output_format).unwrap_or_default();

        format!(
            "{}\n\nExample categories for reference:\n{}\n\nScoring Rules:\n{}\n\n\
             Output Format (respond with valid JSON only):\n{}\n\n\
             Analyze the image and provide the response in the specified JSON format.",
            self.role, examples, scoring, output
        )
    }
}
