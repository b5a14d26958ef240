//! Tolerant JSON extraction from model replies.
//!
//! Model output is sometimes a bare JSON object and sometimes a JSON
//! object wrapped in prose or a markdown fence. Extraction is two-stage:
//! a strict whole-body parse first, then a bounded brace-matching scan for
//! the first `{...}` span. The result is tagged so call sites can log
//! which path was taken without treating the fallback as an error.

use serde_json::Value;

/// A JSON object recovered from a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedJson {
    /// The whole body parsed as JSON.
    Strict(Value),
    /// An embedded object was recovered from surrounding text.
    Fallback(Value),
}

impl ExtractedJson {
    pub fn into_value(self) -> Value {
        match self {
            ExtractedJson::Strict(v) | ExtractedJson::Fallback(v) => v,
        }
    }
}

/// Extract a JSON object from `text`, or `None` if no parse succeeds.
pub fn extract_json_object(text: &str) -> Option<ExtractedJson> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Some(ExtractedJson::Strict(value));
        }
    }

    let span = first_object_span(trimmed)?;
    serde_json::from_str::<Value>(span)
        .ok()
        .filter(Value::is_object)
        .map(ExtractedJson::Fallback)
}

/// Locate the first balanced `{...}` span, skipping braces inside JSON
/// string literals.
fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
