//! Classifier result types.

use serde::{Deserialize, Serialize};

/// A parsed classifier verdict for one frame.
///
/// `nsfw_score` and `is_nsfw` are both classifier-asserted and are kept
/// as-is even when they disagree; the scoring rubric lives in the prompt
/// template, not here. Unknown fields are carried through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub nsfw_score: i64,
    pub is_nsfw: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_classification_parses() {
        let c: Classification =
            serde_json::from_str(r#"{"nsfw_score": 80, "is_nsfw": true}"#).unwrap();
        assert_eq!(c.nsfw_score, 80);
        assert!(c.tags.is_empty());
        assert!(c.description.is_empty());
    }

    #[test]
    fn test_out_of_range_score_is_not_clamped() {
        let c: Classification =
            serde_json::from_str(r#"{"nsfw_score": 150, "is_nsfw": true}"#).unwrap();
        assert_eq!(c.nsfw_score, 150);
    }
}
