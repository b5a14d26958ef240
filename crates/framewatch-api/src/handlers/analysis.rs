//! Analysis retrieval handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use framewatch_models::AnalysisDocument;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalysisParams {
    pub video: Option<String>,
}

/// Return the full analysis document for a video, augmented with a
/// `chart_data` array ordered by frame number for plotting.
pub async fn get_analysis(
    State(state): State<AppState>,
    Query(params): Query<AnalysisParams>,
) -> ApiResult<Json<Value>> {
    let video_id = params
        .video
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("video parameter is required"))?;

    let document = state.store.read(&video_id).await?;
    let chart_data = chart_data(&document);

    let mut body = serde_json::to_value(&document)
        .map_err(|e| ApiError::internal(format!("Failed to serialize analysis: {e}")))?;
    if let Value::Object(map) = &mut body {
        map.insert("chart_data".to_string(), Value::Array(chart_data));
    }

    Ok(Json(body))
}

/// Per-frame points sorted by frame number. Document frames are keyed
/// by filename, which matches frame order for a single sampling run,
/// but the chart contract is explicit about numeric order.
fn chart_data(document: &AnalysisDocument) -> Vec<Value> {
    let mut frames: Vec<_> = document.frames.values().collect();
    frames.sort_by_key(|f| f.frame_number);

    frames
        .into_iter()
        .map(|f| {
            json!({
                "timestamp": f.timestamp,
                "frame_number": f.frame_number,
                "nsfw_score": f.nsfw_score,
                "is_nsfw": f.is_nsfw,
                "tags": f.tags,
                "filename": f.filename,
                "description": f.description,
            })
        })
        .collect()
}
