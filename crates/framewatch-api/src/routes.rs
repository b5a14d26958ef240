//! API routes.

use axum::middleware;
use axum::routing::get;
use axum::Router;

use crate::error::ApiError;
use crate::handlers::analysis::get_analysis;
use crate::handlers::health::health;
use crate::handlers::media::{thumbnail, video_file};
use crate::handlers::videos::{list_videos, video_list};
use crate::middleware::{cors_layer, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/videos", get(list_videos))
        .route("/video-list", get(video_list))
        .route("/analysis", get(get_analysis))
        .route("/video-file", get(video_file))
        .route("/thumbnail", get(thumbnail));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health))
        .fallback(endpoint_not_found)
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Unrecognized paths answer with a structured error body.
async fn endpoint_not_found() -> ApiError {
    ApiError::not_found("API endpoint not found")
}
