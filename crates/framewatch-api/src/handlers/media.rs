//! Media serving handlers.
//!
//! Video files are served with HTTP range support so browsers can seek
//! without downloading the whole file. Thumbnails fall back from the
//! dedicated thumbnail image to the first sampled frame.

use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tokio::io::AsyncSeekExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use framewatch_store::valid_video_id;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct VideoFileParams {
    pub path: Option<String>,
}

/// Serve a video file with range support.
pub async fn video_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<VideoFileParams>,
) -> ApiResult<Response> {
    let raw = params
        .path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("path parameter is required"))?;

    let path = resolve_video_path(&state, &raw)?;
    serve_file(&path, "video/mp4", &headers).await
}

#[derive(Deserialize)]
pub struct ThumbnailParams {
    pub id: Option<String>,
    pub frame: Option<String>,
}

/// Serve a thumbnail for a video.
///
/// Resolution order: an explicitly requested frame image, the dedicated
/// thumbnail, then the lexically first sampled frame.
pub async fn thumbnail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ThumbnailParams>,
) -> ApiResult<Response> {
    let id = params
        .id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("id parameter is required"))?;

    // Ids come straight from the query string; the store's path helpers
    // join them into the output directory unchecked.
    if !valid_video_id(&id) {
        return Err(ApiError::bad_request("Invalid video id"));
    }

    if let Some(frame) = params.frame.filter(|f| !f.is_empty()) {
        if !safe_filename(&frame) {
            return Err(ApiError::bad_request("Invalid frame name"));
        }
        let path = state.store.frames_dir(&id).join(&frame);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return serve_file(&path, "image/jpeg", &headers).await;
        }
    }

    let dedicated = state.store.thumbnail_path(&id);
    if tokio::fs::try_exists(&dedicated).await.unwrap_or(false) {
        return serve_file(&dedicated, "image/jpeg", &headers).await;
    }

    if let Some(first) = first_frame_image(&state.store.frames_dir(&id)).await {
        return serve_file(&first, "image/jpeg", &headers).await;
    }

    Err(ApiError::not_found("Thumbnail not found"))
}

/// Resolve a requested video path, confining it to the video directory.
fn resolve_video_path(state: &AppState, raw: &str) -> ApiResult<PathBuf> {
    let requested = Path::new(raw);
    if requested
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ApiError::bad_request("Invalid video path"));
    }

    // Listings report paths like "video/clip.mp4"; accept either that
    // form or a bare filename.
    let path = match requested.strip_prefix(&state.config.video_dir) {
        Ok(rest) => state.config.video_dir.join(rest),
        Err(_) => state.config.video_dir.join(requested),
    };
    Ok(path)
}

/// Lexically first `.jpg` in the frames directory, if any.
async fn first_frame_image(frames_dir: &Path) -> Option<PathBuf> {
    let mut entries = tokio::fs::read_dir(frames_dir).await.ok()?;
    let mut best: Option<String> = None;

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.to_lowercase().ends_with(".jpg") || name.starts_with('.') {
            continue;
        }
        if best.as_deref().map(|b| name.as_str() < b).unwrap_or(true) {
            best = Some(name);
        }
    }

    best.map(|name| frames_dir.join(name))
}

fn safe_filename(name: &str) -> bool {
    !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Serve a file, honoring a `Range` request header if present.
async fn serve_file(path: &Path, content_type: &str, headers: &HeaderMap) -> ApiResult<Response> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) if m.is_file() => m,
        _ => return Err(ApiError::not_found("File not found")),
    };
    let file_size = metadata.len();

    let range_header = match headers.get(header::RANGE) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::bad_request("Invalid Range header"))?,
        ),
        None => None,
    };

    let Some(raw_range) = range_header else {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to open file: {e}")))?;
        let stream = ReaderStream::new(file);

        return Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (header::CONTENT_LENGTH, file_size.to_string()),
                (header::ACCEPT_RANGES, "bytes".to_string()),
            ],
            Body::from_stream(stream),
        )
            .into_response());
    };

    let (start, end) = match parse_range_header(raw_range) {
        Some(range) => range,
        None => return Err(ApiError::bad_request("Invalid Range header")),
    };

    // An open-ended range runs to the last byte of the file.
    let end = end.unwrap_or(file_size.saturating_sub(1));

    if start >= file_size || start > end {
        debug!("Unsatisfiable range {}-{} of {}", start, end, file_size);
        return Ok((
            StatusCode::RANGE_NOT_SATISFIABLE,
            [(header::CONTENT_RANGE, format!("bytes */{file_size}"))],
        )
            .into_response());
    }
    let end = end.min(file_size - 1);
    let length = end - start + 1;

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to open file: {e}")))?;
    file.seek(std::io::SeekFrom::Start(start))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to seek: {e}")))?;

    let stream = ReaderStream::new(tokio::io::AsyncReadExt::take(file, length));

    Ok((
        StatusCode::PARTIAL_CONTENT,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, length.to_string()),
            (
                header::CONTENT_RANGE,
                format!("bytes {start}-{end}/{file_size}"),
            ),
            (header::ACCEPT_RANGES, "bytes".to_string()),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Parse a `Range` header of the form `bytes=start-[end]`.
///
/// Returns `None` when the header is malformed. Multi-range and suffix
/// requests (`bytes=-500`) are not supported.
fn parse_range_header(value: &str) -> Option<(u64, Option<u64>)> {
    let spec = value.strip_prefix("bytes=")?;
    if spec.contains(',') {
        return None;
    }

    let (start, end) = spec.split_once('-')?;
    let start: u64 = start.trim().parse().ok()?;
    let end = end.trim();
    let end = if end.is_empty() {
        None
    } else {
        Some(end.parse().ok()?)
    };

    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_closed() {
        assert_eq!(parse_range_header("bytes=200-299"), Some((200, Some(299))));
    }

    #[test]
    fn test_parse_range_open_ended() {
        assert_eq!(parse_range_header("bytes=1024-"), Some((1024, None)));
    }

    #[test]
    fn test_parse_range_malformed() {
        assert_eq!(parse_range_header("bytes=abc-def"), None);
        assert_eq!(parse_range_header("items=0-10"), None);
        assert_eq!(parse_range_header("bytes=0-10,20-30"), None);
        assert_eq!(parse_range_header("bytes=-500"), None);
        assert_eq!(parse_range_header("bytes="), None);
    }

    #[test]
    fn test_safe_filename() {
        assert!(safe_filename("frame_00_00_05_000.jpg"));
        assert!(!safe_filename("../escape.jpg"));
        assert!(!safe_filename("a/b.jpg"));
    }
}
