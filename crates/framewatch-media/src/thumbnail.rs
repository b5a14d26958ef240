//! Thumbnail generation.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Seek offset for the thumbnail frame.
const THUMBNAIL_TIMESTAMP: &str = "00:00:01";

/// Output width; height follows the aspect ratio.
const THUMBNAIL_SCALE_WIDTH: u32 = 480;

/// Generate a thumbnail from a video file.
pub async fn generate_thumbnail(
    video_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> MediaResult<()> {
    let video_path = video_path.as_ref();
    let output_path = output_path.as_ref();

    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let filter = format!("scale={THUMBNAIL_SCALE_WIDTH}:-2");

    let output = Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-ss", THUMBNAIL_TIMESTAMP, "-i"])
        .arg(video_path)
        .args(["-vframes", "1", "-vf", &filter])
        .arg(output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ffmpeg_failed(
            "Thumbnail generation failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
            output.status.code(),
        ));
    }

    Ok(())
}
