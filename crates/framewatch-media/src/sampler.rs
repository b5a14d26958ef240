//! Frame sampling at a fixed playback-time cadence.
//!
//! Sampling is index-based: a constant stride in frames is computed from
//! the video fps and the requested interval, and a frame is kept when its
//! zero-based decode index is an exact multiple of the stride. This avoids
//! floating-point cadence drift over long videos and yields exactly one
//! frame per stride window.

use std::path::Path;
use std::process::Stdio;

use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

use framewatch_models::format_timestamp_token;

use crate::error::{MediaError, MediaResult};

/// Temp name prefix for frames before they are renamed to timestamp names.
const STAGING_PREFIX: &str = ".sample_";

/// Compute the sampling stride in frames.
pub fn sampling_stride(fps: f64, interval_seconds: f64) -> u64 {
    let stride = (fps * interval_seconds).round() as i64;
    stride.max(1) as u64
}

/// Sample frames from `video_path` into `output_dir`.
///
/// Each kept frame is written as `{prefix}_{HH_MM_SS_mmm}.jpg`, the token
/// encoding its playback offset (`decode_index / fps`). Returns the number
/// of frames written.
///
/// A missing or un-decodable video yields `Ok(0)`. A decode error
/// mid-stream stops extraction; frames written up to that point are still
/// renamed and counted.
pub async fn sample_frames(
    video_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    interval_seconds: f64,
    prefix: &str,
) -> MediaResult<u64> {
    let video_path = video_path.as_ref();
    let output_dir = output_dir.as_ref();

    if !video_path.exists() {
        warn!("Video file does not exist: {}", video_path.display());
        return Ok(0);
    }

    fs::create_dir_all(output_dir).await?;

    let info = match crate::probe::probe_video(video_path).await {
        Ok(info) => info,
        Err(e) => {
            warn!(
                "Cannot open {} as a video stream: {}",
                video_path.display(),
                e
            );
            return Ok(0);
        }
    };

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let stride = sampling_stride(info.fps, interval_seconds);
    debug!(
        "Sampling {} at fps={:.3} interval={}s stride={}",
        video_path.display(),
        info.fps,
        interval_seconds,
        stride
    );

    // ffmpeg numbers staged frames from 000001; the i-th staged frame is
    // decode index i * stride.
    let staging_pattern = output_dir.join(format!("{STAGING_PREFIX}%06d.jpg"));
    let select_filter = format!("select=not(mod(n\\,{stride}))");

    let output = Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-i"])
        .arg(video_path)
        .args(["-vf", &select_filter, "-vsync", "vfr", "-q:v", "2"])
        .arg(&staging_pattern)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        // Partial success: keep whatever was decoded before the failure.
        warn!(
            "ffmpeg stopped early on {} (exit {:?}): {}",
            video_path.display(),
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let mut staged = Vec::new();
    let mut entries = fs::read_dir(output_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(STAGING_PREFIX) && name.ends_with(".jpg") {
            staged.push(entry.path());
        }
    }
    staged.sort();

    let mut written = 0u64;
    for (index, staged_path) in staged.iter().enumerate() {
        let decode_index = index as u64 * stride;
        let token = format_timestamp_token(decode_index as f64 / info.fps);
        let final_path = output_dir.join(format!("{prefix}_{token}.jpg"));
        fs::rename(staged_path, &final_path).await?;
        written += 1;
    }

    Ok(written)
}
