//! Video stream probing.
//!
//! The sampler derives its stride from the stream fps, so probing is the
//! first step of every run: a video that ffprobe cannot open is treated
//! as unreadable before any frame is decoded.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Fallback when the container reports no usable frame rate.
const DEFAULT_FPS: f64 = 30.0;

/// What the sampler needs to know about a video stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    /// Duration in seconds, 0.0 when the container omits it
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    /// Frame rate used for stride and timestamp arithmetic
    pub fps: f64,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    format: ReportFormat,
    #[serde(default)]
    streams: Vec<ReportStream>,
}

#[derive(Debug, Deserialize)]
struct ReportFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a video file with ffprobe.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: format!("ffprobe could not read {}", path.display()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let report: ProbeReport = serde_json::from_slice(&output.stdout)?;
    info_from_report(report)
}

/// Fold the ffprobe report into `VideoInfo`.
///
/// A file with no video stream is rejected here; missing duration or
/// dimensions degrade to zero rather than failing the probe.
fn info_from_report(report: ProbeReport) -> MediaResult<VideoInfo> {
    let stream = report
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::InvalidVideo("no video stream found".to_string()))?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .or(stream.r_frame_rate.as_deref())
        .and_then(parse_frame_rate)
        .unwrap_or(DEFAULT_FPS);

    let duration = report
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoInfo {
        duration,
        width: stream.width.unwrap_or(0),
        height: stream.height.unwrap_or(0),
        fps,
    })
}

/// ffprobe reports rates either as a rational ("30000/1001") or a plain
/// decimal.
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}
