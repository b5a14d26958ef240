//! FFmpeg CLI wrapper for the Framewatch pipeline.
//!
//! This crate provides:
//! - Video probing via ffprobe (fps, duration, dimensions)
//! - Frame sampling at a fixed playback-time cadence
//! - Thumbnail generation

pub mod error;
pub mod probe;
pub mod sampler;
pub mod thumbnail;

pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use sampler::sample_frames;
pub use thumbnail::generate_thumbnail;
