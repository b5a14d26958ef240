//! Frame timestamp tokens.
//!
//! Sampled frames carry their playback offset in the filename as a
//! fixed-width token `HH_MM_SS_mmm`. The token is zero-padded and
//! millisecond-truncated, so lexical order equals playback order.

/// Format a playback offset in seconds as a `HH_MM_SS_mmm` token.
///
/// Hours grow without a day component (a 26-hour offset yields `26_..`).
pub fn format_timestamp_token(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    let millis = ((seconds - total_seconds as f64) * 1000.0) as u64;

    format!("{hours:02}_{minutes:02}_{secs:02}_{millis:03}")
}

/// Derive the display timestamp (`HH:MM:SS.mmm`) from a frame filename.
///
/// Filenames look like `{prefix}_{HH}_{MM}_{SS}_{mmm}.jpg`. Returns `None`
/// when the name does not end in a full token.
pub fn timestamp_from_filename(filename: &str) -> Option<String> {
    let stem = filename.strip_suffix(".jpg").unwrap_or(filename);
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 5 {
        return None;
    }

    let token = &parts[parts.len() - 4..];
    if !token
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    Some(format!(
        "{}:{}:{}.{}",
        token[0], token[1], token[2], token[3]
    ))
}
