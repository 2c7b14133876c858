//! FFprobe-based media probing.

use super::types::*;
use crate::command::ToolCommand;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Probing reads container headers only; it should never take long.
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe a media file by running the given ffprobe binary.
pub async fn probe_with_ffprobe(ffprobe: &Path, path: &Path) -> Result<ProbeResult> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let output = ToolCommand::new(ffprobe.to_path_buf())
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path.to_string_lossy())
        .timeout(PROBE_TIMEOUT)
        .execute()
        .await?;

    parse_ffprobe_json(&output.stdout)
}

/// Parse ffprobe's JSON report into a [`ProbeResult`].
///
/// Fails when the report has no container section or no usable duration.
pub fn parse_ffprobe_json(json: &str) -> Result<ProbeResult> {
    let output: FfprobeOutput = serde_json::from_str(json)?;

    let format = output
        .format
        .ok_or_else(|| Error::parse_error("ffprobe", "no container metadata"))?;

    let duration = format
        .duration
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| Error::parse_error("ffprobe", "duration missing or unparseable"))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(Error::parse_error(
            "ffprobe",
            format!("invalid duration: {duration}"),
        ));
    }

    let first_of = |kind: &str| {
        output
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some(kind))
    };

    let video = first_of("video");
    let audio = first_of("audio");

    let resolution = match video.and_then(|v| v.width.zip(v.height)) {
        Some((w, h)) if w > 0 && h > 0 => format!("{w}x{h}"),
        _ => UNKNOWN_RESOLUTION.to_string(),
    };

    Ok(ProbeResult {
        duration,
        has_video: video.is_some(),
        has_audio: audio.is_some(),
        video_codec: video.and_then(|v| v.codec_name.clone()),
        audio_codec: audio.and_then(|a| a.codec_name.clone()),
        resolution,
        bitrate: format.bit_rate.and_then(|b| b.parse().ok()),
        container: format.format_name,
    })
}
