//! Probe result types.

use serde::{Deserialize, Serialize};

/// Resolution reported when the input has no video stream.
pub const UNKNOWN_RESOLUTION: &str = "Unknown";

/// What the engine reported about an input file.
///
/// Produced once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Total duration in seconds. Always finite and positive.
    pub duration: f64,
    /// Whether any video stream is present.
    pub has_video: bool,
    /// Whether any audio stream is present.
    pub has_audio: bool,
    /// Codec of the first video stream.
    pub video_codec: Option<String>,
    /// Codec of the first audio stream.
    pub audio_codec: Option<String>,
    /// `"WxH"` of the first video stream, or [`UNKNOWN_RESOLUTION`].
    pub resolution: String,
    /// Container-level bitrate in bits per second.
    pub bitrate: Option<u64>,
    /// Container format name as reported by the engine (e.g. "mov,mp4,m4a").
    pub container: Option<String>,
}

impl ProbeResult {
    /// The resolution, or `None` when the probe could not determine one.
    pub fn known_resolution(&self) -> Option<&str> {
        if self.resolution.is_empty() || self.resolution == UNKNOWN_RESOLUTION {
            None
        } else {
            Some(&self.resolution)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(resolution: &str) -> ProbeResult {
        ProbeResult {
            duration: 12.5,
            has_video: resolution != UNKNOWN_RESOLUTION,
            has_audio: true,
            video_codec: None,
            audio_codec: Some("aac".to_string()),
            resolution: resolution.to_string(),
            bitrate: None,
            container: None,
        }
    }

    #[test]
    fn known_resolution_filters_unknown() {
        assert_eq!(sample("1920x1080").known_resolution(), Some("1920x1080"));
        assert_eq!(sample(UNKNOWN_RESOLUTION).known_resolution(), None);
        assert_eq!(sample("").known_resolution(), None);
    }
}
