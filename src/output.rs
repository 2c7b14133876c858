//! What a run produces and how.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::preset::QualityPreset;

/// Default HLS segment length in seconds.
pub const DEFAULT_SEGMENT_LENGTH: u32 = 4;

/// Segment lengths offered by the interactive prompt. Others are accepted.
pub const SUGGESTED_SEGMENT_LENGTHS: [u32; 4] = [2, 4, 6, 10];

/// Processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Stream-copy chunks without re-encoding
    #[default]
    Copy,
    /// Re-encode chunks with libx264/AAC
    Encode,
    /// Produce an HLS playlist, segments and a player page
    Hls,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputMode::Copy => "copy",
            OutputMode::Encode => "encode",
            OutputMode::Hls => "hls",
        })
    }
}

/// HLS playlist type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistType {
    /// Complete, immutable playlist
    #[default]
    Vod,
    /// Playlist that may still grow
    Live,
}

impl PlaylistType {
    /// Value for the segmenter's `-hls_playlist_type` flag.
    ///
    /// The segmenter only knows `vod` and `event`; a growing playlist is `event`.
    pub fn muxer_value(&self) -> &'static str {
        match self {
            PlaylistType::Vod => "vod",
            PlaylistType::Live => "event",
        }
    }
}

impl fmt::Display for PlaylistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaylistType::Vod => "vod",
            PlaylistType::Live => "live",
        })
    }
}

/// Output selection, fixed before planning and immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub mode: OutputMode,
    /// Chunk file extension without the dot. Unused in HLS mode.
    pub extension: String,
    /// Encode mode only.
    pub quality_preset: QualityPreset,
    /// HLS mode only.
    pub segment_length: u32,
    /// HLS mode only. `None` omits the playlist-type tag.
    pub playlist_type: Option<PlaylistType>,
}

impl OutputConfig {
    /// Stream-copy output with the given extension.
    pub fn copy(extension: impl Into<String>) -> Self {
        Self {
            mode: OutputMode::Copy,
            extension: extension.into(),
            quality_preset: QualityPreset::default(),
            segment_length: DEFAULT_SEGMENT_LENGTH,
            playlist_type: Some(PlaylistType::Vod),
        }
    }

    /// Re-encoded output with the given extension and preset.
    pub fn encode(extension: impl Into<String>, preset: QualityPreset) -> Self {
        Self {
            mode: OutputMode::Encode,
            quality_preset: preset,
            ..Self::copy(extension)
        }
    }

    /// HLS output.
    pub fn hls(segment_length: u32, playlist_type: Option<PlaylistType>) -> Self {
        Self {
            mode: OutputMode::Hls,
            extension: "ts".to_string(),
            quality_preset: QualityPreset::default(),
            segment_length,
            playlist_type,
        }
    }
}

/// Normalize a user-supplied extension: trims whitespace and a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
