use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::{PlaylistType, DEFAULT_SEGMENT_LENGTH};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub hls: HlsConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Defaults for flags not given on the command line.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Chunk length in seconds
    #[serde(default = "default_chunk_length")]
    pub chunk_length: f64,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Encoder preset name; unknown names fall back to "fast" at run time
    #[serde(default = "default_quality_preset")]
    pub quality_preset: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("chunks")
}
fn default_chunk_length() -> f64 {
    60.0
}
fn default_prefix() -> String {
    "chunk".to_string()
}
fn default_quality_preset() -> String {
    "fast".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            chunk_length: default_chunk_length(),
            prefix: default_prefix(),
            quality_preset: default_quality_preset(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HlsConfig {
    #[serde(default = "default_segment_length")]
    pub segment_length: u32,

    #[serde(default)]
    pub playlist_type: PlaylistType,
}

fn default_segment_length() -> u32 {
    DEFAULT_SEGMENT_LENGTH
}

impl Default for HlsConfig {
    fn default() -> Self {
        Self {
            segment_length: default_segment_length(),
            playlist_type: PlaylistType::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Maximum seconds a single engine invocation may run. Unset means no
    /// limit: a long HLS encode is one invocation.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}
