//! Text artifacts written next to the media output.
//!
//! The master playlist text is exact and load-bearing; the player page and
//! playback guide are static templates.

use std::path::{Path, PathBuf};

use chrono::Utc;
use ielts2go_av::TemplateContext;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name of the metadata file written into every output directory.
pub const METADATA_FILE: &str = "ielts2go_metadata.json";

/// Player page file name.
pub const PLAYER_FILE: &str = "player.html";

/// Playback instructions file name.
pub const PLAYBACK_FILE: &str = "PLAYBACK.md";

/// Directory (under the output directory) holding the variant playlist and segments.
pub const HLS_DIR: &str = "hls";

/// Advertised bandwidth of the single rendition. Not measured.
pub const MASTER_BANDWIDTH: u32 = 2_800_000;

/// Resolution advertised when the probe could not determine one.
pub const FALLBACK_RESOLUTION: &str = "1280x720";

const PLAYER_TEMPLATE: &str = include_str!("templates/player.html");
const PLAYBACK_TEMPLATE: &str = include_str!("templates/PLAYBACK.md");

/// Render the master playlist referencing `hls/{prefix}.m3u8`.
pub fn master_playlist(prefix: &str, resolution: Option<&str>) -> String {
    let resolution = resolution
        .filter(|r| !r.is_empty() && *r != ielts2go_av::UNKNOWN_RESOLUTION)
        .unwrap_or(FALLBACK_RESOLUTION);

    format!(
        "#EXTM3U\n\
         #EXT-X-VERSION:3\n\
         #EXT-X-STREAM-INF:BANDWIDTH={MASTER_BANDWIDTH},RESOLUTION={resolution}\n\
         {HLS_DIR}/{prefix}.m3u8\n"
    )
}

/// Contents of `ielts2go_metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub tool: String,
    pub version: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
    /// Base name of the input file.
    pub source_file: String,
    pub chunk_length: f64,
    pub quality_preset: String,
    pub output_directory: String,
}

impl RunMetadata {
    /// Metadata for a run starting now.
    pub fn new(input: &Path, chunk_length: f64, quality_preset: &str, output_dir: &Path) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
            source_file: input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| input.display().to_string()),
            chunk_length,
            quality_preset: quality_preset.to_string(),
            output_directory: output_dir.display().to_string(),
        }
    }
}

/// Writes artifacts into one output directory for one prefix.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    prefix: String,
}

impl ArtifactWriter {
    pub fn new(output_dir: &Path, prefix: &str) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            prefix: prefix.to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `{prefix}_master.m3u8`
    pub fn master_playlist_name(&self) -> String {
        format!("{}_master.m3u8", self.prefix)
    }

    /// `{output_dir}/hls`
    pub fn hls_dir(&self) -> PathBuf {
        self.output_dir.join(HLS_DIR)
    }

    /// `{output_dir}/hls/{prefix}.m3u8`
    pub fn variant_playlist_path(&self) -> PathBuf {
        self.hls_dir().join(format!("{}.m3u8", self.prefix))
    }

    /// `{output_dir}/hls/{prefix}_%03d.ts`, numbered by the segmenter.
    pub fn segment_pattern(&self) -> PathBuf {
        self.hls_dir().join(format!("{}_%03d.ts", self.prefix))
    }

    fn template_context(&self, segment_length: u32) -> TemplateContext {
        TemplateContext::new()
            .with_var("prefix", &self.prefix)
            .with_var("master_playlist", &self.master_playlist_name())
            .with_var("segment_length", &segment_length.to_string())
    }

    pub fn write_master_playlist(&self, resolution: Option<&str>) -> Result<PathBuf> {
        let path = self.output_dir.join(self.master_playlist_name());
        std::fs::write(&path, master_playlist(&self.prefix, resolution))?;
        tracing::info!("Wrote master playlist {:?}", path);
        Ok(path)
    }

    pub fn write_player_page(&self, segment_length: u32) -> Result<PathBuf> {
        let path = self.output_dir.join(PLAYER_FILE);
        let html = self.template_context(segment_length).substitute(PLAYER_TEMPLATE);
        std::fs::write(&path, html)?;
        tracing::info!("Wrote player page {:?}", path);
        Ok(path)
    }

    pub fn write_playback_guide(&self, segment_length: u32) -> Result<PathBuf> {
        let path = self.output_dir.join(PLAYBACK_FILE);
        let text = self
            .template_context(segment_length)
            .substitute(PLAYBACK_TEMPLATE);
        std::fs::write(&path, text)?;
        Ok(path)
    }

    /// Master playlist, player page and playback guide, in that order.
    pub fn write_hls_bundle(&self, resolution: Option<&str>, segment_length: u32) -> Result<()> {
        self.write_master_playlist(resolution)?;
        self.write_player_page(segment_length)?;
        self.write_playback_guide(segment_length)?;
        Ok(())
    }

    pub fn write_metadata(&self, metadata: &RunMetadata) -> Result<PathBuf> {
        let path = self.output_dir.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(metadata)?;
        std::fs::write(&path, json)?;
        tracing::debug!("Wrote run metadata {:?}", path);
        Ok(path)
    }
}
