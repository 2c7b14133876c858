use clap::Parser;
use ielts2go::{OutputMode, PlaylistType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ielts2go")]
#[command(
    author,
    version,
    about = "Split a lesson video into fixed-length chunks or an HLS bundle"
)]
pub struct Cli {
    /// Input video file
    pub input: Option<PathBuf>,

    /// Output directory [default: chunks]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Chunk length in seconds [default: 60]
    #[arg(short, long, allow_negative_numbers = true)]
    pub duration: Option<f64>,

    /// Chunk file name prefix [default: chunk]
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Encoder preset (ultrafast .. veryslow) [default: fast]
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Processing mode; prompts when neither this nor --hls is given
    #[arg(long, value_enum)]
    pub mode: Option<OutputMode>,

    /// Chunk file extension (copy mode defaults to the input's)
    #[arg(long)]
    pub extension: Option<String>,

    /// Produce an HLS bundle instead of chunks
    #[arg(long)]
    pub hls: bool,

    /// HLS segment length in seconds [default: 4]
    #[arg(long)]
    pub hls_segment: Option<u32>,

    /// HLS playlist type [default: vod]
    #[arg(long, value_enum)]
    pub hls_type: Option<PlaylistType>,

    /// Do not show per-chunk progress
    #[arg(long)]
    pub no_progress: bool,

    /// Probe and print the planned invocations without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Report whether ffmpeg and ffprobe are available, then exit
    #[arg(long)]
    pub check_tools: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Mode fixed by flags, if any. `--hls` wins over `--mode`.
    pub fn requested_mode(&self) -> Option<OutputMode> {
        if self.hls {
            Some(OutputMode::Hls)
        } else {
            self.mode
        }
    }

    /// Whether to draw the progress bar for a run in `mode`.
    ///
    /// Verbose runs log each chunk on stderr instead, so the bar is hidden.
    pub fn shows_progress(&self, mode: OutputMode) -> bool {
        !self.no_progress && !self.verbose && !self.dry_run && mode != OutputMode::Hls
    }
}
