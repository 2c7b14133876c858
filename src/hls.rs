//! HLS-mode invocation: one segmenting run, with exactly one fallback.
//!
//! ```text
//! Idle -> Primary --ok--> Success
//!            |
//!          error
//!            v
//!         Fallback --ok--> Success
//!            |
//!          error --> Failed
//! ```
//!
//! Each attempt runs to completion before the next transition. On success the
//! master playlist, player page and playback guide are written.

use std::path::{Path, PathBuf};

use ielts2go_av::MediaEngine;

use crate::artifacts::ArtifactWriter;
use crate::error::{Error, Result};
use crate::output::PlaylistType;

/// Segment length used by the fallback attempt, whatever was requested.
pub const FALLBACK_SEGMENT_LENGTH: u32 = 4;

/// One HLS segmenting job.
#[derive(Debug, Clone, PartialEq)]
pub struct HlsJob {
    pub input: PathBuf,
    /// Target segment length in seconds.
    pub segment_length: u32,
    /// `None` omits the playlist-type tag.
    pub playlist_type: Option<PlaylistType>,
    pub variant_playlist: PathBuf,
    /// Segment file pattern with a `%03d` sequence placeholder.
    pub segment_pattern: PathBuf,
}

impl HlsJob {
    /// Job writing into the writer's `hls/` directory.
    pub fn for_writer(
        input: &Path,
        writer: &ArtifactWriter,
        segment_length: u32,
        playlist_type: Option<PlaylistType>,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            segment_length,
            playlist_type,
            variant_playlist: writer.variant_playlist_path(),
            segment_pattern: writer.segment_pattern(),
        }
    }
}

/// Which attempt is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HlsAttempt {
    Primary,
    Fallback,
}

/// How a successful HLS run got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HlsOutcome {
    /// Engine invocations made (1 or 2).
    pub attempts: u8,
    pub used_fallback: bool,
}

/// Fast, low-latency re-encode to H.264/AAC stereo, segmented as requested.
pub fn primary_args(job: &HlsJob) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into(), "-i".into()];
    args.push(job.input.to_string_lossy().to_string());
    args.extend(
        [
            "-c:v", "libx264", "-preset", "veryfast", "-tune", "zerolatency", "-c:a", "aac",
            "-b:a", "128k", "-ac", "2", "-ar", "44100", "-f", "hls", "-hls_time",
        ]
        .map(String::from),
    );
    args.push(job.segment_length.to_string());
    args.extend(["-hls_list_size", "0", "-hls_segment_filename"].map(String::from));
    args.push(job.segment_pattern.to_string_lossy().to_string());
    if let Some(playlist_type) = job.playlist_type {
        args.push("-hls_playlist_type".into());
        args.push(playlist_type.muxer_value().into());
    }
    args.push(job.variant_playlist.to_string_lossy().to_string());
    args
}

/// Reduced, maximally compatible parameter set: fixed preset, codecs and
/// segment length, no playlist-type tag.
pub fn fallback_args(job: &HlsJob) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into(), "-i".into()];
    args.push(job.input.to_string_lossy().to_string());
    args.extend(
        [
            "-c:v", "libx264", "-preset", "ultrafast", "-c:a", "aac", "-f", "hls", "-hls_time",
        ]
        .map(String::from),
    );
    args.push(FALLBACK_SEGMENT_LENGTH.to_string());
    args.extend(["-hls_list_size", "0", "-hls_segment_filename"].map(String::from));
    args.push(job.segment_pattern.to_string_lossy().to_string());
    args.push(job.variant_playlist.to_string_lossy().to_string());
    args
}

/// Run the HLS job and, on success, write the bundle's text artifacts.
///
/// The master playlist advertises `resolution` (or a default when unknown).
/// If both attempts fail nothing is written and [`Error::Hls`] carries the
/// fallback's failure.
pub async fn run_hls<E: MediaEngine + ?Sized>(
    engine: &E,
    job: &HlsJob,
    artifacts: &ArtifactWriter,
    resolution: Option<&str>,
) -> Result<HlsOutcome> {
    tracing::info!(
        "Generating HLS: {:?} -> {:?} ({}s segments)",
        job.input,
        job.variant_playlist,
        job.segment_length
    );

    let outcome = match attempt(engine, HlsAttempt::Primary, &primary_args(job)).await {
        Ok(()) => HlsOutcome {
            attempts: 1,
            used_fallback: false,
        },
        Err(primary_err) => {
            tracing::warn!(
                "HLS generation failed ({}), retrying with basic settings",
                primary_err
            );
            attempt(engine, HlsAttempt::Fallback, &fallback_args(job))
                .await
                .map_err(|e| Error::Hls {
                    message: e.to_string(),
                })?;
            HlsOutcome {
                attempts: 2,
                used_fallback: true,
            }
        }
    };

    let segment_length = if outcome.used_fallback {
        FALLBACK_SEGMENT_LENGTH
    } else {
        job.segment_length
    };
    artifacts.write_hls_bundle(resolution, segment_length)?;

    Ok(outcome)
}

async fn attempt<E: MediaEngine + ?Sized>(
    engine: &E,
    which: HlsAttempt,
    args: &[String],
) -> ielts2go_av::Result<()> {
    tracing::debug!("HLS {:?} attempt: {}", which, args.join(" "));
    engine.invoke(args).await
}
