//! Standard-mode invocation sequencing: one engine call per planned chunk.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ielts2go_av::MediaEngine;

use crate::error::{Error, Result};
use crate::plan::ChunkJob;
use crate::preset::QualityPreset;

/// Progress callback: percentage complete and a short step label.
pub type ProgressCallback = Box<dyn Fn(f32, &str) + Send + Sync>;

/// How each chunk is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkMode {
    /// Copy audio and video streams verbatim.
    Copy,
    /// Re-encode video (libx264 at the preset) and audio (AAC).
    Encode(QualityPreset),
}

/// Outcome of a fully successful standard-mode run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeStats {
    /// Wall-clock time spent across all invocations.
    pub total_time: Duration,
    /// Number of chunks written.
    pub chunk_count: usize,
}

/// Runs planned chunks through the engine strictly one at a time.
pub struct TranscodeInvoker<'a, E: MediaEngine + ?Sized> {
    engine: &'a E,
    input: PathBuf,
    mode: ChunkMode,
    progress_callback: Option<ProgressCallback>,
}

impl<'a, E: MediaEngine + ?Sized> TranscodeInvoker<'a, E> {
    pub fn new(engine: &'a E, input: &Path, mode: ChunkMode) -> Self {
        Self {
            engine,
            input: input.to_path_buf(),
            mode,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report_progress(&self, progress: f32, step: &str) {
        if let Some(ref cb) = self.progress_callback {
            cb(progress, step);
        }
        tracing::debug!("[{:.0}%] {}", progress, step);
    }

    /// Engine arguments for one chunk.
    ///
    /// Both modes shift negative timestamps to zero so chunks cut at a
    /// non-keyframe seek point start cleanly.
    pub fn chunk_args(&self, job: &ChunkJob) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-ss".to_string(),
            seconds_arg(job.start_offset),
            "-i".to_string(),
            self.input.to_string_lossy().to_string(),
            "-t".to_string(),
            seconds_arg(job.planned_duration),
        ];

        match self.mode {
            ChunkMode::Copy => {
                args.extend(["-c", "copy"].map(String::from));
            }
            ChunkMode::Encode(preset) => {
                args.extend(["-c:v", "libx264", "-preset"].map(String::from));
                args.push(preset.as_str().to_string());
                args.extend(["-c:a", "aac", "-movflags", "+faststart"].map(String::from));
            }
        }

        args.extend(["-avoid_negative_ts", "make_zero"].map(String::from));
        args.push(job.output_path.to_string_lossy().to_string());
        args
    }

    /// Run every job in order, awaiting each before starting the next.
    ///
    /// The first failure aborts the run; files already written stay on disk.
    pub async fn run_all(&self, jobs: &[ChunkJob]) -> Result<TranscodeStats> {
        let started = Instant::now();
        let total = jobs.len();

        for job in jobs {
            let name = job
                .output_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let progress = (job.index as f32 / total as f32) * 100.0;
            self.report_progress(
                progress,
                &format!("Chunk {}/{}: {}", job.index + 1, total, name),
            );

            let args = self.chunk_args(job);
            self.engine
                .invoke(&args)
                .await
                .map_err(|e| Error::Transcode {
                    chunk_index: job.index,
                    message: e.to_string(),
                })?;

            tracing::debug!(
                "Chunk {}/{} written to {:?}",
                job.index + 1,
                total,
                job.output_path
            );
        }

        self.report_progress(100.0, "All chunks written");

        Ok(TranscodeStats {
            total_time: started.elapsed(),
            chunk_count: total,
        })
    }
}

/// Format seconds for the engine with millisecond precision and no
/// trailing zeros (`60`, `0.5`, `119.999`).
pub fn seconds_arg(seconds: f64) -> String {
    let s = format!("{:.3}", seconds);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
