//! One end-to-end run: validate, probe, write metadata, then split or segment.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ielts2go_av::{MediaEngine, ProbeResult};

use crate::artifacts::{ArtifactWriter, RunMetadata};
use crate::error::{Error, Result};
use crate::hls::{self, HlsJob, HlsOutcome};
use crate::output::{OutputConfig, OutputMode};
use crate::plan::{self, ChunkJob};
use crate::preset::QualityPreset;
use crate::transcode::{ChunkMode, ProgressCallback, TranscodeInvoker};

/// Everything a run needs, fixed before it starts.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Chunk length in seconds.
    pub chunk_length: f64,
    pub prefix: String,
    pub quality_preset: QualityPreset,
    pub output: OutputConfig,
    /// Probe and plan only. Nothing is invoked or written.
    pub dry_run: bool,
}

impl RunOptions {
    /// Reject input that can never produce a run.
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(Error::validation("no input file given"));
        }
        if !self.input.is_file() {
            return Err(Error::validation(format!(
                "input file not found: {}",
                self.input.display()
            )));
        }
        if !self.chunk_length.is_finite() || self.chunk_length <= 0.0 {
            return Err(Error::validation(format!(
                "chunk length must be a positive number of seconds, got {}",
                self.chunk_length
            )));
        }
        if self.chunk_length < plan::MIN_CHUNK_LENGTH {
            return Err(Error::validation(format!(
                "chunk length must be at least {}s, got {}",
                plan::MIN_CHUNK_LENGTH,
                self.chunk_length
            )));
        }
        validate_prefix(&self.prefix)?;
        if self.output.mode == OutputMode::Hls && self.output.segment_length == 0 {
            return Err(Error::validation("HLS segment length must be at least 1 second"));
        }
        if self.output.mode != OutputMode::Hls && self.output.extension.is_empty() {
            return Err(Error::validation("output extension cannot be empty"));
        }
        Ok(())
    }
}

/// Characters a prefix may not contain. The prefix becomes part of file
/// names, the segment pattern and the generated player page.
const PREFIX_FORBIDDEN: &[char] = &['"', '\'', '<', '>', '&', '{', '}', '%', '/', '\\'];

fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() {
        return Err(Error::validation("prefix cannot be empty"));
    }
    if let Some(c) = prefix
        .chars()
        .find(|c| c.is_control() || PREFIX_FORBIDDEN.contains(c))
    {
        return Err(Error::validation(format!(
            "prefix {:?} contains unsupported character {:?}",
            prefix, c
        )));
    }
    Ok(())
}

/// What a run did, or would do for a dry run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: OutputMode,
    pub probe: ProbeResult,
    /// Planned chunks (standard mode only).
    pub jobs: Vec<ChunkJob>,
    /// Engine argument lists, in invocation order. For HLS this is the
    /// primary attempt only.
    pub invocations: Vec<Vec<String>>,
    /// Set for HLS runs that were executed.
    pub hls: Option<HlsOutcome>,
    pub dry_run: bool,
    pub elapsed: Duration,
}

impl RunReport {
    /// Files (standard mode) or master playlist (HLS) the run produced.
    pub fn outputs(&self, options: &RunOptions) -> Vec<PathBuf> {
        match self.mode {
            OutputMode::Hls => {
                let writer = ArtifactWriter::new(&options.output_dir, &options.prefix);
                vec![options.output_dir.join(writer.master_playlist_name())]
            }
            _ => self.jobs.iter().map(|j| j.output_path.clone()).collect(),
        }
    }
}

/// Run the whole job against `engine`.
pub async fn run<E: MediaEngine + ?Sized>(
    engine: &E,
    options: &RunOptions,
    progress: Option<ProgressCallback>,
) -> Result<RunReport> {
    let started = Instant::now();
    options.validate()?;

    tracing::info!("Processing {:?} ({} mode)", options.input, options.output.mode);

    if !options.dry_run {
        std::fs::create_dir_all(&options.output_dir)?;
    }

    let probe = engine.probe(&options.input).await.map_err(Error::Probe)?;
    tracing::info!(
        "Duration {:.3}s, resolution {}, video: {}, audio: {}",
        probe.duration,
        probe.resolution,
        probe.has_video,
        probe.has_audio
    );

    let writer = ArtifactWriter::new(&options.output_dir, &options.prefix);
    if !options.dry_run {
        writer.write_metadata(&RunMetadata::new(
            &options.input,
            options.chunk_length,
            options.quality_preset.as_str(),
            &options.output_dir,
        ))?;
    }

    let report = match options.output.mode {
        OutputMode::Copy | OutputMode::Encode => {
            run_standard(engine, options, probe, progress).await?
        }
        OutputMode::Hls => run_segmented(engine, options, &writer, probe).await?,
    };

    Ok(RunReport {
        elapsed: started.elapsed(),
        ..report
    })
}

async fn run_standard<E: MediaEngine + ?Sized>(
    engine: &E,
    options: &RunOptions,
    probe: ProbeResult,
    progress: Option<ProgressCallback>,
) -> Result<RunReport> {
    let jobs = plan::plan(
        probe.duration,
        options.chunk_length,
        &options.output_dir,
        &options.prefix,
        &options.output.extension,
    )?;
    tracing::info!("Planned {} chunk(s) of {}s", jobs.len(), options.chunk_length);

    let mode = match options.output.mode {
        OutputMode::Encode => ChunkMode::Encode(options.output.quality_preset),
        _ => ChunkMode::Copy,
    };
    let mut invoker = TranscodeInvoker::new(engine, &options.input, mode);
    let invocations = jobs.iter().map(|j| invoker.chunk_args(j)).collect();

    if !options.dry_run {
        if let Some(cb) = progress {
            invoker = invoker.with_progress_callback(cb);
        }
        let stats = invoker.run_all(&jobs).await?;
        tracing::debug!(
            "Wrote {} chunk(s) in {:.1}s",
            stats.chunk_count,
            stats.total_time.as_secs_f64()
        );
    }

    Ok(RunReport {
        mode: options.output.mode,
        probe,
        jobs,
        invocations,
        hls: None,
        dry_run: options.dry_run,
        elapsed: Duration::ZERO,
    })
}

async fn run_segmented<E: MediaEngine + ?Sized>(
    engine: &E,
    options: &RunOptions,
    writer: &ArtifactWriter,
    probe: ProbeResult,
) -> Result<RunReport> {
    let job = HlsJob::for_writer(
        &options.input,
        writer,
        options.output.segment_length,
        options.output.playlist_type,
    );
    let invocations = vec![hls::primary_args(&job)];

    let outcome = if options.dry_run {
        None
    } else {
        std::fs::create_dir_all(writer.hls_dir())?;
        let resolution = probe.known_resolution();
        let outcome = hls::run_hls(engine, &job, writer, resolution).await?;
        if outcome.used_fallback {
            tracing::info!("HLS bundle written using fallback settings");
        }
        Some(outcome)
    };

    Ok(RunReport {
        mode: OutputMode::Hls,
        probe,
        jobs: Vec::new(),
        invocations,
        hls: outcome,
        dry_run: options.dry_run,
        elapsed: Duration::ZERO,
    })
}

/// Extension for copy mode: the input's own, or `mp4` when it has none.
pub fn copy_extension(input: &Path) -> String {
    input
        .extension()
        .map(|e| crate::output::normalize_extension(&e.to_string_lossy()))
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "mp4".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn options(input: &Path, out: &Path) -> RunOptions {
        RunOptions {
            input: input.to_path_buf(),
            output_dir: out.to_path_buf(),
            chunk_length: 60.0,
            prefix: "chunk".to_string(),
            quality_preset: QualityPreset::Fast,
            output: OutputConfig::copy("mp4"),
            dry_run: false,
        }
    }

    #[test]
    fn validate_rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir.path().join("nope.mp4"), dir.path());
        assert_matches!(opts.validate(), Err(Error::Validation(msg)) if msg.contains("not found"));

        let opts = options(Path::new(""), dir.path());
        assert_matches!(opts.validate(), Err(Error::Validation(_)));
    }

    #[test]
    fn validate_rejects_bad_chunk_length() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"").unwrap();

        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let opts = RunOptions {
                chunk_length: bad,
                ..options(&input, dir.path())
            };
            assert_matches!(opts.validate(), Err(Error::Validation(_)));
        }
        assert!(options(&input, dir.path()).validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_prefix_and_zero_segments() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"").unwrap();

        let opts = RunOptions {
            prefix: "  ".to_string(),
            ..options(&input, dir.path())
        };
        assert_matches!(opts.validate(), Err(Error::Validation(_)));

        let opts = RunOptions {
            output: OutputConfig::hls(0, None),
            ..options(&input, dir.path())
        };
        assert_matches!(opts.validate(), Err(Error::Validation(_)));
    }

    #[test]
    fn validate_rejects_sub_millisecond_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"").unwrap();

        for tiny in [0.0004, 1e-15] {
            let opts = RunOptions {
                chunk_length: tiny,
                ..options(&input, dir.path())
            };
            assert_matches!(opts.validate(), Err(Error::Validation(msg)) if msg.contains("at least"));
        }
        let opts = RunOptions {
            chunk_length: 0.001,
            ..options(&input, dir.path())
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn validate_rejects_markup_and_pattern_characters_in_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"").unwrap();

        for bad in ["a\"b", "<script>", "x{segment_length}", "part%03d", "a/b", "tab\there"] {
            let opts = RunOptions {
                prefix: bad.to_string(),
                ..options(&input, dir.path())
            };
            assert_matches!(
                opts.validate(),
                Err(Error::Validation(msg)) if msg.contains("unsupported character"),
                "prefix {bad:?}"
            );
        }
        for good in ["lesson", "IELTS Listening 3", "unit-4_part.b"] {
            let opts = RunOptions {
                prefix: good.to_string(),
                ..options(&input, dir.path())
            };
            assert!(opts.validate().is_ok(), "prefix {good:?}");
        }
    }

    #[test]
    fn copy_extension_follows_input() {
        assert_eq!(copy_extension(Path::new("lesson.MOV")), "mov");
        assert_eq!(copy_extension(Path::new("dir/lesson.mkv")), "mkv");
        assert_eq!(copy_extension(Path::new("lesson")), "mp4");
    }
}
