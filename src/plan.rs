//! Chunk planning: where each chunk starts and where it is written.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Remainders shorter than this (seconds) are float noise, not content.
const END_EPSILON: f64 = 1e-9;

/// Shortest chunk length in seconds. Seek and duration arguments are
/// written with millisecond precision.
pub const MIN_CHUNK_LENGTH: f64 = 0.001;

/// Upper bound on chunks in one plan.
pub const MAX_CHUNKS: usize = 100_000;

/// One planned extraction.
///
/// The engine is asked for `planned_duration` seconds starting at
/// `start_offset`; for the final chunk the source ends sooner and the engine
/// clips at end-of-stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkJob {
    /// Zero-based position in the plan.
    pub index: usize,
    /// Seek position in seconds (`index * chunk_length`).
    pub start_offset: f64,
    /// Requested length in seconds (always the chunk length).
    pub planned_duration: f64,
    /// Destination file.
    pub output_path: PathBuf,
}

impl ChunkJob {
    /// File name for chunk `index`: `{prefix}_{index+1:03}.{extension}`.
    pub fn file_name(prefix: &str, index: usize, extension: &str) -> String {
        format!("{}_{:03}.{}", prefix, index + 1, extension)
    }
}

/// Plan `ceil(duration / chunk_length)` chunks covering the whole source.
///
/// Pure and deterministic: identical inputs give identical plans.
pub fn plan(
    duration: f64,
    chunk_length: f64,
    output_dir: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Vec<ChunkJob>> {
    if !chunk_length.is_finite() || chunk_length <= 0.0 {
        return Err(Error::validation(format!(
            "chunk length must be a positive number of seconds, got {chunk_length}"
        )));
    }
    if chunk_length < MIN_CHUNK_LENGTH {
        return Err(Error::validation(format!(
            "chunk length must be at least {MIN_CHUNK_LENGTH}s, got {chunk_length}"
        )));
    }
    if !duration.is_finite() || duration <= 0.0 {
        return Err(Error::validation(format!(
            "media duration must be positive, got {duration}"
        )));
    }

    let estimate = (duration / chunk_length).ceil();
    if estimate > MAX_CHUNKS as f64 {
        return Err(Error::validation(format!(
            "{duration}s in chunks of {chunk_length}s would need more than {MAX_CHUNKS} chunks"
        )));
    }
    let mut count = estimate as usize;
    // Division rounding can add a chunk that would start at end-of-stream
    if count > 1 && duration - (count - 1) as f64 * chunk_length < END_EPSILON {
        count -= 1;
    }

    Ok((0..count)
        .map(|index| ChunkJob {
            index,
            start_offset: index as f64 * chunk_length,
            planned_duration: chunk_length,
            output_path: output_dir.join(ChunkJob::file_name(prefix, index, extension)),
        })
        .collect())
}
