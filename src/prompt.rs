//! Interactive selection of the processing mode.
//!
//! Used only when neither `--hls` nor `--mode` is given. Reads answers line
//! by line; a blank line or end of input picks the shown default.

use std::io::{self, BufRead, Write};

use crate::output::{
    normalize_extension, OutputConfig, OutputMode, PlaylistType, SUGGESTED_SEGMENT_LENGTHS,
};
use crate::preset::QualityPreset;

/// Invalid answers tolerated before the default is taken.
const MAX_ATTEMPTS: usize = 3;

/// Containers offered for encode mode.
const ENCODE_CONTAINERS: [&str; 4] = ["mp4", "mkv", "mov", "webm"];

/// Values used when the user just presses enter.
#[derive(Debug, Clone)]
pub struct PromptDefaults {
    /// Extension for copy mode (normally the input's own).
    pub copy_extension: String,
    pub quality_preset: QualityPreset,
    pub segment_length: u32,
    pub playlist_type: PlaylistType,
}

/// Ask for the processing mode and its follow-up questions.
pub fn prompt_output_config<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    defaults: &PromptDefaults,
) -> io::Result<OutputConfig> {
    writeln!(output, "Processing mode:")?;
    writeln!(output, "  1) copy   - split without re-encoding (fast, lossless)")?;
    writeln!(output, "  2) encode - re-encode each chunk")?;
    writeln!(output, "  3) hls    - HTTP Live Streaming bundle with player page")?;
    let mode = ask(input, output, "Choose mode [1]: ", OutputMode::Copy, |s| {
        match s.to_lowercase().as_str() {
            "1" | "copy" => Some(OutputMode::Copy),
            "2" | "encode" => Some(OutputMode::Encode),
            "3" | "hls" => Some(OutputMode::Hls),
            _ => None,
        }
    })?;

    match mode {
        OutputMode::Copy => Ok(OutputConfig::copy(defaults.copy_extension.clone())),
        OutputMode::Encode => {
            let extension = prompt_container(input, output)?;
            Ok(OutputConfig::encode(extension, defaults.quality_preset))
        }
        OutputMode::Hls => {
            let suggested: Vec<String> = SUGGESTED_SEGMENT_LENGTHS
                .iter()
                .map(|s| s.to_string())
                .collect();
            let segment_length = ask(
                input,
                output,
                &format!(
                    "Segment length in seconds ({}) [{}]: ",
                    suggested.join("/"),
                    defaults.segment_length
                ),
                defaults.segment_length,
                |s| s.parse::<u32>().ok().filter(|n| *n > 0),
            )?;
            let playlist_type = ask(
                input,
                output,
                &format!("Playlist type (vod/live) [{}]: ", defaults.playlist_type),
                defaults.playlist_type,
                |s| match s.to_lowercase().as_str() {
                    "vod" => Some(PlaylistType::Vod),
                    "live" => Some(PlaylistType::Live),
                    _ => None,
                },
            )?;
            Ok(OutputConfig::hls(segment_length, Some(playlist_type)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerChoice {
    Known(&'static str),
    Custom,
}

fn prompt_container<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    writeln!(output, "Output container:")?;
    for (i, ext) in ENCODE_CONTAINERS.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, ext)?;
    }
    let custom_number = ENCODE_CONTAINERS.len() + 1;
    writeln!(output, "  {}) custom extension", custom_number)?;

    let choice = ask(
        input,
        output,
        "Choose container [1]: ",
        ContainerChoice::Known(ENCODE_CONTAINERS[0]),
        |s| {
            let lower = s.to_lowercase();
            if let Ok(n) = lower.parse::<usize>() {
                return match n {
                    n if n == custom_number => Some(ContainerChoice::Custom),
                    n if (1..custom_number).contains(&n) => {
                        Some(ContainerChoice::Known(ENCODE_CONTAINERS[n - 1]))
                    }
                    _ => None,
                };
            }
            if lower == "custom" {
                return Some(ContainerChoice::Custom);
            }
            ENCODE_CONTAINERS
                .iter()
                .find(|ext| **ext == lower)
                .map(|ext| ContainerChoice::Known(ext))
        },
    )?;

    match choice {
        ContainerChoice::Known(ext) => Ok(ext.to_string()),
        ContainerChoice::Custom => ask(
            input,
            output,
            &format!("Extension (without dot) [{}]: ", ENCODE_CONTAINERS[0]),
            ENCODE_CONTAINERS[0].to_string(),
            |s| {
                let ext = normalize_extension(s);
                let valid = !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric());
                valid.then_some(ext)
            },
        ),
    }
}

/// Print `question`, read one line, and parse it.
///
/// Blank input or end of input returns `default`; invalid answers are
/// re-asked up to [`MAX_ATTEMPTS`] times before the default is used.
fn ask<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: T,
    parse: F,
) -> io::Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Option<T>,
{
    for _ in 0..MAX_ATTEMPTS {
        write!(output, "{}", question)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(default);
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(default);
        }
        match parse(answer) {
            Some(value) => return Ok(value),
            None => writeln!(output, "Invalid choice: {}", answer)?,
        }
    }

    tracing::warn!("No valid answer after {} attempts, using default", MAX_ATTEMPTS);
    Ok(default)
}
