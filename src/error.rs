//! Error taxonomy for a splitting run.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Hint printed when the transcoding engine cannot be found.
pub const INSTALL_HINT: &str = "ffmpeg/ffprobe could not be found. Install ffmpeg \
(https://ffmpeg.org/download.html) and make sure it is on your PATH, or set \
`ffmpeg_path`/`ffprobe_path` under [tools] in the config file.";

/// Everything that can end a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad user input: missing or nonexistent file, non-positive chunk length.
    #[error("{0}")]
    Validation(String),

    /// The engine could not determine duration or streams.
    #[error("failed to probe input: {0}")]
    Probe(#[source] ielts2go_av::Error),

    /// One chunk's invocation failed; remaining chunks were not attempted.
    #[error("chunk {} failed: {message}", chunk_index + 1)]
    Transcode { chunk_index: usize, message: String },

    /// Both the primary and the fallback HLS invocations failed.
    #[error("HLS generation failed: {message}")]
    Hls { message: String },

    /// The engine could not be set up at all.
    #[error(transparent)]
    Engine(#[from] ielts2go_av::Error),

    /// Invalid configuration file contents.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing an artifact or creating a directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing run metadata failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Suggest installing the engine when the failure points at a missing binary.
    pub fn install_hint(&self) -> Option<&'static str> {
        let missing = match self {
            Error::Probe(e) | Error::Engine(e) => e.is_tool_missing(),
            _ => false,
        };
        if missing || suggests_missing_engine(&self.to_string()) {
            Some(INSTALL_HINT)
        } else {
            None
        }
    }
}

/// Whether an error message reads like the engine binary is absent.
pub fn suggests_missing_engine(message: &str) -> bool {
    let lower = message.to_lowercase();
    let names_engine = lower.contains("ffmpeg") || lower.contains("ffprobe");
    let says_missing = lower.contains("not found")
        || lower.contains("no such file")
        || lower.contains("enoent")
        || lower.contains("cannot find");
    names_engine && says_missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcode_error_reports_one_based_chunk() {
        let err = Error::Transcode {
            chunk_index: 2,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "chunk 3 failed: boom");
    }

    #[test]
    fn hint_for_missing_engine() {
        let err = Error::Engine(ielts2go_av::Error::tool_not_found("ffmpeg"));
        assert_eq!(err.install_hint(), Some(INSTALL_HINT));

        let err = Error::Hls {
            message: "tool execution failed: ffmpeg: spawn ENOENT".to_string(),
        };
        assert!(err.install_hint().is_some());
    }

    #[test]
    fn no_hint_for_ordinary_failures() {
        let err = Error::Transcode {
            chunk_index: 0,
            message: "tool execution failed: ffmpeg: Invalid data found".to_string(),
        };
        assert_eq!(err.install_hint(), None);
        assert_eq!(Error::validation("chunk length must be positive").install_hint(), None);
    }

    #[test]
    fn missing_engine_heuristic() {
        assert!(suggests_missing_engine("tool not found: ffprobe"));
        assert!(suggests_missing_engine("ffmpeg: No such file or directory"));
        assert!(!suggests_missing_engine("input file not found: lesson.mp4"));
    }
}
