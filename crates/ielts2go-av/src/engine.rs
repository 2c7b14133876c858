//! The narrow interface the splitter uses to reach the transcoding engine.
//!
//! Everything above this crate talks to a [`MediaEngine`]: one call to probe
//! an input and one call per transcoding invocation. [`FfmpegEngine`] is the
//! production implementation; tests substitute a scripted fake.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::command::ToolCommand;
use crate::probe::{probe_with_ffprobe, ProbeResult};
use crate::tools::get_tool_path;
use crate::{Error, Result};

/// An external probing and transcoding facility.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Inspect `path` and report duration, codecs and resolution.
    async fn probe(&self, path: &Path) -> Result<ProbeResult>;

    /// Run one transcoding invocation with `args` and wait for it to finish.
    ///
    /// Resolves `Ok(())` only if the engine signalled successful completion.
    async fn invoke(&self, args: &[String]) -> Result<()>;
}

/// [`MediaEngine`] backed by the ffmpeg and ffprobe command-line tools.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    /// Per-invocation limit. `None` waits for ffmpeg to finish.
    timeout: Option<Duration>,
}

impl FfmpegEngine {
    /// Create an engine from already-resolved tool paths.
    pub fn new(ffmpeg: PathBuf, ffprobe: PathBuf) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            timeout: None,
        }
    }

    /// Locate ffmpeg and ffprobe, preferring configured paths that exist.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ToolNotFound`] if either tool is missing.
    pub fn discover(ffmpeg_path: Option<&Path>, ffprobe_path: Option<&Path>) -> Result<Self> {
        let ffmpeg = get_tool_path("ffmpeg", ffmpeg_path)?;
        let ffprobe = get_tool_path("ffprobe", ffprobe_path)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Using ffmpeg at {:?}, ffprobe at {:?}", ffmpeg, ffprobe);

        Ok(Self::new(ffmpeg, ffprobe))
    }

    /// Kill any invocation that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The per-invocation limit, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Path of the ffmpeg binary in use.
    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    /// Path of the ffprobe binary in use.
    pub fn ffprobe(&self) -> &Path {
        &self.ffprobe
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn probe(&self, path: &Path) -> Result<ProbeResult> {
        probe_with_ffprobe(&self.ffprobe, path).await
    }

    async fn invoke(&self, args: &[String]) -> Result<()> {
        if args.is_empty() {
            return Err(Error::InvalidInput("no ffmpeg arguments given".to_string()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("ffmpeg {}", args.join(" "));

        ToolCommand::new(self.ffmpeg.clone())
            .args(args.iter().cloned())
            .timeout_opt(self.timeout)
            .execute()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_prefers_existing_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = dir.path().join("my-ffmpeg");
        let ffprobe = dir.path().join("my-ffprobe");
        std::fs::write(&ffmpeg, b"").unwrap();
        std::fs::write(&ffprobe, b"").unwrap();

        let engine = FfmpegEngine::discover(Some(&ffmpeg), Some(&ffprobe)).unwrap();
        assert_eq!(engine.ffmpeg(), ffmpeg.as_path());
        assert_eq!(engine.ffprobe(), ffprobe.as_path());
    }

    #[tokio::test]
    async fn invoke_with_missing_binary_reports_tool_missing() {
        let engine = FfmpegEngine::new(
            PathBuf::from("nonexistent_ffmpeg_xyz_12345"),
            PathBuf::from("nonexistent_ffprobe_xyz_12345"),
        );
        let err = engine.invoke(&["-version".to_string()]).await.unwrap_err();
        assert!(err.is_tool_missing(), "got {err:?}");
    }

    #[test]
    fn invocations_are_unbounded_unless_configured() {
        let engine = FfmpegEngine::new(PathBuf::from("ffmpeg"), PathBuf::from("ffprobe"));
        assert_eq!(engine.timeout(), None);
        let engine = engine.with_timeout(Duration::from_secs(90));
        assert_eq!(engine.timeout(), Some(Duration::from_secs(90)));
    }

    #[tokio::test]
    async fn invoke_rejects_empty_arguments() {
        let engine = FfmpegEngine::new(PathBuf::from("ffmpeg"), PathBuf::from("ffprobe"));
        let err = engine.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }
}
