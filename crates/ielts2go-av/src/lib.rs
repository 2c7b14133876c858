//! # ielts2go-av
//!
//! The external media engine boundary for ielts2go.
//!
//! This crate provides:
//! - **Tool discovery** ([`tools`]) -- locate ffmpeg and ffprobe, honouring
//!   configured paths.
//! - **Command execution** ([`ToolCommand`]) -- async builder with optional
//!   timeout for running external processes.
//! - **The engine seam** ([`MediaEngine`]) -- `probe` and `invoke`, with
//!   [`FfmpegEngine`] as the production implementation.
//! - **Probing** ([`probe`]) -- ffprobe JSON reduced to a [`ProbeResult`].
//! - **Templates** ([`TemplateContext`]) -- `{var}` substitution for static
//!   text artifacts.
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use ielts2go_av::{FfmpegEngine, MediaEngine};
//! use std::path::Path;
//!
//! # async fn example() -> ielts2go_av::Result<()> {
//! let engine = FfmpegEngine::discover(None, None)?;
//! let info = engine.probe(Path::new("/path/to/lesson.mp4")).await?;
//! println!("{}s at {}", info.duration, info.resolution);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod engine;
mod error;
pub mod probe;
pub mod template;
pub mod tools;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use engine::{FfmpegEngine, MediaEngine};
pub use error::{Error, Result};
pub use probe::{ProbeResult, UNKNOWN_RESOLUTION};
pub use template::TemplateContext;
pub use tools::{check_configured_tools, check_tools, get_tool_path, require_tool, ToolInfo};
