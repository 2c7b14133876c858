//! ielts2go - Split lesson videos into fixed-length chunks or an HLS bundle
//!
//! This library crate exposes the core functionality for integration testing.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod hls;
pub mod output;
pub mod plan;
pub mod preset;
pub mod prompt;
pub mod run;
pub mod transcode;

pub use error::{Error, Result};
pub use output::{OutputConfig, OutputMode, PlaylistType};
pub use preset::QualityPreset;
pub use run::{run, RunOptions, RunReport};
