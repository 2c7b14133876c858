//! Media file probing.
//!
//! Only the ffprobe CLI backend exists; its JSON report is reduced to the
//! handful of facts the splitter needs.

mod ffprobe;
mod types;

pub use ffprobe::{parse_ffprobe_json, probe_with_ffprobe};
pub use types::*;
