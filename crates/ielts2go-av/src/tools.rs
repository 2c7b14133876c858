//! External tool detection.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check a tool at its configured path, falling back to `PATH` lookup the
/// same way the engine resolves it.
///
/// ffmpeg and ffprobe both answer `-version` rather than `--version`.
pub fn check_configured_tool(
    name: &str,
    config_path: Option<&Path>,
    version_arg: &str,
) -> ToolInfo {
    let missing = ToolInfo {
        name: name.to_string(),
        available: false,
        version: None,
        path: None,
    };

    let Ok(path) = get_tool_path(name, config_path) else {
        return missing;
    };

    match Command::new(&path).arg(version_arg).output() {
        Ok(output) if output.status.success() => ToolInfo {
            name: name.to_string(),
            available: true,
            version: String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string()),
            path: Some(path),
        },
        _ => missing,
    }
}

/// Check the tools the splitter shells out to, on `PATH`.
pub fn check_tools() -> Vec<ToolInfo> {
    check_configured_tools(None, None)
}

/// Check ffmpeg and ffprobe, honouring configured paths.
pub fn check_configured_tools(
    ffmpeg_path: Option<&Path>,
    ffprobe_path: Option<&Path>,
) -> Vec<ToolInfo> {
    vec![
        check_configured_tool("ffmpeg", ffmpeg_path, "-version"),
        check_configured_tool("ffprobe", ffprobe_path, "-version"),
    ]
}

/// Require that a tool is available on `PATH`, returning its path.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over `PATH` lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Configured {} path {:?} does not exist, searching PATH",
            name,
            path
        );
    }

    require_tool(name)
}
