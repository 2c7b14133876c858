//! CLI end-to-end tests
//!
//! Tests for the ielts2go command-line interface. Tests that need a real
//! ffmpeg skip themselves when it is not installed.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the ielts2go binary, run from an empty directory so no
/// stray `ielts2go.toml` is picked up.
#[allow(deprecated)]
fn ielts2go_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ielts2go").unwrap();
    cmd.current_dir(cwd);
    cmd
}

/// Render a short synthetic clip with ffmpeg, or `None` when it is missing.
fn synthetic_clip(dir: &Path, seconds: u32) -> Option<PathBuf> {
    let ffmpeg = ielts2go_av::require_tool("ffmpeg").ok()?;
    ielts2go_av::require_tool("ffprobe").ok()?;

    let path = dir.join("clip.mp4");
    let status = Command::new(ffmpeg)
        .args(["-v", "quiet", "-y", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=duration={}:size=320x240:rate=10", seconds))
        .args(["-pix_fmt", "yuv420p"])
        .arg(&path)
        .status()
        .ok()?;
    status.success().then_some(path)
}

#[test]
fn test_cli_help_flag() {
    let temp = tempdir().unwrap();
    ielts2go_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--hls-segment"));
}

#[test]
fn test_cli_version_flag() {
    let temp = tempdir().unwrap();
    ielts2go_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ielts2go"));
}

#[test]
fn test_cli_missing_input_exits_1() {
    let temp = tempdir().unwrap();
    ielts2go_cmd(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: no input file"));
}

#[test]
fn test_cli_nonexistent_file_exits_1() {
    let temp = tempdir().unwrap();
    ielts2go_cmd(temp.path())
        .args(["/nonexistent/path/lesson.mp4", "--mode", "copy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_non_positive_duration_exits_1() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("lesson.mp4");
    fs::write(&input, b"").unwrap();

    for duration in ["0", "-5"] {
        ielts2go_cmd(temp.path())
            .arg(&input)
            .args(["-d", duration, "--mode", "copy"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("chunk length"));
    }
    assert!(!temp.path().join("chunks").exists());
}

#[test]
fn test_cli_invalid_config_exits_1() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[defaults]\nchunk_length = -1\n").unwrap();

    ielts2go_cmd(temp.path())
        .args(["lesson.mp4", "--config"])
        .arg(&config_file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("chunk_length"));
}

#[test]
fn test_cli_check_tools() {
    let temp = tempdir().unwrap();
    ielts2go_cmd(temp.path())
        .arg("--check-tools")
        .assert()
        .stdout(predicate::str::contains("ffmpeg").and(predicate::str::contains("ffprobe")));
}

#[cfg(unix)]
#[test]
fn test_cli_check_tools_uses_configured_paths() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let mut config = String::from("[tools]\n");
    for name in ["ffmpeg", "ffprobe"] {
        let script = temp.path().join(format!("custom-{}", name));
        fs::write(&script, format!("#!/bin/sh\necho \"{} version 0.0-custom\"\n", name)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        config.push_str(&format!("{}_path = {:?}\n", name, script.display().to_string()));
    }
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, config).unwrap();

    ielts2go_cmd(temp.path())
        .arg("--check-tools")
        .arg("--config")
        .arg(&config_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom-ffmpeg"))
        .stdout(predicate::str::contains("ffprobe version 0.0-custom"));
}

#[test]
fn test_cli_dry_run_shows_plan() {
    let temp = tempdir().unwrap();
    let Some(clip) = synthetic_clip(temp.path(), 5) else {
        eprintln!("Skipping: ffmpeg/ffprobe not installed");
        return;
    };

    ielts2go_cmd(temp.path())
        .arg(&clip)
        .args(["-d", "2", "--mode", "copy", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"))
        .stdout(predicate::str::contains("chunk_003.mp4"));

    assert!(!temp.path().join("chunks").exists());
}

#[test]
fn test_cli_copy_split() {
    let temp = tempdir().unwrap();
    let Some(clip) = synthetic_clip(temp.path(), 5) else {
        eprintln!("Skipping: ffmpeg/ffprobe not installed");
        return;
    };
    let out = temp.path().join("out");

    ielts2go_cmd(temp.path())
        .arg(&clip)
        .args(["-d", "3", "-p", "part", "--mode", "copy", "--no-progress", "-o"])
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("part_001.mp4").exists());
    assert!(out.join("part_002.mp4").exists());
    assert!(out.join("ielts2go_metadata.json").exists());
}

#[test]
fn test_cli_hls_bundle() {
    let temp = tempdir().unwrap();
    let Some(clip) = synthetic_clip(temp.path(), 4) else {
        eprintln!("Skipping: ffmpeg/ffprobe not installed");
        return;
    };
    let out = temp.path().join("out");

    ielts2go_cmd(temp.path())
        .arg(&clip)
        .args(["--hls", "--hls-segment", "2", "-p", "lesson", "-o"])
        .arg(&out)
        .assert()
        .success();

    let master = fs::read_to_string(out.join("lesson_master.m3u8")).unwrap();
    assert!(master.contains("RESOLUTION=320x240"));
    assert!(out.join("hls/lesson.m3u8").exists());
    assert!(out.join("player.html").exists());
    assert!(out.join("PLAYBACK.md").exists());
}
