//! Shared fake engine for integration tests.
//!
//! [`FakeEngine`] stands in for ffmpeg/ffprobe: it reports a fixed probe
//! result, records every invocation, writes the output file named by the last
//! argument, and can be told to fail specific invocations.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use ielts2go_av::{Error, MediaEngine, ProbeResult, Result};

pub struct FakeEngine {
    probe: std::result::Result<ProbeResult, String>,
    fail_calls: HashSet<usize>,
    calls: Mutex<Vec<Vec<String>>>,
    effective: Mutex<Vec<f64>>,
}

impl FakeEngine {
    /// Engine for an input of `duration` seconds at `resolution`.
    pub fn new(duration: f64, resolution: &str) -> Self {
        Self {
            probe: Ok(ProbeResult {
                duration,
                has_video: true,
                has_audio: true,
                video_codec: Some("h264".to_string()),
                audio_codec: Some("aac".to_string()),
                resolution: resolution.to_string(),
                bitrate: Some(2_000_000),
                container: Some("mov,mp4,m4a,3gp,3g2,mj2".to_string()),
            }),
            fail_calls: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            effective: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose probe always fails with `message`.
    pub fn failing_probe(message: &str) -> Self {
        Self {
            probe: Err(message.to_string()),
            ..Self::new(1.0, "Unknown")
        }
    }

    /// Fail the invocation with this zero-based call number.
    pub fn fail_call(mut self, call: usize) -> Self {
        self.fail_calls.insert(call);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Seconds each successful chunk invocation actually produced, clipped at
    /// the end of the input like the real engine does.
    pub fn effective_durations(&self) -> Vec<f64> {
        self.effective.lock().unwrap().clone()
    }

    fn duration(&self) -> f64 {
        self.probe.as_ref().map(|p| p.duration).unwrap_or(0.0)
    }
}

fn value_after(args: &[String], flag: &str) -> Option<f64> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn probe(&self, path: &Path) -> Result<ProbeResult> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        match &self.probe {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(Error::parse_error("ffprobe", message.clone())),
        }
    }

    async fn invoke(&self, args: &[String]) -> Result<()> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(args.to_vec());
            calls.len() - 1
        };

        if self.fail_calls.contains(&call) {
            return Err(Error::tool_failed(
                "ffmpeg",
                format!("Conversion failed! (call {})", call),
            ));
        }

        if let (Some(start), Some(length)) = (value_after(args, "-ss"), value_after(args, "-t")) {
            let clipped = length.min(self.duration() - start);
            self.effective.lock().unwrap().push(clipped);
        }

        let output = PathBuf::from(args.last().expect("engine called without an output"));
        std::fs::write(&output, b"fake media")?;
        Ok(())
    }
}

/// Create an empty input file named `name` in `dir`.
pub fn touch_input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"not really a video").unwrap();
    path
}
