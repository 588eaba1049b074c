//! ffprobe invocation

use crate::aspect::{classify, AspectRatio};
use anyhow::anyhow;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The probe could not be run, exited non-zero or printed something that is not
    /// the expected JSON.
    #[error("ffprobe failed: {0}")]
    ExternalTool(String),

    #[error("ffprobe reported no media streams")]
    NoStreams,
}

/// The part of `ffprobe -show_streams -print_format json` output we read.
#[derive(Debug, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
pub struct ProbeStream {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub codec_type: Option<String>,
}

/// Parse probe stdout and return the first stream's dimensions.
pub fn parse_probe_output(stdout: &[u8]) -> Result<(i64, i64), ProbeError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProbeError::ExternalTool(format!("unparseable output: {}", e)))?;

    let stream = output.streams.first().ok_or(ProbeError::NoStreams)?;

    match (stream.width, stream.height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(ProbeError::ExternalTool(format!(
            "first stream ({}) has no dimensions",
            stream.codec_type.as_deref().unwrap_or("unknown")
        ))),
    }
}

/// Validate that a tool path doesn't contain shell metacharacters or traversal
fn validate_tool_path(path: &str) -> anyhow::Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Invalid ffprobe path: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("ffprobe path contains directory traversal: {}", path));
    }

    Ok(())
}

/// Runs ffprobe against local files.
#[derive(Debug, Clone)]
pub struct VideoProber {
    ffprobe_path: String,
}

impl VideoProber {
    pub fn new(ffprobe_path: impl Into<String>) -> anyhow::Result<Self> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }

    /// Classify the aspect ratio of the first stream in `file_path`.
    ///
    /// Waits for ffprobe to exit; no timeout and no retries. stderr goes straight to the
    /// server's stderr.
    #[tracing::instrument(skip(self), fields(process.executable.name = "ffprobe"))]
    pub async fn classify_aspect(&self, file_path: &Path) -> Result<AspectRatio, ProbeError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(file_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| ProbeError::ExternalTool(format!("failed to execute: {}", e)))?;

        if !output.status.success() {
            tracing::warn!(
                status = %output.status,
                path = %file_path.display(),
                "ffprobe exited with failure"
            );
            return Err(ProbeError::ExternalTool(format!(
                "exited with {}",
                output.status
            )));
        }

        let (width, height) = parse_probe_output(&output.stdout)?;
        let aspect = classify(width, height);

        tracing::info!(
            path = %file_path.display(),
            width,
            height,
            aspect = %aspect,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video aspect ratio classified"
        );

        Ok(aspect)
    }
}
