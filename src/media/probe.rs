use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::errors::{ChapterError, ToolError};
use crate::media::run_tool;

// @module: Audio file probing (duration + embedded marker payload)

// @struct: What the timeline needs to know about one source file
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedFile {
    // @field: Source audio file
    pub path: PathBuf,

    // @field: Intrinsic playback length in seconds
    pub duration: f64,

    // @field: Raw marker payload, None when the file carries no markers
    pub markers: Option<String>,
}

/// Duration and marker queries against a source audio file
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Probe a single file
    async fn probe(&self, path: &Path) -> Result<ProbedFile, ChapterError>;
}

/// `MediaProbe` backed by `ffprobe -show_format` JSON output
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: String,
    marker_tag: String,
    timeout_secs: u64,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>, marker_tag: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            marker_tag: marker_tag.into(),
            timeout_secs,
        }
    }

    /// Extract duration and marker payload from ffprobe JSON
    ///
    /// Tag keys are matched case-insensitively, with or without the ID3
    /// `TXXX:` prefix some muxers add.
    pub fn parse_output(path: &Path, json: &str, marker_tag: &str) -> Result<ProbedFile, ChapterError> {
        let value: Value = serde_json::from_str(json).map_err(|source| ToolError::Output {
            tool: "ffprobe".to_string(),
            source,
        })?;

        let format = value.get("format");
        let duration = format
            .and_then(|f| f.get("duration"))
            .and_then(|d| match d {
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            })
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| {
                ChapterError::Format(format!("ffprobe reported no duration for {}", path.display()))
            })?;

        let wanted = marker_tag.to_lowercase();
        let markers = format
            .and_then(|f| f.get("tags"))
            .and_then(|t| t.as_object())
            .and_then(|tags| {
                tags.iter().find_map(|(key, value)| {
                    let key = key.to_lowercase();
                    let key = key.strip_prefix("txxx:").unwrap_or(&key);
                    if key == wanted {
                        value.as_str().map(|s| s.to_string())
                    } else {
                        None
                    }
                })
            })
            .filter(|payload| !payload.trim().is_empty());

        Ok(ProbedFile {
            path: path.to_path_buf(),
            duration,
            markers,
        })
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> Result<ProbedFile, ChapterError> {
        let output = run_tool(
            &self.ffprobe_path,
            [
                OsStr::new("-v"),
                OsStr::new("quiet"),
                OsStr::new("-print_format"),
                OsStr::new("json"),
                OsStr::new("-show_format"),
                path.as_os_str(),
            ],
            Some(self.timeout_secs),
        )
        .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let probed = Self::parse_output(path, &stdout, &self.marker_tag)?;
        debug!(
            "Probed {}: {:.3}s, markers: {}",
            path.display(),
            probed.duration,
            probed.markers.is_some()
        );
        Ok(probed)
    }
}
