use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use crate::errors::ChapterError;
use crate::media::run_tool;

// @module: Lossless audio range extraction

/// Capability to copy a time range of a source file into a new file
/// without re-encoding
#[async_trait]
pub trait Cutter: Send + Sync {
    /// Extract `[start, start + duration)` (seconds, relative to the source file)
    /// into `output`, returning the written path
    async fn cut(&self, source: &Path, start: f64, duration: f64, output: &Path) -> Result<PathBuf, ChapterError>;
}

/// `Cutter` backed by `ffmpeg -acodec copy`
#[derive(Debug, Clone)]
pub struct FfmpegCutter {
    ffmpeg_path: String,
    timeout_secs: Option<u64>,
}

impl FfmpegCutter {
    /// A timeout of 0 waits for ffmpeg indefinitely
    pub fn new(ffmpeg_path: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout_secs: Some(timeout_secs).filter(|secs| *secs > 0),
        }
    }

    /// Build the ffmpeg argument list for one cut
    pub fn build_args(source: &Path, start: f64, duration: f64, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(10);
        args.push("-y".into());                 // Overwrite existing file
        args.push("-i".into());
        args.push(source.as_os_str().to_owned());
        args.push("-ss".into());
        args.push(format!("{:.3}", start.max(0.0)).into());
        args.push("-t".into());
        args.push(format!("{:.3}", duration.max(0.0)).into());
        args.push("-acodec".into());
        args.push("copy".into());               // Stream copy, no re-encode
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl Cutter for FfmpegCutter {
    async fn cut(&self, source: &Path, start: f64, duration: f64, output: &Path) -> Result<PathBuf, ChapterError> {
        let args = Self::build_args(source, start, duration, output);
        run_tool(&self.ffmpeg_path, &args, self.timeout_secs).await?;

        debug!(
            "Cut {:.3}s..{:.3}s of {} into {}",
            start,
            start + duration,
            source.display(),
            output.display()
        );
        Ok(output.to_path_buf())
    }
}
