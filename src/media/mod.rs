/*!
 * External media collaborators.
 *
 * - `probe`: duration and embedded marker queries (ffprobe)
 * - `cutter`: lossless range extraction (ffmpeg stream copy)
 * - `tagger`: title/track tag rewriting (lofty)
 *
 * Each collaborator sits behind a trait so the segmentation engine can be
 * driven by fakes in tests.
 */

pub mod cutter;
pub mod probe;
pub mod tagger;

use std::ffi::OsStr;
use std::process::Output;
use std::time::Duration;

use log::debug;
use tokio::process::Command;

use crate::errors::ToolError;

pub use cutter::{Cutter, FfmpegCutter};
pub use probe::{FfprobeProbe, MediaProbe, ProbedFile};
pub use tagger::{LoftyTagger, Tagger};

/// Run an external tool to completion, optionally bounded by a timeout
///
/// A non-zero exit status is turned into `ToolError::Failed` carrying the
/// filtered stderr.
pub async fn run_tool<I, S>(program: &str, args: I, timeout_secs: Option<u64>) -> Result<Output, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    debug!("Running {:?}", command.as_std());

    let future = command.output();
    let result = match timeout_secs.filter(|secs| *secs > 0) {
        Some(secs) => {
            tokio::select! {
                result = future => result,
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    return Err(ToolError::Timeout { tool: program.to_string(), secs });
                }
            }
        }
        None => future.await,
    };

    let output = result.map_err(|e| ToolError::Spawn {
        tool: program.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::Failed {
            tool: program.to_string(),
            status: output.status.to_string(),
            stderr: filter_tool_stderr(&stderr),
        });
    }

    Ok(output)
}

/// Filter ffmpeg-family stderr to only the meaningful error lines, stripping
/// the version banner, build configuration, and stream metadata noise.
pub fn filter_tool_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        stderr.trim().lines().last().unwrap_or("").to_string()
    } else {
        meaningful.join("; ")
    }
}
