/*!
 * Error types for the chaptersplit application.
 *
 * This module contains the error taxonomy shared by the timeline builder,
 * the segmentation engine and the external tool wrappers, using the
 * thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running an external tool (ffmpeg, ffprobe, tag writer)
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable could not be started at all
    #[error("Failed to execute {tool}: {message}")]
    Spawn {
        /// Name of the tool
        tool: String,
        /// Underlying OS error
        message: String,
    },

    /// The tool ran but exited unsuccessfully
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        /// Name of the tool
        tool: String,
        /// Exit status as reported by the OS
        status: String,
        /// Filtered stderr output
        stderr: String,
    },

    /// The tool did not finish within the configured time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        /// Name of the tool
        tool: String,
        /// Configured timeout
        secs: u64,
    },

    /// The tool finished but its output could not be understood
    #[error("Unexpected {tool} output: {source}")]
    Output {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing audio tags failed
    #[error("Tag error on {path:?}: {message}")]
    Tag {
        path: PathBuf,
        message: String,
    },
}

/// Errors that can occur while building a chapter timeline or splitting audio
#[derive(Error, Debug)]
pub enum ChapterError {
    /// Malformed timestamp, marker record or chapter line
    #[error("Format error: {0}")]
    Format(String),

    /// A timestamp outside the known program duration
    #[error("Timestamp {timestamp:.3}s is outside the program duration of {total:.3}s")]
    OutOfRange {
        /// Offending timestamp in seconds
        timestamp: f64,
        /// Total duration in seconds
        total: f64,
    },

    /// No audio files, no chapter file or no surviving chapters
    #[error("Missing data: {0}")]
    MissingData(String),

    /// An external tool failed
    #[error("External tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChapterError {
    /// Whether this error only affects a single record and should be skipped
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Format(_) | Self::OutOfRange { .. } | Self::Tool(_))
    }
}
