/*!
 * Tests for error types
 */

use std::io;
use std::path::PathBuf;
use chaptersplit::errors::{ChapterError, ToolError};

#[test]
fn test_toolError_display_shouldNameTheTool() {
    let err = ToolError::Failed {
        tool: "ffmpeg".to_string(),
        status: "exit status: 1".to_string(),
        stderr: "Invalid argument".to_string(),
    };
    assert_eq!(err.to_string(), "ffmpeg exited with exit status: 1: Invalid argument");

    let err = ToolError::Timeout {
        tool: "ffmpeg".to_string(),
        secs: 30,
    };
    assert_eq!(err.to_string(), "ffmpeg timed out after 30 seconds");
}

#[test]
fn test_chapterError_fromToolError_shouldWrap() {
    let err: ChapterError = ToolError::Tag {
        path: PathBuf::from("01 - Intro.mp3"),
        message: "unsupported".to_string(),
    }
    .into();

    assert!(matches!(err, ChapterError::Tool(ToolError::Tag { .. })));
    assert!(err.to_string().starts_with("External tool error: "));
}

#[test]
fn test_chapterError_fromIoError_shouldWrap() {
    let err: ChapterError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(err, ChapterError::Io(_)));
    assert_eq!(err.to_string(), "File error: gone");
}

#[test]
fn test_outOfRange_display_shouldShowBothTimes() {
    let err = ChapterError::OutOfRange {
        timestamp: 45.0,
        total: 45.0,
    };
    assert_eq!(
        err.to_string(),
        "Timestamp 45.000s is outside the program duration of 45.000s"
    );
}

#[test]
fn test_isRecoverable_shouldSeparateRecordAndDirectoryErrors() {
    assert!(ChapterError::Format("bad".to_string()).is_recoverable());
    assert!(ChapterError::OutOfRange { timestamp: 1.0, total: 0.5 }.is_recoverable());
    assert!(!ChapterError::MissingData("none".to_string()).is_recoverable());
}

#[test]
fn test_chapterError_throughAnyhow_shouldDowncast() {
    let err = anyhow::Error::from(ChapterError::MissingData("no chapters".to_string()))
        .context("Processing /books/Title");

    let inner = err.downcast_ref::<ChapterError>();
    assert!(matches!(inner, Some(ChapterError::MissingData(_))));
}
