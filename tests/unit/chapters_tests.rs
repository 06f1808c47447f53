/*!
 * Tests for the chapter model: timestamps, titles, boundaries and timelines
 */

use anyhow::Result;
use std::path::PathBuf;
use chaptersplit::chapters::{title, ChapterTimeline, FileBoundaryIndex};
use chaptersplit::errors::ChapterError;
use chaptersplit::media::ProbedFile;
use chaptersplit::timestamp;
use crate::common;

fn probed(name: &str, duration: f64, markers: Option<String>) -> ProbedFile {
    ProbedFile {
        path: PathBuf::from(name),
        duration,
        markers,
    }
}

/// Test that well-formed timestamps survive a parse/format round trip
#[test]
fn test_timestamp_roundTrip_shouldReproduceText() {
    for text in ["00:00:00.000", "00:59:59.999", "12:34:56.789", "100:00:00.001", "00:00:30.250"] {
        let secs = timestamp::parse(text).unwrap();
        assert_eq!(timestamp::format(secs).unwrap(), text);
    }
}

/// Test that formatting truncates rather than rounds
#[test]
fn test_timestamp_format_shouldTruncateSubMillisecond() {
    assert_eq!(timestamp::format(1.2349).unwrap(), "00:00:01.234");
    assert!(timestamp::format(-1.0).is_err());
    assert!(matches!(timestamp::parse("1:00:00.000"), Err(ChapterError::Format(_))));
}

/// Test that normalization is idempotent over awkward titles
#[test]
fn test_titleNormalize_shouldBeIdempotent() {
    let samples = [
        "\"Chapter 1 (cont.)\"",
        "*Prologue* -",
        "Chapter 7 (Continued)",
        "X (a) (b)",
        "Disc 2:",
        "  \"*Nested*\"  ",
        "Part One - continued",
    ];
    for raw in samples {
        let once = title::normalize(raw);
        assert_eq!(title::normalize(&once), once, "not idempotent for {:?}", raw);
    }
}

/// Test the documented normalization examples
#[test]
fn test_titleNormalize_withDecoratedTitles_shouldStripDecoration() {
    assert_eq!(title::normalize("Chapter 1 (cont.)"), "Chapter 1");
    assert_eq!(title::normalize("\"Chapter 2\""), "Chapter 2");
    assert_eq!(title::normalize("*Chapter 3*"), "Chapter 3");
    assert_eq!(title::normalize("Chapter 4 continued"), "Chapter 4");
    assert_eq!(title::normalize("Chapter 5 -"), "Chapter 5");
    assert_eq!(title::normalize("Disk 3"), "");
}

/// Test boundaries for files of 10, 20 and 15 seconds given out of order
#[test]
fn test_fileBoundaryIndex_withThreeFiles_shouldResolveHalfOpen() {
    let index = FileBoundaryIndex::build(&[("C.mp3", 15.0), ("A.mp3", 10.0), ("B.mp3", 20.0)]);

    let spans: Vec<(f64, f64)> = index.boundaries().iter().map(|b| (b.start, b.end)).collect();
    assert_eq!(spans, vec![(0.0, 10.0), (10.0, 30.0), (30.0, 45.0)]);

    assert!(index.resolve(25.0).unwrap().file.ends_with("B.mp3"));
    assert!(index.resolve(30.0).unwrap().file.ends_with("C.mp3"));
    assert!(matches!(index.resolve(45.0), Err(ChapterError::OutOfRange { .. })));
    assert!(matches!(index.resolve(-0.5), Err(ChapterError::OutOfRange { .. })));
}

/// Test that contiguous boundaries share their edges
#[test]
fn test_fileBoundaryIndex_shouldBeContiguous() {
    let index = FileBoundaryIndex::build(&[("01.mp3", 1800.5), ("02.mp3", 1799.25), ("03.mp3", 12.0)]);
    for pair in index.boundaries().windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    common::assert_secs_eq(index.total_duration(), 3611.75);
}

/// Test that titles normalizing to nothing never reach the chapter file
#[test]
fn test_embeddedMarkers_withDiscHeaders_shouldNeverWriteEmptyTitles() -> Result<()> {
    let payload = common::marker_payload(&[
        ("Disc 1", "0:00.000"),
        ("Opening Credits", "0:00.000"),
        ("\"Chapter 1\"", "1:30.000"),
        ("Chapter 1 (continued)", "9:00.000"),
    ]);
    let timeline = ChapterTimeline::from_embedded_markers(&[probed("01.mp3", 900.0, Some(payload))])?;

    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("chapters.txt");
    timeline.write_description_file(&path)?;

    let written = std::fs::read_to_string(&path)?;
    assert_eq!(written, "00:00:00.000 Opening Credits\n00:01:30.000 Chapter 1\n");
    Ok(())
}

/// Test that a written chapter file reads back with the same chapters
#[test]
fn test_descriptionFile_writeThenRead_shouldMatch() -> Result<()> {
    let first = common::marker_payload(&[("Intro", "0:00"), ("Chapter One", "5:00")]);
    let second = common::marker_payload(&[("Chapter One", "0:00"), ("Chapter Two", "2:30.5")]);
    let files = [
        probed("Part 1.mp3", 600.0, Some(first)),
        probed("Part 2.mp3", 600.0, Some(second)),
    ];
    let timeline = ChapterTimeline::from_embedded_markers(&files)?;

    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("chapters.txt");
    timeline.write_description_file(&path)?;

    let reread = ChapterTimeline::read_description_file(&path, timeline.total_duration())?;
    assert_eq!(reread.chapters(), timeline.chapters());
    assert_eq!(reread.chapters()[2].start, 750.5);
    assert_eq!(reread.chapters()[2].end, Some(1200.0));
    Ok(())
}

/// Test that a missing chapter file is a directory-level error
#[test]
fn test_readDescriptionFile_withMissingFile_shouldReportMissingData() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = ChapterTimeline::read_description_file(temp_dir.path().join("chapters.txt"), 10.0);
    assert!(matches!(result, Err(ChapterError::MissingData(_))));
    Ok(())
}
