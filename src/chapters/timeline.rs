use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chapters::markers::{self, MarkerEntry};
use crate::errors::ChapterError;
use crate::media::probe::ProbedFile;
use crate::timestamp;

// @module: Global chapter timeline

// @const: One line of a chapter-description file
static DESCRIPTION_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}:\d{2}:\d{2}\.\d{3})\s+(.*)$").unwrap()
});

// @struct: Single chapter of the program
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    // @field: Normalized, non-empty title
    pub title: String,

    // @field: Program offset in seconds
    pub start: f64,

    // @field: Program offset where the chapter stops, once resolved
    pub end: Option<f64>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, start: f64) -> Self {
        Chapter {
            title: title.into(),
            start,
            end: None,
        }
    }

    /// Length in seconds, if the end is resolved
    pub fn duration(&self) -> Option<f64> {
        self.end.map(|end| end - self.start)
    }

    /// Only chapters with a resolved end can be cut
    pub fn is_segmentable(&self) -> bool {
        self.end.is_some_and(|end| end >= self.start)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let start = timestamp::format(self.start).unwrap_or_else(|_| "?".to_string());
        let end = self
            .end
            .and_then(|end| timestamp::format(end).ok())
            .unwrap_or_else(|| "END".to_string());
        write!(f, "{}: {} -> {}", self.title, start, end)
    }
}

/// Insertion-ordered set of markers keyed by title; the first start wins
#[derive(Debug, Default)]
pub struct TitleIndex {
    entries: Vec<MarkerEntry>,
    positions: HashMap<String, usize>,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a marker, returning false if its title was already present
    pub fn insert(&mut self, entry: MarkerEntry) -> bool {
        if self.positions.contains_key(&entry.title) {
            return false;
        }
        self.positions.insert(entry.title.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Start of an already indexed title
    pub fn get(&self, title: &str) -> Option<f64> {
        self.positions.get(title).map(|&idx| self.entries[idx].start)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<MarkerEntry> {
        self.entries
    }
}

/// Ordered chapters of one audiobook
#[derive(Debug, Clone, Default)]
pub struct ChapterTimeline {
    chapters: Vec<Chapter>,
    total_duration: f64,
}

impl ChapterTimeline {
    /// Build the timeline from the markers embedded in each source file
    ///
    /// Files are folded in file-name order. A title seen in an earlier file
    /// (or earlier in the same file) keeps its first timestamp; later
    /// re-announcements of the same chapter are dropped.
    pub fn from_embedded_markers(files: &[ProbedFile]) -> Result<Self, ChapterError> {
        if files.is_empty() {
            return Err(ChapterError::MissingData("No audio files found".to_string()));
        }

        let mut sorted: Vec<&ProbedFile> = files.iter().collect();
        sorted.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

        let mut index = TitleIndex::new();
        let mut cumulative = 0.0;
        for file in sorted {
            if file.markers.is_none() {
                warn!("No chapter markers in {}", file.path.display());
            }
            let parsed = markers::parse_file_markers(cumulative, file.duration, file.markers.as_deref());
            cumulative = parsed.cumulative;

            for entry in parsed.entries {
                let title = entry.title.clone();
                let start = entry.start;
                if !index.insert(entry) {
                    debug!(
                        "Dropping duplicate chapter '{}' at {:.3}s (first seen at {:.3}s)",
                        title,
                        start,
                        index.get(&title).unwrap_or_default()
                    );
                }
            }
        }

        if index.is_empty() {
            return Err(ChapterError::MissingData("No chapters found in audio files".to_string()));
        }

        let mut entries = index.into_entries();
        if !entries.windows(2).all(|w| w[0].start <= w[1].start) {
            debug!("Reordering chapters by start time");
            entries.sort_by(|a, b| a.start.total_cmp(&b.start));
        }

        let chapters = entries
            .into_iter()
            .map(|entry| Chapter::new(entry.title, entry.start))
            .collect();

        let mut timeline = ChapterTimeline {
            chapters,
            total_duration: cumulative,
        };
        timeline.resolve_ends();
        Ok(timeline)
    }

    /// Parse a chapter-description file's contents
    ///
    /// Lines are taken as written: no deduplication and no reordering.
    /// Lines that do not match `HH:MM:SS.mmm <title>` are skipped.
    pub fn from_description(content: &str, total_duration: f64) -> Self {
        let mut chapters = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some(caps) = DESCRIPTION_LINE_REGEX.captures(trimmed) else {
                warn!("Skipping malformed chapter line {}: {}", line_no + 1, trimmed);
                continue;
            };

            let start = match timestamp::parse(&caps[1]) {
                Ok(start) => start,
                Err(e) => {
                    warn!("Skipping chapter line {}: {}", line_no + 1, e);
                    continue;
                }
            };

            let title = caps[2].trim();
            if title.is_empty() {
                warn!("Skipping chapter line {}: empty title", line_no + 1);
                continue;
            }

            chapters.push(Chapter::new(title, start));
        }

        let mut timeline = ChapterTimeline {
            chapters,
            total_duration,
        };
        timeline.resolve_ends();
        timeline
    }

    /// Read and parse a chapter-description file
    pub fn read_description_file<P: AsRef<Path>>(path: P, total_duration: f64) -> Result<Self, ChapterError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ChapterError::MissingData(format!(
                "Chapters file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_description(&content, total_duration))
    }

    // Each end is the next start; the last ends with the program.
    fn resolve_ends(&mut self) {
        let count = self.chapters.len();
        for i in 0..count {
            let candidate = if i + 1 < count {
                self.chapters[i + 1].start
            } else {
                self.total_duration
            };

            let chapter = &mut self.chapters[i];
            if candidate >= chapter.start {
                chapter.end = Some(candidate);
            } else {
                warn!(
                    "Chapter '{}' starts at {:.3}s but would end at {:.3}s; it will not be split",
                    chapter.title, chapter.start, candidate
                );
                chapter.end = None;
            }
        }
    }

    /// Render the chapter-description text, one `<timestamp> <title>` per line
    pub fn to_description(&self) -> Result<String, ChapterError> {
        let mut out = String::new();
        for chapter in &self.chapters {
            out.push_str(&timestamp::format(chapter.start)?);
            out.push(' ');
            out.push_str(&chapter.title);
            out.push('\n');
        }
        Ok(out)
    }

    /// Write the chapter-description file
    pub fn write_description_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ChapterError> {
        let path = path.as_ref();
        let content = self.to_description()?;

        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;

        info!("Wrote {} chapters to {}", self.chapters.len(), path.display());
        Ok(())
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }
}
