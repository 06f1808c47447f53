use std::path::{Path, PathBuf};

use crate::errors::ChapterError;

// @module: Source-file boundaries within the concatenated program

// @struct: Half-open interval [start, end) occupied by one source file
#[derive(Debug, Clone, PartialEq)]
pub struct FileBoundary {
    // @field: Source audio file
    pub file: PathBuf,

    // @field: Program offset where the file begins
    pub start: f64,

    // @field: Program offset where the next file begins
    pub end: f64,
}

impl FileBoundary {
    /// Whether a program timestamp falls inside this file
    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Length of the file in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Contiguous boundaries for an ordered set of source files
#[derive(Debug, Clone, Default)]
pub struct FileBoundaryIndex {
    boundaries: Vec<FileBoundary>,
}

impl FileBoundaryIndex {
    /// Build the index from `(file, duration)` pairs
    ///
    /// Files are ordered by file name before the prefix sum, so the result does
    /// not depend on the order the caller discovered them in.
    pub fn build<P: AsRef<Path>>(files: &[(P, f64)]) -> Self {
        let mut sorted: Vec<(&Path, f64)> = files.iter().map(|(p, d)| (p.as_ref(), *d)).collect();
        sorted.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));

        let mut boundaries = Vec::with_capacity(sorted.len());
        let mut current = 0.0;
        for (file, duration) in sorted {
            let duration = duration.max(0.0);
            boundaries.push(FileBoundary {
                file: file.to_path_buf(),
                start: current,
                end: current + duration,
            });
            current += duration;
        }

        Self { boundaries }
    }

    /// All boundaries in program order
    pub fn boundaries(&self) -> &[FileBoundary] {
        &self.boundaries
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Total program duration
    pub fn total_duration(&self) -> f64 {
        self.boundaries.last().map_or(0.0, |b| b.end)
    }

    /// Find the file owning a program timestamp
    ///
    /// A timestamp equal to a boundary belongs to the later file.
    pub fn resolve(&self, timestamp: f64) -> Result<&FileBoundary, ChapterError> {
        let total = self.total_duration();
        if !(timestamp >= 0.0 && timestamp < total) {
            return Err(ChapterError::OutOfRange { timestamp, total });
        }

        // First boundary whose end lies beyond the timestamp
        let idx = self.boundaries.partition_point(|b| b.end <= timestamp);
        self.boundaries
            .get(idx)
            .filter(|b| b.contains(timestamp))
            .ok_or(ChapterError::OutOfRange { timestamp, total })
    }
}
