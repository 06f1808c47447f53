use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::chapters::{Chapter, ChapterTimeline, FileBoundaryIndex};
use crate::errors::ChapterError;
use crate::file_utils::FileManager;
use crate::media::{Cutter, Tagger};

// @module: Chapter segmentation (cut + retag per chapter)

// Spill past the owning file's end below this is rounding noise
const SPAN_TOLERANCE_SECS: f64 = 0.001;

// @struct: A chapter that could not be written
#[derive(Debug, Clone)]
pub struct SegmentFailure {
    // @field: 1-based position in the timeline
    pub sequence: usize,

    // @field: Chapter title
    pub title: String,

    // @field: Reported error
    pub error: String,
}

/// Outcome of one segmentation run
#[derive(Debug, Clone, Default)]
pub struct SegmentationReport {
    /// Segment files written and tagged, in chapter order
    pub written: Vec<PathBuf>,

    /// Chapters whose cut or tag step failed
    pub failed: Vec<SegmentFailure>,

    /// Sequence numbers of chapters with no resolved end
    pub skipped: Vec<usize>,
}

impl SegmentationReport {
    /// True when every eligible chapter was written
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} written, {} failed, {} skipped",
            self.written.len(),
            self.failed.len(),
            self.skipped.len()
        )
    }
}

/// Drives the per-chapter cut and tag steps
pub struct SegmentationEngine<'a> {
    cutter: &'a dyn Cutter,
    tagger: &'a dyn Tagger,
    separator: String,
}

impl<'a> SegmentationEngine<'a> {
    pub fn new(cutter: &'a dyn Cutter, tagger: &'a dyn Tagger, separator: impl Into<String>) -> Self {
        Self {
            cutter,
            tagger,
            separator: separator.into(),
        }
    }

    /// Split every chapter of the timeline into its own file under `output_dir`
    ///
    /// Chapters are processed strictly in order. A failure on one chapter is
    /// recorded in the report and the run moves on to the next one.
    ///
    /// A chapter that runs past the end of the file it starts in is cut from
    /// that file only; the remainder in the following file is not included.
    pub async fn run<F>(
        &self,
        timeline: &ChapterTimeline,
        index: &FileBoundaryIndex,
        output_dir: &Path,
        mut on_progress: F,
    ) -> Result<SegmentationReport, ChapterError>
    where
        F: FnMut(usize, usize) + Send,
    {
        if timeline.is_empty() {
            return Err(ChapterError::MissingData("Chapter timeline is empty".to_string()));
        }
        if index.is_empty() {
            return Err(ChapterError::MissingData("No audio files to split".to_string()));
        }

        FileManager::ensure_dir(output_dir)?;

        let total = timeline.len();
        let mut report = SegmentationReport::default();

        for (position, chapter) in timeline.chapters().iter().enumerate() {
            let sequence = position + 1;

            if !chapter.is_segmentable() {
                warn!("Skipping chapter {} '{}': end time unresolved", sequence, chapter.title);
                report.skipped.push(sequence);
                on_progress(sequence, total);
                continue;
            }

            match self.split_chapter(chapter, sequence, index, output_dir).await {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    error!("Error processing chapter {} '{}': {}", sequence, chapter.title, e);
                    report.failed.push(SegmentFailure {
                        sequence,
                        title: chapter.title.clone(),
                        error: e.to_string(),
                    });
                }
            }

            on_progress(sequence, total);
        }

        info!("Segmentation finished: {}", report.summary());
        Ok(report)
    }

    async fn split_chapter(
        &self,
        chapter: &Chapter,
        sequence: usize,
        index: &FileBoundaryIndex,
        output_dir: &Path,
    ) -> Result<PathBuf, ChapterError> {
        let end = chapter
            .end
            .ok_or_else(|| ChapterError::MissingData(format!("Chapter '{}' has no end", chapter.title)))?;

        let boundary = index.resolve(chapter.start)?;
        let relative_start = chapter.start - boundary.start;
        let duration = end - chapter.start;

        if end > boundary.end + SPAN_TOLERANCE_SECS {
            warn!(
                "Chapter {} '{}' continues past {}; {:.3}s in the next file will not be included",
                sequence,
                chapter.title,
                boundary.file.display(),
                end - boundary.end
            );
        }

        let extension = boundary
            .file
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_name = FileManager::segment_file_name(sequence, &chapter.title, &self.separator, &extension);
        let output = output_dir.join(file_name);

        debug!(
            "Chapter {}: {} @ {:.3}s for {:.3}s -> {}",
            sequence,
            boundary.file.display(),
            relative_start,
            duration,
            output.display()
        );

        let written = self
            .cutter
            .cut(&boundary.file, relative_start, duration, &output)
            .await?;
        self.tagger.tag(&written, chapter, sequence).await?;

        Ok(written)
    }
}
