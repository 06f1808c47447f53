use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::{Config, LibraryImporter};
use crate::chapters::{ChapterTimeline, FileBoundaryIndex};
use crate::errors::ChapterError;
use crate::file_utils::FileManager;
use crate::media::{Cutter, FfmpegCutter, FfprobeProbe, LoftyTagger, MediaProbe, ProbedFile, Tagger};
use crate::post_process;
use crate::segmentation::{SegmentationEngine, SegmentationReport};

// @module: Application controller for audiobook chapter splitting

/// Where a directory run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Build the chapter file from embedded markers (optionally split afterwards)
    Extract,
    /// Split using an existing chapter file
    Process,
}

/// Per-run switches from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// After extraction, continue with splitting
    pub process: bool,
    /// Remove the original directory after a clean split
    pub cleanup: bool,
    /// Import the split directory into a media library
    pub import_to: Option<LibraryImporter>,
}

/// Counts for a batch of directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Main application controller for chapter extraction and splitting
pub struct Controller {
    // @field: App configuration
    config: Config,
    probe: Box<dyn MediaProbe>,
    cutter: Box<dyn Cutter>,
    tagger: Box<dyn Tagger>,
}

impl Controller {
    // @method: Create a controller backed by ffprobe, ffmpeg and lofty
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let probe = FfprobeProbe::new(
            config.tools.ffprobe_path.clone(),
            config.marker_tag.clone(),
            config.tools.probe_timeout_secs,
        );
        let cutter = FfmpegCutter::new(config.tools.ffmpeg_path.clone(), config.tools.cut_timeout_secs);
        let tagger = LoftyTagger::new(config.marker_tag.clone());

        Ok(Self::with_collaborators(config, Box::new(probe), Box::new(cutter), Box::new(tagger)))
    }

    /// Create a controller with explicit collaborators
    pub fn with_collaborators(
        config: Config,
        probe: Box<dyn MediaProbe>,
        cutter: Box<dyn Cutter>,
        tagger: Box<dyn Tagger>,
    ) -> Self {
        Self {
            config,
            probe,
            cutter,
            tagger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sibling directory receiving the chapter files of `audio_dir`
    pub fn split_dir_for(&self, audio_dir: &Path) -> PathBuf {
        FileManager::split_output_dir(audio_dir, &self.config.split_dir_suffix)
    }

    /// Path of the chapter-description file of `audio_dir`
    pub fn chapters_file_for(&self, audio_dir: &Path) -> PathBuf {
        audio_dir.join(&self.config.chapters_file_name)
    }

    /// Probe every source audio file of a directory, in file-name order
    pub async fn probe_directory(&self, audio_dir: &Path) -> Result<Vec<ProbedFile>> {
        let files = FileManager::find_audio_files(audio_dir, &self.config.audio_extension)?;
        if files.is_empty() {
            return Err(ChapterError::MissingData(format!(
                "No {} files found in directory: {}",
                self.config.audio_extension,
                audio_dir.display()
            ))
            .into());
        }

        let mut probed = Vec::with_capacity(files.len());
        for file in files {
            let info = self
                .probe
                .probe(&file)
                .await
                .with_context(|| format!("Failed to probe {}", file.display()))?;
            probed.push(info);
        }

        Ok(probed)
    }

    /// Build the timeline from embedded markers and write the chapter file
    pub async fn extract_chapters(&self, audio_dir: &Path) -> Result<ChapterTimeline> {
        let (timeline, _) = self.extract_chapters_probed(audio_dir).await?;
        Ok(timeline)
    }

    // Also hands back the probe results so a following split can reuse them
    async fn extract_chapters_probed(&self, audio_dir: &Path) -> Result<(ChapterTimeline, Vec<ProbedFile>)> {
        let probed = self.probe_directory(audio_dir).await?;

        let timeline = ChapterTimeline::from_embedded_markers(&probed)
            .with_context(|| format!("Error extracting chapters from {}", audio_dir.display()))?;

        let chapters_file = self.chapters_file_for(audio_dir);
        timeline
            .write_description_file(&chapters_file)
            .with_context(|| format!("Failed to write {}", chapters_file.display()))?;

        info!(
            "Successfully extracted {} chapters to {}",
            timeline.len(),
            chapters_file.display()
        );
        Ok((timeline, probed))
    }

    /// Split a directory into chapter files using its chapter file
    pub async fn process_chapters(&self, audio_dir: &Path) -> Result<SegmentationReport> {
        let multi_progress = MultiProgress::new();
        self.process_chapters_with_progress(audio_dir, None, &multi_progress)
            .await
    }

    async fn process_chapters_with_progress(
        &self,
        audio_dir: &Path,
        probed: Option<Vec<ProbedFile>>,
        multi_progress: &MultiProgress,
    ) -> Result<SegmentationReport> {
        if !FileManager::dir_exists(audio_dir) {
            return Err(ChapterError::MissingData(format!(
                "Directory does not exist: {}",
                audio_dir.display()
            ))
            .into());
        }

        let chapters_file = self.chapters_file_for(audio_dir);
        if !FileManager::file_exists(&chapters_file) {
            return Err(ChapterError::MissingData(format!(
                "Chapters file not found: {}",
                chapters_file.display()
            ))
            .into());
        }

        let probed = match probed {
            Some(probed) => probed,
            None => self.probe_directory(audio_dir).await?,
        };
        let durations: Vec<(PathBuf, f64)> = probed.into_iter().map(|p| (p.path, p.duration)).collect();
        let index = FileBoundaryIndex::build(&durations);

        let timeline = ChapterTimeline::read_description_file(&chapters_file, index.total_duration())?;
        if timeline.is_empty() {
            return Err(ChapterError::MissingData(format!(
                "No chapters found in {}",
                chapters_file.display()
            ))
            .into());
        }

        let output_dir = self.split_dir_for(audio_dir);
        info!(
            "Splitting {} chapters from {} audio files into {}",
            timeline.len(),
            index.boundaries().len(),
            output_dir.display()
        );

        let progress_bar = multi_progress.add(ProgressBar::new(timeline.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chapters ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Splitting");

        let engine = SegmentationEngine::new(
            self.cutter.as_ref(),
            self.tagger.as_ref(),
            self.config.file_name_separator.clone(),
        );
        let pb = progress_bar.clone();
        let report = engine
            .run(&timeline, &index, &output_dir, move |done, _total| {
                pb.set_position(done as u64);
            })
            .await?;

        progress_bar.finish_and_clear();
        Ok(report)
    }

    /// Run one directory through the requested workflow and hand-off steps
    ///
    /// Returns the segmentation report when a split was performed.
    pub async fn run_directory(
        &self,
        audio_dir: &Path,
        workflow: Workflow,
        options: &RunOptions,
    ) -> Result<Option<SegmentationReport>> {
        let multi_progress = MultiProgress::new();
        self.run_directory_with_progress(audio_dir, workflow, options, &multi_progress)
            .await
    }

    async fn run_directory_with_progress(
        &self,
        audio_dir: &Path,
        workflow: Workflow,
        options: &RunOptions,
        multi_progress: &MultiProgress,
    ) -> Result<Option<SegmentationReport>> {
        let probed = if workflow == Workflow::Extract {
            let (_, probed) = self.extract_chapters_probed(audio_dir).await?;
            if !options.process {
                return Ok(None);
            }
            Some(probed)
        } else {
            None
        };

        let report = self
            .process_chapters_with_progress(audio_dir, probed, multi_progress)
            .await?;

        if !report.is_complete() {
            warn!(
                "{} chapter(s) failed in {}; skipping cleanup",
                report.failed.len(),
                audio_dir.display()
            );
        } else if options.cleanup && !report.written.is_empty() {
            post_process::cleanup_original_files(audio_dir)?;
        }

        if let Some(importer) = options.import_to {
            let mut library = self.config.library.clone();
            library.importer = importer;
            let split_dir = self.split_dir_for(audio_dir);
            if let Err(e) = post_process::import_to_library(&library, &split_dir).await {
                error!("{:#}", e);
            }
        }

        Ok(Some(report))
    }

    /// Run every directory independently; a failing directory does not stop the batch
    pub async fn run_batch(&self, dirs: &[PathBuf], workflow: Workflow, options: &RunOptions) -> BatchSummary {
        let start_time = Instant::now();
        let mut summary = BatchSummary::default();

        let multi_progress = MultiProgress::new();
        let batch_pb = multi_progress.add(ProgressBar::new(dirs.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} directories ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        batch_pb.set_style(template_result.progress_chars("█▓▒░"));

        for dir in dirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| dir.display().to_string());
            batch_pb.set_message(name);

            if !FileManager::dir_exists(dir) {
                error!("Directory not found: {}", dir.display());
                summary.failed += 1;
                batch_pb.inc(1);
                continue;
            }

            info!("Processing directory: {}", dir.display());
            match self
                .run_directory_with_progress(dir, workflow, options, &multi_progress)
                .await
            {
                Ok(Some(report)) => {
                    info!("Processed {}: {}", dir.display(), report.summary());
                    summary.succeeded += 1;
                }
                Ok(None) => summary.succeeded += 1,
                Err(e) => {
                    error!("Error processing {}: {:#}", dir.display(), e);
                    summary.failed += 1;
                }
            }
            batch_pb.inc(1);
        }

        batch_pb.finish_and_clear();
        info!(
            "Batch completed in {}: {} succeeded, {} failed",
            format_duration(start_time.elapsed()),
            summary.succeeded,
            summary.failed
        );
        summary
    }
}

/// Format a duration as `1h 02m 03s`, `2m 03s` or `3.4s`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
