/*!
 * Common test utilities for the chaptersplit test suite
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use chaptersplit::app_config::Config;
use chaptersplit::chapters::Chapter;
use chaptersplit::errors::{ChapterError, ToolError};
use chaptersplit::media::{Cutter, MediaProbe, ProbedFile, Tagger};
use chaptersplit::Controller;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates an audiobook directory with placeholder audio files
pub fn create_audiobook_dir(root: &Path, name: &str, files: &[&str]) -> Result<PathBuf> {
    let dir = root.join(name);
    fs::create_dir_all(&dir)?;
    for file in files {
        create_test_file(&dir, file, "audio")?;
    }
    Ok(dir)
}

/// Builds a marker payload from (name, time) pairs
pub fn marker_payload(records: &[(&str, &str)]) -> String {
    let mut payload = String::from("<Markers>");
    for (name, time) in records {
        payload.push_str(&format!("<Marker><Name>{}</Name><Time>{}</Time></Marker>", name, time));
    }
    payload.push_str("</Markers>");
    payload
}

/// Probe answering from a table keyed by file name
#[derive(Debug, Default, Clone)]
pub struct FakeProbe {
    files: HashMap<String, (f64, Option<String>)>,
    queried: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's duration and marker payload
    pub fn with_file(mut self, name: &str, duration: f64, markers: Option<String>) -> Self {
        self.files.insert(name.to_string(), (duration, markers));
        self
    }

    /// Every path asked for so far, shared across clones
    pub fn queried(&self) -> Vec<PathBuf> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn probe(&self, path: &Path) -> Result<ProbedFile, ChapterError> {
        self.queried.lock().unwrap().push(path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match self.files.get(&name) {
            Some((duration, markers)) => Ok(ProbedFile {
                path: path.to_path_buf(),
                duration: *duration,
                markers: markers.clone(),
            }),
            None => Err(ToolError::Failed {
                tool: "ffprobe".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("{}: No such file", name),
            }
            .into()),
        }
    }
}

/// One recorded cut
#[derive(Debug, Clone, PartialEq)]
pub struct CutCall {
    pub source: PathBuf,
    pub start: f64,
    pub duration: f64,
    pub output: PathBuf,
}

/// Cutter that records calls and writes a placeholder output file
#[derive(Debug, Default, Clone)]
pub struct RecordingCutter {
    calls: Arc<Mutex<Vec<CutCall>>>,
    fail_when_output_contains: Option<String>,
}

impl RecordingCutter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every cut whose output name contains `fragment`
    pub fn failing_on(fragment: &str) -> Self {
        Self {
            calls: Arc::default(),
            fail_when_output_contains: Some(fragment.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<CutCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Cutter for RecordingCutter {
    async fn cut(&self, source: &Path, start: f64, duration: f64, output: &Path) -> Result<PathBuf, ChapterError> {
        self.calls.lock().unwrap().push(CutCall {
            source: source.to_path_buf(),
            start,
            duration,
            output: output.to_path_buf(),
        });

        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(fragment) = &self.fail_when_output_contains {
            if name.contains(fragment.as_str()) {
                return Err(ToolError::Failed {
                    tool: "ffmpeg".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "Invalid data found when processing input".to_string(),
                }
                .into());
            }
        }

        fs::write(output, b"segment")?;
        Ok(output.to_path_buf())
    }
}

/// One recorded tag write
#[derive(Debug, Clone, PartialEq)]
pub struct TagCall {
    pub segment: PathBuf,
    pub title: String,
    pub sequence: usize,
}

/// Tagger that only records what it was asked to write
#[derive(Debug, Default, Clone)]
pub struct RecordingTagger {
    calls: Arc<Mutex<Vec<TagCall>>>,
}

impl RecordingTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TagCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tagger for RecordingTagger {
    async fn tag(&self, segment: &Path, chapter: &Chapter, sequence: usize) -> Result<(), ChapterError> {
        self.calls.lock().unwrap().push(TagCall {
            segment: segment.to_path_buf(),
            title: chapter.title.clone(),
            sequence,
        });
        Ok(())
    }
}

/// Controller wired to the fakes; the returned handles share their call logs
pub fn fake_controller(probe: FakeProbe, cutter: RecordingCutter) -> (Controller, RecordingCutter, RecordingTagger) {
    let tagger = RecordingTagger::new();
    let controller = Controller::with_collaborators(
        Config::default(),
        Box::new(probe),
        Box::new(cutter.clone()),
        Box::new(tagger.clone()),
    );
    (controller, cutter, tagger)
}

/// Float comparison at millisecond precision
pub fn assert_secs_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {:.6}s, got {:.6}s",
        expected,
        actual
    );
}
