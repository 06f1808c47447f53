use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Extension of the source audio files
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,

    /// Name of the chapter-description file inside the audio directory
    #[serde(default = "default_chapters_file_name")]
    pub chapters_file_name: String,

    /// Suffix of the sibling directory receiving the chapter files
    #[serde(default = "default_split_dir_suffix")]
    pub split_dir_suffix: String,

    /// Text between the sequence number and the title in output names
    #[serde(default = "default_file_name_separator")]
    pub file_name_separator: String,

    /// Tag holding the embedded chapter-marker payload
    #[serde(default = "default_marker_tag")]
    pub marker_tag: String,

    /// External tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Media library import settings
    #[serde(default)]
    pub library: LibraryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// External tool configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolsConfig {
    // @field: ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Timeout for a single cut in seconds; 0 waits indefinitely
    #[serde(default)]
    pub cut_timeout_secs: u64,

    /// Timeout for probing one file in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            cut_timeout_secs: 0,
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Supported media library importers
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LibraryImporter {
    // @importer: beets
    #[default]
    Beets,
}

impl LibraryImporter {
    // @returns: Importer name as used on the command line
    pub fn display_name(&self) -> &str {
        match self {
            Self::Beets => "beets",
        }
    }
}

impl std::fmt::Display for LibraryImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for LibraryImporter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "beets" => Ok(Self::Beets),
            _ => Err(anyhow!("Unsupported library type: {}", s)),
        }
    }
}

/// Media library import configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LibraryConfig {
    /// Importer to use
    #[serde(default)]
    pub importer: LibraryImporter,

    /// Command prefix; the split directory is appended as the last argument
    #[serde(default = "default_import_command")]
    pub command: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            importer: LibraryImporter::default(),
            command: default_import_command(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_audio_extension() -> String {
    "mp3".to_string()
}

fn default_chapters_file_name() -> String {
    "chapters.txt".to_string()
}

fn default_split_dir_suffix() -> String {
    "_split".to_string()
}

fn default_file_name_separator() -> String {
    " - ".to_string()
}

fn default_marker_tag() -> String {
    "OverDrive MediaMarkers".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    60 // 1 minute per file
}

fn default_import_command() -> Vec<String> {
    vec!["beet".to_string(), "import".to_string(), "-m".to_string()]
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.audio_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("audio_extension must not be empty"));
        }

        if self.chapters_file_name.trim().is_empty() {
            return Err(anyhow!("chapters_file_name must not be empty"));
        }

        if self.split_dir_suffix.is_empty() {
            return Err(anyhow!("split_dir_suffix must not be empty"));
        }

        if self.split_dir_suffix.contains(['/', '\\']) {
            return Err(anyhow!("split_dir_suffix must not contain path separators"));
        }

        if self.marker_tag.trim().is_empty() {
            return Err(anyhow!("marker_tag must not be empty"));
        }

        if self.library.command.is_empty() || self.library.command[0].trim().is_empty() {
            return Err(anyhow!("Library import command is required"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            audio_extension: default_audio_extension(),
            chapters_file_name: default_chapters_file_name(),
            split_dir_suffix: default_split_dir_suffix(),
            file_name_separator: default_file_name_separator(),
            marker_tag: default_marker_tag(),
            tools: ToolsConfig::default(),
            library: LibraryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
