use anyhow::{Result, Context};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: File and directory utilities

// @const: Characters not allowed in output file names
static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[<>:"/\\|?*]"#).unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find the audio files directly inside a directory, sorted by file name
    pub fn find_audio_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(wanted) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Sibling output directory, e.g. /books/Title -> /books/Title_split
    pub fn split_output_dir<P: AsRef<Path>>(audio_dir: P, suffix: &str) -> PathBuf {
        let audio_dir = audio_dir.as_ref();
        let name = audio_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audiobook".to_string());

        let parent = audio_dir.parent().unwrap_or_else(|| Path::new("."));
        parent.join(format!("{}{}", name, suffix))
    }

    /// Replace characters that are not allowed in file names
    pub fn sanitize_title(title: &str) -> String {
        UNSAFE_FILENAME_CHARS.replace_all(title, "_").into_owned()
    }

    // @generates: Segment file name, e.g. "03 - Chapter Three.mp3"
    pub fn segment_file_name(sequence: usize, title: &str, separator: &str, extension: &str) -> String {
        let mut name = format!("{:02}{}{}", sequence, separator, Self::sanitize_title(title));
        if !extension.is_empty() {
            name.push('.');
            name.push_str(extension);
        }
        name
    }
}
