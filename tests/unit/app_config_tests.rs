/*!
 * Tests for application configuration
 */

use std::str::FromStr;
use anyhow::Result;
use log::LevelFilter;
use chaptersplit::app_config::{Config, LibraryImporter, LogLevel};
use crate::common;

/// Test the default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.audio_extension, "mp3");
    assert_eq!(config.chapters_file_name, "chapters.txt");
    assert_eq!(config.split_dir_suffix, "_split");
    assert_eq!(config.file_name_separator, " - ");
    assert_eq!(config.marker_tag, "OverDrive MediaMarkers");
    assert_eq!(config.tools.ffmpeg_path, "ffmpeg");
    assert_eq!(config.tools.cut_timeout_secs, 0);
    assert_eq!(config.library.importer, LibraryImporter::Beets);
    assert_eq!(config.library.command, vec!["beet", "import", "-m"]);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test saving and loading a configuration file
#[test]
fn test_config_saveAndLoad_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("chaptersplit.json");

    let mut config = Config::default();
    config.audio_extension = "m4b".to_string();
    config.tools.cut_timeout_secs = 30;
    config.log_level = LogLevel::Debug;
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

/// Test that missing fields fall back to defaults
#[test]
fn test_config_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        r#"{ "split_dir_suffix": "-chapters", "tools": { "ffmpeg_path": "/opt/ffmpeg" } }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.split_dir_suffix, "-chapters");
    assert_eq!(config.tools.ffmpeg_path, "/opt/ffmpeg");
    assert_eq!(config.tools.ffprobe_path, "ffprobe");
    assert_eq!(config.tools.probe_timeout_secs, 60);
    assert_eq!(config.chapters_file_name, "chapters.txt");
    Ok(())
}

/// Test that malformed JSON reports the file name
#[test]
fn test_config_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad.json", "{ not json")?;

    let err = Config::from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("bad.json"));
    Ok(())
}

/// Test validation failures
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.split_dir_suffix = String::new();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.split_dir_suffix = "/out".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.audio_extension = ".".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.library.command = Vec::new();
    assert!(config.validate().is_err());
}

/// Test parsing library importer names
#[test]
fn test_libraryImporter_fromStr_shouldBeCaseInsensitive() {
    assert_eq!(LibraryImporter::from_str("Beets").unwrap(), LibraryImporter::Beets);
    assert!(LibraryImporter::from_str("plex").is_err());
    assert_eq!(LibraryImporter::Beets.to_string(), "beets");
}

/// Test log level mapping
#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}
