use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use tokio::process::Command;

use crate::app_config::LibraryConfig;

// @module: Hand-off steps run after a successful split

/// Remove the original audio directory and everything in it
pub fn cleanup_original_files<P: AsRef<Path>>(audio_dir: P) -> Result<()> {
    let audio_dir = audio_dir.as_ref();
    if !audio_dir.is_dir() {
        warn!("Nothing to clean up, {} is not a directory", audio_dir.display());
        return Ok(());
    }

    fs::remove_dir_all(audio_dir)
        .with_context(|| format!("Error during cleanup of {}", audio_dir.display()))?;

    info!("Removed original files in {}", audio_dir.display());
    Ok(())
}

/// Build the importer invocation for a split directory
pub fn import_command(library: &LibraryConfig, split_dir: &Path) -> Result<(String, Vec<String>)> {
    let (program, prefix) = library
        .command
        .split_first()
        .ok_or_else(|| anyhow!("Library import command is empty"))?;

    let mut args = prefix.to_vec();
    args.push(split_dir.to_string_lossy().to_string());
    Ok((program.clone(), args))
}

/// Import the split directory into the configured media library
///
/// The importer inherits the terminal since it may ask questions.
pub async fn import_to_library(library: &LibraryConfig, split_dir: &Path) -> Result<()> {
    let (program, args) = import_command(library, split_dir)?;
    info!("Importing {} with {}", split_dir.display(), library.importer);

    let status = Command::new(&program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("Failed to execute {}", program))?;

    if !status.success() {
        return Err(anyhow!("Error importing to library: {} exited with {}", program, status));
    }

    Ok(())
}
