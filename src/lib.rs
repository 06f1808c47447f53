/*!
 * # chaptersplit - Audiobook chapter reconciliation and splitting
 *
 * A Rust library that turns multi-file audiobooks into one file per chapter.
 *
 * ## Features
 *
 * - Read the chapter markers embedded in each audio file's tags
 * - Reconcile the per-file markers into one book-wide chapter timeline
 * - Normalize chapter titles and drop duplicate continuation markers
 * - Read and write a plain-text chapter file that can be edited by hand
 * - Cut each chapter from the file that contains it and retag the result
 * - Optionally remove the original files and import into a media library
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timestamp`: `HH:MM:SS.mmm` parsing and formatting
 * - `chapters`: Chapter model:
 *   - `chapters::title`: Title normalization pipeline
 *   - `chapters::markers`: Embedded marker payload parsing
 *   - `chapters::boundaries`: Per-file offsets and time resolution
 *   - `chapters::timeline`: Book-wide chapter timeline
 * - `media`: External collaborators (probe, cutter, tagger)
 * - `segmentation`: Per-chapter cut and tag driver
 * - `post_process`: Cleanup and library import
 * - `file_utils`: File system operations
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod chapters;
pub mod errors;
pub mod file_utils;
pub mod media;
pub mod post_process;
pub mod segmentation;
pub mod timestamp;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchSummary, Controller, RunOptions, Workflow};
pub use chapters::{Chapter, ChapterTimeline, FileBoundary, FileBoundaryIndex};
pub use errors::{ChapterError, ToolError};
pub use segmentation::{SegmentationEngine, SegmentationReport};
