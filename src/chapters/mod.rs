/*!
 * Chapter timeline reconstruction.
 *
 * - `title`: ordered title cleanup stages
 * - `markers`: per-file embedded marker payload parsing
 * - `boundaries`: source-file intervals within the whole program
 * - `timeline`: the merged, deduplicated chapter list
 */

pub mod boundaries;
pub mod markers;
pub mod timeline;
pub mod title;

pub use boundaries::{FileBoundary, FileBoundaryIndex};
pub use markers::{FileMarkers, MarkerEntry};
pub use timeline::{Chapter, ChapterTimeline, TitleIndex};
