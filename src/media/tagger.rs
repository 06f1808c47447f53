//! Metadata rewriting for finished chapter segments
//!
//! Uses lofty so the same code path handles ID3v2 (MP3), MP4 atoms and
//! Vorbis comments.

use std::path::Path;

use async_trait::async_trait;
use lofty::{Accessor, ItemKey, Probe, Tag, TagExt, TaggedFileExt};
use log::debug;

use crate::chapters::timeline::Chapter;
use crate::errors::{ChapterError, ToolError};

/// Capability to finalize the tags of a written segment
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Set title and track number, and drop the stale marker tag
    async fn tag(&self, segment: &Path, chapter: &Chapter, sequence: usize) -> Result<(), ChapterError>;
}

/// `Tagger` writing tags in place with lofty
#[derive(Debug, Clone)]
pub struct LoftyTagger {
    marker_tag: String,
}

impl LoftyTagger {
    pub fn new(marker_tag: impl Into<String>) -> Self {
        Self {
            marker_tag: marker_tag.into(),
        }
    }

    /// Whether a tag key is a copy of the embedded marker payload
    pub fn is_marker_key(&self, key: &ItemKey) -> bool {
        match key {
            ItemKey::Unknown(name) => {
                let name = name.to_lowercase();
                let name = name.strip_prefix("txxx:").unwrap_or(&name);
                name == self.marker_tag.to_lowercase()
            }
            _ => false,
        }
    }

    /// Apply the chapter fields to a tag
    pub fn apply(&self, tag: &mut Tag, chapter: &Chapter, sequence: usize) {
        tag.retain(|item| !self.is_marker_key(item.key()));
        tag.set_title(chapter.title.clone());
        tag.set_track(sequence as u32);
    }

    fn tag_blocking(&self, segment: &Path, chapter: &Chapter, sequence: usize) -> Result<(), lofty::error::LoftyError> {
        let mut tagged_file = Probe::open(segment)?.read()?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            debug!("No tags in {}, creating {:?} tag", segment.display(), tag_type);
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        if let Some(tag) = tagged_file.primary_tag_mut() {
            self.apply(tag, chapter, sequence);
            tag.save_to_path(segment)?;
        }

        Ok(())
    }
}

#[async_trait]
impl Tagger for LoftyTagger {
    async fn tag(&self, segment: &Path, chapter: &Chapter, sequence: usize) -> Result<(), ChapterError> {
        let tag_error = |message: String| {
            ChapterError::Tool(ToolError::Tag {
                path: segment.to_path_buf(),
                message,
            })
        };

        // lofty reads and rewrites the whole file synchronously
        let tagger = self.clone();
        let path = segment.to_path_buf();
        let chapter = chapter.clone();
        tokio::task::spawn_blocking(move || tagger.tag_blocking(&path, &chapter, sequence))
            .await
            .map_err(|e| tag_error(e.to_string()))?
            .map_err(|e| tag_error(e.to_string()))
    }
}
