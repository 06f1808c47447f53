use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chapters::title;
use crate::errors::ChapterError;

// @module: Embedded media-marker payload parsing

// @const: One <Name>/<Time> record inside a marker payload
static MARKER_RECORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<Name>\s*([^>]+?)\s*</Name><Time>\s*([\d:.]+)\s*</Time>").unwrap()
});

// @struct: Accepted marker with an absolute program timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    // @field: Normalized title
    pub title: String,

    // @field: Seconds from the start of the first file
    pub start: f64,
}

// @struct: Result of folding one file into the running total
#[derive(Debug, Clone, PartialEq)]
pub struct FileMarkers {
    /// Cumulative duration after this file
    pub cumulative: f64,

    /// Accepted markers in file order
    pub entries: Vec<MarkerEntry>,
}

/// Parse a marker time field such as `5`, `04:05.250` or `1:04:05`
///
/// Fields are read right to left as seconds, minutes, hours.
pub fn parse_marker_time(text: &str) -> Result<f64, ChapterError> {
    let mut fields = text.rsplit(':');
    let bad = |what: &str| ChapterError::Format(format!("Invalid {} in marker time '{}'", what, text));

    let seconds: f64 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .filter(|s: &f64| s.is_finite())
        .ok_or_else(|| bad("seconds"))?;

    let mut total = seconds;
    if let Some(minutes) = fields.next() {
        let minutes = minutes
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .ok_or_else(|| bad("minutes"))?;
        total += minutes as f64;
    }
    if let Some(hours) = fields.next() {
        let hours = hours
            .parse::<u64>()
            .ok()
            .and_then(|h| h.checked_mul(3600))
            .ok_or_else(|| bad("hours"))?;
        total += hours as f64;
    }
    if fields.next().is_some() {
        return Err(bad("field count"));
    }

    Ok(total)
}

/// Fold one file's marker payload into the running program timeline
///
/// A missing payload is not an error: the file simply contributes no markers,
/// but its duration still advances the cumulative offset.
pub fn parse_file_markers(cumulative: f64, file_duration: f64, payload: Option<&str>) -> FileMarkers {
    let mut entries = Vec::new();

    if let Some(payload) = payload {
        for caps in MARKER_RECORD_REGEX.captures_iter(payload) {
            let raw_name = &caps[1];
            let raw_time = &caps[2];

            let offset = match parse_marker_time(raw_time) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Skipping marker '{}': {}", raw_name, e);
                    continue;
                }
            };

            let title = title::normalize(raw_name);
            if title.is_empty() {
                debug!("Skipping marker '{}' at {}: empty title after normalization", raw_name, raw_time);
                continue;
            }

            entries.push(MarkerEntry {
                title,
                start: cumulative + offset,
            });
        }
    }

    FileMarkers {
        cumulative: cumulative + file_duration,
        entries,
    }
}
