use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ChapterError;

// @module: Chapter-file timestamp codec (HH:MM:SS.mmm <-> seconds)

// @const: Chapter timestamp regex, hours may grow past two digits
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):([0-5]\d):([0-5]\d)\.(\d{3})$").unwrap()
});

/// Parse an `HH:MM:SS.mmm` timestamp into seconds
pub fn parse(text: &str) -> Result<f64, ChapterError> {
    let caps = TIMESTAMP_REGEX
        .captures(text)
        .ok_or_else(|| ChapterError::Format(format!("Invalid timestamp format: {}", text)))?;

    let field = |idx: usize| -> Result<u64, ChapterError> {
        caps[idx]
            .parse::<u64>()
            .map_err(|e| ChapterError::Format(format!("Invalid timestamp field in {}: {}", text, e)))
    };

    let (hours, minutes, seconds, millis) = (field(1)?, field(2)?, field(3)?, field(4)?);

    // Minutes and seconds are bounded by the pattern; only hours can overflow
    let total_ms = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
        .ok_or_else(|| ChapterError::Format(format!("Timestamp out of range: {}", text)))?;
    Ok(total_ms as f64 / 1000.0)
}

/// Format seconds as `HH:MM:SS.mmm`, truncating below the millisecond
pub fn format(seconds: f64) -> Result<String, ChapterError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ChapterError::Format(format!("Cannot format timestamp {}", seconds)));
    }

    // Values parsed from text sit within an ulp of the integer millisecond
    let ms = (seconds * 1000.0 + 1e-6).floor() as u64;
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    Ok(format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis))
}
