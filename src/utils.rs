use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::constants::DEFAULT_CACHE_DIR;

/// Get cache directory from environment variable or use default
pub fn get_cache_dir() -> PathBuf {
    std::env::var("FUZZWORK_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR))
}

/// Parse a stored ISO-8601 timestamp into a UTC datetime
///
/// Returns `None` for missing or unparsable values so callers can fall
/// back through the metadata anchor chain instead of failing.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
