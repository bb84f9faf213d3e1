use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::parse_timestamp;

/// Metadata sidecar persisted next to the cached CSV payload
///
/// All timestamps are stored as ISO-8601 UTC strings. Every field is
/// optional on disk: the file may come from an older version, a partial
/// write, or manual editing, and readers degrade instead of failing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Opaque ETag token from the last successful download
    #[serde(default)]
    pub etag: Option<String>,

    /// Distinguishes "no ETag ever seen" from "ETag present but different"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag_present: Option<bool>,

    /// Upstream `Last-Modified` response header at last download time
    #[serde(default)]
    pub last_modified: Option<String>,

    /// Wall clock of the last successful full download
    #[serde(default)]
    pub last_updated: Option<String>,

    /// Wall clock of the last remote probe attempt, success or failure
    #[serde(default)]
    pub last_checked: Option<String>,

    /// Byte count of the decompressed CSV at last download
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl CacheMetadata {
    /// Parsed `last_modified`, or `None` when missing or unparsable
    pub fn last_modified_time(&self) -> Option<DateTime<Utc>> {
        self.last_modified.as_deref().and_then(parse_timestamp)
    }

    /// Parsed `last_updated`, or `None` when missing or unparsable
    pub fn last_updated_time(&self) -> Option<DateTime<Utc>> {
        self.last_updated.as_deref().and_then(parse_timestamp)
    }

    /// Parsed `last_checked`, or `None` when missing or unparsable
    pub fn last_checked_time(&self) -> Option<DateTime<Utc>> {
        self.last_checked.as_deref().and_then(parse_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_preserves_fields() {
        let metadata = CacheMetadata {
            etag: Some("\"abc123\"".to_string()),
            etag_present: Some(true),
            last_modified: Some("2026-08-27T10:00:00+00:00".to_string()),
            last_updated: Some("2026-08-27T10:00:05+00:00".to_string()),
            last_checked: Some("2026-08-27T10:30:00+00:00".to_string()),
            file_size: Some(1024),
        };

        let json = serde_json::to_string_pretty(&metadata).unwrap();
        let parsed: CacheMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.etag.as_deref(), Some("\"abc123\""));
        assert_eq!(parsed.etag_present, Some(true));
        assert_eq!(parsed.file_size, Some(1024));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let parsed: CacheMetadata = serde_json::from_str("{}").unwrap();
        assert!(parsed.etag.is_none());
        assert!(parsed.etag_present.is_none());
        assert!(parsed.last_modified.is_none());
        assert!(parsed.file_size.is_none());
    }

    #[test]
    fn test_etag_present_omitted_when_unset() {
        let metadata = CacheMetadata::default();
        let json = serde_json::to_string(&metadata).unwrap();
        assert!(!json.contains("etag_present"));
    }

    #[test]
    fn test_unparsable_timestamps_degrade_to_none() {
        let metadata = CacheMetadata {
            last_modified: Some("garbage".to_string()),
            last_updated: Some("2026-08-27T10:00:00+00:00".to_string()),
            ..Default::default()
        };

        assert!(metadata.last_modified_time().is_none());
        assert!(metadata.last_updated_time().is_some());
        assert!(metadata.last_checked_time().is_none());
    }
}
