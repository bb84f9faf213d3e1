use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::{CSV_FILE_NAME, METADATA_FILE_NAME};
use crate::models::CacheMetadata;

/// Filesystem persistence for the two cache artifacts: the decompressed
/// CSV payload and its JSON metadata sidecar.
///
/// Every operation is best-effort. Reads degrade to `None` on missing or
/// unreadable files, writes log and swallow failures. A fetch that
/// succeeded over the network is never failed by a disk problem; only
/// durability is lost.
pub struct CacheStore {
    csv_path: PathBuf,
    metadata_path: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `cache_dir`, creating the directory
    /// (including parents) eagerly.
    pub fn new(cache_dir: &Path) -> Self {
        if let Err(e) = fs::create_dir_all(cache_dir) {
            warn!("Failed to create cache directory {:?}: {}", cache_dir, e);
        }

        Self {
            csv_path: cache_dir.join(CSV_FILE_NAME),
            metadata_path: cache_dir.join(METADATA_FILE_NAME),
        }
    }

    /// Parsed metadata sidecar, or `None` when missing or corrupt
    pub fn read_metadata(&self) -> Option<CacheMetadata> {
        let raw = match fs::read_to_string(&self.metadata_path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Failed to read metadata: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                // Corrupt JSON is treated the same as a missing file
                debug!("Failed to parse metadata: {}", e);
                None
            }
        }
    }

    pub fn write_metadata(&self, metadata: &CacheMetadata) {
        let json = match serde_json::to_string_pretty(metadata) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize metadata: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.metadata_path, json) {
            warn!("Failed to write metadata: {}", e);
        }
    }

    /// Cached CSV text, or `None` when missing or unreadable
    pub fn read_csv(&self) -> Option<String> {
        match fs::read_to_string(&self.csv_path) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Failed to read cached CSV: {}", e);
                None
            }
        }
    }

    pub fn write_csv(&self, csv_text: &str) {
        if let Err(e) = fs::write(&self.csv_path, csv_text) {
            warn!("Failed to write CSV file: {}", e);
        }
    }

    /// Remove both cache artifacts. Deletion errors are logged, not raised.
    pub fn clear(&self) {
        for path in [&self.csv_path, &self.metadata_path] {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!("Failed to remove {:?}: {}", path, e);
                }
            }
        }
        info!("Fuzzwork cache cleared (CSV and ETag metadata removed)");
    }
}
