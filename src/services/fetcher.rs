use std::io::Read;

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use reqwest::header::{ETAG, LAST_MODIFIED};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Result of a successful full download of the feed
#[derive(Clone, Debug)]
pub struct DownloadResult {
    /// Decompressed UTF-8 CSV text
    pub csv_text: String,
    /// `ETag` response header, verbatim
    pub etag: Option<String>,
    /// `Last-Modified` response header converted to ISO-8601 UTC;
    /// `None` when missing or unparsable
    pub last_modified: Option<String>,
    /// Byte length of the decompressed CSV
    pub byte_size: u64,
    /// Byte length of the compressed body as received
    pub compressed_size: u64,
}

/// Network side of the client: HEAD probe and full GET download.
///
/// Holds no cache or policy state; the orchestrator owns both the shared
/// HTTP client and all decisions about when these calls happen.
pub struct RemoteFetcher<'a> {
    client: &'a reqwest::Client,
    url: &'a str,
}

impl<'a> RemoteFetcher<'a> {
    pub fn new(client: &'a reqwest::Client, url: &'a str) -> Self {
        Self { client, url }
    }

    /// HEAD the feed and return its `ETag` header.
    ///
    /// Transport errors and non-success statuses are errors; a 2xx
    /// response without an `ETag` header is `Ok(None)`.
    pub async fn probe_etag(&self) -> Result<Option<String>> {
        let response = self
            .client
            .head(self.url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("ETag HEAD request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "ETag HEAD request returned status {}",
                response.status()
            )));
        }

        let etag = header_string(response.headers(), ETAG);
        debug!("Remote ETag probe returned {:?}", etag);
        Ok(etag)
    }

    /// GET the feed, decompress the gzip body, and capture response
    /// metadata.
    pub async fn download(&self) -> Result<DownloadResult> {
        let response = self
            .client
            .get(self.url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("CSV download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "CSV download returned status {}",
                response.status()
            )));
        }

        let etag = header_string(response.headers(), ETAG);
        let last_modified = header_string(response.headers(), LAST_MODIFIED)
            .as_deref()
            .and_then(parse_last_modified);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response body: {}", e)))?;
        let compressed_size = body.len() as u64;

        // The payload is a gzip file, not Content-Encoding compression;
        // decompress explicitly. read_to_string also enforces UTF-8.
        let mut decoder = GzDecoder::new(body.as_ref());
        let mut csv_text = String::new();
        decoder
            .read_to_string(&mut csv_text)
            .map_err(|e| Error::Parse(format!("Failed to decompress CSV payload: {}", e)))?;

        let byte_size = csv_text.len() as u64;
        info!(
            "Downloaded feed: {} bytes compressed, {} bytes decompressed",
            compressed_size, byte_size
        );

        Ok(DownloadResult {
            csv_text,
            etag,
            last_modified,
            byte_size,
            compressed_size,
        })
    }
}

fn header_string(headers: &reqwest::header::HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

/// Convert an RFC 2822 `Last-Modified` value to an ISO-8601 UTC string.
/// Parse failures degrade to `None`.
fn parse_last_modified(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
}
