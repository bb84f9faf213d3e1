use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use crate::constants::{AGGREGATE_CSV_URL, DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECONDS};
use crate::error::{Error, Result};
use crate::models::CacheMetadata;
use crate::progress::{ProgressCallback, ProgressPhase, ProgressUpdate};
use crate::services::cache_store::CacheStore;
use crate::services::fetcher::RemoteFetcher;
use crate::services::freshness::{self, FetchAction, ProbeResolution};

const OPERATION_NAME: &str = "Fuzzwork CSV Download";

/// Constructor options for [`FuzzworkClient`], all defaulted
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory holding the cached CSV and metadata sidecar
    pub cache_dir: PathBuf,
    /// Feed URL; overridable for mirrors and tests
    pub base_url: String,
    /// Timeout applied to every HEAD and GET request
    pub request_timeout: Duration,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_dir: crate::utils::get_cache_dir(),
            base_url: AGGREGATE_CSV_URL.to_string(),
            request_timeout: Duration::from_secs(HTTP_TIMEOUT_SECONDS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Cache-aware client for the Fuzzwork aggregate market CSV feed.
///
/// The public entry point is [`fetch`](Self::fetch): read the local cache,
/// run the freshness policy, probe or download remotely only when the
/// policy says so, persist the result, and return the CSV text. The
/// underlying HTTP client is built lazily on first network use and reused
/// across calls for connection pooling; a warm-cache fetch never
/// constructs it at all.
///
/// Concurrent `fetch` calls on the same client serialize on an internal
/// async mutex, so two near-simultaneous callers cannot race each other
/// into duplicate downloads: the second caller observes the first's
/// freshly persisted cache and short-circuits through the fresh window.
pub struct FuzzworkClient {
    config: ClientConfig,
    store: CacheStore,
    http: OnceCell<reqwest::Client>,
    fetch_lock: Mutex<()>,
}

impl FuzzworkClient {
    pub fn new(config: ClientConfig) -> Self {
        let store = CacheStore::new(&config.cache_dir);
        Self {
            config,
            store,
            http: OnceCell::new(),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Fetch the aggregate CSV, respecting the cache timing rules.
    ///
    /// - `force`: download fresh content regardless of cache state.
    /// - `check_etag`: permit a conditional remote probe when the cache
    ///   has aged past the ETag wait window; without it, staleness is
    ///   never checked and the cached copy is returned as-is.
    /// - `progress`: optional observer notified at phase boundaries.
    ///
    /// Errors only when a full download was required and failed; probe
    /// failures degrade to the cached copy.
    pub async fn fetch(
        &self,
        force: bool,
        check_etag: bool,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<String> {
        let _guard = self.fetch_lock.lock().await;

        let local_csv = self.store.read_csv();
        let metadata = self.store.read_metadata();
        let now = Utc::now();

        let action = freshness::decide(now, metadata.as_ref(), local_csv.is_some(), force, check_etag);

        let csv_text = match (action, local_csv) {
            (FetchAction::FullDownload, _) | (_, None) => {
                return self.download_and_save(progress).await;
            }
            (FetchAction::UseCached, Some(text)) => {
                debug!("Local CSV considered fresh; using cached copy");
                return Ok(text);
            }
            (FetchAction::ProbeEtag, Some(text)) => text,
        };

        let mut meta = metadata.unwrap_or_default();

        let remote_etag = match self.probe_remote().await {
            Ok(etag) => etag,
            Err(e) => {
                debug!("ETag probe failed: {}; using cached copy", e);
                // Still record the attempt so the throttle window applies
                meta.last_checked = Some(Utc::now().to_rfc3339());
                self.store.write_metadata(&meta);
                return Ok(csv_text);
            }
        };

        meta.last_checked = Some(Utc::now().to_rfc3339());

        match freshness::resolve_probe(remote_etag.as_deref(), meta.etag.as_deref()) {
            ProbeResolution::Download => {
                match (&remote_etag, &meta.etag) {
                    (_, None) => info!(
                        "ETag not previously cached (first download or cache cleared); downloading fresh CSV"
                    ),
                    (remote, cached) => info!(
                        "Remote ETag changed from {:?} to {:?}; downloading fresh CSV",
                        cached, remote
                    ),
                }
                self.download_and_save(progress).await
            }
            ProbeResolution::UseCached => {
                if remote_etag.is_some() {
                    info!("ETag match ({:?}) - using cached CSV", remote_etag);
                } else {
                    debug!(
                        "Remote ETag missing but cached copy available (cached: {:?}); using cached CSV",
                        meta.etag
                    );
                }
                meta.etag_present = Some(true);
                self.store.write_metadata(&meta);
                Ok(csv_text)
            }
        }
    }

    /// Cached metadata sidecar, if present
    pub fn get_cache_metadata(&self) -> Option<CacheMetadata> {
        self.store.read_metadata()
    }

    /// Remove stored CSV and metadata. Never errors.
    pub fn clear_cache(&self) {
        self.store.clear();
    }

    /// Drop the lazily-built HTTP client and its connection pool.
    /// Safe to call when no client was ever initialized.
    pub fn close(&mut self) {
        self.http.take();
    }

    async fn http_client(&self) -> Result<&reqwest::Client> {
        self.http
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(self.config.request_timeout)
                    .user_agent(&self.config.user_agent)
                    .build()
                    .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))
            })
            .await
    }

    async fn probe_remote(&self) -> Result<Option<String>> {
        let client = self.http_client().await?;
        RemoteFetcher::new(client, &self.config.base_url)
            .probe_etag()
            .await
    }

    async fn download_and_save(&self, progress: Option<ProgressCallback<'_>>) -> Result<String> {
        report(
            progress,
            ProgressPhase::Starting,
            "Connecting to Fuzzwork server...",
            None,
            0,
            0,
        );
        report(
            progress,
            ProgressPhase::Fetching,
            "Downloading compressed CSV...",
            None,
            0,
            0,
        );

        let client = self.http_client().await?;
        let fetcher = RemoteFetcher::new(client, &self.config.base_url);
        let result = match fetcher.download().await {
            Ok(result) => result,
            Err(e) => {
                report(
                    progress,
                    ProgressPhase::Error,
                    "CSV download failed",
                    Some(e.to_string()),
                    0,
                    0,
                );
                return Err(e);
            }
        };

        report(
            progress,
            ProgressPhase::Processing,
            "Decompressing CSV data...",
            Some(format!("Downloaded {} bytes", result.compressed_size)),
            0,
            0,
        );
        report(
            progress,
            ProgressPhase::Saving,
            "Saving CSV to cache...",
            Some(format!("Decompressed size: {} bytes", result.byte_size)),
            0,
            0,
        );

        let now = Utc::now().to_rfc3339();
        let metadata = CacheMetadata {
            etag: result.etag.clone(),
            etag_present: Some(result.etag.is_some()),
            last_modified: result.last_modified.clone(),
            last_updated: Some(now.clone()),
            last_checked: Some(now),
            file_size: Some(result.byte_size),
        };

        self.store.write_csv(&result.csv_text);
        self.store.write_metadata(&metadata);

        info!(
            "Downloaded and cached fresh Fuzzwork CSV ({} bytes)",
            result.byte_size
        );

        report(
            progress,
            ProgressPhase::Complete,
            "CSV download complete",
            Some(format!("Saved {} bytes", result.byte_size)),
            1,
            1,
        );

        Ok(result.csv_text)
    }
}

fn report(
    progress: Option<ProgressCallback<'_>>,
    phase: ProgressPhase,
    message: &str,
    detail: Option<String>,
    current: u64,
    total: u64,
) {
    if let Some(callback) = progress {
        callback(ProgressUpdate {
            operation: OPERATION_NAME.to_string(),
            phase,
            current,
            total,
            message: message.to_string(),
            detail,
        });
    }
}
