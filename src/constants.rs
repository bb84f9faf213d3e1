//! Fuzzwork Feed Constants
//!
//! Timing windows and cache layout for the aggregate market CSV feed.
//!
//! ## Update Cadence
//!
//! Fuzzwork regenerates the aggregate CSV roughly once per hour. The
//! 31-minute wait window below assumes that cadence: probing the remote
//! ETag any sooner than that after the recorded `Last-Modified` time is
//! almost guaranteed to be a wasted request.

/// Upstream gzip-compressed aggregate CSV endpoint
pub const AGGREGATE_CSV_URL: &str = "https://market.fuzzwork.co.uk/aggregatecsv.csv.gz";

/// Minutes after the recorded `Last-Modified` time before a remote ETag
/// check is worth attempting
pub const ETAG_WAIT_MINUTES: i64 = 31;

/// Minimum seconds between remote ETag probe attempts (success or failure)
///
/// Prevents request storms when a caller retries rapidly after a failed
/// or inconclusive probe.
pub const MIN_FETCH_INTERVAL_SECONDS: i64 = 5 * 60;

/// Request timeout for HEAD and GET requests against the feed
pub const HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Decompressed CSV payload file name inside the cache directory
pub const CSV_FILE_NAME: &str = "aggregatecsv.csv";

/// JSON metadata sidecar file name inside the cache directory
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Default cache directory when `FUZZWORK_CACHE_DIR` is not set
pub const DEFAULT_CACHE_DIR: &str = "fuzzwork_cache";

/// User-Agent sent with every request against the feed
pub const DEFAULT_USER_AGENT: &str = concat!("fuzzmarket/", env!("CARGO_PKG_VERSION"));
