pub mod cache_store;
pub mod fetcher;
pub mod freshness;
pub mod fuzzwork;

pub use cache_store::CacheStore;
pub use fetcher::{DownloadResult, RemoteFetcher};
pub use freshness::{decide, resolve_probe, FetchAction, ProbeResolution};
pub use fuzzwork::{ClientConfig, FuzzworkClient};
