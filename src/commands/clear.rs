use std::path::PathBuf;

use crate::services::{ClientConfig, FuzzworkClient};

pub fn run(cache_dir: Option<PathBuf>) {
    let mut config = ClientConfig::default();
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    let dir = config.cache_dir.clone();

    let client = FuzzworkClient::new(config);
    client.clear_cache();

    println!("🧹 Cleared Fuzzwork cache in {}", dir.display());
}
