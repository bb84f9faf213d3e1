use std::path::PathBuf;

use crate::services::{ClientConfig, FuzzworkClient};

pub fn run(cache_dir: Option<PathBuf>) {
    let mut config = ClientConfig::default();
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    println!("📊 Fuzzwork Cache Status\n");
    println!("📁 Cache directory: {}", config.cache_dir.display());

    let client = FuzzworkClient::new(config);

    let Some(metadata) = client.get_cache_metadata() else {
        println!("\n⚠️  No cached metadata found. Run 'fetch' first.");
        return;
    };

    println!();
    print_field("ETag", metadata.etag.as_deref());
    print_field("Last modified", metadata.last_modified.as_deref());
    print_field("Last updated", metadata.last_updated.as_deref());
    print_field("Last checked", metadata.last_checked.as_deref());
    match metadata.file_size {
        Some(size) => println!("   File size:     {} bytes", size),
        None => println!("   File size:     (unknown)"),
    }
}

fn print_field(label: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("   {:<14} {}", format!("{}:", label), value),
        None => println!("   {:<14} (none)", format!("{}:", label)),
    }
}
