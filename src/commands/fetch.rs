use std::path::PathBuf;

use crate::progress::{ProgressPhase, ProgressUpdate};
use crate::services::{ClientConfig, FuzzworkClient};

pub fn run(force: bool, no_check_etag: bool, cache_dir: Option<PathBuf>) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let mut config = ClientConfig::default();
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    let client = FuzzworkClient::new(config);

    if force {
        println!("🔄 Forcing fresh download...");
    }

    let progress = |update: ProgressUpdate| {
        let icon = match update.phase {
            ProgressPhase::Starting => "🔌",
            ProgressPhase::Fetching => "📥",
            ProgressPhase::Processing => "📦",
            ProgressPhase::Saving => "💾",
            ProgressPhase::Complete => "✅",
            ProgressPhase::Error => "❌",
        };
        match &update.detail {
            Some(detail) => println!("{} {} ({})", icon, update.message, detail),
            None => println!("{} {}", icon, update.message),
        }
    };

    match runtime.block_on(client.fetch(force, !no_check_etag, Some(&progress))) {
        Ok(csv_text) => {
            let lines = csv_text.lines().count();
            println!(
                "\n✅ Market data ready: {} lines ({} bytes)",
                lines,
                csv_text.len()
            );
        }
        Err(e) => {
            eprintln!("\n❌ Fetch failed: {}", e);
            std::process::exit(1);
        }
    }
}
