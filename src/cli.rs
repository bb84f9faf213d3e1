use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "fuzzmarket")]
#[command(about = "Fuzzwork market data cache CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the aggregate market CSV, using the cache when fresh
    Fetch {
        /// Download fresh content regardless of cache state
        #[arg(long)]
        force: bool,
        /// Skip the remote ETag check when the cache is stale
        #[arg(long)]
        no_check_etag: bool,
        /// Cache directory (defaults to FUZZWORK_CACHE_DIR or ./fuzzwork_cache)
        #[arg(short, long)]
        cache_dir: Option<PathBuf>,
    },
    /// Show cached feed metadata
    Status {
        #[arg(short, long)]
        cache_dir: Option<PathBuf>,
    },
    /// Remove the cached CSV and metadata
    Clear {
        #[arg(short, long)]
        cache_dir: Option<PathBuf>,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            force,
            no_check_etag,
            cache_dir,
        } => {
            commands::fetch::run(force, no_check_etag, cache_dir);
        }
        Commands::Status { cache_dir } => {
            commands::status::run(cache_dir);
        }
        Commands::Clear { cache_dir } => {
            commands::clear::run(cache_dir);
        }
    }
}
