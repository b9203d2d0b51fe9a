//! Cache command handler
//!
//! Shows statistics for and clears the persisted geocode cache.

use crate::cache::{FileStore, GeocodeCache};
use crate::config::Config;
use crate::error::Result;
use clap::{Args, Subcommand};

/// Cache command arguments
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cache statistics
    Stats,

    /// Empty the cache
    Clear,
}

/// Run the cache command
pub fn run(args: CacheArgs) -> Result<()> {
    let config = Config::load()?;
    let cache = GeocodeCache::new(Box::new(FileStore::new()?)).with_ttl(config.cache_ttl_secs());

    match args.command {
        CacheCommands::Stats => {
            let stats = cache.stats();
            println!("Cached lookups: {}", stats.total_cached);
            if !stats.by_source.is_empty() {
                println!("By source:");
                let mut sources: Vec<_> = stats.by_source.iter().collect();
                sources.sort();
                for (source, count) in sources {
                    println!("  {}: {}", source, count);
                }
            }
        }
        CacheCommands::Clear => {
            cache.clear();
            println!("Geocode cache cleared");
        }
    }

    Ok(())
}
