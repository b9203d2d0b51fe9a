//! Shared server state

use crate::cache::{FileStore, GeocodeCache, MemoryStore};
use crate::config::Config;
use std::sync::Arc;
use std::time::Instant;

/// State shared across request handlers
pub struct AppState {
    pub config: Config,
    pub cache: Arc<GeocodeCache>,
    started: Instant,
}

impl AppState {
    /// Create state with the file-backed geocode cache
    ///
    /// Falls back to an in-memory cache when no cache directory can be
    /// determined; the server still works, it just forgets on restart.
    pub fn new(config: Config) -> Self {
        let cache = match FileStore::new() {
            Ok(store) => GeocodeCache::new(Box::new(store)),
            Err(_) => GeocodeCache::new(Box::new(MemoryStore::new())),
        };
        let cache = cache.with_ttl(config.cache_ttl_secs());

        Self {
            config,
            cache: Arc::new(cache),
            started: Instant::now(),
        }
    }

    /// Create state with a specific cache (for tests)
    pub fn with_cache(config: Config, cache: Arc<GeocodeCache>) -> Self {
        Self {
            config,
            cache,
            started: Instant::now(),
        }
    }

    /// Seconds since the server started
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
