//! Geocode result caching
//!
//! Successful external geocodes are remembered so repeated lookups for the
//! same place name never hit the network again within the TTL. The cache
//! persists as JSON under a single versioned key in an injected key-value
//! store; corrupt or unparsable persisted data is treated as an empty
//! cache, never as a fatal error.

use crate::constants::cache::{GEOCODE_CACHE_KEY, GEOCODE_TTL_SECS};
use crate::error::{Error, Result};
use crate::geo::{Coordinate, CoordinateSource};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

/// Scoped key-value persistence supplied by the host environment
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// File-backed store under the user cache directory
///
/// Each key maps to one file in the store directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under the default cache directory
    pub fn new() -> Result<Self> {
        let dir = dirs::cache_dir()
            .map(|p| p.join("prop-scout"))
            .ok_or_else(|| Error::Cache("Could not determine cache directory".to_string()))?;
        Ok(Self { dir })
    }

    /// Store under a specific directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral use
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.lock().unwrap().remove(key);
        Ok(())
    }
}

/// One cached geocode result
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedCoordinate {
    coordinate: Coordinate,
    /// Epoch seconds at insertion
    cached_at: i64,
}

/// Counts for cache observability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_cached: usize,
    pub by_source: HashMap<String, usize>,
}

/// TTL-bounded cache of name → coordinate lookups
///
/// Writes are serialized behind a mutex; the table loads once at
/// construction and saves on every write.
pub struct GeocodeCache {
    store: Box<dyn KeyValueStore>,
    entries: Mutex<HashMap<String, CachedCoordinate>>,
    ttl_secs: i64,
}

impl GeocodeCache {
    /// Load the cache from the given store
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let entries = match store.get_item(GEOCODE_CACHE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!("discarding corrupt geocode cache: {}", e);
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!("could not read geocode cache: {}", e);
                HashMap::new()
            }
        };

        Self {
            store,
            entries: Mutex::new(entries),
            ttl_secs: GEOCODE_TTL_SECS,
        }
    }

    /// Override the TTL (seconds)
    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Look up a cached coordinate by normalized key
    ///
    /// Fresh entries come back re-tagged as [`CoordinateSource::Cached`];
    /// stale entries are evicted and None is returned.
    pub fn get(&self, normalized_key: &str) -> Option<Coordinate> {
        self.get_at(normalized_key, Utc::now().timestamp())
    }

    fn get_at(&self, normalized_key: &str, now_secs: i64) -> Option<Coordinate> {
        let mut entries = self.entries.lock().unwrap();

        let entry = entries.get(normalized_key)?;
        if now_secs - entry.cached_at < self.ttl_secs {
            return Some(entry.coordinate.retagged(CoordinateSource::Cached));
        }

        entries.remove(normalized_key);
        self.persist(&entries);
        None
    }

    /// Store a coordinate, overwriting any prior entry for the key
    pub fn put(&self, normalized_key: &str, coordinate: Coordinate) {
        self.put_at(normalized_key, coordinate, Utc::now().timestamp());
    }

    fn put_at(&self, normalized_key: &str, coordinate: Coordinate, now_secs: i64) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            normalized_key.to_string(),
            CachedCoordinate {
                coordinate,
                cached_at: now_secs,
            },
        );
        self.persist(&entries);
    }

    /// Drop every entry and the persisted copy
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
        if let Err(e) = self.store.remove_item(GEOCODE_CACHE_KEY) {
            warn!("could not clear persisted geocode cache: {}", e);
        }
    }

    /// Entry counts, total and by provenance tag
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap();
        let mut by_source: HashMap<String, usize> = HashMap::new();
        for entry in entries.values() {
            *by_source.entry(entry.coordinate.source.to_string()).or_insert(0) += 1;
        }
        CacheStats {
            total_cached: entries.len(),
            by_source,
        }
    }

    fn persist(&self, entries: &HashMap<String, CachedCoordinate>) {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("could not serialize geocode cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set_item(GEOCODE_CACHE_KEY, &raw) {
            warn!("could not persist geocode cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::accuracy::GEOCODED_METERS;
    use tempfile::TempDir;

    fn geocoded(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng, CoordinateSource::Geocoded).with_accuracy(GEOCODED_METERS)
    }

    #[test]
    fn test_put_then_get() {
        let cache = GeocodeCache::new(Box::new(MemoryStore::new()));
        cache.put("maadi", geocoded(29.96, 31.25));

        let hit = cache.get("maadi").unwrap();
        assert_eq!(hit.latitude, 29.96);
        assert_eq!(hit.source, CoordinateSource::Cached);
    }

    #[test]
    fn test_miss() {
        let cache = GeocodeCache::new(Box::new(MemoryStore::new()));
        assert!(cache.get("zamalek").is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = GeocodeCache::new(Box::new(MemoryStore::new()));
        cache.put("maadi", geocoded(29.0, 31.0));
        cache.put("maadi", geocoded(29.96, 31.25));

        assert_eq!(cache.get("maadi").unwrap().latitude, 29.96);
        assert_eq!(cache.stats().total_cached, 1);
    }

    #[test]
    fn test_ttl_expiry_evicts() {
        let cache = GeocodeCache::new(Box::new(MemoryStore::new()));
        let inserted_at = 1_700_000_000;
        cache.put_at("maadi", geocoded(29.96, 31.25), inserted_at);

        // One second past the TTL: gone, and evicted from the map
        assert!(cache
            .get_at("maadi", inserted_at + GEOCODE_TTL_SECS + 1)
            .is_none());
        assert_eq!(cache.stats().total_cached, 0);
    }

    #[test]
    fn test_just_inside_ttl_survives() {
        let cache = GeocodeCache::new(Box::new(MemoryStore::new()));
        let inserted_at = 1_700_000_000;
        cache.put_at("maadi", geocoded(29.96, 31.25), inserted_at);

        assert!(cache
            .get_at("maadi", inserted_at + GEOCODE_TTL_SECS - 1)
            .is_some());
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        let cache = GeocodeCache::new(Box::new(store));
        cache.put("maadi", geocoded(29.96, 31.25));
        cache.put("zamalek", geocoded(30.06, 31.22));

        cache.clear();
        assert_eq!(cache.stats().total_cached, 0);
        assert!(cache.get("maadi").is_none());
    }

    #[test]
    fn test_stats_by_source() {
        let cache = GeocodeCache::new(Box::new(MemoryStore::new()));
        cache.put("maadi", geocoded(29.96, 31.25));
        cache.put("zamalek", geocoded(30.06, 31.22));

        let stats = cache.stats();
        assert_eq!(stats.total_cached, 2);
        assert_eq!(stats.by_source.get("geocoded"), Some(&2));
    }

    #[test]
    fn test_corrupt_persisted_data_is_empty_cache() {
        let store = MemoryStore::new();
        store.set_item(GEOCODE_CACHE_KEY, "{not json at all").unwrap();

        let cache = GeocodeCache::new(Box::new(store));
        assert_eq!(cache.stats().total_cached, 0);
    }

    #[test]
    fn test_persists_across_instances() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_path_buf();

        {
            let cache = GeocodeCache::new(Box::new(FileStore::with_dir(dir.clone())));
            cache.put("maadi", geocoded(29.96, 31.25));
        }

        let reloaded = GeocodeCache::new(Box::new(FileStore::with_dir(dir)));
        let hit = reloaded.get("maadi").unwrap();
        assert_eq!(hit.latitude, 29.96);
        assert_eq!(hit.source, CoordinateSource::Cached);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp.path().to_path_buf());

        assert!(store.get_item("k").unwrap().is_none());
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.remove_item("k").unwrap();
        assert!(store.get_item("k").unwrap().is_none());
        // Removing a missing key is not an error
        store.remove_item("k").unwrap();
    }
}
