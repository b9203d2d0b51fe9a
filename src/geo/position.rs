//! User position acquisition
//!
//! The ranking core never guesses the user's position: it is supplied by a
//! position provider collaborator. The production provider uses ip-api.com
//! with file-based caching; a fixed provider covers explicit --lat/--lng
//! input and tests.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_POSITION_CACHE_FILE, IP_POSITION_TTL_SECS};
use crate::error::{Error, Result};
use crate::geo::{Coordinate, CoordinateSource};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Trait for user position providers
///
/// `current_position` must respect the supplied timeout; callers treat a
/// permission denial as a hard stop for ranking, so implementations should
/// return [`Error::PermissionDenied`] rather than inventing a position.
pub trait PositionProvider: Send + Sync {
    /// Ask the provider for permission to read the user's position
    fn request_permission(&self) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// The user's current position, bounded by `timeout`
    fn current_position(
        &self,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<Coordinate>> + Send;
}

/// IP-based position provider with caching
#[derive(Debug)]
pub struct IpPositionProvider {
    client: reqwest::Client,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Cached position data
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPosition {
    latitude: f64,
    longitude: f64,
    timestamp: u64,
}

impl IpPositionProvider {
    /// Create a provider with the default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir().map(|p| p.join("prop-scout").join(IP_POSITION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            cache_path,
        }
    }

    /// Create a provider with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: Some(cache_path),
        }
    }

    /// Create a provider without caching
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: None,
        }
    }

    /// Fetch position from ip-api.com
    async fn fetch_position(&self) -> Result<Coordinate> {
        let response = self
            .client
            .get(IP_API_URL)
            .send()
            .await
            .map_err(|e| Error::Position(format!("IP position request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Position(format!(
                "IP position API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Position(format!("Failed to parse IP position response: {}", e)))?;

        if data.status != "success" {
            return Err(Error::Position("IP position lookup failed".to_string()));
        }

        let lat = data
            .lat
            .ok_or_else(|| Error::Position("No latitude in response".to_string()))?;
        let lng = data
            .lon
            .ok_or_else(|| Error::Position("No longitude in response".to_string()))?;

        Ok(Coordinate::new(lat, lng, CoordinateSource::Explicit))
    }

    /// Load cached position if still valid
    fn load_cache(&self) -> Option<Coordinate> {
        let cache_path = self.cache_path.as_ref()?;

        if !cache_path.exists() {
            return None;
        }

        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedPosition = serde_json::from_str(&content).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        if now - cached.timestamp < IP_POSITION_TTL_SECS {
            Some(Coordinate::new(
                cached.latitude,
                cached.longitude,
                CoordinateSource::Explicit,
            ))
        } else {
            None
        }
    }

    /// Save position to cache
    fn save_cache(&self, position: &Coordinate) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let cached = CachedPosition {
            latitude: position.latitude,
            longitude: position.longitude,
            timestamp,
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

impl Default for IpPositionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for IpPositionProvider {
    async fn request_permission(&self) -> Result<bool> {
        // IP lookup needs no device permission
        Ok(true)
    }

    async fn current_position(&self, timeout: Duration) -> Result<Coordinate> {
        if let Some(cached) = self.load_cache() {
            return Ok(cached);
        }

        let position = tokio::time::timeout(timeout, self.fetch_position())
            .await
            .map_err(|_| Error::Position("IP position request timed out".to_string()))??;

        self.save_cache(&position);
        Ok(position)
    }
}

/// Fixed position provider for explicit coordinates and tests
#[derive(Debug, Clone)]
pub struct FixedPositionProvider {
    coordinate: Coordinate,
}

impl FixedPositionProvider {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude, CoordinateSource::Explicit),
        }
    }
}

impl PositionProvider for FixedPositionProvider {
    async fn request_permission(&self) -> Result<bool> {
        Ok(true)
    }

    async fn current_position(&self, _timeout: Duration) -> Result<Coordinate> {
        Ok(self.coordinate)
    }
}
