//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/prop-scout/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::geo::BoundingBox;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Home-region bounds
    #[serde(default)]
    pub region: RegionConfig,

    /// External geocoder settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Geocode cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// User position settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Home-region bounding box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_min_lat")]
    pub min_lat: f64,

    #[serde(default = "default_max_lat")]
    pub max_lat: f64,

    #[serde(default = "default_min_lng")]
    pub min_lng: f64,

    #[serde(default = "default_max_lng")]
    pub max_lng: f64,
}

/// External geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Whether to consult the external geocoder at all
    #[serde(default = "default_geocoder_enabled")]
    pub enabled: bool,

    /// Timeout for a single geocoder call in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

/// Geocode cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in days
    #[serde(default = "default_cache_ttl_days")]
    pub ttl_days: i64,
}

/// User position settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Timeout for acquiring the user position in seconds
    #[serde(default = "default_position_timeout")]
    pub position_timeout_secs: u64,

    /// If true, fall back to IP geolocation when no position given
    #[serde(default)]
    pub default_here: bool,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_min_lat() -> f64 {
    DEFAULT_MIN_LAT
}
fn default_max_lat() -> f64 {
    DEFAULT_MAX_LAT
}
fn default_min_lng() -> f64 {
    DEFAULT_MIN_LNG
}
fn default_max_lng() -> f64 {
    DEFAULT_MAX_LNG
}
fn default_geocoder_enabled() -> bool {
    DEFAULT_GEOCODER_ENABLED
}
fn default_geocoder_timeout() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}
fn default_cache_ttl_days() -> i64 {
    DEFAULT_CACHE_TTL_DAYS
}
fn default_position_timeout() -> u64 {
    DEFAULT_POSITION_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_lat: default_min_lat(),
            max_lat: default_max_lat(),
            min_lng: default_min_lng(),
            max_lng: default_max_lng(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: default_geocoder_enabled(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_cache_ttl_days(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            position_timeout_secs: default_position_timeout(),
            default_here: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["region", "min_lat"] => Some(self.region.min_lat.to_string()),
            ["region", "max_lat"] => Some(self.region.max_lat.to_string()),
            ["region", "min_lng"] => Some(self.region.min_lng.to_string()),
            ["region", "max_lng"] => Some(self.region.max_lng.to_string()),

            ["geocoder", "enabled"] => Some(self.geocoder.enabled.to_string()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),

            ["cache", "ttl_days"] => Some(self.cache.ttl_days.to_string()),

            ["location", "position_timeout_secs"] => {
                Some(self.location.position_timeout_secs.to_string())
            }
            ["location", "default_here"] => Some(self.location.default_here.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["region", "min_lat"] => {
                self.region.min_lat = parse_value(key, value)?;
            }
            ["region", "max_lat"] => {
                self.region.max_lat = parse_value(key, value)?;
            }
            ["region", "min_lng"] => {
                self.region.min_lng = parse_value(key, value)?;
            }
            ["region", "max_lng"] => {
                self.region.max_lng = parse_value(key, value)?;
            }

            ["geocoder", "enabled"] => {
                self.geocoder.enabled = parse_value(key, value)?;
            }
            ["geocoder", "timeout_secs"] => {
                self.geocoder.timeout_secs = parse_value(key, value)?;
            }

            ["cache", "ttl_days"] => {
                self.cache.ttl_days = parse_value(key, value)?;
            }

            ["location", "position_timeout_secs"] => {
                self.location.position_timeout_secs = parse_value(key, value)?;
            }
            ["location", "default_here"] => {
                self.location.default_here = parse_value(key, value)?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(key, value)?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "region.min_lat",
            "region.max_lat",
            "region.min_lng",
            "region.max_lng",
            "geocoder.enabled",
            "geocoder.timeout_secs",
            "cache.ttl_days",
            "location.position_timeout_secs",
            "location.default_here",
            "server.host",
            "server.port",
            "output.format",
        ]
    }

    /// The configured region as a bounding box
    pub fn region_bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.region.min_lat,
            self.region.max_lat,
            self.region.min_lng,
            self.region.max_lng,
        )
    }

    /// Geocoder timeout as a Duration
    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder.timeout_secs)
    }

    /// Position acquisition timeout as a Duration
    pub fn position_timeout(&self) -> Duration {
        Duration::from_secs(self.location.position_timeout_secs)
    }

    /// Cache TTL in seconds
    pub fn cache_ttl_secs(&self) -> i64 {
        self.cache.ttl_days * 24 * 3600
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.region.min_lat, 22.0);
        assert_eq!(config.region.max_lng, 37.0);
        assert!(config.geocoder.enabled);
        assert_eq!(config.cache.ttl_days, 30);
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("cache.ttl_days"), Some("30".to_string()));

        config.set("cache.ttl_days", "7").unwrap();
        assert_eq!(config.cache.ttl_days, 7);

        config.set("geocoder.enabled", "false").unwrap();
        assert!(!config.geocoder.enabled);

        config.set("region.min_lat", "21.5").unwrap();
        assert_eq!(config.region.min_lat, 21.5);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_number").is_err());
        assert!(config.set("geocoder.enabled", "maybe").is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(loaded.region.min_lat, 22.0);
        assert_eq!(loaded.cache.ttl_days, 30);
        assert_eq!(loaded.server.port, 7878);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[region]"));
        assert!(toml.contains("[geocoder]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("[server]"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let loaded: Config = toml::from_str("[server]\nport = 9000\n").unwrap();

        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.server.host, "127.0.0.1");
        assert_eq!(loaded.cache.ttl_days, 30);
    }

    #[test]
    fn test_region_bounds() {
        let config = Config::default();
        let bounds = config.region_bounds();

        assert!(bounds.contains(30.0444, 31.2357));
        assert!(!bounds.contains(51.5, -0.12));
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.geocoder_timeout().as_secs(), 5);
        assert_eq!(config.position_timeout().as_secs(), 5);
        assert_eq!(config.cache_ttl_secs(), 30 * 24 * 3600);
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        assert!(keys.contains(&"region.min_lat"));
        assert!(keys.contains(&"cache.ttl_days"));
        assert!(keys.contains(&"server.port"));
    }
}
