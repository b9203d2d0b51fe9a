//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default home-region bounds (approximate extent of Egypt)
pub const DEFAULT_MIN_LAT: f64 = 22.0;
pub const DEFAULT_MAX_LAT: f64 = 32.0;
pub const DEFAULT_MIN_LNG: f64 = 25.0;
pub const DEFAULT_MAX_LNG: f64 = 37.0;

/// External geocoder enabled by default
pub const DEFAULT_GEOCODER_ENABLED: bool = true;

/// Timeout for a single geocoder call in seconds
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 5;

/// Geocode cache TTL in days
pub const DEFAULT_CACHE_TTL_DAYS: i64 = 30;

/// Timeout for acquiring the user position in seconds
pub const DEFAULT_POSITION_TIMEOUT_SECS: u64 = 5;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "prop-scout";
