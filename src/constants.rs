//! Centralized constants for the prop-scout crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers (WGS84 approximation)
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Home-region bounding box: approximate extent of Egypt.
    /// Estimated and procedurally derived coordinates are clamped to this box.
    pub const REGION_MIN_LAT: f64 = 22.0;
    pub const REGION_MAX_LAT: f64 = 32.0;
    pub const REGION_MIN_LNG: f64 = 25.0;
    pub const REGION_MAX_LNG: f64 = 37.0;

    /// Maximum jitter applied to address-estimated coordinates, in degrees
    pub const ADDRESS_JITTER_DEGREES: f64 = 0.1;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Cache settings
pub mod cache {
    /// Geocode cache TTL in seconds (30 days)
    pub const GEOCODE_TTL_SECS: i64 = 30 * 24 * 3600;

    /// Single versioned key the geocode cache persists under
    pub const GEOCODE_CACHE_KEY: &str = "geocode_cache_v1";

    /// IP position cache duration in seconds (1 hour)
    pub const IP_POSITION_TTL_SECS: u64 = 3600;

    /// IP position cache file name
    pub const IP_POSITION_CACHE_FILE: &str = "ip_position_cache.json";
}

/// Nominal accuracy (meters) attached to resolved coordinates by source
pub mod accuracy {
    /// Area-level coordinates cover a district
    pub const AREA_METERS: f64 = 1_000.0;

    /// Address estimation jitters around an area centroid
    pub const ADDRESS_ESTIMATED_METERS: f64 = 2_000.0;

    /// Named-location and procedural fallbacks are city-scale
    pub const CITY_DEFAULT_METERS: f64 = 5_000.0;

    /// Externally geocoded results are street-scale
    pub const GEOCODED_METERS: f64 = 100.0;
}
