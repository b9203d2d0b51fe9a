//! Geographic primitives
//!
//! Coordinates with provenance, bounding-box containment, haversine
//! distance, and the geocoding/position collaborator traits.

pub mod distance;
pub mod nominatim;
pub mod position;

use crate::constants::geo::{REGION_MAX_LAT, REGION_MAX_LNG, REGION_MIN_LAT, REGION_MIN_LNG};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Where a resolved coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSource {
    /// Listing carried its own latitude/longitude
    Explicit,
    /// Taken from the listing's area/region record
    Area,
    /// Jittered around an area centroid from the address string
    AddressEstimated,
    /// Named-location table or procedural fallback
    CityDefault,
    /// Fresh result from the external geocoder
    Geocoded,
    /// Previously geocoded, served from the cache
    Cached,
}

impl std::fmt::Display for CoordinateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Area => write!(f, "area"),
            Self::AddressEstimated => write!(f, "address_estimated"),
            Self::CityDefault => write!(f, "city_default"),
            Self::Geocoded => write!(f, "geocoded"),
            Self::Cached => write!(f, "cached"),
        }
    }
}

/// A geographic coordinate with provenance
///
/// Immutable once constructed. Latitude/longitude are double precision and
/// never rounded; only distances are rounded at presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,

    /// Approximate accuracy in meters, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    pub source: CoordinateSource,
}

impl Coordinate {
    /// Create a new coordinate with the given provenance
    pub fn new(latitude: f64, longitude: f64, source: CoordinateSource) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            source,
        }
    }

    /// Attach a nominal accuracy in meters
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Return a copy re-tagged with a different source
    pub fn retagged(mut self, source: CoordinateSource) -> Self {
        self.source = source;
        self
    }

    /// Validate that the coordinate is within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if self.latitude < -90.0 || self.latitude > 90.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.latitude
            )));
        }
        if self.longitude < -180.0 || self.longitude > 180.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// A rectangular bounding box used for region containment checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// The configured home region (approximate extent of Egypt)
    pub fn home_region() -> Self {
        Self::new(REGION_MIN_LAT, REGION_MAX_LAT, REGION_MIN_LNG, REGION_MAX_LNG)
    }

    /// Check whether a latitude/longitude pair falls inside this box
    ///
    /// Used to reject externally geocoded results that land outside the
    /// expected operating region (e.g. a same-named place in another
    /// country).
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }

    /// Clamp a latitude/longitude pair into this box
    pub fn clamp(&self, lat: f64, lng: f64) -> (f64, f64) {
        (
            lat.clamp(self.min_lat, self.max_lat),
            lng.clamp(self.min_lng, self.max_lng),
        )
    }
}

/// Trait for geocoding backends
///
/// Implementations must be thread-safe (Send + Sync) to work with the
/// async server. The ranker never depends on a geocoder succeeding; any
/// error or empty result falls through to the next resolution source.
pub trait Geocoder: Send + Sync {
    /// Geocode a free-text query to a coordinate
    ///
    /// Returns the best match for the query, or None if not found
    fn geocode(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Option<Coordinate>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validate() {
        assert!(Coordinate::new(30.0, 31.0, CoordinateSource::Explicit)
            .validate()
            .is_ok());
        assert!(Coordinate::new(-90.0, 180.0, CoordinateSource::Explicit)
            .validate()
            .is_ok());
        assert!(Coordinate::new(90.5, 31.0, CoordinateSource::Explicit)
            .validate()
            .is_err());
        assert!(Coordinate::new(30.0, -180.5, CoordinateSource::Explicit)
            .validate()
            .is_err());
    }

    #[test]
    fn test_coordinate_serialization() {
        let coord = Coordinate::new(30.0444, 31.2357, CoordinateSource::Explicit);
        let json = serde_json::to_string(&coord).unwrap();
        let parsed: Coordinate = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.latitude, 30.0444);
        assert_eq!(parsed.source, CoordinateSource::Explicit);
        assert!(!json.contains("accuracy"));
    }

    #[test]
    fn test_retagged() {
        let coord = Coordinate::new(30.0, 31.0, CoordinateSource::Geocoded).with_accuracy(100.0);
        let cached = coord.retagged(CoordinateSource::Cached);

        assert_eq!(cached.source, CoordinateSource::Cached);
        assert_eq!(cached.latitude, coord.latitude);
        assert_eq!(cached.accuracy, Some(100.0));
    }

    #[test]
    fn test_bounding_box_contains() {
        let bounds = BoundingBox::home_region();

        assert!(bounds.contains(30.0444, 31.2357)); // Cairo
        assert!(!bounds.contains(51.5074, -0.1278)); // London
        assert!(bounds.contains(22.0, 25.0)); // Edges are inside
    }

    #[test]
    fn test_bounding_box_clamp() {
        let bounds = BoundingBox::home_region();

        let (lat, lng) = bounds.clamp(50.0, 10.0);
        assert_eq!(lat, 32.0);
        assert_eq!(lng, 25.0);

        let (lat, lng) = bounds.clamp(30.0, 31.0);
        assert_eq!(lat, 30.0);
        assert_eq!(lng, 31.0);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(CoordinateSource::AddressEstimated.to_string(), "address_estimated");
        assert_eq!(CoordinateSource::CityDefault.to_string(), "city_default");
    }
}
