//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::constants::accuracy::GEOCODED_METERS;
use crate::constants::api::NOMINATIM_URL;
use crate::error::{Error, Result};
use crate::geo::{BoundingBox, Coordinate, CoordinateSource, Geocoder};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = "prop-scout/0.1.0";

/// Nominatim geocoding backend
///
/// Results outside the configured region box are discarded — a geocoder
/// resolving a query to a same-named place in another country must not
/// override the local estimation chain.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    region: BoundingBox,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    /// Create a new Nominatim backend bounded to the home region
    pub fn new() -> Self {
        Self::with_region(BoundingBox::home_region())
    }

    /// Create a backend bounded to a specific region
    pub fn with_region(region: BoundingBox) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: NOMINATIM_URL.to_string(),
            region,
        }
    }

    /// Override the API base URL (for tests against a local stub)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lng)))?;
        Ok((lat, lng))
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        let Some(result) = results.into_iter().next() else {
            return Ok(None);
        };

        let (lat, lng) = Self::parse_coords(&result.lat, &result.lon)?;
        if !self.region.contains(lat, lng) {
            debug!(query, lat, lng, "geocoder result outside region, discarding");
            return Ok(None);
        }

        Ok(Some(
            Coordinate::new(lat, lng, CoordinateSource::Geocoded).with_accuracy(GEOCODED_METERS),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coords() {
        let (lat, lng) = NominatimGeocoder::parse_coords("30.0444", "31.2357").unwrap();
        assert!((lat - 30.0444).abs() < 0.0001);
        assert!((lng - 31.2357).abs() < 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimGeocoder::parse_coords("invalid", "0").is_err());
        assert!(NominatimGeocoder::parse_coords("0", "invalid").is_err());
    }

    #[test]
    fn test_backend_creation() {
        let backend = NominatimGeocoder::new();
        assert!(format!("{:?}", backend).contains("NominatimGeocoder"));
    }

    #[test]
    fn test_region_rejection_logic() {
        let region = BoundingBox::home_region();
        // London geocode of an ambiguous name must not pass the filter
        assert!(!region.contains(51.5074, -0.1278));
        assert!(region.contains(30.0444, 31.2357));
    }
}
