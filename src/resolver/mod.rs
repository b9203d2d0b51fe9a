//! Coordinate resolution
//!
//! Derives a best-effort coordinate for a listing from whatever location
//! signals it carries. Sources are tried in a fixed priority order,
//! expressed as a list of strategy variants interpreted in sequence; the
//! first strategy that produces a coordinate wins and weaker sources are
//! never consulted. Resolution is pure: the same listing and table state
//! always yield the same coordinate and provenance tag.

pub mod places;

use crate::constants::accuracy::{ADDRESS_ESTIMATED_METERS, AREA_METERS, CITY_DEFAULT_METERS};
use crate::constants::geo::ADDRESS_JITTER_DEGREES;
use crate::geo::{BoundingBox, Coordinate, CoordinateSource};
use crate::listing::Locatable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One source of location data, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Listing's own latitude/longitude fields
    Explicit,
    /// Coordinates on the referenced area record
    AreaLevel,
    /// Deterministic jitter around the area centroid, seeded by the address
    AddressEstimated,
    /// Named-location table lookup on the area/city name
    NamedFallback,
    /// Hash-derived coordinate inside the home region; always succeeds
    ProceduralDefault,
}

/// The full resolution chain, strongest source first
pub const DEFAULT_STRATEGIES: &[ResolutionStrategy] = &[
    ResolutionStrategy::Explicit,
    ResolutionStrategy::AreaLevel,
    ResolutionStrategy::AddressEstimated,
    ResolutionStrategy::NamedFallback,
    ResolutionStrategy::ProceduralDefault,
];

/// Deterministic string hash
///
/// Polynomial hash (`h = h*31 + char`) truncated to the 32-bit signed
/// range, absolute value taken. Drives address jitter and the procedural
/// default; determinism across calls is what matters, not the exact bits.
pub fn name_hash(s: &str) -> u32 {
    let mut h: i32 = 0;
    for c in s.chars() {
        h = h.wrapping_mul(31).wrapping_add(c as i32);
    }
    h.unsigned_abs()
}

/// Resolves listing location signals into coordinates
#[derive(Debug, Clone)]
pub struct CoordinateResolver {
    bounds: BoundingBox,
    strategies: Vec<ResolutionStrategy>,
}

impl Default for CoordinateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateResolver {
    /// Resolver with the full strategy chain over the home region
    pub fn new() -> Self {
        Self {
            bounds: BoundingBox::home_region(),
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    /// Override the region bounding box
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// Restrict resolution to a subset of the chain
    ///
    /// Without `ProceduralDefault` in the list, resolution can fail and
    /// the listing ranks with an unknown distance.
    pub fn with_strategies(mut self, strategies: &[ResolutionStrategy]) -> Self {
        self.strategies = strategies.to_vec();
        self
    }

    /// The region box this resolver clamps and validates against
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// The configured strategy chain, strongest first
    pub fn strategies(&self) -> &[ResolutionStrategy] {
        &self.strategies
    }

    /// Resolve a coordinate for a listing via the configured chain
    pub fn resolve<T: Locatable>(&self, listing: &T) -> Option<Coordinate> {
        self.resolve_with(&self.strategies, listing)
    }

    /// Resolve using an explicit strategy list, strongest first
    pub fn resolve_with<T: Locatable>(
        &self,
        strategies: &[ResolutionStrategy],
        listing: &T,
    ) -> Option<Coordinate> {
        for strategy in strategies {
            let coord = match strategy {
                ResolutionStrategy::Explicit => self.try_explicit(listing),
                ResolutionStrategy::AreaLevel => self.try_area(listing),
                ResolutionStrategy::AddressEstimated => self.try_address_estimated(listing),
                ResolutionStrategy::NamedFallback => self.try_named_fallback(listing),
                ResolutionStrategy::ProceduralDefault => Some(self.procedural_default(listing)),
            };
            if let Some(coord) = coord {
                return Some(coord);
            }
        }
        None
    }

    fn try_explicit<T: Locatable>(&self, listing: &T) -> Option<Coordinate> {
        let (lat, lng) = parse_pair(listing.raw_latitude(), listing.raw_longitude())?;
        Some(Coordinate::new(lat, lng, CoordinateSource::Explicit))
    }

    fn try_area<T: Locatable>(&self, listing: &T) -> Option<Coordinate> {
        let area = listing.area()?;
        let (lat, lng) = parse_pair(area.latitude.as_deref(), area.longitude.as_deref())?;
        Some(Coordinate::new(lat, lng, CoordinateSource::Area).with_accuracy(AREA_METERS))
    }

    /// Estimate a position from the address string
    ///
    /// The address itself carries no coordinates; instead the area centroid
    /// anchors the listing and a hash of the address spreads listings that
    /// share an area across a small neighborhood. Same address, same spot.
    fn try_address_estimated<T: Locatable>(&self, listing: &T) -> Option<Coordinate> {
        let address = listing.address()?.trim();
        if address.is_empty() {
            return None;
        }

        let name = places::normalize_place_name(listing.area_name().unwrap_or(""));
        let base = places::lookup(&name)?;

        let h = name_hash(address);
        let jitter_lat = ((h % 200) as f64 - 100.0) / 100.0 * ADDRESS_JITTER_DEGREES;
        let jitter_lng = ((h.wrapping_mul(7) % 200) as f64 - 100.0) / 100.0 * ADDRESS_JITTER_DEGREES;

        let (lat, lng) = self
            .bounds
            .clamp(base.latitude + jitter_lat, base.longitude + jitter_lng);

        debug!(address, lat, lng, "estimated position from address");
        Some(
            Coordinate::new(lat, lng, CoordinateSource::AddressEstimated)
                .with_accuracy(ADDRESS_ESTIMATED_METERS),
        )
    }

    fn try_named_fallback<T: Locatable>(&self, listing: &T) -> Option<Coordinate> {
        let name = places::normalize_place_name(listing.area_name()?);
        places::lookup(&name)
    }

    /// Derive a coordinate from the (possibly empty) area name alone
    ///
    /// Scales two hash components into the region box so listings with no
    /// usable signals still land somewhere stable instead of vanishing.
    fn procedural_default<T: Locatable>(&self, listing: &T) -> Coordinate {
        let name = listing.area_name().unwrap_or("");
        let h = name_hash(name);

        let lat_span = self.bounds.max_lat - self.bounds.min_lat;
        let lng_span = self.bounds.max_lng - self.bounds.min_lng;
        let lat = self.bounds.min_lat + (h % 1000) as f64 / 1000.0 * lat_span;
        let lng = self.bounds.min_lng + (h.wrapping_mul(13) % 1000) as f64 / 1000.0 * lng_span;

        let (lat, lng) = self.bounds.clamp(lat, lng);
        Coordinate::new(lat, lng, CoordinateSource::CityDefault)
            .with_accuracy(CITY_DEFAULT_METERS)
    }
}

/// Parse a raw latitude/longitude string pair
///
/// Unparsable or out-of-range values are treated as absent so resolution
/// falls through to the next source rather than failing the listing.
fn parse_pair(lat: Option<&str>, lng: Option<&str>) -> Option<(f64, f64)> {
    let lat_raw = lat?.trim();
    let lng_raw = lng?.trim();

    let lat: f64 = match lat_raw.parse() {
        Ok(v) => v,
        Err(_) => {
            debug!(raw = lat_raw, "unparsable latitude, falling through");
            return None;
        }
    };
    let lng: f64 = match lng_raw.parse() {
        Ok(v) => v,
        Err(_) => {
            debug!(raw = lng_raw, "unparsable longitude, falling through");
            return None;
        }
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        debug!(lat, lng, "coordinates out of range, falling through");
        return None;
    }

    Some((lat, lng))
}
