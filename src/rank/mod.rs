//! Proximity ranking
//!
//! Resolves a coordinate for every listing, computes the distance from the
//! user's position, and produces a stable distance-ascending order with
//! unlocatable listings at the tail. One listing failing to resolve never
//! aborts the batch.

use crate::cache::GeocodeCache;
use crate::error::{Error, Result};
use crate::geo::distance::distance_km;
use crate::geo::nominatim::NominatimGeocoder;
use crate::geo::{Coordinate, Geocoder};
use crate::listing::Locatable;
use crate::resolver::places::normalize_place_name;
use crate::resolver::{CoordinateResolver, ResolutionStrategy};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Default timeout for a single external geocoder call
pub const DEFAULT_GEOCODER_TIMEOUT: Duration = Duration::from_secs(5);

/// Sources tried before the geocoder is worth consulting; the rest of the
/// configured chain only runs when the geocoder could not help either.
const STRONG_STRATEGIES: &[ResolutionStrategy] = &[
    ResolutionStrategy::Explicit,
    ResolutionStrategy::AreaLevel,
];

/// A listing annotated with its resolved coordinate and distance
#[derive(Debug, Clone, Serialize)]
pub struct RankedListing<T> {
    pub listing: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    pub distance_label: String,
}

/// Cooperative cancellation handle
///
/// Checked between per-listing resolutions; a cancelled ranking returns
/// [`Error::Cancelled`] rather than a truncated result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Relaxed)
    }
}

/// Orchestrates resolution, distance computation and ordering
///
/// The geocoder and cache are optional collaborators owned by the
/// composition root and injected here; ranking works without either.
pub struct ProximityRanker<G: Geocoder = NominatimGeocoder> {
    resolver: CoordinateResolver,
    geocoder: Option<G>,
    cache: Option<Arc<GeocodeCache>>,
    geocoder_timeout: Duration,
}

impl ProximityRanker<NominatimGeocoder> {
    /// Ranker with the full resolution chain and no geocoder wired
    pub fn new() -> Self {
        Self {
            resolver: CoordinateResolver::new(),
            geocoder: None,
            cache: None,
            geocoder_timeout: DEFAULT_GEOCODER_TIMEOUT,
        }
    }
}

impl Default for ProximityRanker<NominatimGeocoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Geocoder> ProximityRanker<G> {
    /// Ranker with an external geocoder wired in
    pub fn with_geocoder(geocoder: G) -> Self {
        Self {
            resolver: CoordinateResolver::new(),
            geocoder: Some(geocoder),
            cache: None,
            geocoder_timeout: DEFAULT_GEOCODER_TIMEOUT,
        }
    }

    /// Replace the resolver (custom bounds or strategy subset)
    pub fn with_resolver(mut self, resolver: CoordinateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Attach a geocode cache
    pub fn with_cache(mut self, cache: Arc<GeocodeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Override the per-call geocoder timeout
    pub fn with_geocoder_timeout(mut self, timeout: Duration) -> Self {
        self.geocoder_timeout = timeout;
        self
    }

    /// Rank listings by distance from the user position
    ///
    /// Output order is a deterministic function of input order and resolved
    /// coordinates: ascending by distance, unknown distances last, ties and
    /// unknowns keeping their original relative order.
    pub async fn rank<T: Locatable>(
        &self,
        user: &Coordinate,
        listings: Vec<T>,
    ) -> Result<Vec<RankedListing<T>>> {
        self.rank_cancellable(user, listings, &CancelToken::new())
            .await
    }

    /// Rank with cooperative cancellation
    pub async fn rank_cancellable<T: Locatable>(
        &self,
        user: &Coordinate,
        listings: Vec<T>,
        cancel: &CancelToken,
    ) -> Result<Vec<RankedListing<T>>> {
        user.validate()?;

        let mut ranked = Vec::with_capacity(listings.len());
        for listing in listings {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let coordinate = self.resolve_listing(&listing).await;
            let distance = coordinate.as_ref().map(|c| distance_km(user, c));

            ranked.push(RankedListing {
                listing,
                coordinate,
                distance_km: distance,
                distance_label: distance_label(distance),
            });
        }

        // Vec::sort_by is stable, so equal and unknown distances keep
        // their input order.
        ranked.sort_by(|a, b| compare_distances(a.distance_km, b.distance_km));
        Ok(ranked)
    }

    /// Resolution order: listing-carried coordinates, then cache/geocoder,
    /// then the estimation part of the configured chain.
    async fn resolve_listing<T: Locatable>(&self, listing: &T) -> Option<Coordinate> {
        let (strong, fallback): (Vec<_>, Vec<_>) = self
            .resolver
            .strategies()
            .iter()
            .copied()
            .partition(|s| STRONG_STRATEGIES.contains(s));

        if let Some(coord) = self.resolver.resolve_with(&strong, listing) {
            return Some(coord);
        }
        if let Some(coord) = self.lookup_geocoded(listing).await {
            return Some(coord);
        }
        self.resolver.resolve_with(&fallback, listing)
    }

    async fn lookup_geocoded<T: Locatable>(&self, listing: &T) -> Option<Coordinate> {
        let query = geocode_query(listing)?;
        let key = normalize_place_name(&query);
        if key.is_empty() {
            return None;
        }

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                return Some(hit);
            }
        }

        let geocoder = self.geocoder.as_ref()?;
        match tokio::time::timeout(self.geocoder_timeout, geocoder.geocode(&query)).await {
            Ok(Ok(Some(coord))) => {
                if let Some(cache) = &self.cache {
                    cache.put(&key, coord);
                }
                Some(coord)
            }
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                warn!(query = %query, "geocoder failed, falling through: {}", e);
                None
            }
            Err(_) => {
                warn!(query = %query, "geocoder timed out, falling through");
                None
            }
        }
    }
}

/// Build a geocode query from the listing's address and area name
fn geocode_query<T: Locatable>(listing: &T) -> Option<String> {
    let address = listing.address().map(str::trim).filter(|a| !a.is_empty());
    let area = listing.area_name().map(str::trim).filter(|a| !a.is_empty());

    match (address, area) {
        (Some(address), Some(area)) => Some(format!("{}, {}", address, area)),
        (Some(address), None) => Some(address.to_string()),
        (None, Some(area)) => Some(area.to_string()),
        (None, None) => None,
    }
}

/// Human-readable distance annotation
fn distance_label(distance: Option<f64>) -> String {
    match distance {
        Some(d) => format!("{:.2} km away", d),
        None => "Distance unknown".to_string(),
    }
}

/// Ascending by distance, unknown distances greater than any number
fn compare_distances(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::geo::CoordinateSource;
    use crate::listing::{Area, Listing};

    fn cairo() -> Coordinate {
        Coordinate::new(30.0444, 31.2357, CoordinateSource::Explicit)
    }

    /// Geocoder that always answers with one coordinate
    struct StaticGeocoder(Coordinate);

    impl Geocoder for StaticGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Option<Coordinate>> {
            Ok(Some(self.0))
        }
    }

    /// Geocoder that always errors
    struct FailingGeocoder;

    impl Geocoder for FailingGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Option<Coordinate>> {
            Err(Error::Geocoding("unreachable backend".to_string()))
        }
    }

    #[tokio::test]
    async fn test_explicit_listing_scenario() {
        // User downtown, listing in Zamalek with explicit coordinates
        let ranker = ProximityRanker::new();
        let listings = vec![Listing::new("zamalek flat").with_coords("30.0618", "31.2194")];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        let top = &ranked[0];
        assert_eq!(top.coordinate.unwrap().source, CoordinateSource::Explicit);
        let d = top.distance_km.unwrap();
        assert!((d - 2.49).abs() < 0.05, "distance {} should be ~2.49", d);
        assert_eq!(top.distance_label, format!("{:.2} km away", d));
    }

    #[tokio::test]
    async fn test_sorted_ascending() {
        let ranker = ProximityRanker::new();
        let listings = vec![
            Listing::new("aswan").with_coords("24.0889", "32.8998"),
            Listing::new("zamalek").with_coords("30.0618", "31.2194"),
            Listing::new("alexandria").with_coords("31.2001", "29.9187"),
        ];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        let titles: Vec<_> = ranked.iter().map(|r| r.listing.title.as_str()).collect();
        assert_eq!(titles, vec!["zamalek", "alexandria", "aswan"]);
    }

    #[tokio::test]
    async fn test_stable_null_last_sort() {
        // Restrict the chain so locationless listings stay unresolved
        let ranker = ProximityRanker::new()
            .with_resolver(CoordinateResolver::new().with_strategies(STRONG_STRATEGIES));
        let listings = vec![
            Listing::new("A"),
            Listing::new("B").with_coords("30.0895", "31.2357"), // ~5 km north
            Listing::new("C"),
            Listing::new("D").with_coords("30.0624", "31.2357"), // ~2 km north
        ];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        let titles: Vec<_> = ranked.iter().map(|r| r.listing.title.as_str()).collect();
        assert_eq!(titles, vec!["D", "B", "A", "C"]);
        assert_eq!(ranked[2].distance_label, "Distance unknown");
        assert!(ranked[2].distance_km.is_none());
        assert!(ranked[2].coordinate.is_none());
    }

    #[tokio::test]
    async fn test_full_chain_never_loses_a_listing() {
        let ranker = ProximityRanker::new();
        let listings = vec![
            Listing::new("explicit").with_coords("30.06", "31.22"),
            Listing::new("nothing at all"),
            Listing::new("named").with_city("Maadi"),
        ];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        assert_eq!(ranked.len(), 3);
        for r in &ranked {
            assert!(r.distance_km.is_some(), "{} lost", r.listing.title);
            assert!(r.distance_label.ends_with("km away"));
        }
    }

    #[tokio::test]
    async fn test_geocoder_beats_estimation_chain() {
        let geocoded = Coordinate::new(29.97, 31.26, CoordinateSource::Geocoded);
        let ranker = ProximityRanker::with_geocoder(StaticGeocoder(geocoded));
        let listings = vec![Listing::new("flat").with_city("Maadi")];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        assert_eq!(ranked[0].coordinate.unwrap().source, CoordinateSource::Geocoded);
        assert_eq!(ranked[0].coordinate.unwrap().latitude, 29.97);
    }

    #[tokio::test]
    async fn test_geocoder_never_overrides_explicit() {
        let geocoded = Coordinate::new(25.0, 33.0, CoordinateSource::Geocoded);
        let ranker = ProximityRanker::with_geocoder(StaticGeocoder(geocoded));
        let listings = vec![Listing::new("flat")
            .with_coords("30.0618", "31.2194")
            .with_city("Maadi")];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        assert_eq!(ranked[0].coordinate.unwrap().source, CoordinateSource::Explicit);
    }

    #[tokio::test]
    async fn test_geocoder_failure_falls_through() {
        let ranker = ProximityRanker::with_geocoder(FailingGeocoder);
        let listings = vec![Listing::new("flat").with_city("Maadi")];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        // Named fallback took over; the batch completed
        let coord = ranked[0].coordinate.unwrap();
        assert_eq!(coord.source, CoordinateSource::CityDefault);
        assert_eq!(coord.latitude, 29.9602);
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_geocoder() {
        let cache = Arc::new(GeocodeCache::new(Box::new(MemoryStore::new())));
        cache.put(
            "maadi",
            Coordinate::new(29.96, 31.25, CoordinateSource::Geocoded),
        );

        // A failing geocoder proves the cache answered
        let ranker = ProximityRanker::with_geocoder(FailingGeocoder).with_cache(Arc::clone(&cache));
        let listings = vec![Listing::new("flat").with_city("Maadi")];

        let ranked = ranker.rank(&cairo(), listings).await.unwrap();

        assert_eq!(ranked[0].coordinate.unwrap().source, CoordinateSource::Cached);
    }

    #[tokio::test]
    async fn test_geocode_result_is_cached() {
        let cache = Arc::new(GeocodeCache::new(Box::new(MemoryStore::new())));
        let geocoded = Coordinate::new(29.97, 31.26, CoordinateSource::Geocoded);
        let ranker = ProximityRanker::with_geocoder(StaticGeocoder(geocoded))
            .with_cache(Arc::clone(&cache));

        let listings = vec![Listing::new("flat").with_city("Maadi")];
        ranker.rank(&cairo(), listings).await.unwrap();

        assert_eq!(cache.stats().total_cached, 1);
        assert!(cache.get("maadi").is_some());
    }

    #[tokio::test]
    async fn test_cancellation_discards_results() {
        let ranker = ProximityRanker::new();
        let token = CancelToken::new();
        token.cancel();

        let listings = vec![Listing::new("flat").with_coords("30.06", "31.22")];
        let result = ranker.rank_cancellable(&cairo(), listings, &token).await;

        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_invalid_user_coordinate_rejected() {
        let ranker = ProximityRanker::new();
        let bad = Coordinate::new(95.0, 31.0, CoordinateSource::Explicit);

        let result = ranker.rank(&bad, vec![Listing::new("flat")]).await;
        assert!(matches!(result, Err(Error::InvalidCoordinates(_))));
    }

    #[test]
    fn test_distance_label_formatting() {
        assert_eq!(distance_label(Some(2.0)), "2.00 km away");
        assert_eq!(distance_label(Some(2.494)), "2.49 km away");
        assert_eq!(distance_label(None), "Distance unknown");
    }

    #[test]
    fn test_geocode_query_shapes() {
        let both = Listing::new("a").with_address("9 Road 9").with_city("Maadi");
        assert_eq!(geocode_query(&both).as_deref(), Some("9 Road 9, Maadi"));

        let address_only = Listing::new("b").with_address("9 Road 9");
        assert_eq!(geocode_query(&address_only).as_deref(), Some("9 Road 9"));

        let area_only = Listing::new("c").with_area(Area::named("Zamalek"));
        assert_eq!(geocode_query(&area_only).as_deref(), Some("Zamalek"));

        assert!(geocode_query(&Listing::new("d")).is_none());
    }
}
