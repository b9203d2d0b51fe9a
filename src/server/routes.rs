//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::cache::CacheStats;
use crate::error::Error;
use crate::geo::nominatim::NominatimGeocoder;
use crate::geo::{Coordinate, CoordinateSource};
use crate::listing::Listing;
use crate::rank::{ProximityRanker, RankedListing};
use crate::resolver::{places, CoordinateResolver};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/rank", post(rank_handler))
        .route("/api/resolve", post(resolve_handler))
        .route("/api/places", get(places_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache", delete(cache_clear_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Rank request body
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    /// User latitude
    pub lat: f64,
    /// User longitude
    pub lng: f64,
    /// Listings to rank
    pub listings: Vec<Listing>,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::Geocoding(_) => "GEOCODING_ERROR",
            Error::PermissionDenied(_) => "PERMISSION_DENIED",
            Error::Cache(_) => "CACHE_ERROR",
            Error::Cancelled => "CANCELLED",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Build the ranker the state's config describes
fn build_ranker(state: &AppState) -> ProximityRanker<NominatimGeocoder> {
    let bounds = state.config.region_bounds();
    let resolver = CoordinateResolver::new().with_bounds(bounds);

    let ranker = if state.config.geocoder.enabled {
        ProximityRanker::with_geocoder(NominatimGeocoder::with_region(bounds))
    } else {
        ProximityRanker::new()
    };

    ranker
        .with_resolver(resolver)
        .with_cache(Arc::clone(&state.cache))
        .with_geocoder_timeout(state.config.geocoder_timeout())
}

/// Rank listings by distance from the user position
///
/// POST /api/rank
async fn rank_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RankRequest>,
) -> Result<Json<Vec<RankedListing<Listing>>>, ApiError> {
    let user = Coordinate::new(req.lat, req.lng, CoordinateSource::Explicit);
    user.validate().map_err(ApiError::from)?;

    let ranker = build_ranker(&state);
    let ranked = ranker
        .rank(&user, req.listings)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ranked))
}

/// Resolve response
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub coordinate: Option<Coordinate>,
}

/// Resolve a single listing's coordinate
///
/// POST /api/resolve
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Json(listing): Json<Listing>,
) -> Json<ResolveResponse> {
    let resolver = CoordinateResolver::new().with_bounds(state.config.region_bounds());
    Json(ResolveResponse {
        coordinate: resolver.resolve(&listing),
    })
}

/// Places query parameters
#[derive(Debug, Deserialize)]
pub struct PlacesQuery {
    pub q: String,
}

/// Places response
#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub query: String,
    pub normalized: String,
    pub coordinate: Option<Coordinate>,
}

/// Look a place name up in the named-location table
///
/// GET /api/places?q=name
async fn places_handler(Query(params): Query<PlacesQuery>) -> Json<PlacesResponse> {
    let normalized = places::normalize_place_name(&params.q);
    let coordinate = places::lookup(&normalized);

    Json(PlacesResponse {
        query: params.q,
        normalized,
        coordinate,
    })
}

/// Cache statistics
///
/// GET /api/cache/stats
async fn cache_stats_handler(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Clear response
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// Empty the geocode cache
///
/// DELETE /api/cache
async fn cache_clear_handler(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    state.cache.clear();
    Json(ClearResponse { cleared: true })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Whether the external geocoder is enabled
    pub geocoder_enabled: bool,
    /// Entries currently in the geocode cache
    pub cached_entries: usize,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder_enabled: state.config.geocoder.enabled,
        cached_entries: state.cache.stats().total_cached,
        uptime_secs: state.uptime_secs(),
    })
}
