//! prop-scout: proximity ranking for property listings
//!
//! A library and CLI tool for ranking property listings by distance from a
//! user position, deterministically deriving a usable coordinate for
//! listings with incomplete or missing location data.
//!
//! ## Features
//!
//! - Fixed-priority coordinate resolution (explicit, area-level,
//!   address-estimated, named fallback, procedural default)
//! - Curated named-location table with substring fallback matching
//! - Haversine distance with stable, null-last ordering
//! - Optional Nominatim geocoding with TTL-bounded persistent caching
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use prop_scout::geo::{Coordinate, CoordinateSource};
//! use prop_scout::listing::Listing;
//! use prop_scout::rank::ProximityRanker;
//!
//! # async fn example() -> prop_scout::Result<()> {
//! let user = Coordinate::new(30.0444, 31.2357, CoordinateSource::Explicit); // Cairo
//! let listings = vec![
//!     Listing::new("zamalek flat").with_coords("30.0618", "31.2194"),
//!     Listing::new("somewhere in maadi").with_city("Maadi"),
//! ];
//!
//! let ranker = ProximityRanker::new();
//! let ranked = ranker.rank(&user, listings).await?;
//! for r in &ranked {
//!     println!("{}: {}", r.listing.title, r.distance_label);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod listing;
pub mod rank;
pub mod resolver;
pub mod server;

// Re-export commonly used types
pub use cache::{GeocodeCache, KeyValueStore};
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{BoundingBox, Coordinate, CoordinateSource};
pub use listing::{Area, Listing, Locatable};
pub use rank::{CancelToken, ProximityRanker, RankedListing};
pub use resolver::{CoordinateResolver, ResolutionStrategy};
