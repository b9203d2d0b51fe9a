//! Locate command handler
//!
//! Resolves a place name to coordinates via the named-location table,
//! optionally falling back to the external geocoder.

use crate::cache::{FileStore, GeocodeCache};
use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimGeocoder;
use crate::geo::{Coordinate, Geocoder};
use crate::resolver::places;
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Place name to resolve
    pub query: String,

    /// Consult the external geocoder when the table has no match
    #[arg(long, short = 'g')]
    pub geocode: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;
    let normalized = places::normalize_place_name(&args.query);

    let mut coordinate = places::lookup(&normalized);

    if coordinate.is_none() && args.geocode && config.geocoder.enabled {
        coordinate = geocode_lookup(&config, &args.query, &normalized).await?;
    }

    match coordinate {
        Some(coord) => print_coordinate(&args, &coord)?,
        None => {
            eprintln!("No match for '{}'", args.query);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn geocode_lookup(
    config: &Config,
    query: &str,
    normalized: &str,
) -> Result<Option<Coordinate>> {
    let cache =
        GeocodeCache::new(Box::new(FileStore::new()?)).with_ttl(config.cache_ttl_secs());

    if let Some(hit) = cache.get(normalized) {
        return Ok(Some(hit));
    }

    let geocoder = NominatimGeocoder::with_region(config.region_bounds());
    let result = tokio::time::timeout(config.geocoder_timeout(), geocoder.geocode(query))
        .await
        .unwrap_or(Ok(None))?;

    if let Some(coord) = result {
        cache.put(normalized, coord);
        return Ok(Some(coord));
    }
    Ok(None)
}

fn print_coordinate(args: &LocateArgs, coord: &Coordinate) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(coord)?);
    } else {
        println!(
            "{}: ({:.6}, {:.6}) via {}",
            args.query, coord.latitude, coord.longitude, coord.source
        );
    }
    Ok(())
}
