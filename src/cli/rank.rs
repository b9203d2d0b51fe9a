//! Rank command handler
//!
//! Ranks listings from a JSON file (or stdin) by distance from the user.

use crate::cache::{FileStore, GeocodeCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::geo::nominatim::NominatimGeocoder;
use crate::geo::position::{IpPositionProvider, PositionProvider};
use crate::geo::{Coordinate, CoordinateSource};
use crate::listing::Listing;
use crate::rank::ProximityRanker;
use crate::resolver::CoordinateResolver;
use clap::Args;
use std::io::Read;
use std::sync::Arc;

/// Rank command arguments
#[derive(Args)]
pub struct RankArgs {
    /// Listings JSON file (reads stdin when omitted)
    #[arg(long, short = 'i')]
    pub input: Option<String>,

    /// User latitude
    #[arg(long, requires = "lng", conflicts_with = "here")]
    pub lat: Option<f64>,

    /// User longitude
    #[arg(long, requires = "lat", conflicts_with = "here")]
    pub lng: Option<f64>,

    /// Use current location (IP geolocation)
    #[arg(long)]
    pub here: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Skip the external geocoder even if enabled in config
    #[arg(long)]
    pub no_geocode: bool,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the rank command
pub async fn run(args: RankArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let user = user_position(&args, &config).await?;
    let listings = read_listings(args.input.as_deref())?;

    let cache = Arc::new(
        GeocodeCache::new(Box::new(FileStore::new()?)).with_ttl(config.cache_ttl_secs()),
    );

    let bounds = config.region_bounds();
    let ranker = if config.geocoder.enabled && !args.no_geocode {
        ProximityRanker::with_geocoder(NominatimGeocoder::with_region(bounds))
    } else {
        ProximityRanker::new()
    };
    let ranker = ranker
        .with_resolver(CoordinateResolver::new().with_bounds(bounds))
        .with_cache(cache)
        .with_geocoder_timeout(config.geocoder_timeout());

    let ranked = ranker.rank(&user, listings).await?;

    let format_name = args.format.as_deref().unwrap_or(&config.output.format);
    let formatter = get_formatter(format_name)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format_name)))?;
    let rendered = formatter.format(&ranked)?;

    match &args.output {
        Some(path) => std::fs::write(path, rendered)?,
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Determine the user position from args and config
async fn user_position(args: &RankArgs, config: &Config) -> Result<Coordinate> {
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let coord = Coordinate::new(lat, lng, CoordinateSource::Explicit);
        coord.validate()?;
        return Ok(coord);
    }

    if args.here || config.location.default_here {
        let provider = IpPositionProvider::new();
        if !provider.request_permission().await? {
            return Err(Error::PermissionDenied(
                "position provider refused access".to_string(),
            ));
        }
        let position = provider.current_position(config.position_timeout()).await?;
        eprintln!(
            "Using IP location: ({:.4}, {:.4})",
            position.latitude, position.longitude
        );
        return Ok(position);
    }

    Err(Error::Config(
        "No user position; pass --lat/--lng or --here".to_string(),
    ))
}

/// Read listings from a file or stdin
fn read_listings(input: Option<&str>) -> Result<Vec<Listing>> {
    let content = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    Ok(serde_json::from_str(&content)?)
}

fn list_formats() {
    println!("Available formats:");
    for info in available_formats() {
        println!("  {} - {}", info.name, info.description);
    }
}
