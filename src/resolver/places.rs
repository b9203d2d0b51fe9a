//! Named-location fallback table
//!
//! A hand-curated mapping from normalized place name to canonical
//! coordinates for the home region. Lookups try an exact key match first,
//! then fall back to substring containment in either direction, scanning
//! in declaration order and returning the first hit. The containment
//! heuristic can surprise for very short names; that behavior is
//! intentional and relied upon by existing data.

use crate::constants::accuracy::CITY_DEFAULT_METERS;
use crate::geo::{Coordinate, CoordinateSource};

/// One entry of the named-location table
#[derive(Debug, Clone, Copy)]
pub struct NamedPlace {
    /// Normalized key (lowercase, single-spaced)
    pub key: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Curated cities and districts, declaration order significant.
///
/// Cairo districts first (most listings), then Giza, then the rest of the
/// country. Keys must already be in normalized form.
pub static NAMED_PLACES: &[NamedPlace] = &[
    // Greater Cairo districts
    NamedPlace { key: "maadi", latitude: 29.9602, longitude: 31.2569 },
    NamedPlace { key: "zamalek", latitude: 30.0618, longitude: 31.2194 },
    NamedPlace { key: "heliopolis", latitude: 30.0910, longitude: 31.3225 },
    NamedPlace { key: "nasr city", latitude: 30.0561, longitude: 31.3301 },
    NamedPlace { key: "new cairo", latitude: 30.0300, longitude: 31.4700 },
    NamedPlace { key: "fifth settlement", latitude: 30.0074, longitude: 31.4913 },
    NamedPlace { key: "garden city", latitude: 30.0359, longitude: 31.2312 },
    NamedPlace { key: "downtown cairo", latitude: 30.0459, longitude: 31.2420 },
    NamedPlace { key: "shubra", latitude: 30.1004, longitude: 31.2454 },
    NamedPlace { key: "ain shams", latitude: 30.1311, longitude: 31.3191 },
    NamedPlace { key: "el marg", latitude: 30.1522, longitude: 31.3355 },
    NamedPlace { key: "helwan", latitude: 29.8500, longitude: 31.3333 },
    NamedPlace { key: "mokattam", latitude: 30.0190, longitude: 31.2990 },
    NamedPlace { key: "shorouk", latitude: 30.1210, longitude: 31.6080 },
    NamedPlace { key: "obour", latitude: 30.1930, longitude: 31.4600 },
    NamedPlace { key: "madinaty", latitude: 30.1020, longitude: 31.6330 },
    NamedPlace { key: "rehab", latitude: 30.0590, longitude: 31.4920 },
    NamedPlace { key: "cairo", latitude: 30.0444, longitude: 31.2357 },
    // Giza side
    NamedPlace { key: "dokki", latitude: 30.0381, longitude: 31.2118 },
    NamedPlace { key: "mohandessin", latitude: 30.0587, longitude: 31.2022 },
    NamedPlace { key: "agouza", latitude: 30.0560, longitude: 31.2080 },
    NamedPlace { key: "haram", latitude: 29.9930, longitude: 31.1600 },
    NamedPlace { key: "faisal", latitude: 29.9960, longitude: 31.1800 },
    NamedPlace { key: "6th of october", latitude: 29.9380, longitude: 30.9130 },
    NamedPlace { key: "sheikh zayed", latitude: 30.0390, longitude: 30.9720 },
    NamedPlace { key: "imbaba", latitude: 30.0760, longitude: 31.2070 },
    NamedPlace { key: "giza", latitude: 30.0131, longitude: 31.2089 },
    // Alexandria and the Delta
    NamedPlace { key: "smouha", latitude: 31.2180, longitude: 29.9450 },
    NamedPlace { key: "miami alexandria", latitude: 31.2680, longitude: 30.0080 },
    NamedPlace { key: "agami", latitude: 31.0960, longitude: 29.7600 },
    NamedPlace { key: "alexandria", latitude: 31.2001, longitude: 29.9187 },
    NamedPlace { key: "borg el arab", latitude: 30.9180, longitude: 29.5360 },
    NamedPlace { key: "mansoura", latitude: 31.0409, longitude: 31.3785 },
    NamedPlace { key: "tanta", latitude: 30.7865, longitude: 31.0004 },
    NamedPlace { key: "zagazig", latitude: 30.5877, longitude: 31.5020 },
    NamedPlace { key: "damietta", latitude: 31.4165, longitude: 31.8133 },
    NamedPlace { key: "kafr el sheikh", latitude: 31.1107, longitude: 30.9388 },
    NamedPlace { key: "damanhour", latitude: 31.0341, longitude: 30.4682 },
    NamedPlace { key: "banha", latitude: 30.4598, longitude: 31.1785 },
    NamedPlace { key: "shibin el kom", latitude: 30.5545, longitude: 31.0120 },
    // Canal zone and Sinai
    NamedPlace { key: "port said", latitude: 31.2653, longitude: 32.3019 },
    NamedPlace { key: "ismailia", latitude: 30.5965, longitude: 32.2715 },
    NamedPlace { key: "suez", latitude: 29.9668, longitude: 32.5498 },
    NamedPlace { key: "sharm el sheikh", latitude: 27.9158, longitude: 34.3300 },
    NamedPlace { key: "dahab", latitude: 28.5096, longitude: 34.5136 },
    NamedPlace { key: "el arish", latitude: 31.1316, longitude: 33.7984 },
    // Red Sea coast
    NamedPlace { key: "hurghada", latitude: 27.2579, longitude: 33.8116 },
    NamedPlace { key: "el gouna", latitude: 27.3949, longitude: 33.6780 },
    NamedPlace { key: "ain sokhna", latitude: 29.6010, longitude: 32.3170 },
    NamedPlace { key: "marsa alam", latitude: 25.0676, longitude: 34.8790 },
    // North coast
    NamedPlace { key: "marsa matruh", latitude: 31.3543, longitude: 27.2373 },
    NamedPlace { key: "el alamein", latitude: 30.8330, longitude: 28.9550 },
    NamedPlace { key: "north coast", latitude: 30.9300, longitude: 28.7000 },
    // Upper Egypt
    NamedPlace { key: "fayoum", latitude: 29.3084, longitude: 30.8428 },
    NamedPlace { key: "beni suef", latitude: 29.0661, longitude: 31.0994 },
    NamedPlace { key: "minya", latitude: 28.1099, longitude: 30.7503 },
    NamedPlace { key: "asyut", latitude: 27.1801, longitude: 31.1837 },
    NamedPlace { key: "sohag", latitude: 26.5591, longitude: 31.6957 },
    NamedPlace { key: "qena", latitude: 26.1551, longitude: 32.7160 },
    NamedPlace { key: "luxor", latitude: 25.6872, longitude: 32.6396 },
    NamedPlace { key: "aswan", latitude: 24.0889, longitude: 32.8998 },
];

/// Normalize a place name for table lookup
///
/// Lowercases, trims, and collapses internal whitespace. Unicode letters
/// (including non-Latin scripts) are preserved.
pub fn normalize_place_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look up a normalized place name in the table
///
/// Exact key match wins; otherwise the first declaration-order entry whose
/// key contains the query, or is contained by it, is returned. Empty
/// queries never match.
pub fn lookup(normalized: &str) -> Option<Coordinate> {
    if normalized.is_empty() {
        return None;
    }

    let found = NAMED_PLACES
        .iter()
        .find(|p| p.key == normalized)
        .or_else(|| {
            NAMED_PLACES
                .iter()
                .find(|p| p.key.contains(normalized) || normalized.contains(p.key))
        })?;

    Some(
        Coordinate::new(found.latitude, found.longitude, CoordinateSource::CityDefault)
            .with_accuracy(CITY_DEFAULT_METERS),
    )
}
