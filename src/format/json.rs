//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::listing::Listing;
use crate::rank::RankedListing;

/// JSON formatter - outputs full results as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON response"
    }

    fn format(&self, results: &[RankedListing<Listing>]) -> Result<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, CoordinateSource};

    fn create_test_results() -> Vec<RankedListing<Listing>> {
        vec![RankedListing {
            listing: Listing::new("zamalek flat"),
            coordinate: Some(Coordinate::new(30.0618, 31.2194, CoordinateSource::Explicit)),
            distance_km: Some(2.49),
            distance_label: "2.49 km away".to_string(),
        }]
    }

    #[test]
    fn test_json_format() {
        let formatter = JsonFormatter;
        let output = formatter.format(&create_test_results()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let first = &parsed[0];
        assert_eq!(first["listing"]["title"], "zamalek flat");
        assert_eq!(first["distance_km"], 2.49);
        assert_eq!(first["coordinate"]["source"], "explicit");
    }

    #[test]
    fn test_json_formatter_info() {
        let formatter = JsonFormatter;
        assert_eq!(formatter.name(), "json");
        assert!(!formatter.description().is_empty());
    }
}
