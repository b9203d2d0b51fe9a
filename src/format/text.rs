//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::listing::Listing;
use crate::rank::RankedListing;

/// Text formatter - outputs a numbered ranking
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable ranking"
    }

    fn format(&self, results: &[RankedListing<Listing>]) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("{} listings ranked by distance\n\n", results.len()));

        for (i, ranked) in results.iter().enumerate() {
            output.push_str(&format!(
                "{:>3}. {} — {}\n",
                i + 1,
                ranked.listing.title,
                ranked.distance_label
            ));

            if let Some(coord) = &ranked.coordinate {
                output.push_str(&format!(
                    "     ({:.6}, {:.6}) via {}\n",
                    coord.latitude, coord.longitude, coord.source
                ));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, CoordinateSource};

    fn create_test_results() -> Vec<RankedListing<Listing>> {
        vec![
            RankedListing {
                listing: Listing::new("zamalek flat"),
                coordinate: Some(Coordinate::new(30.0618, 31.2194, CoordinateSource::Explicit)),
                distance_km: Some(2.49),
                distance_label: "2.49 km away".to_string(),
            },
            RankedListing {
                listing: Listing::new("mystery plot"),
                coordinate: None,
                distance_km: None,
                distance_label: "Distance unknown".to_string(),
            },
        ]
    }

    #[test]
    fn test_text_format() {
        let formatter = TextFormatter;
        let output = formatter.format(&create_test_results()).unwrap();

        assert!(output.contains("2 listings ranked by distance"));
        assert!(output.contains("zamalek flat — 2.49 km away"));
        assert!(output.contains("via explicit"));
        assert!(output.contains("mystery plot — Distance unknown"));
    }

    #[test]
    fn test_unresolved_listing_has_no_coordinate_line() {
        let formatter = TextFormatter;
        let output = formatter.format(&create_test_results()).unwrap();

        // Only one coordinate line for the two results
        assert_eq!(output.matches("via ").count(), 1);
    }

    #[test]
    fn test_text_formatter_info() {
        let formatter = TextFormatter;
        assert_eq!(formatter.name(), "text");
        assert!(!formatter.description().is_empty());
    }
}
