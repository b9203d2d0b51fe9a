//! Property listing entity model
//!
//! Listings arrive from feeds and exports with location data in wildly
//! varying states of completeness: some carry coordinates, some only an
//! area record, some just a free-text address. Coordinate fields are kept
//! as raw strings because feed data is text; parsing happens during
//! resolution, and unparsable values are treated as absent.

use serde::{Deserialize, Serialize};

/// An area/region record a listing may reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    /// Area name (e.g. "Maadi", "New Cairo")
    pub name: String,

    /// Raw latitude, when the area record carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,

    /// Raw longitude, when the area record carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

impl Area {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_coords(name: impl Into<String>, lat: impl Into<String>, lng: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: Some(lat.into()),
            longitude: Some(lng.into()),
        }
    }
}

/// A property listing with partial location data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Listing title or reference
    pub title: String,

    /// Raw latitude as it appeared in the feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,

    /// Raw longitude as it appeared in the feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,

    /// Referenced area/region record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,

    /// Free-text street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Standalone city/area name when no area record exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Listing {
    /// Create a listing with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            latitude: None,
            longitude: None,
            area: None,
            address: None,
            city: None,
        }
    }

    pub fn with_coords(mut self, lat: impl Into<String>, lng: impl Into<String>) -> Self {
        self.latitude = Some(lat.into());
        self.longitude = Some(lng.into());
        self
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}

/// Location signals an entity exposes to the resolver
///
/// The resolver and ranker are generic over this trait so any record type
/// can be ranked, not just [`Listing`].
pub trait Locatable {
    /// Raw latitude string, if the entity carries one
    fn raw_latitude(&self) -> Option<&str>;

    /// Raw longitude string, if the entity carries one
    fn raw_longitude(&self) -> Option<&str>;

    /// Referenced area record, if any
    fn area(&self) -> Option<&Area>;

    /// Free-text address, if any
    fn address(&self) -> Option<&str>;

    /// Best available area/city name: the area record's name, else the
    /// standalone city field
    fn area_name(&self) -> Option<&str>;
}

impl Locatable for Listing {
    fn raw_latitude(&self) -> Option<&str> {
        self.latitude.as_deref()
    }

    fn raw_longitude(&self) -> Option<&str> {
        self.longitude.as_deref()
    }

    fn area(&self) -> Option<&Area> {
        self.area.as_ref()
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn area_name(&self) -> Option<&str> {
        self.area
            .as_ref()
            .map(|a| a.name.as_str())
            .or(self.city.as_deref())
    }
}
