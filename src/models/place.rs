//! Point types shared by the geometry, interpolation and resolver layers.

use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon) in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Convert to a `geo` point (x = longitude, y = latitude)
    pub fn to_geo(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

/// A house-number level address extracted from OSM.
///
/// Matches the records produced by the OSM address extraction step:
/// `{"type": "node", "housenumber": "325", "street": "E Winslow Rd",
/// "latitude": 39.14, "longitude": -86.52, ...}`. Way-type entries carry no
/// coordinates and are skipped when the street index is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressPoint {
    #[serde(rename = "housenumber")]
    pub house_number: String,

    pub street: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

impl AddressPoint {
    pub fn new(house_number: &str, street: &str, location: GeoPoint) -> Self {
        Self {
            house_number: house_number.to_string(),
            street: street.to_string(),
            latitude: Some(location.lat),
            longitude: Some(location.lon),
            city: None,
            postcode: None,
        }
    }

    /// Coordinates, if the source object had them
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}
