//! Curated trustee office / resource listing entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{bare_unit_name, GeoPoint};

/// Placeholder used by the collection scripts for unknown values
const NOT_AVAILABLE: &str = "N/A";

/// A trustee office or county resource (e.g. food pantry).
///
/// Field names follow the dataset JSON (`County`, `Name`, ...). Absent values
/// are `None` rather than empty strings; a record with no address or no
/// coordinates is "incomplete" but still a valid match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Record {
    #[serde(rename = "County")]
    pub county: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Address")]
    pub address: Option<String>,

    #[serde(rename = "Phone")]
    pub phone: Option<String>,

    #[serde(rename = "Website")]
    pub website: Option<String>,

    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,

    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,

    #[serde(rename = "Hours")]
    pub hours: Vec<String>,
}

impl Record {
    /// Placeholder for a township with no office on file
    pub fn placeholder(county: &str, unit_name: &str) -> Self {
        Self {
            county: county.to_string(),
            name: format!("{} Township Trustee", bare_unit_name(unit_name)),
            address: None,
            phone: None,
            website: None,
            latitude: None,
            longitude: None,
            hours: Vec::new(),
        }
    }

    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Missing address or coordinates; eligible for enrichment
    pub fn is_incomplete(&self) -> bool {
        self.address.is_none() || self.coordinates().is_none()
    }

    pub fn in_county(&self, county: &str) -> bool {
        self.county.trim().eq_ignore_ascii_case(county.trim())
    }

    /// Whether this record belongs to the given unit.
    ///
    /// The unit name has its " Township" suffix stripped and must be a
    /// case-insensitive prefix of the record's display name.
    pub fn matches_unit(&self, county: &str, unit_name: &str) -> bool {
        let bare = bare_unit_name(unit_name).to_lowercase();
        !bare.is_empty() && self.in_county(county) && self.name.to_lowercase().starts_with(&bare)
    }
}

/// Wire shape of a record as written by the collection scripts.
///
/// Values are loosely typed there: coordinates may be `""`, `Hours` may be
/// the string "N/A", and text may contain typographic spaces.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "County")]
    county: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Address", default)]
    address: Option<String>,
    #[serde(rename = "Phone", default)]
    phone: Option<String>,
    #[serde(rename = "Website", default)]
    website: Option<String>,
    #[serde(rename = "Latitude", default)]
    latitude: Option<Value>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<Value>,
    #[serde(rename = "Hours", default)]
    hours: Option<Value>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self {
            county: normalize_text(&raw.county),
            name: normalize_text(&raw.name),
            address: optional_text(raw.address),
            phone: optional_text(raw.phone),
            website: optional_text(raw.website),
            latitude: raw.latitude.as_ref().and_then(coordinate_value),
            longitude: raw.longitude.as_ref().and_then(coordinate_value),
            hours: raw.hours.map(hours_value).unwrap_or_default(),
        }
    }
}

/// Replace the typographic characters Places API responses contain
pub fn normalize_text(s: &str) -> String {
    s.replace(['\u{202f}', '\u{2009}'], " ")
        .replace('\u{2013}', "-")
        .trim()
        .to_string()
}

fn optional_text(value: Option<String>) -> Option<String> {
    let text = normalize_text(&value?);
    if text.is_empty() || text == NOT_AVAILABLE {
        None
    } else {
        Some(text)
    }
}

fn coordinate_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn hours_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(normalize_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => optional_text(Some(s)).into_iter().collect(),
        _ => Vec::new(),
    }
}
