//! OpenStreetMap Nominatim search provider.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{get_json, GeocodeCandidate, GeocodeError, GeocodeQuery, Geocoder};
use crate::models::GeoPoint;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    /// Nominatim returns coordinates as strings
    lat: String,
    lon: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    #[serde(rename = "ISO3166-2-lvl4")]
    iso_region: Option<String>,
    state: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    fn search_url(&self, query: &GeocodeQuery) -> Result<Url, GeocodeError> {
        let mut params: Vec<(&str, String)> = vec![
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("countrycodes", "us".to_string()),
        ];

        // Structured postal code search when there's no free text
        match (&query.address, &query.postal_code) {
            (None, Some(zip)) => params.push(("postalcode", zip.clone())),
            _ => {
                let text = query.text().ok_or_else(|| {
                    GeocodeError::NotConfigured("empty geocoding query".to_string())
                })?;
                params.push(("q", text));
            }
        }

        Ok(Url::parse_with_params(&self.endpoint, &params)?)
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = self.search_url(query)?;
        let places: Vec<NominatimPlace> = get_json(&self.client, url).await?;
        debug!("Nominatim returned {} candidates", places.len());
        Ok(places.into_iter().filter_map(to_candidate).collect())
    }
}

fn to_candidate(place: NominatimPlace) -> Option<GeocodeCandidate> {
    let lat = place.lat.trim().parse::<f64>().ok()?;
    let lon = place.lon.trim().parse::<f64>().ok()?;
    let region_hint = place.address.and_then(|a| a.iso_region.or(a.state));
    Some(GeocodeCandidate {
        location: GeoPoint::new(lat, lon),
        region_hint,
    })
}
