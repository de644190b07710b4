//! OpenCage forward geocoding provider.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{get_json, GeocodeCandidate, GeocodeError, GeocodeQuery, Geocoder};
use crate::models::GeoPoint;

pub const DEFAULT_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";

pub struct OpenCageGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: OpenCageGeometry,
    #[serde(default)]
    components: OpenCageComponents,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OpenCageComponents {
    state_code: Option<String>,
    state: Option<String>,
}

impl OpenCageGeocoder {
    pub fn new(client: reqwest::Client, endpoint: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    fn search_url(&self, query: &GeocodeQuery) -> Result<Url, GeocodeError> {
        let text = query
            .text()
            .ok_or_else(|| GeocodeError::NotConfigured("empty geocoding query".to_string()))?;
        Ok(Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", text.as_str()),
                ("key", self.api_key.as_str()),
                ("countrycode", "us"),
                ("no_annotations", "1"),
            ],
        )?)
    }
}

impl Geocoder for OpenCageGeocoder {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = self.search_url(query)?;
        let response: OpenCageResponse = get_json(&self.client, url).await?;
        debug!("OpenCage returned {} candidates", response.results.len());
        Ok(response.results.into_iter().map(to_candidate).collect())
    }
}

fn to_candidate(result: OpenCageResult) -> GeocodeCandidate {
    GeocodeCandidate {
        location: GeoPoint::new(result.geometry.lat, result.geometry.lng),
        region_hint: result.components.state_code.or(result.components.state),
    }
}
