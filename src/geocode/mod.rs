//! Geocoding providers.
//!
//! A provider turns an address and/or postal code into candidate coordinates
//! ordered by provider relevance. Calls are made once with a fixed timeout;
//! failures surface immediately and are never retried.

mod nominatim;
mod opencage;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{GeocoderConfig, ProviderKind};
use crate::models::GeoPoint;

pub use nominatim::{NominatimGeocoder, DEFAULT_ENDPOINT as NOMINATIM_ENDPOINT};
pub use opencage::{OpenCageGeocoder, DEFAULT_ENDPOINT as OPENCAGE_ENDPOINT};

/// What to look up. At least one field should be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

impl GeocodeQuery {
    /// Single-line query text; the postal code is appended when the address
    /// doesn't already contain it
    pub fn text(&self) -> Option<String> {
        match (&self.address, &self.postal_code) {
            (Some(address), Some(zip)) if !address.contains(zip.as_str()) => {
                Some(format!("{} {}", address, zip))
            }
            (Some(address), _) => Some(address.clone()),
            (None, Some(zip)) => Some(zip.clone()),
            (None, None) => None,
        }
    }
}

/// A candidate coordinate returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub location: GeoPoint,
    /// State/region reported by the provider (e.g. "IN", "Indiana", "US-IN")
    pub region_hint: Option<String>,
}

impl GeocodeCandidate {
    /// Whether the region hint names the given state, by code or name
    pub fn in_region(&self, code: &str, name: &str) -> bool {
        let Some(hint) = self.region_hint.as_deref().map(str::trim) else {
            return false;
        };
        hint.eq_ignore_ascii_case(code)
            || hint.eq_ignore_ascii_case(name)
            || hint
                .rsplit_once('-')
                .is_some_and(|(_, suffix)| suffix.eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoding provider returned HTTP {0}")]
    Status(u16),

    #[error("could not decode geocoding response: {0}")]
    Decode(String),

    #[error("geocoder is not configured: {0}")]
    NotConfigured(String),

    #[error("invalid geocoder endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// External geocoding collaborator
pub trait Geocoder: Send + Sync {
    /// Candidates ordered by relevance; possibly empty
    fn geocode(
        &self,
        query: &GeocodeQuery,
    ) -> impl Future<Output = Result<Vec<GeocodeCandidate>, GeocodeError>> + Send;
}

/// Provider selected by configuration
pub enum HttpGeocoder {
    Nominatim(NominatimGeocoder),
    OpenCage(OpenCageGeocoder),
}

impl HttpGeocoder {
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = http_client(config)?;
        Ok(match config.provider {
            ProviderKind::Nominatim => {
                HttpGeocoder::Nominatim(NominatimGeocoder::new(client, config.endpoint()))
            }
            ProviderKind::OpenCage => {
                let key = config.api_key.clone().ok_or_else(|| {
                    GeocodeError::NotConfigured("OpenCage requires geocoder.api_key".to_string())
                })?;
                HttpGeocoder::OpenCage(OpenCageGeocoder::new(client, config.endpoint(), key))
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            HttpGeocoder::Nominatim(_) => "nominatim",
            HttpGeocoder::OpenCage(_) => "opencage",
        }
    }
}

impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        match self {
            HttpGeocoder::Nominatim(g) => g.geocode(query).await,
            HttpGeocoder::OpenCage(g) => g.geocode(query).await,
        }
    }
}

fn http_client(config: &GeocoderConfig) -> Result<reqwest::Client, GeocodeError> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Send a GET and decode the JSON body, mapping non-success statuses
async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: url::Url,
) -> Result<T, GeocodeError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(GeocodeError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| GeocodeError::Decode(e.to_string()))
}
