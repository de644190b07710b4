use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::geocode::{NOMINATIM_ENDPOINT, OPENCAGE_ENDPOINT};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Township boundaries (GeoJSON FeatureCollection)
    pub boundaries: PathBuf,
    /// Trustee office records (JSON array)
    pub trustees: PathBuf,
    /// County-keyed resource listings, e.g. food pantries
    pub resources: Option<PathBuf>,
    /// OSM-derived address points for interpolation
    pub address_points: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Nominatim,
    #[serde(rename = "opencage")]
    OpenCage,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub provider: ProviderKind,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Nominatim,
            endpoint: None,
            api_key: None,
            user_agent: concat!("township-locator/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

impl GeocoderConfig {
    /// Configured endpoint, or the provider's public default
    pub fn endpoint(&self) -> String {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, ProviderKind::Nominatim) => NOMINATIM_ENDPOINT.to_string(),
            (None, ProviderKind::OpenCage) => OPENCAGE_ENDPOINT.to_string(),
        }
    }
}

/// How coordinates are obtained for a free-text address
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMode {
    /// Ask the geocoding provider
    #[default]
    Provider,
    /// Estimate from the address point dataset only
    Interpolated,
    /// Provider first, interpolation when the provider has no candidates
    /// or the provider call fails
    ProviderThenInterpolated,
}

/// Property names read from boundary features
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BoundaryFields {
    pub county_field: String,
    pub unit_field: String,
}

impl Default for BoundaryFields {
    fn default() -> Self {
        Self {
            county_field: "cnty_name".to_string(),
            unit_field: "tl_2021_18_cousub_namelsad".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResolverConfig {
    pub home_state_code: String,
    pub home_state_name: String,
    pub nearest_threshold_km: f64,
    pub acquisition: AcquisitionMode,
    /// Fall back to the nearest record when no township contains the point
    pub nearest_fallback: bool,
    pub boundary_fields: BoundaryFields,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            home_state_code: "IN".to_string(),
            home_state_name: "Indiana".to_string(),
            nearest_threshold_km: 50.0,
            acquisition: AcquisitionMode::default(),
            nearest_fallback: false,
            boundary_fields: BoundaryFields::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
