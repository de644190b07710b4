//! HTTP server for township and trustee lookups.
//!
//! Provides forward (address) and reverse (coordinate) resolution plus a
//! nearest-trustee-office lookup.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use township_locator::geocode::HttpGeocoder;
use township_locator::resolver::{InputError, NotFoundCause};
use township_locator::{Config, Datasets, Resolution, Resolver};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Township and trustee lookup server")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Listen address (overrides server.listen)
    #[arg(short, long)]
    listen: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// Application state shared across handlers
struct AppState {
    resolver: Resolver<HttpGeocoder>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Township Locator Server");
    let config = Config::load_from_file(&args.config)?;

    let datasets = Datasets::load(&config.data, &config.resolver.boundary_fields)
        .context("Failed to load township boundaries")?;
    let geocoder =
        HttpGeocoder::from_config(&config.geocoder).context("Failed to set up geocoder")?;
    info!(
        "Using {} geocoder at {}",
        geocoder.name(),
        config.geocoder.endpoint()
    );

    let state = Arc::new(AppState {
        resolver: Resolver::new(config.resolver.clone(), datasets, geocoder),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/geocode", get(geocode_handler))
        .route("/reverse-geocode", get(reverse_handler))
        .route("/nearest", get(nearest_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listen = args.listen.unwrap_or(config.server.listen);
    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind {}", listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let datasets = state.resolver.datasets();
    Json(HealthResponse {
        status: "ok",
        townships: datasets.townships.index().len(),
        trustees: datasets.trustees.get().map(|store| store.len()),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    townships: usize,
    trustees: Option<usize>,
}

/// Forward lookup from a free-text address
async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQueryParams>,
) -> (StatusCode, Json<Resolution>) {
    let address = params.address.unwrap_or_default();
    let resolution = state
        .resolver
        .resolve_by_address(&address, params.postal_code.as_deref())
        .await;
    respond(resolution)
}

/// Reverse lookup, including the county resource listing
async fn reverse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoordinateQueryParams>,
) -> (StatusCode, Json<Resolution>) {
    let resolution = match params.parse() {
        Ok((lat, lon)) => state.resolver.resolve_by_coordinates(lat, lon),
        Err(invalid) => invalid,
    };
    respond(resolution)
}

/// Nearest trustee office by the office's own coordinates
async fn nearest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoordinateQueryParams>,
) -> (StatusCode, Json<Resolution>) {
    let resolution = match params.parse() {
        Ok((lat, lon)) => state.resolver.resolve_nearest_record(lat, lon),
        Err(invalid) => invalid,
    };
    respond(resolution)
}

#[derive(Deserialize)]
struct AddressQueryParams {
    /// "Street, City, ST ZIP"
    address: Option<String>,
    /// Optional ZIP hint
    postal_code: Option<String>,
}

/// Coordinates arrive as text so non-numeric values get a structured
/// `invalid_input` response instead of a query rejection
#[derive(Deserialize)]
struct CoordinateQueryParams {
    lat: Option<String>,
    lon: Option<String>,
}

impl CoordinateQueryParams {
    fn parse(&self) -> Result<(f64, f64), Resolution> {
        Ok((coordinate(self.lat.as_deref())?, coordinate(self.lon.as_deref())?))
    }
}

fn coordinate(value: Option<&str>) -> Result<f64, Resolution> {
    let value = value.unwrap_or_default().trim();
    value.parse::<f64>().map_err(|_| {
        Resolution::invalid(InputError::NonNumericCoordinate {
            value: value.to_string(),
        })
    })
}

fn respond(resolution: Resolution) -> (StatusCode, Json<Resolution>) {
    let status = status_code(&resolution);
    debug!("Responding {} ({})", status, resolution.status());
    (status, Json(resolution))
}

fn status_code(resolution: &Resolution) -> StatusCode {
    match resolution {
        Resolution::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        Resolution::NotFound(NotFoundCause::ProviderError { .. }) => StatusCode::BAD_GATEWAY,
        Resolution::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_status_codes() {
        let (status, Json(body)) = respond(Resolution::not_found(NotFoundCause::NoCandidates));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status(), "not_found");

        let (status, _) = respond(Resolution::not_found(NotFoundCause::ProviderError {
            message: "timed out".to_string(),
        }));
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = respond(Resolution::DataUnavailable {
            dataset: "trustees".to_string(),
            reason: "missing".to_string(),
            township: None,
            location: None,
            resources: None,
        });
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_non_numeric_coordinate_is_bad_request() {
        let params = CoordinateQueryParams {
            lat: Some("abc".to_string()),
            lon: Some("-86.5".to_string()),
        };
        let invalid = params.parse().unwrap_err();
        let (status, Json(body)) = respond(invalid);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.status(), "invalid_input");
    }
}
