//! Resolution outcomes returned to callers.

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::address::AddressError;
use crate::models::{GeoPoint, Record, Township};

/// How the coordinates for a request were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateAcquisition {
    /// Supplied by the caller
    DirectInput,
    /// Returned by the geocoding provider
    ProviderGeocode,
    /// Estimated from the address point dataset
    Interpolated,
}

/// Coordinates plus their provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub acquisition: CoordinateAcquisition,
}

impl Location {
    pub fn new(point: GeoPoint, acquisition: CoordinateAcquisition) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            acquisition,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// How the record was tied to the location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// The township boundary contains the point
    Containment,
    /// The record's own coordinates are nearest the point
    NearestRecord,
}

/// Why no coordinates or record could be produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum NotFoundCause {
    /// The provider answered with no candidates
    NoCandidates,
    /// The provider call failed; not retried
    ProviderError { message: String },
    /// The street or house number is not in the address point dataset
    NotInAddressPoints,
    /// No record has coordinates within the distance threshold
    NoRecordWithinThreshold { threshold_km: f64 },
}

/// Rejected input. Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("'{value}' is not a numeric coordinate")]
    NonNumericCoordinate { value: String },

    #[error("'{value}' is not a valid postal code")]
    InvalidPostalCode { value: String },

    #[error("address is outside of {service_area} (state '{state}')")]
    OutsideServiceState { state: String, service_area: String },
}

/// County resource listing attached to reverse lookups
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resources {
    Listed { records: Vec<Record> },
    Unavailable { reason: String },
}

/// Terminal state of a resolution request.
///
/// "Data unavailable" (a dataset could not be loaded) is kept distinct from
/// the no-match outcomes `UnitOnly`, `CoordinatesOnly` and `NotFound`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Matched {
        township: Township,
        record: Record,
        location: Location,
        method: MatchMethod,
        /// Distance from the point to the record, for nearest-record matches
        #[serde(skip_serializing_if = "Option::is_none")]
        distance_km: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resources: Option<Resources>,
    },
    UnitOnly {
        township: Township,
        location: Location,
        #[serde(skip_serializing_if = "Option::is_none")]
        resources: Option<Resources>,
    },
    CoordinatesOnly {
        location: Location,
    },
    NotFound(NotFoundCause),
    InvalidInput {
        #[serde(serialize_with = "as_message")]
        error: InputError,
    },
    DataUnavailable {
        dataset: String,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        township: Option<Township>,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<Location>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resources: Option<Resources>,
    },
}

impl Resolution {
    pub fn invalid(error: impl Into<InputError>) -> Self {
        Resolution::InvalidInput {
            error: error.into(),
        }
    }

    pub fn not_found(cause: NotFoundCause) -> Self {
        Resolution::NotFound(cause)
    }

    /// Matched township, if any
    pub fn township(&self) -> Option<&Township> {
        match self {
            Resolution::Matched { township, .. } | Resolution::UnitOnly { township, .. } => {
                Some(township)
            }
            Resolution::DataUnavailable { township, .. } => township.as_ref(),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Resolution::Matched { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Resolution::Matched { location, .. }
            | Resolution::UnitOnly { location, .. }
            | Resolution::CoordinatesOnly { location } => Some(location),
            Resolution::DataUnavailable { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Short status label, matching the serialized `status` tag
    pub fn status(&self) -> &'static str {
        match self {
            Resolution::Matched { .. } => "matched",
            Resolution::UnitOnly { .. } => "unit_only",
            Resolution::CoordinatesOnly { .. } => "coordinates_only",
            Resolution::NotFound(_) => "not_found",
            Resolution::InvalidInput { .. } => "invalid_input",
            Resolution::DataUnavailable { .. } => "data_unavailable",
        }
    }
}

fn as_message<S: Serializer>(error: &InputError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
