//! Dataset loading and availability tracking.
//!
//! The boundary dataset is mandatory: failing to load it aborts startup.
//! Record and address-point datasets are optional; a failed load is kept as
//! [`Dataset::Unavailable`] so requests can report "no data source" separately
//! from "no match".

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BoundaryFields, DataConfig};
use crate::interpolate::StreetIndex;
use crate::pip::{load_boundaries, PipService, TownshipIndex};
use crate::records::RecordStore;

/// Failure to load a named dataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("dataset {} contains no usable entries", path.display())]
    Empty { path: PathBuf },
}

/// Read a dataset file, distinguishing "absent" from other I/O failures.
pub fn read_dataset(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// An optional dataset: either loaded or unavailable with the reason.
#[derive(Debug)]
pub enum Dataset<T> {
    Ready(Arc<T>),
    Unavailable { reason: String },
}

impl<T> Dataset<T> {
    pub fn ready(value: T) -> Self {
        Dataset::Ready(Arc::new(value))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Dataset::Unavailable {
            reason: reason.into(),
        }
    }

    /// Wrap a load result, logging the failure instead of propagating it
    pub fn from_load(name: &str, result: Result<T, LoadError>) -> Self {
        match result {
            Ok(value) => Dataset::ready(value),
            Err(e) => {
                warn!("{} dataset unavailable: {}", name, e);
                Dataset::unavailable(e.to_string())
            }
        }
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Dataset::Ready(value) => Some(value),
            Dataset::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Dataset::Ready(_))
    }
}

impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        match self {
            Dataset::Ready(value) => Dataset::Ready(Arc::clone(value)),
            Dataset::Unavailable { reason } => Dataset::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

/// All read-only state a resolver needs, built once at startup.
#[derive(Clone)]
pub struct Datasets {
    pub townships: Arc<PipService>,
    pub trustees: Dataset<RecordStore>,
    pub resources: Dataset<RecordStore>,
    pub address_points: Dataset<StreetIndex>,
}

impl Datasets {
    /// Load every configured dataset. Only the boundary dataset is fatal.
    pub fn load(config: &DataConfig, fields: &BoundaryFields) -> Result<Self, LoadError> {
        let boundaries = load_boundaries(&config.boundaries, fields)?;
        let townships = Arc::new(PipService::new(TownshipIndex::build(boundaries)));

        let trustees = Dataset::from_load("trustee", RecordStore::load(&config.trustees));
        let resources = optional(&config.resources, "resource", RecordStore::load);
        let address_points = optional(&config.address_points, "address point", StreetIndex::load);

        info!(
            "Datasets loaded: {} townships, trustees {}, resources {}, address points {}",
            townships.index().len(),
            availability(&trustees),
            availability(&resources),
            availability(&address_points),
        );

        Ok(Self {
            townships,
            trustees,
            resources,
            address_points,
        })
    }
}

fn optional<T>(
    path: &Option<PathBuf>,
    name: &str,
    load: impl FnOnce(&Path) -> Result<T, LoadError>,
) -> Dataset<T> {
    match path {
        Some(path) => Dataset::from_load(name, load(path)),
        None => Dataset::unavailable(format!("no {} dataset configured", name)),
    }
}

fn availability<T>(dataset: &Dataset<T>) -> &'static str {
    if dataset.is_ready() {
        "ready"
    } else {
        "unavailable"
    }
}
