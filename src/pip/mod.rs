//! Point-in-Polygon (PIP) township lookup.
//!
//! Loads township boundaries from GeoJSON and provides containment and
//! nearest-centroid lookups over an R-tree spatial index.

mod boundary;
mod index;
mod service;

pub use boundary::{load_boundaries, parse_boundaries, ParseFailure, TownshipBoundary};
pub use index::TownshipIndex;
pub use service::PipService;
