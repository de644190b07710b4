//! Township Locator - resolve Indiana addresses and coordinates to civil
//! townships and their trustee offices
//!
//! This library provides shared types and modules for the server and audit binaries.

pub mod address;
pub mod config;
pub mod dataset;
pub mod geocode;
pub mod geometry;
pub mod interpolate;
pub mod models;
pub mod pip;
pub mod records;
pub mod resolver;

pub use config::Config;
pub use dataset::{Dataset, Datasets, LoadError};
pub use models::{GeoPoint, Record, Township};
pub use resolver::{Resolution, Resolver};
