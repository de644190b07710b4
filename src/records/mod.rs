//! Trustee and resource record lookups.

mod audit;
mod store;

pub use audit::{missing_units, CoverageReport, MissingUnit};
pub use store::RecordStore;
