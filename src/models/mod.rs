//! Core data models for township resolution.

pub mod place;
pub mod record;
pub mod township;

pub use place::{AddressPoint, GeoPoint};
pub use record::Record;
pub use township::{bare_unit_name, Township};
