//! House-number interpolation over OSM address points.
//!
//! Points are grouped by lower-cased street name. For an address that has no
//! exact point, the coordinate is estimated between the bracketing known
//! house numbers, assuming numbers run roughly linearly along the street.
//! This is an approximation, not exact geocoding.

use std::path::Path;
use std::sync::LazyLock;

use hashbrown::HashMap;
use regex::Regex;
use tracing::{debug, info};

use crate::dataset::{read_dataset, LoadError};
use crate::geometry::{distance_between, interpolate_linear};
use crate::models::{AddressPoint, GeoPoint};

static HOUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid house number regex"));

/// Numeric part of a house number ("325" -> 325, "12A" -> 12, "Rear" -> None)
pub fn house_number_value(house_number: &str) -> Option<u64> {
    HOUSE_NUMBER
        .find(house_number)
        .and_then(|m| m.as_str().parse().ok())
}

/// A located address point with its parsed house number
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedPoint {
    pub number: u64,
    pub location: GeoPoint,
}

impl NumberedPoint {
    pub fn new(number: u64, location: GeoPoint) -> Self {
        Self { number, location }
    }

    fn from_address(point: &AddressPoint) -> Option<Self> {
        Some(Self {
            number: house_number_value(&point.house_number)?,
            location: point.location()?,
        })
    }
}

/// Point on the street whose house number is closest to `target`.
///
/// An exact number match wins outright; otherwise ties go to the earliest
/// point in `points`.
pub fn best_numeric_match(target: u64, points: &[NumberedPoint]) -> Option<&NumberedPoint> {
    points
        .iter()
        .find(|p| p.number == target)
        .or_else(|| points.iter().min_by_key(|p| p.number.abs_diff(target)))
}

/// Estimate the coordinate of house number `target` on a street.
///
/// With no exact match, the points are ordered by number and the bracketing
/// pair is found (`prev`: greatest number <= target, `next`: smallest number
/// >= target). The position is `prev + f * (next - prev)` where
/// `f = dist(prev, best) / dist(prev, next)` and `best` is the
/// [`best_numeric_match`]. A missing or degenerate bracket falls back to the
/// best match itself.
pub fn interpolate(target: u64, points: &[NumberedPoint]) -> Option<GeoPoint> {
    let best = best_numeric_match(target, points)?;
    if best.number == target {
        return Some(best.location);
    }

    let mut sorted: Vec<&NumberedPoint> = points.iter().collect();
    sorted.sort_by_key(|p| p.number);

    let prev = sorted.iter().rev().find(|p| p.number <= target);
    let next = sorted.iter().find(|p| p.number >= target);

    let (prev, next) = match (prev, next) {
        (Some(prev), Some(next)) if prev.number != next.number => (*prev, *next),
        _ => {
            debug!("No bracket for house number {}, using nearest number {}", target, best.number);
            return Some(best.location);
        }
    };

    let span = distance_between(prev.location, next.location);
    if span <= 0.0 {
        return Some(best.location);
    }

    let fraction = distance_between(prev.location, best.location) / span;
    debug!(
        "Interpolating {} between {} and {} (fraction {:.3})",
        target, prev.number, next.number, fraction
    );
    Some(interpolate_linear(prev.location, next.location, fraction))
}

/// Address points grouped by street
#[derive(Debug, Default)]
pub struct StreetIndex {
    streets: HashMap<String, Vec<NumberedPoint>>,
}

impl StreetIndex {
    /// Load a JSON array of OSM address points
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        info!("Loading address points from {}", path.display());
        let content = read_dataset(path)?;
        let points: Vec<AddressPoint> =
            serde_json::from_str(&content).map_err(|e| LoadError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let index = Self::from_points(&points);
        if index.streets.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(index)
    }

    /// Group points by lower-cased street, dropping those without a numeric
    /// house number or coordinates.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a AddressPoint>) -> Self {
        let mut streets: HashMap<String, Vec<NumberedPoint>> = HashMap::new();
        let mut total = 0usize;
        let mut dropped = 0usize;

        for point in points {
            total += 1;
            let key = street_key(&point.street);
            match NumberedPoint::from_address(point) {
                Some(numbered) if !key.is_empty() => {
                    streets.entry(key).or_default().push(numbered);
                }
                _ => dropped += 1,
            }
        }

        info!(
            "Indexed {} address points on {} streets ({} of {} unusable)",
            total - dropped,
            streets.len(),
            dropped,
            total
        );
        Self { streets }
    }

    /// Points on a street, matched case-insensitively
    pub fn street(&self, street: &str) -> Option<&[NumberedPoint]> {
        self.streets.get(&street_key(street)).map(Vec::as_slice)
    }

    /// Estimate coordinates for `house_number street`
    pub fn locate(&self, house_number: &str, street: &str) -> Option<GeoPoint> {
        let target = house_number_value(house_number)?;
        interpolate(target, self.street(street)?)
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }
}

fn street_key(street: &str) -> String {
    street.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
