//! Township boundary loading from GeoJSON.

use std::path::Path;

use geo::{BoundingRect, Centroid, Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::BoundaryFields;
use crate::dataset::{read_dataset, LoadError};
use crate::models::{GeoPoint, Township};

/// A single township polygon with metadata
#[derive(Debug, Clone)]
pub struct TownshipBoundary {
    pub township: Township,
    pub geometry: MultiPolygon<f64>,
    /// Position in the source file; lower wins when polygons overlap
    pub ordinal: usize,
    pub centroid: Option<GeoPoint>,
}

impl TownshipBoundary {
    pub fn new(township: Township, geometry: MultiPolygon<f64>, ordinal: usize) -> Self {
        let centroid = geometry.centroid().map(|p| GeoPoint::new(p.y(), p.x()));
        Self {
            township,
            geometry,
            ordinal,
            centroid,
        }
    }

    /// Get the bounding box of this boundary
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Map<String, Value>,
    geometry: Option<FeatureGeometry>,
}

/// Positions are `[lon, lat]` with an optional trailing altitude
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum FeatureGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

/// Load township boundaries from a GeoJSON FeatureCollection file.
pub fn load_boundaries(
    path: &Path,
    fields: &BoundaryFields,
) -> Result<Vec<TownshipBoundary>, LoadError> {
    info!("Loading township boundaries from {}", path.display());
    let content = read_dataset(path)?;
    parse_boundaries(&content, fields).map_err(|e| match e {
        ParseFailure::Json(reason) => LoadError::Malformed {
            path: path.to_path_buf(),
            reason,
        },
        ParseFailure::Empty => LoadError::Empty {
            path: path.to_path_buf(),
        },
    })
}

#[derive(Debug, PartialEq)]
pub enum ParseFailure {
    Json(String),
    Empty,
}

/// Parse boundaries from GeoJSON text, keeping file order.
///
/// Features without a county, a unit name, or a polygonal geometry are
/// skipped with a warning.
pub fn parse_boundaries(
    content: &str,
    fields: &BoundaryFields,
) -> Result<Vec<TownshipBoundary>, ParseFailure> {
    let collection: FeatureCollection =
        serde_json::from_str(content).map_err(|e| ParseFailure::Json(e.to_string()))?;

    let mut boundaries = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;

    for (position, feature) in collection.features.into_iter().enumerate() {
        let county = property(&feature.properties, &fields.county_field);
        let unit = property(&feature.properties, &fields.unit_field);

        let (county, unit) = match (county, unit) {
            (Some(c), Some(u)) => (c, u),
            _ => {
                debug!("Feature {} is missing county or unit name", position);
                skipped += 1;
                continue;
            }
        };

        let geometry = match feature.geometry.and_then(to_multi_polygon) {
            Some(g) => g,
            None => {
                debug!("Feature {} ({}, {}) has no polygon geometry", position, unit, county);
                skipped += 1;
                continue;
            }
        };

        let ordinal = boundaries.len();
        boundaries.push(TownshipBoundary::new(
            Township::new(county, unit),
            geometry,
            ordinal,
        ));
    }

    if skipped > 0 {
        warn!("Skipped {} boundary features without usable data", skipped);
    }
    if boundaries.is_empty() {
        return Err(ParseFailure::Empty);
    }

    info!("Loaded {} township boundaries", boundaries.len());
    Ok(boundaries)
}

fn property(properties: &Map<String, Value>, key: &str) -> Option<String> {
    properties
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn to_multi_polygon(geometry: FeatureGeometry) -> Option<MultiPolygon<f64>> {
    let polygons: Vec<Polygon<f64>> = match geometry {
        FeatureGeometry::Polygon { coordinates } => to_polygon(coordinates).into_iter().collect(),
        FeatureGeometry::MultiPolygon { coordinates } => {
            coordinates.into_iter().filter_map(to_polygon).collect()
        }
        FeatureGeometry::Unsupported => return None,
    };

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon::new(polygons))
    }
}

/// First ring is the exterior; the rest are holes
fn to_polygon(rings: Vec<Vec<Vec<f64>>>) -> Option<Polygon<f64>> {
    let mut rings = rings.into_iter();
    let exterior = to_ring(rings.next()?)?;
    Some(Polygon::new(exterior, rings.filter_map(to_ring).collect()))
}

fn to_ring(positions: Vec<Vec<f64>>) -> Option<LineString<f64>> {
    let mut ring: Vec<Coord<f64>> = positions
        .iter()
        .filter(|p| p.len() >= 2 && p[0].is_finite() && p[1].is_finite())
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect();

    if ring.len() < 3 {
        return None;
    }

    // Close the ring if needed
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }

    if ring.len() < 4 {
        return None;
    }

    Some(LineString::new(ring))
}
