//! Spatial index for fast township boundary lookups.

use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::{debug, info};

use super::TownshipBoundary;
use crate::geometry::contains;
use crate::models::GeoPoint;

/// Wrapper for R-tree indexing of township boundaries
#[derive(Clone)]
pub struct IndexedBoundary {
    pub boundary: Arc<TownshipBoundary>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedBoundary {
    pub fn new(boundary: Arc<TownshipBoundary>) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = boundary.bbox()?;
        Some(Self {
            boundary,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// Read-only township index.
///
/// The R-tree narrows candidates by envelope; among the candidates that
/// truly contain the point, the one loaded first wins. This makes the result
/// identical to a linear scan in load order, which [`TownshipIndex::lookup_linear`]
/// keeps available as ground truth.
pub struct TownshipIndex {
    tree: RTree<IndexedBoundary>,
    /// All boundaries in load order
    boundaries: Vec<Arc<TownshipBoundary>>,
}

impl TownshipIndex {
    /// Build spatial index from township boundaries
    pub fn build(boundaries: Vec<TownshipBoundary>) -> Self {
        info!(
            "Building spatial index for {} boundaries...",
            boundaries.len()
        );

        let boundaries: Vec<Arc<TownshipBoundary>> =
            boundaries.into_iter().map(Arc::new).collect();

        let indexed: Vec<IndexedBoundary> = boundaries
            .iter()
            .cloned()
            .filter_map(IndexedBoundary::new)
            .collect();

        let tree = RTree::bulk_load(indexed);

        info!("Spatial index built with {} entries", tree.size());

        Self { tree, boundaries }
    }

    /// First boundary in load order containing the point
    pub fn lookup(&self, point: GeoPoint) -> Option<Arc<TownshipBoundary>> {
        let query_envelope = AABB::from_point([point.lon, point.lat]);

        // Use R-tree to get candidates via envelope intersection, then filter with exact containment
        let found = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ib| contains(&ib.boundary.geometry, point))
            .min_by_key(|ib| ib.boundary.ordinal)
            .map(|ib| Arc::clone(&ib.boundary));

        debug!(
            "Containment lookup at ({}, {}): {:?}",
            point.lat,
            point.lon,
            found.as_ref().map(|b| &b.township.name)
        );

        found
    }

    /// Reference linear scan in load order
    pub fn lookup_linear(&self, point: GeoPoint) -> Option<Arc<TownshipBoundary>> {
        self.boundaries
            .iter()
            .find(|b| contains(&b.geometry, point))
            .map(Arc::clone)
    }

    /// Get total number of indexed boundaries
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Iterate over all boundaries in load order
    pub fn boundaries(&self) -> impl Iterator<Item = &Arc<TownshipBoundary>> {
        self.boundaries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Township;
    use geo::{polygon, MultiPolygon};

    fn square(county: &str, name: &str, x0: f64, y0: f64, size: f64, ordinal: usize) -> TownshipBoundary {
        let poly = polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ];
        TownshipBoundary::new(
            Township::new(county, name),
            MultiPolygon::new(vec![poly]),
            ordinal,
        )
    }

    fn grid() -> TownshipIndex {
        TownshipIndex::build(grid_boundaries())
    }

    fn grid_boundaries() -> Vec<TownshipBoundary> {
        let mut boundaries = Vec::new();
        let mut ordinal = 0;
        for row in 0..5 {
            for col in 0..5 {
                boundaries.push(square(
                    "Grid",
                    &format!("R{}C{} Township", row, col),
                    col as f64,
                    row as f64,
                    1.0,
                    ordinal,
                ));
                ordinal += 1;
            }
        }
        boundaries
    }

    /// Same boundaries, loaded in a different order
    fn reordered(order: impl Fn(Vec<TownshipBoundary>) -> Vec<TownshipBoundary>) -> TownshipIndex {
        let boundaries = order(grid_boundaries())
            .into_iter()
            .enumerate()
            .map(|(ordinal, b)| TownshipBoundary::new(b.township, b.geometry, ordinal))
            .collect();
        TownshipIndex::build(boundaries)
    }

    #[test]
    fn test_lookup_interior_point() {
        let index = grid();
        let found = index.lookup(GeoPoint::new(2.5, 3.5)).unwrap();
        assert_eq!(found.township.name, "R2C3 Township");
    }

    #[test]
    fn test_lookup_outside_all() {
        let index = grid();
        assert!(index.lookup(GeoPoint::new(40.7128, -74.0060)).is_none());
        assert!(index.lookup_linear(GeoPoint::new(40.7128, -74.0060)).is_none());
    }

    #[test]
    fn test_shared_edge_goes_to_first_loaded() {
        let index = grid();
        // x = 1.0 is the edge between C0 and C1 in row 0
        let found = index.lookup(GeoPoint::new(0.5, 1.0)).unwrap();
        assert_eq!(found.township.name, "R0C0 Township");
    }

    #[test]
    fn test_overlap_prefers_load_order() {
        let big = square("A", "Big Township", 0.0, 0.0, 10.0, 0);
        let small = square("A", "Small Township", 2.0, 2.0, 1.0, 1);
        let index = TownshipIndex::build(vec![big, small]);
        let found = index.lookup(GeoPoint::new(2.5, 2.5)).unwrap();
        assert_eq!(found.township.name, "Big Township");
    }

    #[test]
    fn test_index_matches_linear_scan() {
        let index = grid();
        let mut lat = -0.5;
        while lat <= 5.5 {
            let mut lon = -0.5;
            while lon <= 5.5 {
                let p = GeoPoint::new(lat, lon);
                let indexed = index.lookup(p).map(|b| b.ordinal);
                let linear = index.lookup_linear(p).map(|b| b.ordinal);
                assert_eq!(indexed, linear, "mismatch at {:?}", p);
                lon += 0.25;
            }
            lat += 0.25;
        }
    }

    #[test]
    fn test_interior_points_independent_of_load_order() {
        let forward = grid();
        let reversed = reordered(|mut b| {
            b.reverse();
            b
        });
        let rotated = reordered(|mut b| {
            b.rotate_left(7);
            b
        });

        for row in 0..5 {
            for col in 0..5 {
                for (dy, dx) in [(0.5, 0.5), (0.1, 0.9), (0.9, 0.1), (0.25, 0.75)] {
                    let p = GeoPoint::new(row as f64 + dy, col as f64 + dx);
                    let expected = format!("R{}C{} Township", row, col);
                    for index in [&forward, &reversed, &rotated] {
                        let found = index.lookup(p).map(|b| b.township.clone());
                        assert_eq!(found, Some(Township::new("Grid", expected.as_str())), "at {:?}", p);
                        let linear = index.lookup_linear(p).map(|b| b.township.clone());
                        assert_eq!(linear, found, "linear scan differs at {:?}", p);
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_index() {
        let index = TownshipIndex::build(vec![]);
        assert!(index.is_empty());
        assert!(index.lookup(GeoPoint::new(0.0, 0.0)).is_none());
    }
}
