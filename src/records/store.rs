//! In-memory record store keyed by county.

use std::path::Path;

use hashbrown::HashMap;
use tracing::{debug, info};

use crate::dataset::{read_dataset, LoadError};
use crate::geometry::nearest_within;
use crate::models::{GeoPoint, Record};

/// Read-only collection of records in load order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    /// Lower-cased county -> positions in `records`, ascending
    by_county: HashMap<String, Vec<usize>>,
}

impl RecordStore {
    /// Load a JSON array of records
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        info!("Loading records from {}", path.display());
        let content = read_dataset(path)?;
        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(|e| LoadError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let store = Self::from_records(records);
        info!(
            "Loaded {} records across {} counties ({} incomplete)",
            store.len(),
            store.by_county.len(),
            store.incomplete().count()
        );
        Ok(store)
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut by_county: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            by_county
                .entry(county_key(&record.county))
                .or_default()
                .push(position);
        }
        Self { records, by_county }
    }

    /// First record in load order belonging to the unit.
    ///
    /// See [`Record::matches_unit`] for the name rule. Duplicate offices in
    /// the source data resolve to the earliest entry.
    pub fn find_by_unit(&self, county: &str, unit_name: &str) -> Option<&Record> {
        let found = self
            .county_records(county)
            .find(|r| r.matches_unit(county, unit_name));
        debug!(
            "Record lookup for {} in {} County: {}",
            unit_name,
            county,
            found.map(|r| r.name.as_str()).unwrap_or("none")
        );
        found
    }

    /// All records in the county, in load order. Unknown counties yield an
    /// empty list.
    pub fn find_by_county(&self, county: &str) -> Vec<&Record> {
        self.county_records(county).collect()
    }

    /// Record whose own coordinates are nearest, if within `threshold_km`.
    ///
    /// Records without coordinates are not candidates.
    pub fn nearest(&self, point: GeoPoint, threshold_km: f64) -> Option<(&Record, f64)> {
        let candidates = self
            .records
            .iter()
            .filter_map(|r| r.coordinates().map(|c| (r, c)));
        nearest_within(point, candidates, threshold_km)
    }

    /// Records missing an address or coordinates
    pub fn incomplete(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.is_incomplete())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn county_records<'a>(&'a self, county: &str) -> impl Iterator<Item = &'a Record> + 'a {
        self.by_county
            .get(&county_key(county))
            .map(|positions| positions.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.records[i])
    }
}

fn county_key(county: &str) -> String {
    county.trim().to_lowercase()
}
