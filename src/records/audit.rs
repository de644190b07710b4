//! Cross-check of township boundaries against the trustee records.

use serde::Serialize;

use super::RecordStore;
use crate::models::{bare_unit_name, Record};
use crate::pip::TownshipIndex;

/// Census placeholder for areas with no civil township
const UNDEFINED_SUBDIVISION: &str = "County Subdivisions Not Defined";

/// A township with no record on file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingUnit {
    pub county: String,
    pub township: String,
}

impl MissingUnit {
    /// Incomplete placeholder record for later enrichment
    pub fn placeholder(&self) -> Record {
        Record::placeholder(&self.county, &self.township)
    }
}

/// Townships without records, in boundary load order.
pub fn missing_units(index: &TownshipIndex, store: &RecordStore) -> Vec<MissingUnit> {
    index
        .boundaries()
        .map(|b| &b.township)
        .filter(|t| bare_unit_name(&t.name) != UNDEFINED_SUBDIVISION)
        .filter(|t| store.find_by_unit(&t.county, &t.name).is_none())
        .map(|t| MissingUnit {
            county: t.county.clone(),
            township: bare_unit_name(&t.name).to_string(),
        })
        .collect()
}

/// Summary of dataset coverage
#[derive(Debug, Serialize)]
pub struct CoverageReport {
    pub missing: Vec<MissingUnit>,
    /// Records needing enrichment (no address or coordinates)
    pub incomplete: Vec<Record>,
}

impl CoverageReport {
    pub fn build(index: &TownshipIndex, store: &RecordStore) -> Self {
        Self {
            missing: missing_units(index, store),
            incomplete: store.incomplete().cloned().collect(),
        }
    }

    /// Missing townships grouped by county, counties in first-seen order
    pub fn by_county(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for unit in &self.missing {
            match groups.iter_mut().find(|(county, _)| *county == unit.county) {
                Some((_, townships)) => townships.push(unit.township.as_str()),
                None => groups.push((unit.county.as_str(), vec![unit.township.as_str()])),
            }
        }
        groups
    }

    pub fn placeholders(&self) -> Vec<Record> {
        self.missing.iter().map(MissingUnit::placeholder).collect()
    }
}
