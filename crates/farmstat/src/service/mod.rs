//! In-memory record collection with CRUD, search, sorting and ranking.

mod ordering;

use std::collections::BTreeSet;
use std::path::Path;

use crate::filter::FilterEngine;
use crate::record::{Field, Record};
use crate::repository::{DatasetInfo, Repository};

use ordering::compare_records;

/// Fields scanned by [`RecordService::search`].
const SEARCH_FIELDS: [Field; 4] = [
    Field::Geo,
    Field::RefDate,
    Field::AreaProductionFarmValue,
    Field::Value,
];

/// Owns the live record collection.
///
/// Records have no identity beyond their position: deleting a record shifts
/// every later index down by one.
#[derive(Debug, Default)]
pub struct RecordService {
    records: Vec<Record>,
    repository: Repository,
    source: Option<DatasetInfo>,
}

impl RecordService {
    /// Create an empty service with a default repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty service that persists through `repository`.
    pub fn with_repository(repository: Repository) -> Self {
        Self {
            records: Vec::new(),
            repository,
            source: None,
        }
    }

    /// Number of records in memory.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Metadata of the last successfully loaded file.
    pub fn source(&self) -> Option<&DatasetInfo> {
        self.source.as_ref()
    }

    /// Replace the collection with up to `max_records` rows from `path`.
    ///
    /// On failure the error is logged, the current collection is kept and
    /// `false` is returned.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>, max_records: Option<usize>) -> bool {
        let path = path.as_ref();
        match self.repository.load_with_info(path, max_records) {
            Ok((records, info)) => {
                log::info!("loaded {} records from '{}'", records.len(), path.display());
                self.records = records;
                self.source = Some(info);
                true
            }
            Err(e) => {
                log::error!("failed to load data: {e}");
                false
            }
        }
    }

    /// Write the collection to `path`. Fails for an empty collection.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> bool {
        match self.repository.save(&self.records, path) {
            Ok(saved) => saved,
            Err(e) => {
                log::error!("failed to save data: {e}");
                false
            }
        }
    }

    /// A copy of every record, in collection order.
    pub fn records(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// A copy of the record at `index`.
    pub fn get(&self, index: usize) -> Option<Record> {
        self.records.get(index).cloned()
    }

    /// Append a record. Always succeeds.
    pub fn add(&mut self, record: Record) -> bool {
        self.records.push(record);
        true
    }

    /// Replace the record at `index`; `false` if the index is out of range.
    pub fn update(&mut self, index: usize, record: Record) -> bool {
        match self.records.get_mut(index) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => {
                log::warn!("update rejected: index {index} out of range");
                false
            }
        }
    }

    /// Remove the record at `index`; `false` if the index is out of range.
    pub fn delete(&mut self, index: usize) -> bool {
        if index < self.records.len() {
            self.records.remove(index);
            true
        } else {
            log::warn!("delete rejected: index {index} out of range");
            false
        }
    }

    /// Case-insensitive substring search over location, date, description and value.
    pub fn search(&self, term: &str) -> Vec<(usize, Record)> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.matches_term(&needle, &SEARCH_FIELDS))
            .map(|(i, r)| (i, r.clone()))
            .collect()
    }

    /// Records with indices in `start..=end`, clamped to the collection.
    pub fn range(&self, start: isize, end: isize) -> Vec<(usize, Record)> {
        let Some(last) = self.records.len().checked_sub(1) else {
            return Vec::new();
        };
        let start = start.max(0) as usize;
        let end = match usize::try_from(end) {
            Ok(end) => end.min(last),
            Err(_) => return Vec::new(),
        };
        if start > end {
            return Vec::new();
        }

        self.records[start..=end]
            .iter()
            .enumerate()
            .map(|(offset, r)| (start + offset, r.clone()))
            .collect()
    }

    /// Sort the collection in place with a stable sort.
    ///
    /// Returns `false`, leaving the order untouched, for unknown field names.
    pub fn sort(&mut self, field: &str, ascending: bool) -> bool {
        let Some(field) = Field::parse(field) else {
            log::warn!("cannot sort by unknown field '{field}'");
            return false;
        };
        self.records.sort_by(|a, b| compare_records(a, b, field, ascending));
        true
    }

    /// The first `n` records of a sorted copy. The live order is not changed.
    pub fn top_n(&self, n: usize, field: &str, ascending: bool) -> Vec<Record> {
        let Some(field) = Field::parse(field) else {
            log::warn!("cannot rank by unknown field '{field}'");
            return Vec::new();
        };
        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| compare_records(a, b, field, ascending));
        ranked.truncate(n);
        ranked
    }

    /// Distinct non-empty values of a field.
    pub fn unique_values(&self, field: &str) -> BTreeSet<String> {
        let Some(field) = Field::parse(field) else {
            return BTreeSet::new();
        };
        self.records
            .iter()
            .map(|r| r.get(field))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// A filter engine over a snapshot of the current records.
    pub fn filter_engine(&self) -> FilterEngine {
        FilterEngine::with_repository(&self.records, self.repository.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(geo: &str, value: &str) -> Record {
        Record::new().with(Field::Geo, geo).with(Field::Value, value)
    }

    fn service_with(records: &[(&str, &str)]) -> RecordService {
        let mut service = RecordService::new();
        for (geo, value) in records {
            service.add(rec(geo, value));
        }
        service
    }

    #[test]
    fn test_crud_by_index() {
        let mut service = service_with(&[("Canada", "1000"), ("Ontario", "2000")]);

        assert_eq!(service.get(1).unwrap().geo(), "Ontario");
        assert!(service.get(2).is_none());

        assert!(service.update(0, rec("Quebec", "1500")));
        assert_eq!(service.get(0).unwrap().geo(), "Quebec");
        assert!(!service.update(5, rec("Nowhere", "0")));

        assert!(service.delete(0));
        assert_eq!(service.get(0).unwrap().geo(), "Ontario");
        assert!(!service.delete(1));
        assert_eq!(service.record_count(), 1);
    }

    #[test]
    fn test_records_are_copies() {
        let service = service_with(&[("Canada", "1000")]);
        let mut copy = service.records();
        copy[0].set_geo("Changed");
        let mut single = service.get(0).unwrap();
        single.set_value("0");

        assert_eq!(service.get(0).unwrap(), rec("Canada", "1000"));
    }

    #[test]
    fn test_search_is_case_insensitive_over_key_fields() {
        let mut service = service_with(&[("Ontario", "2000"), ("Quebec", "1500")]);
        service.add(
            Record::new()
                .with(
                    Field::AreaProductionFarmValue,
                    "Seeded area (ONTARIO basis)",
                )
                .with(Field::Uom, "ontario"),
        );
        service.add(Record::new().with(Field::Uom, "ontario"));

        let results = service.search("ontario");
        let indices: Vec<usize> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 2]);

        assert_eq!(service.search("150").len(), 1);
    }

    #[test]
    fn test_range_clamps() {
        let service = service_with(&[
            ("A", "1"),
            ("B", "2"),
            ("C", "3"),
            ("D", "4"),
            ("E", "5"),
        ]);

        let results = service.range(1, 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 1);
        assert_eq!(results[2].0, 3);

        assert_eq!(service.range(-4, 1).len(), 2);
        assert_eq!(service.range(3, 99).len(), 2);
        assert!(service.range(4, 2).is_empty());
        assert!(service.range(0, -1).is_empty());
        assert!(RecordService::new().range(0, 10).is_empty());
    }

    #[test]
    fn test_sort_by_geo_and_value() {
        let mut service = service_with(&[
            ("Zebra Province", "100"),
            ("Alpha Province", "500"),
            ("Beta Province", "250"),
        ]);

        assert!(service.sort("geo", true));
        let geos: Vec<String> = service.records().iter().map(|r| r.geo().to_string()).collect();
        assert_eq!(
            geos,
            vec!["Alpha Province", "Beta Province", "Zebra Province"]
        );

        assert!(service.sort("VALUE", false));
        let values: Vec<String> = service.records().iter().map(|r| r.value().to_string()).collect();
        assert_eq!(values, vec!["500", "250", "100"]);
    }

    #[test]
    fn test_sort_invalid_field_leaves_order() {
        let mut service = service_with(&[("B", "1"), ("A", "2")]);
        let before = service.records();
        assert!(!service.sort("invalid_field", true));
        assert_eq!(service.records(), before);
    }

    #[test]
    fn test_top_n_does_not_reorder() {
        let mut service = RecordService::new();
        for i in 0..10 {
            service.add(rec(&format!("Location {i}"), &(i * 100).to_string()));
        }

        let top = service.top_n(3, "value", false);
        let values: Vec<&str> = top.iter().map(|r| r.value()).collect();
        assert_eq!(values, vec!["900", "800", "700"]);
        assert_eq!(service.get(0).unwrap().value(), "0");

        assert_eq!(service.top_n(50, "value", true).len(), 10);
        assert!(service.top_n(3, "bogus", true).is_empty());
    }

    #[test]
    fn test_unique_values() {
        let mut service = service_with(&[
            ("Ontario", "100"),
            ("Quebec", "200"),
            ("Ontario", "300"),
            ("Alberta", "400"),
        ]);
        service.add(rec("", "500"));

        let geos = service.unique_values("geo");
        assert_eq!(geos.len(), 3);
        assert!(geos.contains("Ontario"));
        assert!(geos.contains("Quebec"));
        assert!(geos.contains("Alberta"));
        assert!(service.unique_values("missing").is_empty());
    }

    #[test]
    fn test_failed_load_keeps_records() {
        let mut service = service_with(&[("Canada", "1")]);
        let loaded = service.load_from_file("/definitely/not/here.csv", Some(10));
        assert!(!loaded);
        assert_eq!(service.record_count(), 1);
        assert!(service.source().is_none());
    }

    #[test]
    fn test_save_empty_fails() {
        let service = RecordService::new();
        assert!(!service.save_to_file("/tmp/never-written.csv"));
    }
}
