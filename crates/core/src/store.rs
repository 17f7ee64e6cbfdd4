//! Point sources and sinks.
//!
//! The engine reads every located point once (`fetch_located`) and writes
//! every assignment once (`persist_assignments`). Adapters are the only code
//! that translates between `Point` and whatever record format they persist.

use rustc_hash::FxHashMap;

use crate::error::{BundleError, Result};
use crate::model::{Assignment, Point, PointId};

/// Backing store for a bundling run.
pub trait PointStore {
    /// Returns all points that have both coordinates present.
    fn fetch_located(&mut self) -> Result<Vec<Point>>;

    /// Writes cluster and bundle keys for the given points in one batch.
    ///
    /// Implementations must either apply every assignment or none of them.
    fn persist_assignments(&mut self, assignments: &[Assignment]) -> Result<()>;
}

/// A stored record. Coordinates are optional until geocoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredPoint {
    pub id: PointId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: String,
    pub family_name: String,
    pub given_name: String,
    pub cluster_key: Option<String>,
    pub bundle_key: Option<String>,
}

impl StoredPoint {
    pub fn is_located(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    fn to_point(&self) -> Option<Point> {
        let mut point = Point::new(self.id, self.latitude?, self.longitude?)
            .with_address(self.address.clone())
            .with_name(self.given_name.clone(), self.family_name.clone());
        point.cluster_key = self.cluster_key.clone();
        point.bundle_key = self.bundle_key.clone();
        Some(point)
    }
}

/// In-process store keeping records in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<StoredPoint>,
    index: FxHashMap<PointId, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records. A later record replaces an earlier one
    /// with the same id.
    pub fn from_records(records: impl IntoIterator<Item = StoredPoint>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Builds a store from records, rejecting any repeated id.
    pub fn try_from_records(records: impl IntoIterator<Item = StoredPoint>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            if store.index.contains_key(&record.id) {
                return Err(BundleError::DuplicatePoint(record.id));
            }
            store.insert(record);
        }
        Ok(store)
    }

    pub fn insert(&mut self, record: StoredPoint) {
        match self.index.get(&record.id) {
            Some(&idx) => self.records[idx] = record,
            None => {
                self.index.insert(record.id, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, id: PointId) -> Option<&StoredPoint> {
        self.index.get(&id).map(|&idx| &self.records[idx])
    }

    pub fn records(&self) -> &[StoredPoint] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PointStore for MemoryStore {
    fn fetch_located(&mut self) -> Result<Vec<Point>> {
        Ok(self.records.iter().filter_map(StoredPoint::to_point).collect())
    }

    fn persist_assignments(&mut self, assignments: &[Assignment]) -> Result<()> {
        let mut targets = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let idx = *self
                .index
                .get(&assignment.id)
                .ok_or(BundleError::UnknownPoint(assignment.id))?;
            targets.push(idx);
        }
        for (idx, assignment) in targets.into_iter().zip(assignments) {
            let record = &mut self.records[idx];
            record.cluster_key = Some(assignment.cluster_key.clone());
            record.bundle_key = Some(assignment.bundle_key.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: PointId, coords: Option<(f64, f64)>) -> StoredPoint {
        StoredPoint {
            id,
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            address: format!("{} Main St", id),
            ..Default::default()
        }
    }

    #[test]
    fn fetch_skips_records_without_coordinates() {
        let mut store = MemoryStore::from_records([
            record(1, Some((42.0, -71.0))),
            record(2, None),
            StoredPoint {
                longitude: None,
                ..record(3, Some((42.1, -71.1)))
            },
            record(4, Some((42.2, -71.2))),
        ]);
        let ids: Vec<_> = store.fetch_located().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn persist_is_all_or_nothing() {
        let mut store = MemoryStore::from_records([record(1, Some((1.0, 1.0)))]);
        let batch = [
            Assignment {
                id: 1,
                cluster_key: "1".into(),
                bundle_key: "1-A".into(),
            },
            Assignment {
                id: 99,
                cluster_key: "1".into(),
                bundle_key: "1-A".into(),
            },
        ];
        let err = store.persist_assignments(&batch).unwrap_err();
        assert!(matches!(err, BundleError::UnknownPoint(99)));
        assert_eq!(store.get(1).unwrap().bundle_key, None);

        store.persist_assignments(&batch[..1]).unwrap();
        assert_eq!(store.get(1).unwrap().bundle_key.as_deref(), Some("1-A"));
        assert_eq!(store.get(1).unwrap().cluster_key.as_deref(), Some("1"));
    }

    #[test]
    fn strict_load_rejects_repeated_ids() {
        let err = MemoryStore::try_from_records([
            record(1, Some((1.0, 1.0))),
            record(1, Some((2.0, 2.0))),
            record(2, None),
        ])
        .unwrap_err();
        assert!(matches!(err, BundleError::DuplicatePoint(1)));

        let store =
            MemoryStore::try_from_records([record(1, None), record(2, Some((1.0, 1.0)))]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_replaces_duplicate_ids() {
        let mut store = MemoryStore::new();
        store.insert(record(7, None));
        store.insert(record(7, Some((1.0, 2.0))));
        assert_eq!(store.len(), 1);
        assert!(store.get(7).unwrap().is_located());
    }
}
