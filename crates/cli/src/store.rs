//! JSON file store.
//!
//! The point file is a JSON array of records. Records without coordinates
//! are carried through untouched. Writes go to a hidden sibling file that is
//! renamed over the target, so a failed write never leaves a half-written
//! point file behind.

use std::fs;
use std::path::{Path, PathBuf};

use address_bundler_core::{
    Assignment, BundleError, MemoryStore, Point, PointStore, Result, StoredPoint,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One entry of the point file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: u64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_key: Option<String>,
}

impl From<PointRecord> for StoredPoint {
    fn from(r: PointRecord) -> Self {
        Self {
            id: r.id,
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address,
            family_name: r.family_name,
            given_name: r.given_name,
            cluster_key: r.cluster_key,
            bundle_key: r.bundle_key,
        }
    }
}

impl From<&StoredPoint> for PointRecord {
    fn from(s: &StoredPoint) -> Self {
        Self {
            id: s.id,
            address: s.address.clone(),
            family_name: s.family_name.clone(),
            given_name: s.given_name.clone(),
            latitude: s.latitude,
            longitude: s.longitude,
            cluster_key: s.cluster_key.clone(),
            bundle_key: s.bundle_key.clone(),
        }
    }
}

/// Point store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    records: MemoryStore,
    output: PathBuf,
}

impl JsonFileStore {
    /// Loads `path`. Assignments are written back to the same file unless
    /// `with_output` points elsewhere. A file that repeats an id is
    /// rejected, since writing it back would drop records.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let records: Vec<PointRecord> = serde_json::from_slice(&data)
            .map_err(|e| BundleError::Store(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), records = records.len(), "loaded point file");
        Ok(Self {
            records: MemoryStore::try_from_records(records.into_iter().map(StoredPoint::from))?,
            output: path.to_path_buf(),
        })
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn records(&self) -> &[StoredPoint] {
        self.records.records()
    }

    fn write(&self, records: &MemoryStore) -> Result<()> {
        let body: Vec<PointRecord> = records.records().iter().map(PointRecord::from).collect();
        let json = serde_json::to_vec_pretty(&body).map_err(|e| BundleError::Store(e.to_string()))?;

        let tmp = temp_sibling(&self.output);
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &self.output) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %self.output.display(), "wrote point file");
        Ok(())
    }
}

impl PointStore for JsonFileStore {
    fn fetch_located(&mut self) -> Result<Vec<Point>> {
        self.records.fetch_located()
    }

    fn persist_assignments(&mut self, assignments: &[Assignment]) -> Result<()> {
        let mut next = self.records.clone();
        next.persist_assignments(assignments)?;
        self.write(&next)?;
        self.records = next;
        Ok(())
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "points.json".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
