//! Cluster-and-bundle pipeline.
//!
//! FETCH -> CLUSTER -> (per cluster: SPLIT -> CONSOLIDATE -> RELABEL) ->
//! PERSIST -> REPORT. Stages run once each, in order. Configuration is
//! validated before anything is fetched, and the store sees exactly one
//! write, after every cluster is finished.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::bundle::{ClusterBundles, bundle_cluster};
use crate::cluster::{cluster_key, geo_clusters};
use crate::error::Result;
use crate::model::{Assignment, Point};
use crate::params::{BundleMode, BundleParams};
use crate::report::BundleReport;
use crate::store::PointStore;

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The store had no located points. Nothing was written.
    NoPoints,
    /// Every located point was assigned and persisted.
    Completed(BundleReport),
}

impl RunOutcome {
    pub fn report(&self) -> Option<&BundleReport> {
        match self {
            Self::NoPoints => None,
            Self::Completed(report) => Some(report),
        }
    }
}

/// A validated engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleEngine {
    params: BundleParams,
    mode: BundleMode,
}

impl BundleEngine {
    /// Validates `params` and builds an engine.
    pub fn new(params: BundleParams, mode: BundleMode) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, mode })
    }

    /// Like `new`, parsing `mode` case-insensitively ("STREET" or "KMEANS").
    pub fn with_mode_str(params: BundleParams, mode: &str) -> Result<Self> {
        Self::new(params, mode.parse()?)
    }

    pub fn params(&self) -> &BundleParams {
        &self.params
    }

    pub fn mode(&self) -> BundleMode {
        self.mode
    }

    /// Fetches, assigns, persists and reports.
    pub fn run<S: PointStore + ?Sized>(&self, store: &mut S) -> Result<RunOutcome> {
        let mut points = store.fetch_located()?;
        if points.is_empty() {
            info!("no geocoded points found, nothing to bundle");
            return Ok(RunOutcome::NoPoints);
        }
        info!(points = points.len(), mode = %self.mode, "fetched located points");

        let results = self.bundle(&points);
        write_keys(&mut points, &results);

        let assignments: Vec<Assignment> = points.iter().filter_map(Point::assignment).collect();
        store.persist_assignments(&assignments)?;
        info!(assignments = assignments.len(), "persisted bundle assignments");

        let report = BundleReport::new(self.mode, &self.params, &results);
        log_report(&report);
        Ok(RunOutcome::Completed(report))
    }

    /// Assigns cluster and bundle keys in memory, without a store.
    ///
    /// Returns `None` for an empty slice.
    pub fn assign(&self, points: &mut [Point]) -> Option<BundleReport> {
        if points.is_empty() {
            return None;
        }
        let results = self.bundle(points);
        write_keys(points, &results);
        Some(BundleReport::new(self.mode, &self.params, &results))
    }

    fn bundle(&self, points: &[Point]) -> Vec<ClusterBundles> {
        let groups = match self.params.cluster_count {
            None => vec![(0..points.len()).collect()],
            Some(count) => geo_clusters(points, count.min(points.len()), &self.params),
        };
        info!(clusters = groups.len(), "clustered points");

        // Clusters share nothing mutable; indexed collect keeps key order.
        groups
            .into_par_iter()
            .enumerate()
            .map(|(idx, members)| {
                let key = cluster_key(idx);
                debug!(cluster = %key, points = members.len(), "bundling cluster");
                bundle_cluster(points, key, members, self.mode, &self.params)
            })
            .collect()
    }
}

/// Validates configuration, then runs the full pipeline against `store`.
///
/// Configuration errors are returned before the store is read.
pub fn run<S: PointStore + ?Sized>(
    store: &mut S,
    params: &BundleParams,
    mode: &str,
) -> Result<RunOutcome> {
    BundleEngine::with_mode_str(params.clone(), mode)?.run(store)
}

fn write_keys(points: &mut [Point], results: &[ClusterBundles]) {
    for cluster in results {
        for bundle in &cluster.bundles {
            let key = bundle.key(&cluster.cluster_key);
            for &idx in &bundle.members {
                points[idx].cluster_key = Some(cluster.cluster_key.clone());
                points[idx].bundle_key = Some(key.clone());
            }
        }
    }
}

fn log_report(report: &BundleReport) {
    for cluster in &report.clusters {
        info!(cluster = %cluster.key, points = cluster.size, bundles = cluster.bundles.len(), "cluster");
        for bundle in &cluster.bundles {
            debug!(bundle = %bundle.key, points = bundle.size, "final bundle");
        }
    }
    for bundle in report.undersized() {
        info!(bundle = %bundle.key, points = bundle.size, "bundle remains below minimum size");
    }
    info!(
        points = report.total_points,
        clusters = report.cluster_count(),
        bundles = report.bundle_count(),
        "bundling complete"
    );
}
