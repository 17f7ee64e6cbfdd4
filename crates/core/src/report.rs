//! Run reports.
//!
//! Per-cluster and per-bundle sizes for observability. Building or printing
//! a report never touches the points themselves.

use std::fmt;

use itertools::Itertools;

use crate::bundle::ClusterBundles;
use crate::label::{bundle_key, split_bundle_key};
use crate::params::{BundleMode, BundleParams};

/// Size of one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub key: String,
    pub size: usize,
}

/// Sizes within one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSummary {
    pub key: String,
    pub size: usize,
    pub bundles: Vec<BundleSummary>,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleReport {
    pub mode: BundleMode,
    pub bundle_size: usize,
    pub min_bundle_size: usize,
    pub total_points: usize,
    pub clusters: Vec<ClusterSummary>,
    /// First-pass keys of folded tiny bundles, paired with the final key
    /// their points ended up under.
    pub merged: Vec<(String, String)>,
}

impl BundleReport {
    pub(crate) fn new(mode: BundleMode, params: &BundleParams, results: &[ClusterBundles]) -> Self {
        let clusters: Vec<ClusterSummary> = results
            .iter()
            .map(|c| ClusterSummary {
                key: c.cluster_key.clone(),
                size: c.point_count(),
                bundles: c
                    .bundles
                    .iter()
                    .map(|b| BundleSummary {
                        key: b.key(&c.cluster_key),
                        size: b.len(),
                    })
                    .collect(),
            })
            .collect();

        let merged = results
            .iter()
            .flat_map(|c| {
                c.consolidation.merges.iter().filter_map(|m| {
                    let dest = c.final_bundle_of(m.from)?;
                    Some((bundle_key(&c.cluster_key, m.from), dest.key(&c.cluster_key)))
                })
            })
            .collect();

        Self {
            mode,
            bundle_size: params.bundle_size,
            min_bundle_size: params.min_bundle_size,
            total_points: clusters.iter().map(|c| c.size).sum(),
            clusters,
            merged,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn bundle_count(&self) -> usize {
        self.clusters.iter().map(|c| c.bundles.len()).sum()
    }

    /// Final bundles still below `min_bundle_size`.
    pub fn undersized(&self) -> impl Iterator<Item = &BundleSummary> {
        self.clusters
            .iter()
            .flat_map(|c| &c.bundles)
            .filter(|b| b.size < self.min_bundle_size)
    }
}

impl fmt::Display for BundleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cluster in &self.clusters {
            writeln!(f, "Cluster {}: {} points", cluster.key, cluster.size)?;
            for bundle in &cluster.bundles {
                write!(f, "  Bundle {}: {} points", bundle.key, bundle.size)?;
                if bundle.size < self.min_bundle_size {
                    write!(f, " (below minimum {})", self.min_bundle_size)?;
                }
                writeln!(f)?;
            }
        }
        for (from, into) in &self.merged {
            writeln!(f, "Merged tiny bundle {} into {}", from, into)?;
        }
        let clusters = self.cluster_count();
        write!(
            f,
            "Clustered {} points into {} cluster{} with bundle size {} using {} bundling.",
            self.total_points,
            clusters,
            if clusters == 1 { "" } else { "s" },
            self.bundle_size,
            self.mode
        )
    }
}

/// Groups existing `(cluster_key, bundle_key)` pairs into summaries.
///
/// Clusters with numeric keys sort numerically, others after them by text.
/// Bundles sort by letter suffix; keys that do not parse sort last by text.
pub fn summarize_assignments<'a>(
    assignments: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<ClusterSummary> {
    assignments
        .into_iter()
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(cluster, _)| match cluster.parse::<u64>() {
            Ok(n) => (0, n, String::new()),
            Err(_) => (1, 0, cluster.to_string()),
        })
        .map(|(cluster, keys)| {
            let bundles: Vec<BundleSummary> = keys
                .into_iter()
                .counts()
                .into_iter()
                .sorted_by_key(|(key, _)| match split_bundle_key(key) {
                    Some((_, suffix)) => (0, suffix, String::new()),
                    None => (1, 0, key.to_string()),
                })
                .map(|(key, size)| BundleSummary {
                    key: key.to_string(),
                    size,
                })
                .collect();
            ClusterSummary {
                key: cluster.to_string(),
                size: bundles.iter().map(|b| b.size).sum(),
                bundles,
            }
        })
        .collect()
}
