//! Bundling inside one geographic cluster.
//!
//! - `split` - First pass, street-sorted chunks or proximity groups
//! - `consolidate` - Folds tiny bundles into bundles with room
//! - `relabel` - Dense A, B, C... relabelling

mod consolidate;
mod relabel;
mod split;

pub use consolidate::{Consolidation, Merge, consolidate};
pub use relabel::relabel;
pub use split::{
    bundles_needed, chunk_oversized, even_chunk_sizes, proximity_groups, sort_members,
    split_cluster, split_sorted,
};

use crate::label::bundle_key;
use crate::model::Point;
use crate::params::{BundleMode, BundleParams};

/// A bundle inside one cluster: a label index plus member indices into the
/// run's point slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub label: usize,
    pub members: Vec<usize>,
}

impl Bundle {
    pub const fn new(label: usize, members: Vec<usize>) -> Self {
        Self { label, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The `{cluster_key}-{letters}` key for this bundle.
    pub fn key(&self, cluster_key: &str) -> String {
        bundle_key(cluster_key, self.label)
    }
}

/// Result of bundling one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterBundles {
    pub cluster_key: String,
    /// Final bundles, densely labelled from 0.
    pub bundles: Vec<Bundle>,
    /// First-pass bundles, before consolidation.
    pub initial: Vec<Bundle>,
    pub consolidation: Consolidation,
}

impl ClusterBundles {
    pub fn point_count(&self) -> usize {
        self.bundles.iter().map(Bundle::len).sum()
    }

    /// The final bundle holding the points of first-pass bundle `label`.
    pub fn final_bundle_of(&self, label: usize) -> Option<&Bundle> {
        let lead = *self.initial.iter().find(|b| b.label == label)?.members.first()?;
        self.bundles.iter().find(|b| b.members.contains(&lead))
    }
}

/// Runs split, consolidate and relabel for one cluster.
pub fn bundle_cluster(
    points: &[Point],
    cluster_key: String,
    mut members: Vec<usize>,
    mode: BundleMode,
    params: &BundleParams,
) -> ClusterBundles {
    let mut bundles = split_cluster(points, &mut members, mode, params);
    let initial = bundles.clone();
    let consolidation = consolidate(&mut bundles, params.bundle_size, params.min_bundle_size);
    relabel(&mut bundles);
    ClusterBundles {
        cluster_key,
        bundles,
        initial,
        consolidation,
    }
}
