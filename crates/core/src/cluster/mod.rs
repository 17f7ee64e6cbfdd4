//! Geographic clustering.
//!
//! Partitions points into K groups with seeded k-means. Groups come back
//! non-empty and in a stable order; group `i` becomes cluster key `i + 1`.

mod kmeans;

pub use kmeans::{Clustering, Coord, KMeans};

use crate::model::Point;
use crate::params::BundleParams;

/// Partitions `points` into at most `cluster_count` geographic groups.
///
/// Returns index groups into `points`. Identical input gives identical
/// groups. Empty input gives no groups.
pub fn geo_clusters(points: &[Point], cluster_count: usize, params: &BundleParams) -> Vec<Vec<usize>> {
    if points.is_empty() {
        return Vec::new();
    }
    let coords: Vec<Coord> = points.iter().map(|p| p.location.as_array()).collect();
    KMeans::from_params(cluster_count, params).fit(&coords).groups()
}

/// The 1-based cluster key for group index `idx`.
pub fn cluster_key(idx: usize) -> String {
    (idx + 1).to_string()
}
