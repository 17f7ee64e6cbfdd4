//! First pass: cut a cluster into bundles.
//!
//! Members are always sorted by street first. STREET mode (and any cluster
//! that already fits in one bundle) cuts the sorted list into evenly sized
//! runs. KMEANS mode clusters the members by proximity, then cuts any
//! oversized group sequentially. The two KMEANS steps are kept separate so
//! each can be checked on its own.

use crate::cluster::{Coord, KMeans};
use crate::model::Point;
use crate::params::{BundleMode, BundleParams};
use crate::street::street_key;

use super::Bundle;

/// Number of bundles a cluster of `len` points needs.
#[inline]
pub fn bundles_needed(len: usize, bundle_size: usize) -> usize {
    len.div_ceil(bundle_size)
}

/// Sorts member indices by street key, family name, given name, then id.
pub fn sort_members(points: &[Point], members: &mut [usize]) {
    members.sort_by_cached_key(|&idx| {
        let p = &points[idx];
        (
            street_key(&p.address),
            p.family_name.clone(),
            p.given_name.clone(),
            p.id,
        )
    });
}

/// Sizes of `bundles_needed(len, bundle_size)` contiguous chunks that differ
/// by at most one; the first `len % n` chunks carry the extra point.
pub fn even_chunk_sizes(len: usize, bundle_size: usize) -> Vec<usize> {
    let needed = bundles_needed(len, bundle_size);
    if needed == 0 {
        return Vec::new();
    }
    let base = len / needed;
    let extra = len % needed;
    (0..needed).map(|b| base + usize::from(b < extra)).collect()
}

/// Cuts already sorted members into evenly sized contiguous groups.
pub fn split_sorted(members: &[usize], bundle_size: usize) -> Vec<Vec<usize>> {
    let mut groups = Vec::new();
    let mut start = 0;
    for size in even_chunk_sizes(members.len(), bundle_size) {
        groups.push(members[start..start + size].to_vec());
        start += size;
    }
    groups
}

/// Groups members by proximity with a secondary k-means of `groups` clusters.
///
/// Returned groups are in ascending sub-label order and keep the order of
/// `members` inside each group. Sizes are not bounded.
pub fn proximity_groups(
    points: &[Point],
    members: &[usize],
    groups: usize,
    params: &BundleParams,
) -> Vec<Vec<usize>> {
    let coords: Vec<Coord> = members
        .iter()
        .map(|&idx| points[idx].location.as_array())
        .collect();
    KMeans::from_params(groups, params)
        .fit(&coords)
        .groups()
        .into_iter()
        .map(|group| group.into_iter().map(|pos| members[pos]).collect())
        .collect()
}

/// Cuts every group longer than `bundle_size` into sequential pieces of at
/// most `bundle_size`. Shorter groups pass through untouched.
pub fn chunk_oversized(groups: Vec<Vec<usize>>, bundle_size: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        if group.len() <= bundle_size {
            out.push(group);
        } else {
            out.extend(group.chunks(bundle_size).map(<[usize]>::to_vec));
        }
    }
    out
}

/// Splits one cluster into labelled bundles.
///
/// `members` is sorted in place. Labels are assigned 0, 1, 2... in emission
/// order.
pub fn split_cluster(
    points: &[Point],
    members: &mut [usize],
    mode: BundleMode,
    params: &BundleParams,
) -> Vec<Bundle> {
    sort_members(points, members);
    let bundle_size = params.bundle_size;

    let groups = if mode == BundleMode::Street || members.len() <= bundle_size {
        split_sorted(members, bundle_size)
    } else {
        let needed = bundles_needed(members.len(), bundle_size);
        chunk_oversized(proximity_groups(points, members, needed, params), bundle_size)
    };

    groups
        .into_iter()
        .enumerate()
        .map(|(label, members)| Bundle::new(label, members))
        .collect()
}
