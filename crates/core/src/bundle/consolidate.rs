//! Second pass: fold tiny bundles into bundles with spare capacity.

use std::cmp::Reverse;

use tracing::{debug, warn};

use super::Bundle;

/// A tiny bundle moved into another bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub from: usize,
    pub into: usize,
    pub size: usize,
}

/// What a consolidation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidation {
    pub merges: Vec<Merge>,
    /// Labels of tiny bundles that had no bundle able to take them.
    pub unplaced: Vec<usize>,
}

/// Merges bundles smaller than `min_bundle_size` into other bundles.
///
/// The tiny set is fixed before any merge. Each tiny bundle, in ascending
/// label order and with its current contents, moves into the other bundle
/// with the most remaining capacity that can hold it without exceeding
/// `bundle_size`; ties go to the lowest label. A tiny bundle with no such
/// target is left as is. Greedy: tiny bundles are never recombined with each
/// other to make room.
pub fn consolidate(
    bundles: &mut Vec<Bundle>,
    bundle_size: usize,
    min_bundle_size: usize,
) -> Consolidation {
    let mut tiny: Vec<usize> = bundles
        .iter()
        .filter(|b| b.len() < min_bundle_size)
        .map(|b| b.label)
        .collect();
    tiny.sort_unstable();

    let mut outcome = Consolidation::default();
    for label in tiny {
        let Some(pos) = bundles.iter().position(|b| b.label == label) else {
            continue;
        };
        let size = bundles[pos].len();

        let target = bundles
            .iter()
            .filter(|b| b.label != label && b.len() + size <= bundle_size)
            .max_by_key(|b| (bundle_size - b.len(), Reverse(b.label)))
            .map(|b| b.label);

        let Some(into) = target else {
            warn!(label, size, "no bundle has room for tiny bundle, leaving it");
            outcome.unplaced.push(label);
            continue;
        };

        let moved = bundles.remove(pos);
        if let Some(dest) = bundles.iter_mut().find(|b| b.label == into) {
            dest.members.extend(moved.members);
        }
        debug!(from = label, into, size, "merged tiny bundle");
        outcome.merges.push(Merge {
            from: label,
            into,
            size,
        });
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundles_of(sizes: &[usize]) -> Vec<Bundle> {
        let mut next = 0;
        sizes
            .iter()
            .enumerate()
            .map(|(label, &size)| {
                let members = (next..next + size).collect();
                next += size;
                Bundle::new(label, members)
            })
            .collect()
    }

    fn sizes(bundles: &[Bundle]) -> Vec<(usize, usize)> {
        bundles.iter().map(|b| (b.label, b.len())).collect()
    }

    #[test]
    fn no_room_leaves_tiny_bundle() {
        let mut bundles = bundles_of(&[18, 3, 19]);
        let outcome = consolidate(&mut bundles, 20, 5);
        assert!(outcome.merges.is_empty());
        assert_eq!(outcome.unplaced, vec![1]);
        assert_eq!(sizes(&bundles), vec![(0, 18), (1, 3), (2, 19)]);
    }

    #[test]
    fn merges_into_bundle_with_room() {
        let mut bundles = bundles_of(&[18, 3, 12]);
        let outcome = consolidate(&mut bundles, 20, 5);
        assert_eq!(
            outcome.merges,
            vec![Merge {
                from: 1,
                into: 2,
                size: 3
            }]
        );
        assert_eq!(sizes(&bundles), vec![(0, 18), (2, 15)]);
        assert_eq!(bundles[1].members, vec![21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 18, 19, 20]);
    }

    #[test]
    fn prefers_most_remaining_capacity() {
        let mut bundles = bundles_of(&[10, 2, 6, 15]);
        consolidate(&mut bundles, 20, 5);
        assert_eq!(sizes(&bundles), vec![(0, 10), (2, 8), (3, 15)]);
    }

    #[test]
    fn ties_go_to_lowest_label() {
        let mut bundles = bundles_of(&[12, 3, 12]);
        consolidate(&mut bundles, 20, 5);
        assert_eq!(sizes(&bundles), vec![(0, 15), (2, 12)]);
    }

    #[test]
    fn tiny_bundle_can_absorb_another_tiny_bundle() {
        // 1 goes into 2 (most room), then 2 (now 5) is still processed from
        // the snapshot and folds into 0.
        let mut bundles = bundles_of(&[8, 1, 4]);
        let outcome = consolidate(&mut bundles, 20, 5);
        assert_eq!(outcome.merges.len(), 2);
        assert_eq!(sizes(&bundles), vec![(0, 13)]);
    }

    #[test]
    fn nothing_tiny_is_a_no_op() {
        let mut bundles = bundles_of(&[16, 16, 15]);
        let outcome = consolidate(&mut bundles, 20, 5);
        assert_eq!(outcome, Consolidation::default());
        assert_eq!(bundles.len(), 3);
    }
}
