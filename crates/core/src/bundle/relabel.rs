//! Final pass: dense relabelling.

use super::Bundle;

/// Relabels bundles to `0..len` in order of their current labels.
///
/// Returns `true` if any label changed. Running it on an already dense,
/// sorted set changes nothing.
pub fn relabel(bundles: &mut [Bundle]) -> bool {
    bundles.sort_by_key(|b| b.label);
    let mut changed = false;
    for (idx, bundle) in bundles.iter_mut().enumerate() {
        if bundle.label != idx {
            bundle.label = idx;
            changed = true;
        }
    }
    changed
}
