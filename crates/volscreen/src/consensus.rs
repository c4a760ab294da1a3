//! Consensus between the two detector paths.

use std::collections::BTreeSet;

/// Volumes kept from the template set when the centroid set agrees within
/// one volume index.
///
/// The ±1 tolerance absorbs the sliding window's center shift and minor
/// disagreement over which adjacent volume soaks up an artifact. Index 0
/// never looks below itself and no index wraps around.
pub fn reconcile(template_flags: &[usize], centroid_flags: &[usize]) -> Vec<usize> {
    let centroid: BTreeSet<usize> = centroid_flags.iter().copied().collect();
    let mut kept: Vec<usize> = template_flags
        .iter()
        .copied()
        .filter(|&v| {
            centroid.contains(&v)
                || v.checked_sub(1).is_some_and(|p| centroid.contains(&p))
                || centroid.contains(&(v + 1))
        })
        .collect();
    kept.sort_unstable();
    kept.dedup();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_keeps_neighbors_of_agreement() {
        assert_eq!(reconcile(&[4, 5, 6, 9], &[5]), vec![4, 5, 6]);
    }

    #[test]
    fn empty_centroid_set_keeps_nothing() {
        assert!(reconcile(&[1, 2, 3], &[]).is_empty());
    }

    #[test]
    fn index_zero_does_not_wrap() {
        assert_eq!(reconcile(&[0], &[1]), vec![0]);
        assert!(reconcile(&[0], &[19]).is_empty());
    }

    #[test]
    fn output_is_sorted_and_deduplicated() {
        assert_eq!(reconcile(&[7, 3, 7], &[3, 8]), vec![3, 7]);
    }
}
