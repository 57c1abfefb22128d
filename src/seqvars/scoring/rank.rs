//! Rank-based rescaling of priority scores.

use itertools::Itertools as _;

/// Replace each score by its rescaled rank among all `scores`.
///
/// Scores are grouped by identical value and groups are processed in
/// descending order.  A group of `k` scores at rank `r` (1-based) is assigned
/// `1 - (r + k / 2) / n` with integer halving of `k`, then `r` advances by `k`.
/// Ties are flattened, not broken.
///
/// # Returns
///
/// The rescaled scores, at the positions of the input scores.
pub fn rescale(scores: &[f64]) -> Vec<f64> {
    let total = scores.len() as f64;
    let mut order = (0..scores.len()).collect::<Vec<_>>();
    order.sort_by(|&lhs, &rhs| scores[rhs].total_cmp(&scores[lhs]));

    let mut result = vec![0.0; scores.len()];
    let mut rank = 1usize;
    let groups = order
        .into_iter()
        .group_by(|&idx| scores[idx])
        .into_iter()
        .map(|(_, group)| group.collect::<Vec<_>>())
        .collect::<Vec<_>>();
    for group in groups {
        let k = group.len();
        let value = 1.0 - (rank + k / 2) as f64 / total;
        for idx in group {
            result[idx] = value;
        }
        rank += k;
    }
    result
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rescale_with_ties() {
        assert_eq!(rescale(&[0.9, 0.9, 0.5, 0.1]), vec![0.5, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn rescale_keeps_positions() {
        assert_eq!(rescale(&[0.1, 0.5, 0.9, 0.9]), vec![0.0, 0.25, 0.5, 0.5]);
    }

    #[test]
    fn rescale_all_tied() {
        assert_eq!(rescale(&[0.3, 0.3, 0.3]), vec![1.0 - 2.0 / 3.0; 3]);
    }

    #[test]
    fn rescale_empty() {
        assert!(rescale(&[]).is_empty());
    }
}
