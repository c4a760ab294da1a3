//! Tukey-fence outlier flagging with robust quartiles.
//!
//! Motion and dropout artifacts produce heavy-tailed score distributions,
//! so fences are built from quartiles rather than a normality assumption.
//! Both detector paths share this one implementation: the centroid path
//! uses the two-sided form on its dispersion series, the template path
//! the lower-tail form per slice column.

use ndarray::{Array2, ArrayView2, Axis};

/// Percentile of an ascending-sorted slice by linear interpolation
/// between order statistics.
///
/// The rank is `p / 100 * (n - 1)`; fractional ranks interpolate linearly
/// between the two bracketing values. This matches numpy's default
/// percentile definition.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

fn quartile_fence(values: &[f64], multiplier: f64) -> Option<(f64, f64)> {
    let sorted = sorted_copy(values);
    let distinct = 1 + sorted.windows(2).filter(|w| w[0] != w[1]).count();
    if sorted.len() < 4 || distinct < 4 {
        return None;
    }
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    if iqr <= 0.0 || !iqr.is_finite() {
        return None;
    }
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr))
}

/// Two-sided Tukey fences over a score sequence.
///
/// Flags positions strictly outside [q1 − m·iqr, q3 + m·iqr]. Fewer than
/// four distinct values, or a collapsed interquartile range, yields no
/// flags: a series that short or that flat has no detectable anomaly.
pub fn flag_two_sided(values: &[f64], multiplier: f64) -> Vec<usize> {
    let Some((lower, upper)) = quartile_fence(values, multiplier) else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| v < lower || v > upper)
        .map(|(i, _)| i)
        .collect()
}

/// Lower-tail Tukey fences applied independently to every column of a
/// (volumes, slices) matrix.
///
/// Template-similarity artifacts push projections low, never high, so
/// only `value < q1 − m·iqr` flags an entry. Degenerate columns flag
/// nothing.
pub fn flag_lower_per_column(matrix: ArrayView2<'_, f64>, multiplier: f64) -> Array2<bool> {
    let (t, s) = matrix.dim();
    let mut flags = Array2::from_elem((t, s), false);
    for (col, column) in matrix.axis_iter(Axis(1)).enumerate() {
        let values = column.to_vec();
        let Some((lower, _)) = quartile_fence(&values, multiplier) else {
            continue;
        };
        for (row, &v) in values.iter().enumerate() {
            if v < lower {
                flags[[row, col]] = true;
            }
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 25.0), 2.0);
        assert_eq!(percentile(&sorted, 50.0), 3.0);
        assert_eq!(percentile(&sorted, 100.0), 5.0);
        let even = vec![1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&even, 25.0) - 1.75).abs() < 1e-12);
        assert!((percentile(&even, 75.0) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn spike_flagged_on_both_tails() {
        let mut values: Vec<f64> = (0..20).map(|i| 10.0 + 0.1 * i as f64).collect();
        values[3] = 100.0;
        values[11] = -50.0;
        let flags = flag_two_sided(&values, 1.5);
        assert_eq!(flags, vec![3, 11]);
    }

    #[test]
    fn zero_variance_yields_no_flags() {
        let values = vec![5.0; 30];
        assert!(flag_two_sided(&values, 1.5).is_empty());
    }

    #[test]
    fn short_series_yields_no_flags() {
        assert!(flag_two_sided(&[1.0, 100.0, 1.0], 1.5).is_empty());
    }

    #[test]
    fn too_few_distinct_values_yields_no_flags() {
        assert!(flag_two_sided(&[1.0, 1.0, 1.0, 1.0, 100.0, 1.0], 1.5).is_empty());
    }

    #[test]
    fn wider_multiplier_keeps_moderate_values() {
        let mut values: Vec<f64> = (0..12).map(|i| (i % 4) as f64).collect();
        values[5] = 6.5;
        assert_eq!(flag_two_sided(&values, 1.5), vec![5]);
        assert!(flag_two_sided(&values, 1.75).is_empty());
    }

    #[test]
    fn columnar_flags_lower_tail_only() {
        // Column 0 has one low value, column 1 one high value.
        let mut rows = Vec::new();
        for i in 0..12 {
            rows.push([20.0 + 0.2 * i as f64, 20.0 + 0.2 * i as f64]);
        }
        rows[4][0] = 1.0;
        rows[7][1] = 90.0;
        let matrix = arr2(&rows);
        let flags = flag_lower_per_column(matrix.view(), 1.5);
        assert!(flags[[4, 0]]);
        assert!(!flags[[7, 1]]);
        assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
    }

    #[test]
    fn constant_column_flags_nothing() {
        let matrix = arr2(&[[1.0, 2.0], [1.0, 2.0], [1.0, 2.0], [1.0, 2.0], [1.0, 2.0]]);
        let flags = flag_lower_per_column(matrix.view(), 1.5);
        assert!(flags.iter().all(|&f| !f));
    }
}
