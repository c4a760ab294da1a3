//! Sliding-window dispersion scores over a feature series.
//!
//! Generalizes frame-to-frame variance metrics: each volume is scored by
//! its root-mean-square deviation from the average of a symmetric
//! neighborhood, rather than only the adjacent volume.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::ScreenError;
use crate::fence;

/// Dispersion scores for the volumes that have a full symmetric window.
///
/// `values[i]` scores volume `i + offset`; the first and last `offset`
/// volumes carry no score and can never be flagged by this path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionSeries {
    pub values: Vec<f64>,
    pub offset: usize,
}

impl DispersionSeries {
    /// Volume index scored by position `pos`.
    pub fn volume_index(&self, pos: usize) -> usize {
        pos + self.offset
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Volume indices whose score falls outside the two-sided Tukey
    /// fences, already re-mapped from score positions.
    pub fn fence_flags(&self, multiplier: f64) -> Vec<usize> {
        fence::flag_two_sided(&self.values, multiplier)
            .into_iter()
            .map(|pos| self.volume_index(pos))
            .collect()
    }
}

/// Root-mean-square deviation of each feature vector from the average of
/// its `2 * win` symmetric neighbors, the center itself excluded.
///
/// `features` has shape (channels, volumes). For every center in
/// [win, T − win) the neighborhood average is taken over the `win`
/// vectors on each side, the squared differences are averaged across
/// channels, and the square root is the score. Requires `1 <= win` and
/// `T > 2 * win`, otherwise [`ScreenError::InvalidWindow`] before any
/// computation.
///
/// Window sums come from per-channel prefix sums, so no windowed copy of
/// the series is ever materialized.
pub fn sliding_dispersion(
    features: ArrayView2<'_, f64>,
    win: usize,
) -> Result<DispersionSeries, ScreenError> {
    let (channels, t) = features.dim();
    if win == 0 || t <= 2 * win {
        return Err(ScreenError::InvalidWindow { win, n_volumes: t });
    }

    let mut prefix = vec![vec![0.0f64; t + 1]; channels];
    for (ch, row) in prefix.iter_mut().enumerate() {
        for v in 0..t {
            row[v + 1] = row[v] + features[[ch, v]];
        }
    }

    let span = (2 * win) as f64;
    let mut values = Vec::with_capacity(t - 2 * win);
    for vol in win..(t - win) {
        let mut sq = 0.0;
        for (ch, row) in prefix.iter().enumerate() {
            let center = features[[ch, vol]];
            let window_sum = row[vol + win + 1] - row[vol - win] - center;
            let avg = window_sum / span;
            let d = center - avg;
            sq += d * d;
        }
        values.push((sq / channels as f64).sqrt());
    }

    Ok(DispersionSeries { values, offset: win })
}
