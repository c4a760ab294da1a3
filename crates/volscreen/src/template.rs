//! Time-averaged template construction and slice projections.
//!
//! The template is the per-voxel time-mean of the scan, denoised by
//! zeroing each slice below its own Otsu threshold. Thresholding per
//! slice keeps the template robust to intensity drift along the slicing
//! axis. Every raw slice is then scored by its dot product against the
//! matching template slice; a whole-volume artifact degrades many slice
//! projections at once, which is what the volume-level count detects.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::scan::{Scan, SliceAxis};

/// Histogram resolution for the per-slice Otsu threshold.
const OTSU_BINS: usize = 256;

/// Denoised time-mean volume, sliced along a fixed axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    data: Array3<f64>,
    axis: SliceAxis,
    thresholds: Vec<f64>,
}

impl Template {
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn axis(&self) -> SliceAxis {
        self.axis
    }

    /// Otsu threshold applied to each slice along the template axis.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn n_slices(&self) -> usize {
        self.thresholds.len()
    }
}

/// Otsu threshold of a 2D slice: the intensity cut maximizing the
/// between-class variance of a foreground/background split, over a
/// 256-bin histogram spanning the slice's intensity range.
///
/// A flat slice has no splittable classes; the threshold collapses to the
/// minimum intensity so that nothing is zeroed.
pub fn otsu_threshold(slice: ArrayView2<'_, f64>) -> f64 {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in slice.iter() {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return if lo.is_finite() { lo } else { 0.0 };
    }

    let scale = OTSU_BINS as f64 / (hi - lo);
    let mut hist = [0usize; OTSU_BINS];
    for &v in slice.iter() {
        let bin = (((v - lo) * scale) as usize).min(OTSU_BINS - 1);
        hist[bin] += 1;
    }

    let total = slice.len() as f64;
    let mut sum_all = 0.0;
    for (i, &count) in hist.iter().enumerate() {
        sum_all += i as f64 * count as f64;
    }

    let mut w_bg = 0.0;
    let mut sum_bg = 0.0;
    let mut best_between = f64::NEG_INFINITY;
    let mut best_bin = 0usize;
    for (i, &count) in hist.iter().enumerate() {
        w_bg += count as f64;
        if w_bg == 0.0 {
            continue;
        }
        let w_fg = total - w_bg;
        if w_fg == 0.0 {
            break;
        }
        sum_bg += i as f64 * count as f64;
        let mean_bg = sum_bg / w_bg;
        let mean_fg = (sum_all - sum_bg) / w_fg;
        let between = w_bg * w_fg * (mean_bg - mean_fg) * (mean_bg - mean_fg);
        if between > best_between {
            best_between = between;
            best_bin = i;
        }
    }

    // Center of the best background bin, mapped back to intensity units.
    lo + (best_bin as f64 + 0.5) * (hi - lo) / OTSU_BINS as f64
}

/// Build the thresholded time-mean template for `scan`, slicing along
/// `axis`.
pub fn build_template(scan: &Scan, axis: SliceAxis) -> Template {
    let spatial = scan.spatial_shape();
    let mut mean = scan
        .data()
        .mean_axis(Axis(3))
        .unwrap_or_else(|| Array3::zeros((spatial[0], spatial[1], spatial[2])));

    let ax = Axis(axis.index());
    let n_slices = spatial[axis.index()];
    let mut thresholds = Vec::with_capacity(n_slices);
    for s in 0..n_slices {
        let mut slice = mean.index_axis_mut(ax, s);
        let thresh = otsu_threshold(slice.view());
        slice.mapv_inplace(|v| if v < thresh { 0.0 } else { v });
        thresholds.push(thresh);
    }

    Template {
        data: mean,
        axis,
        thresholds,
    }
}

/// Dot product of every raw slice against the matching template slice.
///
/// Returns a (volumes, slices) matrix; entry (v, s) sums over all
/// in-slice positions of volume `v`'s slice `s` times the template's
/// slice `s`.
pub fn project_onto_template(scan: &Scan, template: &Template) -> Array2<f64> {
    let ax = Axis(template.axis().index());
    let t = scan.n_volumes();
    let n_slices = template.n_slices();
    let mut projections = Array2::zeros((t, n_slices));
    for v in 0..t {
        let vol = scan.volume(v);
        for s in 0..n_slices {
            let raw = vol.index_axis(ax, s);
            let tpl = template.data().index_axis(ax, s);
            let mut dot = 0.0;
            for (a, b) in raw.iter().zip(tpl.iter()) {
                dot += a * b;
            }
            projections[[v, s]] = dot;
        }
    }
    projections
}

/// Volumes whose flagged-slice count exceeds `round(S * fraction)`.
///
/// A single noisy slice should not condemn a volume; a whole-volume
/// artifact degrades many slices at once.
pub fn flag_degraded_volumes(slice_flags: ArrayView2<'_, bool>, fraction: f64) -> Vec<usize> {
    let n_slices = slice_flags.ncols();
    let threshold = (n_slices as f64 * fraction).round();
    let mut flagged = Vec::new();
    for (v, row) in slice_flags.outer_iter().enumerate() {
        let count = row.iter().filter(|&&f| f).count();
        if count as f64 > threshold {
            flagged.push(v);
        }
    }
    flagged
}
