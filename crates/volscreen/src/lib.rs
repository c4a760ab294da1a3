//! volscreen — outlier-volume screening for 4D scans.
//!
//! Flags time-points corrupted by motion, scanner artifact, or signal
//! dropout so they can be excluded from downstream analysis. Two
//! independent detectors run over every scan:
//!
//! 1. **Centroid path** – each volume reduces to its intensity-weighted
//!    center of mass; a sliding-window RMS dispersion score over that
//!    series is fenced with robust quartiles.
//! 2. **Template path** – every slice of every volume is projected onto a
//!    per-slice Otsu-thresholded time-mean template; volumes with too many
//!    anomalously low projections are flagged.
//!
//! A volume makes the final list only when the template path flags it and
//! the centroid path agrees within one volume index.
//!
//! # Public API
//! The stable surface is intentionally small:
//! - [`Screener`] and [`ScreenConfig`] as primary entry points
//! - [`Scan`] as the input container
//! - individual stages ([`centroid_series`], [`sliding_dispersion`],
//!   [`build_template`], the fence functions) for callers assembling
//!   custom pipelines
//!
//! The engine never reads files, draws plots, or prints; loading and
//! presentation belong to front ends such as `volscreen-cli`.

mod consensus;
mod dispersion;
mod error;
mod features;
mod fence;
mod scan;
mod screener;
mod template;
#[cfg(test)]
mod test_utils;

pub use consensus::reconcile;
pub use dispersion::{sliding_dispersion, DispersionSeries};
pub use error::ScreenError;
pub use features::{centroid_series, CentroidExtractor, FeatureExtractor, FeatureSeries};
pub use fence::{flag_lower_per_column, flag_two_sided, percentile};
pub use scan::{Scan, SliceAxis};
pub use screener::{screen_scan, ScreenConfig, ScreenResult, Screener};
pub use template::{
    build_template, flag_degraded_volumes, otsu_threshold, project_onto_template, Template,
};
