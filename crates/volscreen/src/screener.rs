//! High-level screening API.
//!
//! [`Screener`] is the primary entry point for flagging outlier volumes.
//! It wraps a [`ScreenConfig`] and runs both detector paths plus the
//! consensus step over any number of scans. Create once, screen many.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consensus;
use crate::dispersion::{sliding_dispersion, DispersionSeries};
use crate::error::ScreenError;
use crate::features::{CentroidExtractor, FeatureExtractor};
use crate::fence;
use crate::scan::{Scan, SliceAxis};
use crate::template;

/// Tuning knobs for one screening run.
///
/// Passed explicitly into every stage; there is no ambient configuration,
/// so different configurations can screen different scans concurrently
/// without interference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Half-width of the symmetric dispersion window, in volumes.
    pub window_halfwidth: usize,
    /// Tukey fence multiplier shared by both detector paths.
    /// 1.5 and 1.75 are the values in common use.
    pub fence_multiplier: f64,
    /// Spatial axis sliced by the template path.
    pub slicing_axis: SliceAxis,
    /// Fraction of a volume's slices that must be anomalous before the
    /// volume itself is flagged.
    pub slice_outlier_fraction: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            window_halfwidth: 1,
            fence_multiplier: 1.5,
            slicing_axis: SliceAxis::Z,
            slice_outlier_fraction: 0.25,
        }
    }
}

/// Outcome of screening one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    /// Consensus outlier volumes, ascending.
    pub flagged_volumes: Vec<usize>,
    /// Volumes flagged by the centroid-dispersion path.
    pub centroid_flags: Vec<usize>,
    /// Volumes flagged by the template-projection path.
    pub template_flags: Vec<usize>,
    /// Volumes with zero total intensity. Their centroid is undefined;
    /// they are counted into the centroid path's flags and their presence
    /// marks the centroid series incomplete.
    pub degenerate_volumes: Vec<usize>,
    /// Dispersion scores over the centroid series.
    pub dispersion: DispersionSeries,
    /// Per-(volume, slice) projections onto the template, for external
    /// visualization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projections: Option<Array2<f64>>,
    /// Number of volumes screened.
    pub n_volumes: usize,
}

impl ScreenResult {
    /// True when every volume had a defined centroid.
    pub fn is_complete(&self) -> bool {
        self.degenerate_volumes.is_empty()
    }
}

/// Primary screening interface.
pub struct Screener {
    config: ScreenConfig,
}

impl Screener {
    pub fn new() -> Self {
        Self {
            config: ScreenConfig::default(),
        }
    }

    pub fn with_config(config: ScreenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut ScreenConfig {
        &mut self.config
    }

    /// Screen one scan for outlier volumes.
    pub fn screen(&self, scan: &Scan) -> Result<ScreenResult, ScreenError> {
        screen_scan(scan, &self.config)
    }
}

impl Default for Screener {
    fn default() -> Self {
        Self::new()
    }
}

/// Run both detector paths over `scan` and reconcile them.
pub fn screen_scan(scan: &Scan, config: &ScreenConfig) -> Result<ScreenResult, ScreenError> {
    // Centroid path: center-of-mass series, windowed dispersion, fences.
    let features = CentroidExtractor.extract(scan)?;
    if !features.is_complete() {
        tracing::warn!(
            "{} of {} volumes have zero mass and no defined centroid",
            features.degenerate.len(),
            scan.n_volumes()
        );
    }
    let dispersion = sliding_dispersion(features.values.view(), config.window_halfwidth)?;
    let mut centroid_flags = dispersion.fence_flags(config.fence_multiplier);
    // A volume with no definable centroid is an outlier by itself.
    centroid_flags.extend(features.degenerate.iter().copied());
    centroid_flags.sort_unstable();
    centroid_flags.dedup();
    tracing::info!(
        "centroid path: {} of {} scored volumes flagged",
        centroid_flags.len(),
        dispersion.len()
    );

    // Template path: thresholded time-mean, slice projections, lower fences.
    let template = template::build_template(scan, config.slicing_axis);
    let projections = template::project_onto_template(scan, &template);
    let slice_flags = fence::flag_lower_per_column(projections.view(), config.fence_multiplier);
    let template_flags =
        template::flag_degraded_volumes(slice_flags.view(), config.slice_outlier_fraction);
    tracing::info!(
        "template path: {} volumes flagged across {} slices",
        template_flags.len(),
        template.n_slices()
    );

    let flagged_volumes = consensus::reconcile(&template_flags, &centroid_flags);
    tracing::info!("consensus: {} outlier volumes", flagged_volumes.len());

    Ok(ScreenResult {
        flagged_volumes,
        centroid_flags,
        template_flags,
        degenerate_volumes: features.degenerate,
        dispersion,
        projections: Some(projections),
        n_volumes: scan.n_volumes(),
    })
}
