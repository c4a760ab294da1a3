//! Per-volume summary features.
//!
//! A [`FeatureExtractor`] reduces every volume of a scan to a fixed-size
//! feature vector, producing a (channels, volumes) series that feeds the
//! sliding-window dispersion stage. The shipped extractor is the
//! intensity-weighted center of mass.

use ndarray::{Array2, ArrayView3};

use crate::error::ScreenError;
use crate::scan::Scan;

/// Feature matrix of shape (channels, volumes), plus the volumes whose
/// features were undefined.
///
/// Degenerate volumes carry the mean feature vector of the defined ones so
/// the dispersion window of their neighbors stays computable; their
/// indices are reported so callers can treat them as outliers outright and
/// mark the series incomplete.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSeries {
    pub values: Array2<f64>,
    pub degenerate: Vec<usize>,
}

impl FeatureSeries {
    /// True when every volume produced a defined feature vector.
    pub fn is_complete(&self) -> bool {
        self.degenerate.is_empty()
    }
}

/// Reduces each volume of a scan to a fixed-size feature vector.
pub trait FeatureExtractor {
    /// Number of feature channels per volume.
    fn channels(&self) -> usize;

    /// Extract the (channels, volumes) series for `scan`.
    fn extract(&self, scan: &Scan) -> Result<FeatureSeries, ScreenError>;
}

/// Intensity-weighted center of mass, one (x, y, z) triple per volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidExtractor;

impl FeatureExtractor for CentroidExtractor {
    fn channels(&self) -> usize {
        3
    }

    fn extract(&self, scan: &Scan) -> Result<FeatureSeries, ScreenError> {
        let t = scan.n_volumes();
        let mut values = Array2::zeros((3, t));
        let mut degenerate = Vec::new();
        let mut sum = [0.0f64; 3];
        for v in 0..t {
            match volume_centroid(scan.volume(v)) {
                Some(c) => {
                    for ch in 0..3 {
                        values[[ch, v]] = c[ch];
                        sum[ch] += c[ch];
                    }
                }
                None => degenerate.push(v),
            }
        }
        if !degenerate.is_empty() {
            let defined = t - degenerate.len();
            let fill = if defined > 0 {
                [
                    sum[0] / defined as f64,
                    sum[1] / defined as f64,
                    sum[2] / defined as f64,
                ]
            } else {
                // Every volume is empty; fall back to the grid center.
                let s = scan.spatial_shape();
                [
                    (s[0] as f64 - 1.0) / 2.0,
                    (s[1] as f64 - 1.0) / 2.0,
                    (s[2] as f64 - 1.0) / 2.0,
                ]
            };
            for &v in &degenerate {
                for ch in 0..3 {
                    values[[ch, v]] = fill[ch];
                }
            }
        }
        Ok(FeatureSeries { values, degenerate })
    }
}

/// Center of mass of every volume, treating intensity as mass.
///
/// Returns a (3, volumes) series. Unlike [`CentroidExtractor::extract`],
/// this is the strict form: a volume whose intensities sum to zero has no
/// defined centroid and aborts with [`ScreenError::DegenerateVolume`].
pub fn centroid_series(scan: &Scan) -> Result<Array2<f64>, ScreenError> {
    let t = scan.n_volumes();
    let mut series = Array2::zeros((3, t));
    for v in 0..t {
        let c = volume_centroid(scan.volume(v))
            .ok_or(ScreenError::DegenerateVolume { volume: v })?;
        for ch in 0..3 {
            series[[ch, v]] = c[ch];
        }
    }
    Ok(series)
}

/// Intensity-weighted centroid of one volume, `None` when it carries no
/// mass.
fn volume_centroid(vol: ArrayView3<'_, f64>) -> Option<[f64; 3]> {
    let mut mass = 0.0;
    let mut moment = [0.0f64; 3];
    for ((x, y, z), &w) in vol.indexed_iter() {
        mass += w;
        moment[0] += w * x as f64;
        moment[1] += w * y as f64;
        moment[2] += w * z as f64;
    }
    if mass == 0.0 {
        return None;
    }
    Some([moment[0] / mass, moment[1] / mass, moment[2] / mass])
}
