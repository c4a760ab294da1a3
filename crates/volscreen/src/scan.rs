//! Scan container and slicing-axis selection.

use ndarray::{Array4, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

/// Spatial axis along which the template path slices a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceAxis {
    X,
    Y,
    Z,
}

impl SliceAxis {
    /// Position of this axis within a volume's (X, Y, Z) shape.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Immutable 4D scan with axes (X, Y, Z, T).
///
/// The last axis is time; each index along it is one volume. The
/// screening pipeline never mutates the data; the thresholded template
/// is a derived copy, not a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    data: Array4<f64>,
}

impl Scan {
    pub fn new(data: Array4<f64>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Array4<f64> {
        &self.data
    }

    /// Number of volumes (length of the time axis).
    pub fn n_volumes(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    /// Spatial shape (X, Y, Z) of one volume.
    pub fn spatial_shape(&self) -> [usize; 3] {
        let (x, y, z, _) = self.data.dim();
        [x, y, z]
    }

    /// Number of slices along `axis`.
    pub fn n_slices(&self, axis: SliceAxis) -> usize {
        self.spatial_shape()[axis.index()]
    }

    /// View of volume `v`.
    pub fn volume(&self, v: usize) -> ArrayView3<'_, f64> {
        self.data.index_axis(Axis(3), v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn shape_accessors() {
        let scan = Scan::new(Array4::zeros((4, 5, 6, 7)));
        assert_eq!(scan.n_volumes(), 7);
        assert_eq!(scan.spatial_shape(), [4, 5, 6]);
        assert_eq!(scan.n_slices(SliceAxis::X), 4);
        assert_eq!(scan.n_slices(SliceAxis::Y), 5);
        assert_eq!(scan.n_slices(SliceAxis::Z), 6);
    }

    #[test]
    fn volume_view_selects_time_point() {
        let mut data = Array4::zeros((2, 2, 2, 3));
        data[[1, 0, 1, 2]] = 9.0;
        let scan = Scan::new(data);
        assert_eq!(scan.volume(2)[[1, 0, 1]], 9.0);
        assert_eq!(scan.volume(1)[[1, 0, 1]], 0.0);
        assert_eq!(scan.volume(0).dim(), (2, 2, 2));
    }
}
