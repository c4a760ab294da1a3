//! Shared synthetic-scan builders for unit tests.

use ndarray::{Array4, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scan::Scan;

/// Scan with every voxel at `value`.
pub(crate) fn uniform_scan(nx: usize, ny: usize, nz: usize, t: usize, value: f64) -> Scan {
    Scan::new(Array4::from_elem((nx, ny, nz, t), value))
}

/// Spatially uniform scan whose intensity ramps over time:
/// volume `v` has every voxel at `base + step * v`.
pub(crate) fn graded_scan(
    nx: usize,
    ny: usize,
    nz: usize,
    t: usize,
    base: f64,
    step: f64,
) -> Scan {
    Scan::new(Array4::from_shape_fn((nx, ny, nz, t), |(_, _, _, v)| {
        base + step * v as f64
    }))
}

/// Copy of `scan` with volume `v` set to all zeros.
pub(crate) fn with_zeroed_volume(scan: Scan, v: usize) -> Scan {
    let mut data = scan.data().clone();
    data.index_axis_mut(Axis(3), v).fill(0.0);
    Scan::new(data)
}

/// Cubic scan of side `n` with a unit background and a bright blob of
/// seeded-random weight near one face. Volume `displaced` (if in range)
/// has its blob moved to the opposite face, shifting that volume's
/// centroid far outside the jitter band.
pub(crate) fn jittered_blob_scan(n: usize, t: usize, displaced: usize) -> Scan {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut data = Array4::from_elem((n, n, n, t), 1.0);
    let mid = n / 2;
    for v in 0..t {
        let w = 40.0 + rng.gen_range(0.0..4.0);
        let x = if v == displaced { 1 } else { n - 2 };
        data[[x, mid, mid, v]] += w;
    }
    Scan::new(data)
}
