//! Error type for the screening pipeline.

/// Errors that abort screening of a scan.
///
/// Degenerate fence statistics are deliberately not represented here: a
/// series too short or too flat for quartiles simply yields no flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// A volume's intensities sum to zero, so its center of mass is
    /// undefined.
    DegenerateVolume { volume: usize },
    /// Window half-width incompatible with the number of volumes.
    InvalidWindow { win: usize, n_volumes: usize },
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateVolume { volume } => {
                write!(f, "volume {} has zero total intensity, centroid undefined", volume)
            }
            Self::InvalidWindow { win, n_volumes } => {
                write!(
                    f,
                    "window half-width {} incompatible with {} volumes (need 1 <= win < T/2)",
                    win, n_volumes
                )
            }
        }
    }
}

impl std::error::Error for ScreenError {}
