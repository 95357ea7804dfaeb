use serde::{Deserialize, Serialize};

use crate::error::{require_positive, MulensError, Result};

/// Numerical settings shared by the image solver and finite-source averaging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Largest lens-equation residual for a polynomial root to count as an image.
    pub image_tolerance: f64,
    /// Laguerre iterations allowed per root.
    pub max_iterations: usize,
    /// Radial cells of the uniform-disk quadrature.
    pub disk_rings: usize,
    /// Azimuthal cells of the uniform-disk quadrature.
    pub disk_angles: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            image_tolerance: 1e-6,
            max_iterations: 80,
            disk_rings: 20,
            disk_angles: 64,
        }
    }
}

impl SolverConfig {
    /// Reject settings under which no image could ever be accepted.
    pub fn validate(&self) -> Result<()> {
        require_positive("image_tolerance", self.image_tolerance)?;
        for (name, count) in [
            ("max_iterations", self.max_iterations),
            ("disk_rings", self.disk_rings),
            ("disk_angles", self.disk_angles),
        ] {
            if count == 0 {
                return Err(MulensError::InvalidParameter {
                    name,
                    value: 0.0,
                    reason: "must be at least 1",
                });
            }
        }
        Ok(())
    }
}
