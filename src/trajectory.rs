use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_positive, Result};

/// Rectilinear source trajectory relative to the lens centre of mass.
///
/// `alpha` is the angle in degrees between the source motion and the binary
/// axis; `u_0` is the impact parameter reached at `t_0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    t_0: f64,
    u_0: f64,
    t_e: f64,
    alpha: f64,
}

impl Trajectory {
    pub fn new(t_0: f64, u_0: f64, t_e: f64, alpha: f64) -> Result<Self> {
        Ok(Self {
            t_0: require_finite("t_0", t_0)?,
            u_0: require_finite("u_0", u_0)?,
            t_e: require_positive("t_E", t_e)?,
            alpha: require_finite("alpha", alpha)?,
        })
    }

    pub fn t_0(&self) -> f64 {
        self.t_0
    }

    pub fn u_0(&self) -> f64 {
        self.u_0
    }

    pub fn t_e(&self) -> f64 {
        self.t_e
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Source position `(x, y)` at epoch `t`.
    pub fn position(&self, t: f64) -> (f64, f64) {
        let tau = (t - self.t_0) / self.t_e;
        let (sin_a, cos_a) = self.alpha.to_radians().sin_cos();
        (
            tau * cos_a - self.u_0 * sin_a,
            tau * sin_a + self.u_0 * cos_a,
        )
    }

    pub fn positions(&self, times: &[f64]) -> Vec<(f64, f64)> {
        times.iter().map(|&t| self.position(t)).collect()
    }
}
