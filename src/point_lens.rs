use serde::Serialize;

use crate::common::{uniform_disk_average, MagnificationModel};
use crate::config::SolverConfig;
use crate::error::{require_finite, require_non_negative, Result};

/// Single point-mass lens at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PointLens {
    solver: SolverConfig,
}

impl PointLens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Paczynski magnification `(u^2 + 2) / (u sqrt(u^2 + 4))`; infinite at `u = 0`.
    pub fn point_source_magnification(&self, source_x: f64, source_y: f64) -> Result<f64> {
        let u = require_finite("source_x", source_x)?.hypot(require_finite("source_y", source_y)?);
        if u == 0.0 {
            return Ok(f64::INFINITY);
        }
        let u2 = u * u;
        Ok((u2 + 2.0) / (u * (u2 + 4.0).sqrt()))
    }

    /// Uniform source of radius `rho`; `rho = 0` is a point source.
    pub fn magnification(&self, source_x: f64, source_y: f64, rho: f64) -> Result<f64> {
        let rho = require_non_negative("rho", rho)?;
        if rho == 0.0 {
            return self.point_source_magnification(source_x, source_y);
        }
        uniform_disk_average(&self.solver, source_x, source_y, rho, |x, y| {
            self.point_source_magnification(x, y)
        })
    }
}

impl MagnificationModel for PointLens {
    fn magnification(&self, source_x: f64, source_y: f64, rho: f64) -> Result<f64> {
        PointLens::magnification(self, source_x, source_y, rho)
    }
}
