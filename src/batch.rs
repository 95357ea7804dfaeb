use rayon::prelude::*;
use tracing::debug;

use crate::common::MagnificationModel;
use crate::error::Result;
use crate::trajectory::Trajectory;

/// Magnification at each source position, evaluated in parallel.
///
/// Positions are processed independently via Rayon; the output keeps their order.
pub fn magnification_at<M>(model: &M, positions: &[(f64, f64)], rho: f64) -> Result<Vec<f64>>
where
    M: MagnificationModel + ?Sized,
{
    debug!(n_positions = positions.len(), rho, "batch magnification");
    positions
        .par_iter()
        .map(|&(x, y)| model.magnification(x, y, rho))
        .collect()
}

/// Magnification along `trajectory` at each epoch in `times`.
pub fn magnification_curve<M>(
    model: &M,
    trajectory: &Trajectory,
    times: &[f64],
    rho: f64,
) -> Result<Vec<f64>>
where
    M: MagnificationModel + ?Sized,
{
    magnification_at(model, &trajectory.positions(times), rho)
}
