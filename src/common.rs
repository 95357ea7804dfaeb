use std::f64::consts::TAU;

use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::error::Result;

/// A lens model that can report the magnification of a source at `(x, y)`.
///
/// `rho` is the angular source radius in Einstein radii; `0.0` requests the
/// point-source value. Coordinates are in the model's centre-of-mass frame.
pub trait MagnificationModel: Send + Sync {
    fn magnification(&self, source_x: f64, source_y: f64, rho: f64) -> Result<f64>;
}

/// Primary and secondary mass fractions for mass ratio `q = m2 / m1`.
pub fn mass_fractions(q: f64) -> (f64, f64) {
    (1.0 / (1.0 + q), q / (1.0 + q))
}

// ---------------------------------------------------------------------------
// Finite source
// ---------------------------------------------------------------------------

/// Average a point-source magnification over a uniformly bright disk.
///
/// Midpoint rule on a polar grid of `disk_rings x disk_angles` cells centred
/// on the source, each cell weighted by its area. Rings are evaluated in
/// parallel; the first failing evaluation aborts the average.
pub fn uniform_disk_average<F>(
    config: &SolverConfig,
    source_x: f64,
    source_y: f64,
    rho: f64,
    point_magnification: F,
) -> Result<f64>
where
    F: Fn(f64, f64) -> Result<f64> + Sync,
{
    config.validate()?;
    let rings = config.disk_rings;
    let angles = config.disk_angles;
    let d_r = rho / rings as f64;
    let d_theta = TAU / angles as f64;

    let ring_sums = (0..rings)
        .into_par_iter()
        .map(|i| {
            let r = (i as f64 + 0.5) * d_r;
            let mut sum = 0.0;
            for j in 0..angles {
                let theta = (j as f64 + 0.5) * d_theta;
                sum += point_magnification(source_x + r * theta.cos(), source_y + r * theta.sin())?;
            }
            Ok((r * sum, r * angles as f64))
        })
        .collect::<Result<Vec<(f64, f64)>>>()?;

    let (weighted, weight) = ring_sums
        .iter()
        .fold((0.0, 0.0), |(acc_m, acc_w), &(m, w)| (acc_m + m, acc_w + w));
    Ok(weighted / weight)
}
