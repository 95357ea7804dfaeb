//! Binary point-mass lens: lens-equation polynomial, image finding and
//! point-source magnification.
//!
//! Source and image positions are given in the centre-of-mass frame with the
//! primary on the negative real axis. Internally everything is solved in the
//! frame of the secondary lens, where the external convergence and shear of
//! [`crate::BinaryLensWithShear`] are centred:
//!
//! ```text
//! zeta = (1 - K) w - G conj(w) - m1 / (conj(w) - d) - m2 / conj(w),   d = -s
//! ```
//!
//! Eliminating `conj(w)` with the conjugated equation yields a polynomial of
//! degree 5 (no shear) or 9 (shear). Its roots are candidate images; only those
//! that satisfy the lens equation to `image_tolerance` are kept.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::common::{uniform_disk_average, MagnificationModel};
use crate::config::SolverConfig;
use crate::error::{require_finite, require_non_negative, require_positive, MulensError, Result};
use crate::polynomial::ComplexPolynomial;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

const NEWTON_POLISH_STEPS: usize = 8;
/// Relative distance below which two accepted roots are the same image.
const DUPLICATE_IMAGE_TOLERANCE: f64 = 1e-9;

/// A solution of the lens equation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Image position, centre-of-mass frame.
    pub position: Complex64,
    /// `1 / |det J|` at the image.
    pub magnification: f64,
    /// Sign of the Jacobian determinant.
    pub parity: i8,
}

// ---------------------------------------------------------------------------
// Lens equation
// ---------------------------------------------------------------------------

/// Two point masses on the real axis plus a mass sheet (`convergence_k`) and
/// external shear (`shear_g`) centred on the secondary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct LensEquation {
    pub(crate) mass_1: f64,
    pub(crate) mass_2: f64,
    pub(crate) separation: f64,
    pub(crate) convergence_k: f64,
    pub(crate) shear_g: Complex64,
}

impl LensEquation {
    pub(crate) fn new(
        mass_1: f64,
        mass_2: f64,
        separation: f64,
        convergence_k: f64,
        shear_g: Complex64,
    ) -> Result<Self> {
        require_positive("mass_1", mass_1)?;
        require_positive("mass_2", mass_2)?;
        require_positive("separation", separation)?;
        require_finite("convergence_K", convergence_k)?;
        require_finite("shear_G.re", shear_g.re)?;
        require_finite("shear_G.im", shear_g.im)?;
        if convergence_k >= 1.0 {
            return Err(MulensError::InvalidParameter {
                name: "convergence_K",
                value: convergence_k,
                reason: "must be below 1",
            });
        }
        let a = 1.0 - convergence_k;
        if (a * a - shear_g.norm_sqr()).abs() < f64::EPSILON {
            return Err(MulensError::InvalidParameter {
                name: "shear_G",
                value: shear_g.norm(),
                reason: "|G| = 1 - K makes the lens mapping degenerate",
            });
        }
        Ok(Self {
            mass_1,
            mass_2,
            separation,
            convergence_k,
            shear_g,
        })
    }

    /// Positions of the primary and secondary on the real axis, centre-of-mass frame.
    pub(crate) fn lens_positions(&self) -> (f64, f64) {
        let total = self.mass_1 + self.mass_2;
        (
            -self.separation * self.mass_2 / total,
            self.separation * self.mass_1 / total,
        )
    }

    /// Polynomial whose roots contain every image, for a source `zeta` given
    /// relative to the secondary.
    fn polynomial(&self, zeta: Complex64) -> ComplexPolynomial {
        let m1 = Complex64::new(self.mass_1, 0.0);
        let m2 = Complex64::new(self.mass_2, 0.0);
        let d = Complex64::new(-self.separation, 0.0);
        let a = Complex64::new(1.0 - self.convergence_k, 0.0);
        let g = self.shear_g;
        let a2 = a * a;

        // D = w (w - d); on images conj(w) = N / (a D).
        let dw = ComplexPolynomial::new(vec![ZERO, -d, ONE]);
        let n = &(&ComplexPolynomial::linear(zeta.conj(), g.conj()) * &dw)
            + &ComplexPolynomial::linear(-m2 * d, m1 + m2);
        // a D (conj(w) - d) = N - d a D
        let n_shifted = &n - &dw.scale(d * a);
        let source_term = ComplexPolynomial::linear(-zeta, a);

        if g == ZERO {
            // Every term carries a factor of D; dividing it out leaves degree 5.
            (&(&source_term * &n_shifted) * &n).scale(a)
                - (&dw * &n).scale(m1 * a2)
                - (&dw * &n_shifted).scale(m2 * a2)
        } else {
            let dw2 = &dw * &dw;
            (&(&(&source_term * &dw) * &n_shifted) * &n).scale(a)
                - (&(&n * &n) * &n_shifted).scale(g)
                - (&dw2 * &n).scale(m1 * a2)
                - (&dw2 * &n_shifted).scale(m2 * a2)
        }
    }

    /// Image of `w` under the lens mapping, secondary-lens frame.
    fn map(&self, w: Complex64) -> Complex64 {
        let wc = w.conj();
        let a = 1.0 - self.convergence_k;
        a * w - self.shear_g * wc - self.mass_1 / (wc + self.separation) - self.mass_2 / wc
    }

    /// `d zeta / d conj(w)`.
    fn conjugate_derivative(&self, w: Complex64) -> Complex64 {
        let wc = w.conj();
        let p1 = wc + self.separation;
        self.mass_1 / (p1 * p1) + self.mass_2 / (wc * wc) - self.shear_g
    }

    /// Jacobian determinant of the lens mapping at `w`, secondary-lens frame.
    fn jacobian_determinant(&self, w: Complex64) -> f64 {
        let a = 1.0 - self.convergence_k;
        a * a - self.conjugate_derivative(w).norm_sqr()
    }

    /// Newton correction for `w` on the (non-analytic) lens equation.
    fn newton_step(&self, w: Complex64, zeta: Complex64) -> Option<Complex64> {
        let a = 1.0 - self.convergence_k;
        let f = self.map(w) - zeta;
        let b = self.conjugate_derivative(w);
        let step = (b * f.conj() - a * f) / (a * a - b.norm_sqr());
        step.is_finite().then_some(step)
    }

    /// Decide whether a polynomial root is an image.
    ///
    /// Roots within `image_tolerance` of the lens equation are taken as they
    /// are. Roots whose Newton correction is below the tolerance are images
    /// the polynomial located poorly (close to a lens for distant sources);
    /// they are polished on the lens equation and re-checked.
    fn refine_root(
        &self,
        root: Complex64,
        residual: f64,
        zeta: Complex64,
        tolerance: f64,
    ) -> Option<Complex64> {
        if !residual.is_finite() {
            return None;
        }
        if residual < tolerance {
            return Some(root);
        }
        let mut w = root;
        let mut step = self.newton_step(w, zeta)?;
        if step.norm() >= tolerance {
            return None;
        }
        for _ in 0..NEWTON_POLISH_STEPS {
            w += step;
            step = self.newton_step(w, zeta)?;
            if step.norm() <= f64::EPSILON * (1.0 + w.norm()) {
                break;
            }
        }
        let residual = (self.map(w) - zeta).norm();
        trace!(?root, ?w, residual, "polished poorly conditioned root");
        (residual < tolerance).then_some(w)
    }

    pub(crate) fn images(
        &self,
        source_x: f64,
        source_y: f64,
        config: &SolverConfig,
    ) -> Result<Vec<Image>> {
        config.validate()?;
        require_finite("source_x", source_x)?;
        require_finite("source_y", source_y)?;

        let (_, secondary) = self.lens_positions();
        let zeta = Complex64::new(source_x - secondary, source_y);
        let mut candidates: Vec<(f64, Complex64)> = self
            .polynomial(zeta)
            .roots(config.max_iterations)?
            .into_iter()
            .map(|w| ((self.map(w) - zeta).norm(), w))
            .collect();
        // Best roots first so that a polished root never displaces an exact one.
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut positions: Vec<Complex64> = Vec::with_capacity(candidates.len());
        for (residual, root) in candidates {
            trace!(?root, residual, "lens equation residual");
            let Some(w) = self.refine_root(root, residual, zeta, config.image_tolerance) else {
                continue;
            };
            let duplicate = positions
                .iter()
                .any(|p| (p - w).norm() < DUPLICATE_IMAGE_TOLERANCE * (1.0 + w.norm()));
            if !duplicate {
                positions.push(w);
            }
        }

        let images: Vec<Image> = positions
            .into_iter()
            .map(|w| {
                let det = self.jacobian_determinant(w);
                Image {
                    position: w + secondary,
                    magnification: 1.0 / det.abs(),
                    parity: if det < 0.0 { -1 } else { 1 },
                }
            })
            .collect();

        if images.len() % 2 == 0 {
            warn!(
                source_x,
                source_y,
                n_images = images.len(),
                "even number of images, source is probably on a caustic"
            );
        } else {
            debug!(source_x, source_y, n_images = images.len(), "solved lens equation");
        }
        Ok(images)
    }

    pub(crate) fn point_source_magnification(
        &self,
        source_x: f64,
        source_y: f64,
        config: &SolverConfig,
    ) -> Result<f64> {
        let images = self.images(source_x, source_y, config)?;
        Ok(images.iter().map(|image| image.magnification).sum())
    }
}

// ---------------------------------------------------------------------------
// Public binary lens
// ---------------------------------------------------------------------------

/// Two point masses with no external perturbation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BinaryLens {
    lens: LensEquation,
    solver: SolverConfig,
}

impl BinaryLens {
    /// `mass_1` and `mass_2` are in units of the mass defining the Einstein
    /// radius (usually `m1 + m2 = 1`); `separation` in Einstein radii.
    pub fn new(mass_1: f64, mass_2: f64, separation: f64) -> Result<Self> {
        Ok(Self {
            lens: LensEquation::new(mass_1, mass_2, separation, 0.0, ZERO)?,
            solver: SolverConfig::default(),
        })
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn mass_1(&self) -> f64 {
        self.lens.mass_1
    }

    pub fn mass_2(&self) -> f64 {
        self.lens.mass_2
    }

    pub fn separation(&self) -> f64 {
        self.lens.separation
    }

    pub fn solver(&self) -> &SolverConfig {
        &self.solver
    }

    /// Primary and secondary positions on the real axis.
    pub fn lens_positions(&self) -> (f64, f64) {
        self.lens.lens_positions()
    }

    pub fn images(&self, source_x: f64, source_y: f64) -> Result<Vec<Image>> {
        self.lens.images(source_x, source_y, &self.solver)
    }

    pub fn point_source_magnification(&self, source_x: f64, source_y: f64) -> Result<f64> {
        self.lens.point_source_magnification(source_x, source_y, &self.solver)
    }

    /// Magnification of a uniform source of radius `rho`; `rho = 0` is a point source.
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

impl MagnificationModel for BinaryLens {
    fn magnification(&self, source_x: f64, source_y: f64, rho: f64) -> Result<f64> {
        BinaryLens::magnification(self, source_x, source_y, rho)
    }
}
