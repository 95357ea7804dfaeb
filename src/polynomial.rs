//! Dense complex polynomials and a Laguerre root finder.
//!
//! Coefficients are stored in ascending order: `coeffs[k]` multiplies `w^k`.
//! The lens-equation polynomials assembled in [`crate::binary_lens`] are built
//! from the arithmetic here and handed to [`ComplexPolynomial::roots`].

use std::ops::{Add, Mul, Sub};

use num_complex::Complex64;
use tracing::trace;

use crate::error::{MulensError, Result};

/// Step fractions applied every 10th Laguerre iteration to break limit cycles.
const LIMIT_CYCLE_FRACTIONS: [f64; 8] = [0.5, 0.25, 0.75, 0.13, 0.38, 0.62, 0.88, 1.0];
const CYCLE_PERIOD: usize = 10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPolynomial {
    coeffs: Vec<Complex64>,
}

impl ComplexPolynomial {
    /// Build from ascending coefficients.
    pub fn new(coeffs: Vec<Complex64>) -> Self {
        Self { coeffs }
    }

    pub fn constant(c: Complex64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// `c0 + c1 w`
    pub fn linear(c0: Complex64, c1: Complex64) -> Self {
        Self {
            coeffs: vec![c0, c1],
        }
    }

    /// Monic polynomial with the given roots: `prod (w - r_k)`.
    pub fn from_roots(roots: &[Complex64]) -> Self {
        roots.iter().fold(Self::constant(Complex64::new(1.0, 0.0)), |acc, &r| {
            &acc * &Self::linear(-r, Complex64::new(1.0, 0.0))
        })
    }

    pub fn coefficients(&self) -> &[Complex64] {
        &self.coeffs
    }

    /// Degree ignoring exactly-zero leading coefficients; `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.iter().rposition(|c| *c != ZERO)
    }

    /// Horner evaluation.
    pub fn eval(&self, w: Complex64) -> Complex64 {
        self.coeffs.iter().rev().fold(ZERO, |acc, &c| acc * w + c)
    }

    pub fn scale(&self, factor: Complex64) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|&c| c * factor).collect(),
        }
    }

    /// All complex roots, with multiplicity.
    ///
    /// Roots are isolated one at a time with Laguerre's method on the deflated
    /// polynomial, then each is polished against the undeflated coefficients so
    /// that deflation round-off does not accumulate.
    pub fn roots(&self, max_iterations: usize) -> Result<Vec<Complex64>> {
        let degree = self.degree().ok_or(MulensError::DegeneratePolynomial)?;
        let full = &self.coeffs[..=degree];

        let mut deflated = full.to_vec();
        let mut roots = Vec::with_capacity(degree);
        for j in (1..=degree).rev() {
            let (root, converged) = laguerre(&deflated[..=j], ZERO, max_iterations);
            if !converged {
                return Err(MulensError::RootNotConverged {
                    degree: j,
                    iterations: max_iterations,
                });
            }
            // Synthetic division by (w - root).
            let mut b = deflated[j];
            for k in (0..j).rev() {
                let c = deflated[k];
                deflated[k] = b;
                b = root * b + c;
            }
            deflated.truncate(j);
            roots.push(root);
        }

        for root in roots.iter_mut() {
            let (polished, converged) = laguerre(full, *root, max_iterations);
            if !converged {
                trace!(?root, "polishing stopped before convergence");
            }
            *root = polished;
        }
        Ok(roots)
    }
}

/// One root of `coeffs` by Laguerre's method, starting from `start`.
///
/// Returns the last iterate and whether it converged to round-off.
fn laguerre(coeffs: &[Complex64], start: Complex64, max_iterations: usize) -> (Complex64, bool) {
    let m = coeffs.len() - 1;
    let mf = m as f64;
    let mut x = start;

    for iter in 1..=max_iterations {
        let mut b = coeffs[m];
        let mut err = b.norm();
        let mut d = ZERO;
        let mut f = ZERO;
        let abx = x.norm();
        for &c in coeffs[..m].iter().rev() {
            f = x * f + d;
            d = x * d + b;
            b = x * b + c;
            err = b.norm() + abx * err;
        }
        err *= f64::EPSILON;
        if b.norm() <= err {
            return (x, true);
        }

        let g = d / b;
        let g2 = g * g;
        let h = g2 - 2.0 * f / b;
        let sq = ((mf - 1.0) * (mf * h - g2)).sqrt();
        let gp = g + sq;
        let gm = g - sq;
        let abp = gp.norm();
        let abm = gm.norm();
        let denom = if abp < abm { gm } else { gp };
        let dx = if abp.max(abm) > 0.0 {
            mf / denom
        } else {
            Complex64::from_polar(1.0 + abx, iter as f64)
        };

        let next = x - dx;
        if next == x {
            return (x, true);
        }
        if iter % CYCLE_PERIOD != 0 {
            x = next;
        } else {
            let idx = (iter / CYCLE_PERIOD - 1) % LIMIT_CYCLE_FRACTIONS.len();
            x -= dx * LIMIT_CYCLE_FRACTIONS[idx];
        }
    }
    (x, false)
}

fn coeff(coeffs: &[Complex64], k: usize) -> Complex64 {
    coeffs.get(k).copied().unwrap_or(ZERO)
}

impl Add for &ComplexPolynomial {
    type Output = ComplexPolynomial;

    fn add(self, rhs: Self) -> ComplexPolynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..n)
            .map(|k| coeff(&self.coeffs, k) + coeff(&rhs.coeffs, k))
            .collect();
        ComplexPolynomial { coeffs }
    }
}

impl Sub for &ComplexPolynomial {
    type Output = ComplexPolynomial;

    fn sub(self, rhs: Self) -> ComplexPolynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..n)
            .map(|k| coeff(&self.coeffs, k) - coeff(&rhs.coeffs, k))
            .collect();
        ComplexPolynomial { coeffs }
    }
}

impl Mul for &ComplexPolynomial {
    type Output = ComplexPolynomial;

    fn mul(self, rhs: Self) -> ComplexPolynomial {
        if self.coeffs.is_empty() || rhs.coeffs.is_empty() {
            return ComplexPolynomial { coeffs: Vec::new() };
        }
        let mut coeffs = vec![ZERO; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        ComplexPolynomial { coeffs }
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp for ComplexPolynomial {
            type Output = ComplexPolynomial;

            fn $method(self, rhs: Self) -> ComplexPolynomial {
                (&self).$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);
