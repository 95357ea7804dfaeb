use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MulensError>;

/// Errors raised while constructing lens models or computing magnifications.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MulensError {
    /// The parallax vector was given the wrong number of components.
    #[error("pi_E has 2 components (got {found})")]
    ParallaxComponents { found: usize },

    #[error("pi_E given both as separate components and as a sequence")]
    MixedParallaxInput,

    #[error("unknown reference frame '{0}', expected NorthEast, ParPerp or Unspecified")]
    UnknownReferenceFrame(String),

    /// A physical or numerical input is outside its valid domain.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("polynomial has no non-zero coefficients")]
    DegeneratePolynomial,

    /// Laguerre iteration ran out of steps while isolating a root.
    #[error("root of degree-{degree} polynomial did not converge in {iterations} iterations")]
    RootNotConverged { degree: usize, iterations: usize },
}

/// Reject non-finite values and values not strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(MulensError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(MulensError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(value)
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MulensError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    let value = require_finite(name, value)?;
    if value < 0.0 {
        return Err(MulensError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        });
    }
    Ok(value)
}
