use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MulensError, Result};

/// Frame in which the two parallax components are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// Sky-aligned: (pi_E_N, pi_E_E).
    #[default]
    NorthEast,
    /// Binary-axis aligned: (pi_E_par, pi_E_perp).
    ParPerp,
    /// No frame attached; components print under the generic `pi_E` label.
    Unspecified,
}

impl ReferenceFrame {
    fn component_labels(self) -> &'static str {
        match self {
            ReferenceFrame::NorthEast => "(pi_E_N, pi_E_E)",
            ReferenceFrame::ParPerp => "(pi_E_par, pi_E_perp)",
            ReferenceFrame::Unspecified => "pi_E",
        }
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceFrame::NorthEast => write!(f, "NorthEast"),
            ReferenceFrame::ParPerp => write!(f, "ParPerp"),
            ReferenceFrame::Unspecified => write!(f, "Unspecified"),
        }
    }
}

impl FromStr for ReferenceFrame {
    type Err = MulensError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NorthEast" => Ok(ReferenceFrame::NorthEast),
            "ParPerp" => Ok(ReferenceFrame::ParPerp),
            "Unspecified" => Ok(ReferenceFrame::Unspecified),
            other => Err(MulensError::UnknownReferenceFrame(other.to_string())),
        }
    }
}

/// The ways a caller may supply parallax components.
#[derive(Clone, Debug, PartialEq)]
pub enum ParallaxInput {
    /// Two scalars; a missing second component is rejected.
    Components { pi_e_1: f64, pi_e_2: Option<f64> },
    /// A sequence that must hold exactly two values.
    Composite(Vec<f64>),
    Unset,
}

impl ParallaxInput {
    /// Pick the input form from optional keyword values.
    ///
    /// Scalars and a composite given together are rejected, as is a second
    /// scalar without a first.
    pub fn from_keywords(
        pi_e_1: Option<f64>,
        pi_e_2: Option<f64>,
        pi_e: Option<Vec<f64>>,
    ) -> Result<Self> {
        match (pi_e_1, pi_e_2, pi_e) {
            (Some(_), _, Some(_)) | (_, Some(_), Some(_)) => Err(MulensError::MixedParallaxInput),
            (Some(pi_e_1), pi_e_2, None) => Ok(ParallaxInput::Components { pi_e_1, pi_e_2 }),
            (None, Some(_), None) => Err(MulensError::ParallaxComponents { found: 1 }),
            (None, None, Some(values)) => Ok(ParallaxInput::Composite(values)),
            (None, None, None) => Ok(ParallaxInput::Unset),
        }
    }
}

/// Microlensing parallax vector pi_E.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxVector {
    reference_frame: ReferenceFrame,
    components: [f64; 2],
}

impl ParallaxVector {
    /// Resolve `input` into a vector; `frame` defaults to [`ReferenceFrame::NorthEast`].
    pub fn new(input: ParallaxInput, frame: Option<ReferenceFrame>) -> Result<Self> {
        let components = match input {
            ParallaxInput::Components {
                pi_e_1,
                pi_e_2: Some(pi_e_2),
            } => [pi_e_1, pi_e_2],
            ParallaxInput::Components { pi_e_2: None, .. } => {
                return Err(MulensError::ParallaxComponents { found: 1 });
            }
            ParallaxInput::Composite(values) => match values.as_slice() {
                &[a, b] => [a, b],
                other => {
                    return Err(MulensError::ParallaxComponents { found: other.len() });
                }
            },
            ParallaxInput::Unset => return Err(MulensError::ParallaxComponents { found: 0 }),
        };
        Ok(Self {
            reference_frame: frame.unwrap_or_default(),
            components,
        })
    }

    /// North-east vector from two components.
    pub fn from_components(pi_e_1: f64, pi_e_2: f64) -> Self {
        Self {
            reference_frame: ReferenceFrame::NorthEast,
            components: [pi_e_1, pi_e_2],
        }
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        Self::new(ParallaxInput::Composite(values.to_vec()), None)
    }

    pub fn with_reference_frame(mut self, frame: ReferenceFrame) -> Self {
        self.reference_frame = frame;
        self
    }

    pub fn components(&self) -> [f64; 2] {
        self.components
    }

    pub fn reference_frame(&self) -> ReferenceFrame {
        self.reference_frame
    }
}

impl fmt::Display for ParallaxVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = ({:?}, {:?})",
            self.reference_frame.component_labels(),
            self.components[0],
            self.components[1]
        )
    }
}
