pub mod batch;
pub mod binary_lens;
pub mod common;
pub mod config;
pub mod error;
pub mod parallax;
pub mod point_lens;
pub mod polynomial;
pub mod shear;
pub mod trajectory;

pub use batch::{magnification_at, magnification_curve};
pub use binary_lens::{BinaryLens, Image};
pub use common::{mass_fractions, MagnificationModel};
pub use config::SolverConfig;
pub use error::{MulensError, Result};
pub use parallax::{ParallaxInput, ParallaxVector, ReferenceFrame};
pub use point_lens::PointLens;
pub use shear::BinaryLensWithShear;
pub use trajectory::Trajectory;
