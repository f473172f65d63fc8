//! Affine 3D transforms that track structural properties of their matrix
//! (identity, pure translation, orthonormal linear block) and use them to
//! pick cheaper algorithms.

#[macro_use]
mod macros;

pub mod affine;
pub mod axis_angle;
pub mod num;
pub mod properties;
pub mod scalar;

pub use affine::Affine3;
pub use axis_angle::AxisAngle;
pub use properties::AffineProperties;
