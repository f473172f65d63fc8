//! Rotations represented by an axis and an angle.

use crate::{num::Float, scalar};
use approx::AbsDiffEq;
use nalgebra::Vector3;

/// A rotation by `angle` radians around `axis`, following the right-hand
/// rule.
///
/// The axis is not required to have unit length. Operations consuming an
/// [`AxisAngle`] normalize the axis themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAngle<F: Float> {
    pub axis: Vector3<F>,
    pub angle: F,
}

impl<F: Float> AxisAngle<F> {
    /// Creates a new axis-angle rotation.
    pub fn new(axis: Vector3<F>, angle: F) -> Self {
        Self { axis, angle }
    }

    /// Creates the zero rotation, using the z-axis as a placeholder axis.
    pub fn zero() -> Self {
        Self::new(Vector3::z(), F::ZERO)
    }

    /// Returns a copy with the axis scaled to unit length.
    pub fn normalized(&self) -> Self {
        let inv_length = scalar::invsqrt(self.axis.norm_squared());
        Self::new(self.axis * inv_length, self.angle)
    }
}

impl<F: Float> AbsDiffEq for AxisAngle<F> {
    type Epsilon = F;

    fn default_epsilon() -> F {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: F) -> bool {
        self.axis.abs_diff_eq(&other.axis, epsilon) && self.angle.abs_diff_eq(&other.angle, epsilon)
    }
}
