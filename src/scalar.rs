//! Scalar helpers used by the affine transform operations.

use crate::num::Float;

/// Computes the sine of the given angle (in radians).
#[inline]
pub fn sin<F: Float>(angle: F) -> F {
    angle.sin()
}

/// Computes the cosine of the given angle (in radians).
#[inline]
pub fn cos<F: Float>(angle: F) -> F {
    angle.cos()
}

/// Computes the cosine of `angle` from its already known sine.
///
/// The magnitude is obtained as `sqrt(1 - sin^2)`, and the sign is
/// recovered from the quadrant of `angle`.
#[inline]
pub fn cos_from_sin<F: Float>(sin: F, angle: F) -> F {
    let cos = (F::ONE - sin * sin).sqrt();
    let a = angle + F::FRAC_PI_2();
    let mut b = a - (a / F::two_pi()).trunc() * F::two_pi();
    if b < F::ZERO {
        b += F::two_pi();
    }
    if b >= F::PI() { -cos } else { cos }
}

/// Computes `1 / sqrt(value)`.
#[inline]
pub fn invsqrt<F: Float>(value: F) -> F {
    F::ONE / value.sqrt()
}

/// Computes `a * b + c` with a single rounding.
#[inline]
pub fn fma<F: Float>(a: F, b: F, c: F) -> F {
    a.mul_add(b, c)
}

/// Whether the absolute value of `value` is exactly one.
#[inline]
pub fn abs_equals_one<F: Float>(value: F) -> bool {
    value.abs() == F::ONE
}

/// Whether `value` is neither infinite nor NaN.
#[inline]
pub fn is_finite<F: Float>(value: F) -> bool {
    value.is_finite()
}

/// Computes the arccosine of `value` after clamping it to `[-1, 1]`.
#[inline]
pub fn safe_acos<F: Float>(value: F) -> F {
    if value < F::NEG_ONE {
        F::PI()
    } else if value > F::ONE {
        F::ZERO
    } else {
        value.acos()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn cosine_from_sine_has_correct_sign_in_each_quadrant() {
        for angle in [0.3, FRAC_PI_2 + 0.3, PI + 0.3, 3.0 * FRAC_PI_2 + 0.3, -0.3, -PI + 0.3] {
            assert_abs_diff_eq!(cos_from_sin(angle.sin(), angle), angle.cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn abs_equals_one_only_accepts_exact_unit_magnitude() {
        assert!(abs_equals_one(1.0_f64));
        assert!(abs_equals_one(-1.0_f32));
        assert!(!abs_equals_one(1.0 + f64::EPSILON));
        assert!(!abs_equals_one(0.0_f64));
    }

    #[test]
    fn safe_acos_clamps_out_of_range_input() {
        assert_eq!(safe_acos(1.5_f64), 0.0);
        assert_abs_diff_eq!(safe_acos(-1.5_f64), PI);
        assert_abs_diff_eq!(safe_acos(0.0_f64), FRAC_PI_2);
    }

    #[test]
    fn invsqrt_of_zero_is_infinite() {
        assert!(!is_finite(invsqrt(0.0_f64)));
        assert_abs_diff_eq!(invsqrt(4.0_f64), 0.5);
    }

    proptest! {
        #[test]
        fn should_match_regular_cosine(angle in -20.0..20.0_f64) {
            prop_assert!(approx::abs_diff_eq!(cos_from_sin(sin(angle), angle), cos(angle), epsilon = 1e-7));
        }
    }
}
