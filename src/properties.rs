//! Cached structural properties of affine transforms.

use crate::num::Float;
use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use std::fmt;

bitflags! {
    /// Bitflags encoding structural facts known to hold for the values of
    /// an [`Affine3`](crate::Affine3).
    ///
    /// A set of flags may be conservative (a flag may be missing even if the
    /// corresponding fact holds), but a flag must never be set unless the
    /// fact holds.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Zeroable, Pod)]
    pub struct AffineProperties: u8 {
        /// The transform is exactly the identity.
        const IDENTITY = 1 << 2;
        /// The linear block is exactly the identity, so the transform is a
        /// pure translation.
        const TRANSLATION = 1 << 3;
        /// The columns of the linear block are mutually perpendicular unit
        /// vectors. Reflections are included.
        const ORTHONORMAL = 1 << 4;
    }
}

impl AffineProperties {
    /// The flags of the identity transform, which has every property.
    pub const IDENTITY_MASK: Self = Self::all();

    /// Determines the flags that can be derived from exact inspection of
    /// the given column-major linear block and translation.
    ///
    /// Only an exactly identity linear block is recognized as orthonormal.
    pub fn of_fields<F: Float>(linear: &[F; 9], translation: &[F; 3]) -> Self {
        if !linear_block_is_identity(linear) {
            return Self::empty();
        }
        if translation.iter().all(|&value| value == F::ZERO) {
            Self::IDENTITY_MASK
        } else {
            Self::TRANSLATION | Self::ORTHONORMAL
        }
    }

    /// Determines every flag that actually holds for the given column-major
    /// linear block and translation. Identity and translation are checked
    /// exactly, while orthonormality is checked with the given tolerance on
    /// the entries of `L^T * L - I`.
    pub fn ground_truth<F: Float>(linear: &[F; 9], translation: &[F; 3], epsilon: F) -> Self {
        let mut properties = Self::of_fields(linear, translation);
        if linear_block_is_orthonormal(linear, epsilon) {
            properties |= Self::ORTHONORMAL;
        }
        properties
    }

    /// Whether every flag in `self` is also in `ground_truth`.
    pub fn is_sound_for(self, ground_truth: Self) -> bool {
        (self - ground_truth).is_empty()
    }
}

impl fmt::Display for AffineProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "GENERAL");
        }
        bitflags::parser::to_writer(self, f)
    }
}

fn linear_block_is_identity<F: Float>(linear: &[F; 9]) -> bool {
    linear.iter().enumerate().all(|(idx, &value)| {
        if idx % 4 == 0 {
            value == F::ONE
        } else {
            value == F::ZERO
        }
    })
}

fn linear_block_is_orthonormal<F: Float>(linear: &[F; 9], epsilon: F) -> bool {
    let column = |col: usize| &linear[3 * col..3 * col + 3];
    (0..3).all(|i| {
        (0..3).all(|j| {
            let dot: F = column(i)
                .iter()
                .zip(column(j))
                .fold(F::ZERO, |acc, (&a, &b)| acc + a * b);
            let expected = if i == j { F::ONE } else { F::ZERO };
            (dot - expected).abs() <= epsilon
        })
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const IDENTITY_LINEAR: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn identity_flags_have_canonical_bit_values() {
        assert_eq!(AffineProperties::IDENTITY.bits(), 4);
        assert_eq!(AffineProperties::TRANSLATION.bits(), 8);
        assert_eq!(AffineProperties::ORTHONORMAL.bits(), 16);
        assert_eq!(AffineProperties::IDENTITY_MASK.bits(), 28);
    }

    #[test]
    fn flags_cast_to_their_bit_pattern() {
        assert_eq!(bytemuck::cast::<_, u8>(AffineProperties::IDENTITY_MASK), 28);
        assert_eq!(
            bytemuck::cast::<u8, AffineProperties>(16),
            AffineProperties::ORTHONORMAL
        );
    }

    #[test]
    fn exact_scan_of_identity_gives_all_flags() {
        assert_eq!(
            AffineProperties::of_fields(&IDENTITY_LINEAR, &[0.0; 3]),
            AffineProperties::IDENTITY_MASK
        );
    }

    #[test]
    fn exact_scan_of_translation_omits_identity() {
        assert_eq!(
            AffineProperties::of_fields(&IDENTITY_LINEAR, &[0.0, 1.0, 0.0]),
            AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL
        );
    }

    #[test]
    fn exact_scan_does_not_use_tolerance() {
        let mut linear = IDENTITY_LINEAR;
        linear[0] = 1.0 + f64::EPSILON;
        assert!(AffineProperties::of_fields(&linear, &[0.0; 3]).is_empty());
    }

    #[test]
    fn ground_truth_recognizes_rotation_as_orthonormal() {
        let (s, c) = 0.7_f64.sin_cos();
        let linear = [c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(
            AffineProperties::ground_truth(&linear, &[3.0, 0.0, 0.0], 1e-12),
            AffineProperties::ORTHONORMAL
        );
    }

    #[test]
    fn ground_truth_rejects_scaled_block() {
        let linear = [2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0];
        assert!(AffineProperties::ground_truth(&linear, &[0.0; 3], 1e-12).is_empty());
    }

    #[test]
    fn soundness_requires_subset_of_ground_truth() {
        let truth = AffineProperties::ORTHONORMAL;
        assert!(AffineProperties::empty().is_sound_for(truth));
        assert!(AffineProperties::ORTHONORMAL.is_sound_for(truth));
        assert!(!AffineProperties::TRANSLATION.is_sound_for(truth));
    }

    #[test]
    fn display_lists_set_flags() {
        assert_eq!(AffineProperties::empty().to_string(), "GENERAL");
        assert_eq!(
            (AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL).to_string(),
            "TRANSLATION | ORTHONORMAL"
        );
    }
}
