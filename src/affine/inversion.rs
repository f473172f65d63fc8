//! Inverses, normal matrices and related operations on the linear block.

use super::Affine3;
use crate::{num::Float, properties::AffineProperties, scalar};
use nalgebra::Matrix3;

impl<F: Float> Affine3<F> {
    /// Computes the inverse transform.
    ///
    /// The inverse of an orthonormal transform is obtained by transposing
    /// the linear block. Otherwise the adjugate is divided by the
    /// determinant, so a singular transform yields non-finite elements.
    pub fn invert(&self) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            Self::identity()
        } else if self.properties.contains(AffineProperties::ORTHONORMAL) {
            self.invert_orthonormal()
        } else {
            self.invert_generic()
        }
    }

    fn invert_orthonormal(&self) -> Self {
        Self::from_linear_and_translation(
            [
                self.m00, self.m10, self.m20, self.m01, self.m11, self.m21, self.m02, self.m12,
                self.m22,
            ],
            [
                -(self.m00 * self.m30 + self.m01 * self.m31 + self.m02 * self.m32),
                -(self.m10 * self.m30 + self.m11 * self.m31 + self.m12 * self.m32),
                -(self.m20 * self.m30 + self.m21 * self.m31 + self.m22 * self.m32),
            ],
            self.properties & (AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL),
        )
    }

    fn invert_generic(&self) -> Self {
        let Self {
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
            m20,
            m21,
            m22,
            m30,
            m31,
            m32,
            ..
        } = *self;

        let m11m00 = m00 * m11;
        let m10m01 = m01 * m10;
        let m10m02 = m02 * m10;
        let m12m00 = m00 * m12;
        let m12m01 = m01 * m12;
        let m11m02 = m02 * m11;
        let s = F::ONE
            / ((m11m00 - m10m01) * m22 + (m10m02 - m12m00) * m21 + (m12m01 - m11m02) * m20);

        let m10m22 = m10 * m22;
        let m10m21 = m10 * m21;
        let m11m22 = m11 * m22;
        let m11m20 = m11 * m20;
        let m12m21 = m12 * m21;
        let m12m20 = m12 * m20;
        let m20m02 = m20 * m02;
        let m20m01 = m20 * m01;
        let m21m02 = m21 * m02;
        let m21m00 = m21 * m00;
        let m22m01 = m22 * m01;
        let m22m00 = m22 * m00;

        Self::from_fields(
            [
                (m11m22 - m12m21) * s,
                (m21m02 - m22m01) * s,
                (m12m01 - m11m02) * s,
                (m12m20 - m10m22) * s,
                (m22m00 - m20m02) * s,
                (m10m02 - m12m00) * s,
                (m10m21 - m11m20) * s,
                (m20m01 - m21m00) * s,
                (m11m00 - m10m01) * s,
                (m10m22 * m31 - m10m21 * m32 + m11m20 * m32 - m11m22 * m30 + m12m21 * m30
                    - m12m20 * m31)
                    * s,
                (m20m02 * m31 - m20m01 * m32 + m21m00 * m32 - m21m02 * m30 + m22m01 * m30
                    - m22m00 * m31)
                    * s,
                (m11m02 * m30 - m12m01 * m30 + m12m00 * m31 - m10m02 * m31 + m10m01 * m32
                    - m11m00 * m32)
                    * s,
            ],
            AffineProperties::empty(),
        )
    }

    /// Computes the inverse under the assumption that only the diagonal of
    /// the linear block and the translation are non-zero, as for an
    /// orthographic projection.
    pub fn invert_ortho(&self) -> Self {
        let inv_m00 = F::ONE / self.m00;
        let inv_m11 = F::ONE / self.m11;
        let inv_m22 = F::ONE / self.m22;
        Self::from_linear_and_translation(
            [
                inv_m00,
                F::ZERO,
                F::ZERO,
                F::ZERO,
                inv_m11,
                F::ZERO,
                F::ZERO,
                F::ZERO,
                inv_m22,
            ],
            [
                -self.m30 * inv_m00,
                -self.m31 * inv_m11,
                -self.m32 * inv_m22,
            ],
            AffineProperties::empty(),
        )
    }

    /// Transposes the linear block, keeping the translation.
    pub fn transpose3x3(&self) -> Self {
        Self::from_linear_and_translation(
            [
                self.m00, self.m10, self.m20, self.m01, self.m11, self.m21, self.m02, self.m12,
                self.m22,
            ],
            self.translation_array(),
            self.properties,
        )
    }

    /// Computes the determinant of the linear block.
    pub fn determinant(&self) -> F {
        (self.m00 * self.m11 - self.m01 * self.m10) * self.m22
            + (self.m02 * self.m10 - self.m00 * self.m12) * self.m21
            + (self.m01 * self.m12 - self.m02 * self.m11) * self.m20
    }

    /// Computes the normal matrix, the inverse transpose of the linear
    /// block, with zero translation.
    pub fn normal(&self) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            Self::identity()
        } else if self.properties.contains(AffineProperties::ORTHONORMAL) {
            Self::from_linear_and_translation(
                self.linear_array(),
                [F::ZERO; 3],
                AffineProperties::ORTHONORMAL,
            )
        } else {
            let cofactors = self.cofactors();
            let s = F::ONE / self.determinant();
            Self::from_linear_and_translation(
                cofactors.map(|value| value * s),
                [F::ZERO; 3],
                AffineProperties::empty(),
            )
        }
    }

    /// Computes the normal matrix as a 3x3 matrix.
    pub fn normal3x3(&self) -> Matrix3<F> {
        if self.properties.contains(AffineProperties::ORTHONORMAL) {
            self.linear_part()
        } else {
            let s = F::ONE / self.determinant();
            column_major_matrix3(self.cofactors().map(|value| value * s))
        }
    }

    /// Computes the cofactor matrix of the linear block, which is the
    /// normal matrix scaled by the determinant. The translation is zeroed.
    pub fn cofactor3x3(&self) -> Self {
        let properties = if self.properties.contains(AffineProperties::TRANSLATION) {
            AffineProperties::IDENTITY_MASK
        } else {
            self.properties & AffineProperties::ORTHONORMAL
        };
        Self::from_linear_and_translation(self.cofactors(), [F::ZERO; 3], properties)
    }

    /// Computes the cofactor matrix of the linear block as a 3x3 matrix.
    pub fn cofactor_matrix3(&self) -> Matrix3<F> {
        column_major_matrix3(self.cofactors())
    }

    /// Scales each column of the linear block to unit length.
    pub fn normalize3x3(&self) -> Self {
        let inv_x = scalar::invsqrt(self.m00 * self.m00 + self.m01 * self.m01 + self.m02 * self.m02);
        let inv_y = scalar::invsqrt(self.m10 * self.m10 + self.m11 * self.m11 + self.m12 * self.m12);
        let inv_z = scalar::invsqrt(self.m20 * self.m20 + self.m21 * self.m21 + self.m22 * self.m22);
        Self::from_linear_and_translation(
            [
                self.m00 * inv_x,
                self.m01 * inv_x,
                self.m02 * inv_x,
                self.m10 * inv_y,
                self.m11 * inv_y,
                self.m12 * inv_y,
                self.m20 * inv_z,
                self.m21 * inv_z,
                self.m22 * inv_z,
            ],
            self.translation_array(),
            self.properties,
        )
    }

    /// Column-major cofactors of the linear block.
    fn cofactors(&self) -> [F; 9] {
        [
            self.m11 * self.m22 - self.m21 * self.m12,
            self.m20 * self.m12 - self.m10 * self.m22,
            self.m10 * self.m21 - self.m20 * self.m11,
            self.m21 * self.m02 - self.m01 * self.m22,
            self.m00 * self.m22 - self.m20 * self.m02,
            self.m20 * self.m01 - self.m00 * self.m21,
            self.m01 * self.m12 - self.m02 * self.m11,
            self.m02 * self.m10 - self.m00 * self.m12,
            self.m00 * self.m11 - self.m01 * self.m10,
        ]
    }
}

fn column_major_matrix3<F: Float>(elements: [F; 9]) -> Matrix3<F> {
    Matrix3::from_column_slice(&elements)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};
    use proptest::prelude::*;

    fn general() -> Affine3<f64> {
        Affine3::new(
            2.0, 0.5, -1.0, 0.25, 3.0, 1.5, -0.75, 1.0, 1.25, 4.0, -2.0, 7.0,
        )
    }

    prop_compose! {
        fn angle_strategy()(angle in -10.0..10.0_f64) -> f64 {
            angle
        }
    }

    #[test]
    fn inverting_identity_gives_identity() {
        let inverse = Affine3::<f64>::identity().invert();
        assert_eq!(inverse, Affine3::identity());
        assert_eq!(inverse.properties(), AffineProperties::IDENTITY_MASK);
    }

    #[test]
    fn generic_inverse_round_trips() {
        let a = general();
        assert_abs_diff_eq!(a.multiply(&a.invert()), Affine3::identity(), epsilon = 1e-12);
        assert_abs_diff_eq!(a.invert().multiply(&a), Affine3::identity(), epsilon = 1e-12);
        assert!(a.invert().properties().is_empty());
    }

    #[test]
    fn generic_inverse_matches_nalgebra() {
        let a = general();
        let expected = a.to_matrix4().try_inverse().unwrap();
        assert_abs_diff_eq!(a.invert().to_matrix4(), expected, epsilon = 1e-12);
    }

    #[test]
    fn inverse_of_translation_negates_offset() {
        let inverse = Affine3::<f64>::translation(1.0, -2.0, 3.0).invert();
        assert_eq!(inverse.translation_vector(), vector![-1.0, 2.0, -3.0]);
        assert_eq!(
            inverse.properties(),
            AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL
        );
    }

    #[test]
    fn orthonormal_inverse_matches_generic_inverse() {
        let rigid = Affine3::<f64>::rotation_xyz(0.3, -1.1, 2.0).translate(1.0, 2.0, 3.0);
        let mut unflagged = rigid;
        unflagged.assume(AffineProperties::empty());
        assert_abs_diff_eq!(rigid.invert(), unflagged.invert(), epsilon = 1e-12);
        assert_eq!(rigid.invert().properties(), AffineProperties::ORTHONORMAL);
    }

    #[test]
    fn singular_inverse_is_not_finite() {
        let singular = Affine3::<f64>::scaling(1.0, 0.0, 1.0);
        assert!(!singular.invert().is_finite());
    }

    #[test]
    fn ortho_inverse_matches_generic_inverse() {
        let ortho = Affine3::<f64>::ortho_projection(-2.0, 4.0, -1.0, 3.0, 0.5, 50.0, false);
        assert_abs_diff_eq!(ortho.invert_ortho(), ortho.invert(), epsilon = 1e-12);
    }

    #[test]
    fn transposing_keeps_translation_and_properties() {
        let rotation = Affine3::<f64>::rotation_z(0.5).translate_local(1.0, 2.0, 3.0);
        let transposed = rotation.transpose3x3();
        assert_eq!(transposed.m01(), rotation.m10());
        assert_eq!(transposed.translation_vector(), rotation.translation_vector());
        assert_eq!(transposed.properties(), rotation.properties());
    }

    #[test]
    fn determinant_matches_nalgebra() {
        let a = general();
        assert_abs_diff_eq!(
            a.determinant(),
            a.linear_part().determinant(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn normal_of_rotation_is_rotation_without_translation() {
        let rigid = Affine3::<f64>::rotation_y(0.7).translate_local(3.0, 0.0, 0.0);
        let normal = rigid.normal();
        assert_eq!(normal.linear_part(), rigid.linear_part());
        assert_eq!(normal.translation_vector(), vector![0.0, 0.0, 0.0]);
        assert_eq!(normal.properties(), AffineProperties::ORTHONORMAL);
        assert_eq!(rigid.normal3x3(), rigid.linear_part());
    }

    #[test]
    fn generic_normal_is_inverse_transpose() {
        let a = general();
        let expected = a.linear_part().try_inverse().unwrap().transpose();
        assert_abs_diff_eq!(a.normal().linear_part(), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(a.normal3x3(), expected, epsilon = 1e-12);
        assert_eq!(a.normal().translation_vector(), vector![0.0, 0.0, 0.0]);
    }

    #[test]
    fn normal_keeps_normals_perpendicular_to_surface() {
        let a = Affine3::<f64>::scaling(1.0, 4.0, 0.5).rotate_x(0.3);
        let tangent = vector![1.0, 1.0, 0.0];
        let normal = vector![1.0, -1.0, 0.0];
        let transformed_tangent = a.transform_direction(&tangent);
        let transformed_normal = a.normal().transform_direction(&normal);
        assert_abs_diff_eq!(transformed_tangent.dot(&transformed_normal), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cofactors_are_normal_scaled_by_determinant() {
        let a = general();
        let scaled_normal = a.normal().linear_part() * a.determinant();
        assert_abs_diff_eq!(a.cofactor3x3().linear_part(), scaled_normal, epsilon = 1e-12);
        assert_abs_diff_eq!(a.cofactor_matrix3(), scaled_normal, epsilon = 1e-12);
        assert_eq!(
            Affine3::<f64>::translation(1.0, 2.0, 3.0).cofactor3x3().properties(),
            AffineProperties::IDENTITY_MASK
        );
    }

    #[test]
    fn normalizing_gives_unit_columns() {
        let normalized = general().normalize3x3();
        let scale = normalized.scale_vector();
        assert_abs_diff_eq!(scale, vector![1.0, 1.0, 1.0], epsilon = 1e-12);
        assert_eq!(normalized.translation_vector(), general().translation_vector());
    }

    #[test]
    fn inverse_maps_transformed_point_back() {
        let a = general();
        let p = point![0.5, -1.5, 2.0];
        assert_abs_diff_eq!(
            a.invert().transform_position(&a.transform_position(&p)),
            p,
            epsilon = 1e-12
        );
    }

    proptest! {
        #[test]
        fn rotation_inverse_equals_transpose(angle in angle_strategy()) {
            let rotation = Affine3::<f64>::rotation_y(angle);
            prop_assert!(approx::abs_diff_eq!(
                rotation.invert(),
                rotation.transpose3x3(),
                epsilon = 1e-12
            ));
        }
    }
}
