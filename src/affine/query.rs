//! Transformation of geometric objects and extraction of information from
//! a transform.

use super::Affine3;
use crate::{axis_angle::AxisAngle, num::Float, scalar};
use anyhow::{Result, bail};
use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3, Vector4};

impl<F: Float> Affine3<F> {
    /// Transforms the given position, applying the translation.
    pub fn transform_position(&self, position: &Point3<F>) -> Point3<F> {
        Point3::from(self.transform_direction(&position.coords) + self.translation_vector())
    }

    /// Transforms the given direction, ignoring the translation.
    pub fn transform_direction(&self, direction: &Vector3<F>) -> Vector3<F> {
        let (x, y, z) = (direction.x, direction.y, direction.z);
        Vector3::new(
            self.m00 * x + self.m10 * y + self.m20 * z,
            self.m01 * x + self.m11 * y + self.m21 * z,
            self.m02 * x + self.m12 * y + self.m22 * z,
        )
    }

    /// Transforms the given homogeneous vector. The translation is scaled
    /// by `w`, which is passed through unchanged.
    pub fn transform_vector4(&self, vector: &Vector4<F>) -> Vector4<F> {
        let transformed =
            self.transform_direction(&vector.xyz()) + self.translation_vector() * vector.w;
        Vector4::new(transformed.x, transformed.y, transformed.z, vector.w)
    }

    /// Computes the minimum and maximum corner of the axis-aligned box
    /// enclosing the given box after transformation.
    pub fn transform_aabb(&self, min: &Point3<F>, max: &Point3<F>) -> (Point3<F>, Point3<F>) {
        let mut out_min = self.translation_vector();
        let mut out_max = out_min;
        for (column, (&lower, &upper)) in self
            .linear_columns_as_vectors()
            .iter()
            .zip(min.coords.iter().zip(max.coords.iter()))
        {
            let a = column * lower;
            let b = column * upper;
            out_min += a.zip_map(&b, |a, b| a.min(b));
            out_max += a.zip_map(&b, |a, b| a.max(b));
        }
        (Point3::from(out_min), Point3::from(out_max))
    }

    /// Returns the length of each column of the linear block.
    pub fn scale_vector(&self) -> Vector3<F> {
        let [x, y, z] = self.linear_columns_as_vectors();
        Vector3::new(x.norm(), y.norm(), z.norm())
    }

    /// Extracts the angles `(x, y, z)` such that the linear block equals
    /// `Rx(x) * Ry(y) * Rz(z)`.
    ///
    /// The linear block must be a rotation for the result to be
    /// meaningful.
    pub fn euler_angles_xyz(&self) -> Vector3<F> {
        Vector3::new(
            F::atan2(-self.m21, self.m22),
            F::atan2(self.m20, F::sqrt(F::ONE - self.m20 * self.m20)),
            F::atan2(-self.m10, self.m00),
        )
    }

    /// Extracts the angles `(x, y, z)` such that the linear block equals
    /// `Rz(z) * Ry(y) * Rx(x)`.
    ///
    /// The linear block must be a rotation for the result to be
    /// meaningful.
    pub fn euler_angles_zyx(&self) -> Vector3<F> {
        Vector3::new(
            F::atan2(self.m12, self.m22),
            F::atan2(-self.m02, F::sqrt(F::ONE - self.m02 * self.m02)),
            F::atan2(self.m01, self.m00),
        )
    }

    /// Computes the unit direction that the transform maps onto `+x`.
    ///
    /// Works for any invertible linear block.
    pub fn positive_x(&self) -> Vector3<F> {
        Vector3::new(
            self.m11 * self.m22 - self.m12 * self.m21,
            self.m02 * self.m21 - self.m01 * self.m22,
            self.m01 * self.m12 - self.m02 * self.m11,
        )
        .normalize()
    }

    /// Computes the unit direction that the transform maps onto `+y`.
    ///
    /// Works for any invertible linear block.
    pub fn positive_y(&self) -> Vector3<F> {
        Vector3::new(
            self.m12 * self.m20 - self.m10 * self.m22,
            self.m00 * self.m22 - self.m02 * self.m20,
            self.m02 * self.m10 - self.m00 * self.m12,
        )
        .normalize()
    }

    /// Computes the unit direction that the transform maps onto `+z`.
    ///
    /// Works for any invertible linear block.
    pub fn positive_z(&self) -> Vector3<F> {
        Vector3::new(
            self.m10 * self.m21 - self.m11 * self.m20,
            self.m20 * self.m01 - self.m21 * self.m00,
            self.m00 * self.m11 - self.m01 * self.m10,
        )
        .normalize()
    }

    /// Returns the direction that the transform maps onto `+x`, assuming
    /// an orthonormal linear block.
    pub fn normalized_positive_x(&self) -> Vector3<F> {
        Vector3::new(self.m00, self.m10, self.m20)
    }

    /// Returns the direction that the transform maps onto `+y`, assuming
    /// an orthonormal linear block.
    pub fn normalized_positive_y(&self) -> Vector3<F> {
        Vector3::new(self.m01, self.m11, self.m21)
    }

    /// Returns the direction that the transform maps onto `+z`, assuming
    /// an orthonormal linear block.
    pub fn normalized_positive_z(&self) -> Vector3<F> {
        Vector3::new(self.m02, self.m12, self.m22)
    }

    /// Computes the point that the transform maps onto the origin, scaled
    /// by the determinant of the linear block.
    ///
    /// For a rigid transform, like a view transform, this is the position
    /// of the viewer.
    pub fn origin(&self) -> Point3<F> {
        let a = self.m00 * self.m11 - self.m01 * self.m10;
        let b = self.m00 * self.m12 - self.m02 * self.m10;
        let d = self.m01 * self.m12 - self.m02 * self.m11;
        let g = self.m20 * self.m31 - self.m21 * self.m30;
        let h = self.m20 * self.m32 - self.m22 * self.m30;
        let j = self.m21 * self.m32 - self.m22 * self.m31;
        Point3::new(
            -self.m10 * j + self.m11 * h - self.m12 * g,
            self.m00 * j - self.m01 * h + self.m02 * g,
            -self.m30 * d + self.m31 * b - self.m32 * a,
        )
    }

    /// Returns the frustum plane with the given index when the transform
    /// is used as a projection. The indices 0 to 5 select the `-x`, `+x`,
    /// `-y`, `+y`, `-z` and `+z` planes, in that order.
    ///
    /// The plane coefficients `(a, b, c, d)` are scaled to unit length as
    /// a 4-vector.
    ///
    /// # Errors
    /// Returns an error if the index exceeds 5.
    pub fn frustum_plane(&self, index: usize) -> Result<Vector4<F>> {
        let plane = match index {
            0 => Vector4::new(self.m00, self.m10, self.m20, F::ONE + self.m30),
            1 => Vector4::new(-self.m00, -self.m10, -self.m20, F::ONE - self.m30),
            2 => Vector4::new(self.m01, self.m11, self.m21, F::ONE + self.m31),
            3 => Vector4::new(-self.m01, -self.m11, -self.m21, F::ONE - self.m31),
            4 => Vector4::new(self.m02, self.m12, self.m22, F::ONE + self.m32),
            5 => Vector4::new(-self.m02, -self.m12, -self.m22, F::ONE - self.m32),
            _ => bail!("Invalid frustum plane index {index}"),
        };
        Ok(plane.normalize())
    }

    /// Extracts the rotation of the linear block after scaling its columns
    /// to unit length.
    pub fn unnormalized_rotation(&self) -> UnitQuaternion<F> {
        self.normalize3x3().normalized_rotation()
    }

    /// Extracts the rotation of the linear block, assuming that it is
    /// orthonormal.
    pub fn normalized_rotation(&self) -> UnitQuaternion<F> {
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
            ..
        } = *self;

        let trace = m00 + m11 + m22;

        // Branch on the largest diagonal contribution for stability
        let (w, x, y, z) = if trace >= F::ZERO {
            let t = F::sqrt(trace + F::ONE);
            let s = F::ONE_HALF / t;
            (t * F::ONE_HALF, (m12 - m21) * s, (m20 - m02) * s, (m01 - m10) * s)
        } else if m00 >= m11 && m00 >= m22 {
            let t = F::sqrt(m00 - (m11 + m22) + F::ONE);
            let s = F::ONE_HALF / t;
            ((m12 - m21) * s, t * F::ONE_HALF, (m10 + m01) * s, (m02 + m20) * s)
        } else if m11 > m22 {
            let t = F::sqrt(m11 - (m22 + m00) + F::ONE);
            let s = F::ONE_HALF / t;
            ((m20 - m02) * s, (m10 + m01) * s, t * F::ONE_HALF, (m21 + m12) * s)
        } else {
            let t = F::sqrt(m22 - (m00 + m11) + F::ONE);
            let s = F::ONE_HALF / t;
            ((m01 - m10) * s, (m02 + m20) * s, (m21 + m12) * s, t * F::ONE_HALF)
        };
        UnitQuaternion::new_unchecked(Quaternion::new(w, x, y, z))
    }

    /// Extracts the rotation of the linear block as an axis and angle. The
    /// columns are scaled to unit length first.
    ///
    /// A rotation by zero gives the z-axis with zero angle. A half turn is
    /// detected from the symmetry of the block and handled separately.
    pub fn axis_angle(&self) -> AxisAngle<F> {
        let [n00, n01, n02, n10, n11, n12, n20, n21, n22] = self.normalize3x3().linear_array();
        let epsilon = float!(F, 1e-4);
        let epsilon2 = float!(F, 1e-3);

        let symmetric = (n10 - n01).abs() < epsilon
            && (n20 - n02).abs() < epsilon
            && (n21 - n12).abs() < epsilon;

        if !symmetric {
            let axis = Vector3::new(n12 - n21, n20 - n02, n01 - n10);
            let angle = scalar::safe_acos((n00 + n11 + n22 - F::ONE) * F::ONE_HALF);
            return AxisAngle::new(axis / axis.norm(), angle);
        }

        if (n10 + n01).abs() < epsilon2
            && (n20 + n02).abs() < epsilon2
            && (n21 + n12).abs() < epsilon2
            && (n00 + n11 + n22 - float!(F, 3.0)).abs() < epsilon2
        {
            return AxisAngle::zero();
        }

        let quarter = float!(F, 0.25);
        let xx = (n00 + F::ONE) * F::ONE_HALF;
        let yy = (n11 + F::ONE) * F::ONE_HALF;
        let zz = (n22 + F::ONE) * F::ONE_HALF;
        let xy = (n10 + n01) * quarter;
        let xz = (n20 + n02) * quarter;
        let yz = (n21 + n12) * quarter;

        let axis = if xx > yy && xx > zz {
            let x = F::sqrt(xx);
            Vector3::new(x, xy / x, xz / x)
        } else if yy > zz {
            let y = F::sqrt(yy);
            Vector3::new(xy / y, y, yz / y)
        } else {
            let z = F::sqrt(zz);
            Vector3::new(xz / z, yz / z, z)
        };
        AxisAngle::new(axis, F::pi())
    }

    fn linear_columns_as_vectors(&self) -> [Vector3<F>; 3] {
        [
            Vector3::new(self.m00, self.m01, self.m02),
            Vector3::new(self.m10, self.m11, self.m12),
            Vector3::new(self.m20, self.m21, self.m22),
        ]
    }
}
