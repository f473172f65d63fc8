//! Composition of transforms, with fast paths selected from the known
//! properties.

use super::{
    Affine3,
    construction::{
        look_along_block, look_at_block, orientation_normal, quaternion_block, reflection_block,
        rodrigues_block, towards_block, unit_scaling_properties,
    },
};
use crate::{axis_angle::AxisAngle, num::Float, properties::AffineProperties, scalar};
use nalgebra::{UnitQuaternion, Vector3, Vector4};

/// Flags that no rotation-like post-multiplication can preserve in
/// general.
const ROTATION_CLEARED: AffineProperties =
    AffineProperties::IDENTITY.union(AffineProperties::TRANSLATION);

impl<F: Float> Affine3<F> {
    /// Computes `self * right`.
    ///
    /// If either operand is flagged as the identity, the other operand is
    /// returned as is. If `self` is flagged as a pure translation, only the
    /// translations are added. The generic path uses fused multiply-add.
    pub fn multiply(&self, right: &Self) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            *right
        } else if right.properties.contains(AffineProperties::IDENTITY) {
            *self
        } else if self.properties.contains(AffineProperties::TRANSLATION) {
            self.multiply_translation(right)
        } else {
            self.multiply_generic(right)
        }
    }

    /// Computes `self * right` under the assumption that `self` is a pure
    /// translation.
    pub fn multiply_translation(&self, right: &Self) -> Self {
        Self::from_linear_and_translation(
            right.linear_array(),
            [
                right.m30 + self.m30,
                right.m31 + self.m31,
                right.m32 + self.m32,
            ],
            right.properties & (AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL),
        )
    }

    /// Computes `self * view` under the assumption that `self` only has
    /// non-zero elements on the diagonal of the linear block and in the
    /// translation, like an orthographic projection.
    pub fn multiply_ortho(&self, view: &Self) -> Self {
        let (m00, m11, m22) = (self.m00, self.m11, self.m22);
        Self::from_linear_and_translation(
            [
                m00 * view.m00,
                m11 * view.m01,
                m22 * view.m02,
                m00 * view.m10,
                m11 * view.m11,
                m22 * view.m12,
                m00 * view.m20,
                m11 * view.m21,
                m22 * view.m22,
            ],
            [
                m00 * view.m30 + self.m30,
                m11 * view.m31 + self.m31,
                m22 * view.m32 + self.m32,
            ],
            self.properties & view.properties & AffineProperties::ORTHONORMAL,
        )
    }

    /// Multiplies the linear block with the 3x3 matrix given by its
    /// column-major elements, keeping the translation.
    pub fn multiply3x3(
        &self,
        r00: F,
        r01: F,
        r02: F,
        r10: F,
        r11: F,
        r12: F,
        r20: F,
        r21: F,
        r22: F,
    ) -> Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = self.linear_array();
        let fma = scalar::fma;
        Self::from_linear_and_translation(
            [
                fma(m00, r00, fma(m10, r01, m20 * r02)),
                fma(m01, r00, fma(m11, r01, m21 * r02)),
                fma(m02, r00, fma(m12, r01, m22 * r02)),
                fma(m00, r10, fma(m10, r11, m20 * r12)),
                fma(m01, r10, fma(m11, r11, m21 * r12)),
                fma(m02, r10, fma(m12, r11, m22 * r12)),
                fma(m00, r20, fma(m10, r21, m20 * r22)),
                fma(m01, r20, fma(m11, r21, m21 * r22)),
                fma(m02, r20, fma(m12, r21, m22 * r22)),
            ],
            self.translation_array(),
            AffineProperties::empty(),
        )
    }

    fn multiply_generic(&self, right: &Self) -> Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32] = self.to_array();
        let [r00, r01, r02, r10, r11, r12, r20, r21, r22, r30, r31, r32] = right.to_array();
        let fma = scalar::fma;
        Self::from_fields(
            [
                fma(m00, r00, fma(m10, r01, m20 * r02)),
                fma(m01, r00, fma(m11, r01, m21 * r02)),
                fma(m02, r00, fma(m12, r01, m22 * r02)),
                fma(m00, r10, fma(m10, r11, m20 * r12)),
                fma(m01, r10, fma(m11, r11, m21 * r12)),
                fma(m02, r10, fma(m12, r11, m22 * r12)),
                fma(m00, r20, fma(m10, r21, m20 * r22)),
                fma(m01, r20, fma(m11, r21, m21 * r22)),
                fma(m02, r20, fma(m12, r21, m22 * r22)),
                fma(m00, r30, fma(m10, r31, fma(m20, r32, m30))),
                fma(m01, r30, fma(m11, r31, fma(m21, r32, m31))),
                fma(m02, r30, fma(m12, r31, fma(m22, r32, m32))),
            ],
            self.properties
                & right.properties
                & (AffineProperties::ORTHONORMAL | AffineProperties::TRANSLATION),
        )
    }

    /// Computes `self * right` with plain multiplications and additions,
    /// assigning the given properties to the result.
    pub(super) fn post_multiply(&self, right: &Self, properties: AffineProperties) -> Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32] = self.to_array();
        let [r00, r01, r02, r10, r11, r12, r20, r21, r22, r30, r31, r32] = right.to_array();
        Self::from_fields(
            [
                m00 * r00 + m10 * r01 + m20 * r02,
                m01 * r00 + m11 * r01 + m21 * r02,
                m02 * r00 + m12 * r01 + m22 * r02,
                m00 * r10 + m10 * r11 + m20 * r12,
                m01 * r10 + m11 * r11 + m21 * r12,
                m02 * r10 + m12 * r11 + m22 * r12,
                m00 * r20 + m10 * r21 + m20 * r22,
                m01 * r20 + m11 * r21 + m21 * r22,
                m02 * r20 + m12 * r21 + m22 * r22,
                m00 * r30 + m10 * r31 + m20 * r32 + m30,
                m01 * r30 + m11 * r31 + m21 * r32 + m31,
                m02 * r30 + m12 * r31 + m22 * r32 + m32,
            ],
            properties,
        )
    }

    /// Computes `self * L`, where `L` has the given column-major linear
    /// block and no translation.
    fn post_multiply_linear(&self, linear: [F; 9], properties: AffineProperties) -> Self {
        self.post_multiply(
            &Self::from_linear_and_translation(linear, [F::ZERO; 3], AffineProperties::empty()),
            properties,
        )
    }

    /// Computes `L * self`, where `L` has the given column-major linear
    /// block and no translation.
    fn pre_multiply_linear(&self, linear: [F; 9], properties: AffineProperties) -> Self {
        let [l00, l01, l02, l10, l11, l12, l20, l21, l22] = linear;
        self.map_columns(
            |[x, y, z]| {
                [
                    l00 * x + l10 * y + l20 * z,
                    l01 * x + l11 * y + l21 * z,
                    l02 * x + l12 * y + l22 * z,
                ]
            },
            properties,
        )
    }

    /// Applies `map` to each of the four columns, including the
    /// translation.
    fn map_columns(&self, map: impl Fn([F; 3]) -> [F; 3], properties: AffineProperties) -> Self {
        let [c0, c1, c2, c3] = [
            map([self.m00, self.m01, self.m02]),
            map([self.m10, self.m11, self.m12]),
            map([self.m20, self.m21, self.m22]),
            map([self.m30, self.m31, self.m32]),
        ];
        Self::from_fields(
            [
                c0[0], c0[1], c0[2], c1[0], c1[1], c1[2], c2[0], c2[1], c2[2], c3[0], c3[1],
                c3[2],
            ],
            properties,
        )
    }

    /// Replaces the linear block of a pure translation with the block of the
    /// given rotation.
    fn rotation_with_own_translation(&self, rotation: Self) -> Self {
        let mut result = rotation;
        result.set_translation(self.m30, self.m31, self.m32);
        result
    }

    /// Applies a translation by `(x, y, z)` before this transform.
    pub fn translate(&self, x: F, y: F, z: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::translation(x, y, z);
        }
        let mut result = *self;
        if self.properties.contains(AffineProperties::TRANSLATION) {
            result.m30 = x + self.m30;
            result.m31 = y + self.m31;
            result.m32 = z + self.m32;
        } else {
            result.m30 = self.m00 * x + self.m10 * y + self.m20 * z + self.m30;
            result.m31 = self.m01 * x + self.m11 * y + self.m21 * z + self.m31;
            result.m32 = self.m02 * x + self.m12 * y + self.m22 * z + self.m32;
        }
        result.properties -= AffineProperties::IDENTITY;
        result
    }

    /// Applies a translation by the given offset before this transform.
    pub fn translate_by(&self, offset: &Vector3<F>) -> Self {
        self.translate(offset.x, offset.y, offset.z)
    }

    /// Applies a translation by `(x, y, z)` after this transform.
    pub fn translate_local(&self, x: F, y: F, z: F) -> Self {
        let mut result = *self;
        result.m30 = self.m30 + x;
        result.m31 = self.m31 + y;
        result.m32 = self.m32 + z;
        result.properties -= AffineProperties::IDENTITY;
        result
    }

    /// Applies a scaling by `(x, y, z)` before this transform.
    ///
    /// Orthonormality is kept only if every factor has absolute value
    /// exactly one.
    pub fn scale(&self, x: F, y: F, z: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::scaling(x, y, z);
        }
        let properties = self.properties & unit_scaling_properties(x, y, z);
        if self.properties.contains(AffineProperties::TRANSLATION) {
            return Self::from_linear_and_translation(
                [
                    x,
                    self.m01 * x,
                    self.m02 * x,
                    self.m10 * y,
                    y,
                    self.m12 * y,
                    self.m20 * z,
                    self.m21 * z,
                    z,
                ],
                self.translation_array(),
                properties,
            );
        }
        Self::from_linear_and_translation(
            [
                self.m00 * x,
                self.m01 * x,
                self.m02 * x,
                self.m10 * y,
                self.m11 * y,
                self.m12 * y,
                self.m20 * z,
                self.m21 * z,
                self.m22 * z,
            ],
            self.translation_array(),
            properties,
        )
    }

    /// Applies a scaling of the x- and y-axis before this transform.
    pub fn scale_xy(&self, x: F, y: F) -> Self {
        self.scale(x, y, F::ONE)
    }

    /// Applies a uniform scaling before this transform.
    pub fn scale_uniform(&self, factor: F) -> Self {
        self.scale(factor, factor, factor)
    }

    /// Applies a scaling by the components of `factors` before this
    /// transform.
    pub fn scale_by(&self, factors: &Vector3<F>) -> Self {
        self.scale(factors.x, factors.y, factors.z)
    }

    /// Applies a scaling by `(sx, sy, sz)` about the point `(ox, oy, oz)`
    /// before this transform.
    pub fn scale_around(&self, sx: F, sy: F, sz: F, ox: F, oy: F, oz: F) -> Self {
        let nm30 = self.m00 * ox + self.m10 * oy + self.m20 * oz + self.m30;
        let nm31 = self.m01 * ox + self.m11 * oy + self.m21 * oz + self.m31;
        let nm32 = self.m02 * ox + self.m12 * oy + self.m22 * oz + self.m32;
        let mut result = self.scale_generic_unflagged(sx, sy, sz);
        result.m30 = -result.m00 * ox - result.m10 * oy - result.m20 * oz + nm30;
        result.m31 = -result.m01 * ox - result.m11 * oy - result.m21 * oz + nm31;
        result.m32 = -result.m02 * ox - result.m12 * oy - result.m22 * oz + nm32;
        result.properties = self.properties & unit_scaling_properties(sx, sy, sz);
        result
    }

    /// Applies a scaling by `(x, y, z)` after this transform.
    pub fn scale_local(&self, x: F, y: F, z: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::scaling(x, y, z);
        }
        self.map_columns(|[a, b, c]| [x * a, y * b, z * c], AffineProperties::empty())
    }

    fn scale_generic_unflagged(&self, x: F, y: F, z: F) -> Self {
        Self::from_linear_and_translation(
            [
                self.m00 * x,
                self.m01 * x,
                self.m02 * x,
                self.m10 * y,
                self.m11 * y,
                self.m12 * y,
                self.m20 * z,
                self.m21 * z,
                self.m22 * z,
            ],
            self.translation_array(),
            AffineProperties::empty(),
        )
    }

    /// Applies a rotation by `angle` radians around the unit axis
    /// `(x, y, z)` before this transform.
    pub fn rotate(&self, angle: F, x: F, y: F, z: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            Self::rotation(angle, x, y, z)
        } else if self.properties.contains(AffineProperties::TRANSLATION) {
            self.rotate_translation(angle, x, y, z)
        } else if y == F::ZERO && z == F::ZERO && scalar::abs_equals_one(x) {
            self.rotate_x(x * angle)
        } else if x == F::ZERO && z == F::ZERO && scalar::abs_equals_one(y) {
            self.rotate_y(y * angle)
        } else if x == F::ZERO && y == F::ZERO && scalar::abs_equals_one(z) {
            self.rotate_z(z * angle)
        } else {
            self.post_multiply_linear(
                rodrigues_block(angle, x, y, z),
                self.properties - ROTATION_CLEARED,
            )
        }
    }

    /// Applies the given axis-angle rotation before this transform. The
    /// axis is normalized first.
    pub fn rotate_axis_angle(&self, axis_angle: &AxisAngle<F>) -> Self {
        let AxisAngle { axis, angle } = axis_angle.normalized();
        self.rotate(angle, axis.x, axis.y, axis.z)
    }

    /// Applies a rotation around the unit axis `(x, y, z)` before this
    /// transform, assuming that this transform is a pure translation.
    pub fn rotate_translation(&self, angle: F, x: F, y: F, z: F) -> Self {
        self.rotation_with_own_translation(Self::rotation(angle, x, y, z))
    }

    /// Applies a rotation by `angle` radians around the x-axis before this
    /// transform.
    pub fn rotate_x(&self, angle: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::rotation_x(angle);
        }
        if self.properties.contains(AffineProperties::TRANSLATION) {
            return self.rotation_with_own_translation(Self::rotation_x(angle));
        }
        let sin = scalar::sin(angle);
        let cos = scalar::cos_from_sin(sin, angle);
        let mut result = *self;
        result.m10 = self.m10 * cos + self.m20 * sin;
        result.m11 = self.m11 * cos + self.m21 * sin;
        result.m12 = self.m12 * cos + self.m22 * sin;
        result.m20 = self.m10 * -sin + self.m20 * cos;
        result.m21 = self.m11 * -sin + self.m21 * cos;
        result.m22 = self.m12 * -sin + self.m22 * cos;
        result.properties -= ROTATION_CLEARED;
        result
    }

    /// Applies a rotation by `angle` radians around the y-axis before this
    /// transform.
    pub fn rotate_y(&self, angle: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::rotation_y(angle);
        }
        if self.properties.contains(AffineProperties::TRANSLATION) {
            return self.rotation_with_own_translation(Self::rotation_y(angle));
        }
        let sin = scalar::sin(angle);
        let cos = scalar::cos_from_sin(sin, angle);
        let mut result = *self;
        result.m00 = self.m00 * cos + self.m20 * -sin;
        result.m01 = self.m01 * cos + self.m21 * -sin;
        result.m02 = self.m02 * cos + self.m22 * -sin;
        result.m20 = self.m00 * sin + self.m20 * cos;
        result.m21 = self.m01 * sin + self.m21 * cos;
        result.m22 = self.m02 * sin + self.m22 * cos;
        result.properties -= ROTATION_CLEARED;
        result
    }

    /// Applies a rotation by `angle` radians around the z-axis before this
    /// transform.
    pub fn rotate_z(&self, angle: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::rotation_z(angle);
        }
        if self.properties.contains(AffineProperties::TRANSLATION) {
            return self.rotation_with_own_translation(Self::rotation_z(angle));
        }
        let sin = scalar::sin(angle);
        let cos = scalar::cos_from_sin(sin, angle);
        let mut result = *self;
        result.m00 = self.m00 * cos + self.m10 * sin;
        result.m01 = self.m01 * cos + self.m11 * sin;
        result.m02 = self.m02 * cos + self.m12 * sin;
        result.m10 = self.m00 * -sin + self.m10 * cos;
        result.m11 = self.m01 * -sin + self.m11 * cos;
        result.m12 = self.m02 * -sin + self.m12 * cos;
        result.properties -= ROTATION_CLEARED;
        result
    }

    /// Applies `Rx(angle_x) * Ry(angle_y) * Rz(angle_z)` before this
    /// transform.
    pub fn rotate_xyz(&self, angle_x: F, angle_y: F, angle_z: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::rotation_xyz(angle_x, angle_y, angle_z);
        }
        if self.properties.contains(AffineProperties::TRANSLATION) {
            return self
                .rotation_with_own_translation(Self::rotation_xyz(angle_x, angle_y, angle_z));
        }
        let (sin_x, cos_x) = sin_cos(angle_x);
        let (sin_y, cos_y) = sin_cos(angle_y);
        let (sin_z, cos_z) = sin_cos(angle_z);
        let [c0, c1, c2] = self.linear_columns();

        let nc1 = combine(&c1, cos_x, &c2, sin_x);
        let nc2 = combine(&c1, -sin_x, &c2, cos_x);
        let nc0 = combine(&c0, cos_y, &nc2, -sin_y);
        let rc2 = combine(&c0, sin_y, &nc2, cos_y);
        let rc0 = combine(&nc0, cos_z, &nc1, sin_z);
        let rc1 = combine(&nc0, -sin_z, &nc1, cos_z);

        self.with_linear_columns([rc0, rc1, rc2], self.properties - ROTATION_CLEARED)
    }

    /// Applies `Rz(angle_z) * Ry(angle_y) * Rx(angle_x)` before this
    /// transform.
    pub fn rotate_zyx(&self, angle_z: F, angle_y: F, angle_x: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::rotation_zyx(angle_z, angle_y, angle_x);
        }
        if self.properties.contains(AffineProperties::TRANSLATION) {
            return self
                .rotation_with_own_translation(Self::rotation_zyx(angle_z, angle_y, angle_x));
        }
        let (sin_x, cos_x) = sin_cos(angle_x);
        let (sin_y, cos_y) = sin_cos(angle_y);
        let (sin_z, cos_z) = sin_cos(angle_z);
        let [c0, c1, c2] = self.linear_columns();

        let nc0 = combine(&c0, cos_z, &c1, sin_z);
        let nc1 = combine(&c0, -sin_z, &c1, cos_z);
        let nc2 = combine(&nc0, sin_y, &c2, cos_y);
        let rc0 = combine(&nc0, cos_y, &c2, -sin_y);
        let rc1 = combine(&nc1, cos_x, &nc2, sin_x);
        let rc2 = combine(&nc1, -sin_x, &nc2, cos_x);

        self.with_linear_columns([rc0, rc1, rc2], self.properties - ROTATION_CLEARED)
    }

    /// Applies `Ry(angle_y) * Rx(angle_x) * Rz(angle_z)` before this
    /// transform.
    pub fn rotate_yxz(&self, angle_y: F, angle_x: F, angle_z: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::rotation_yxz(angle_y, angle_x, angle_z);
        }
        if self.properties.contains(AffineProperties::TRANSLATION) {
            return self
                .rotation_with_own_translation(Self::rotation_yxz(angle_y, angle_x, angle_z));
        }
        let (sin_x, cos_x) = sin_cos(angle_x);
        let (sin_y, cos_y) = sin_cos(angle_y);
        let (sin_z, cos_z) = sin_cos(angle_z);
        let [c0, c1, c2] = self.linear_columns();

        let nc2 = combine(&c0, sin_y, &c2, cos_y);
        let nc0 = combine(&c0, cos_y, &c2, -sin_y);
        let nc1 = combine(&c1, cos_x, &nc2, sin_x);
        let rc2 = combine(&c1, -sin_x, &nc2, cos_x);
        let rc0 = combine(&nc0, cos_z, &nc1, sin_z);
        let rc1 = combine(&nc0, -sin_z, &nc1, cos_z);

        self.with_linear_columns([rc0, rc1, rc2], self.properties - ROTATION_CLEARED)
    }

    /// Applies the rotation represented by `quaternion` before this
    /// transform.
    pub fn rotate_quaternion(&self, quaternion: &UnitQuaternion<F>) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            Self::rotation_quaternion(quaternion)
        } else if self.properties.contains(AffineProperties::TRANSLATION) {
            self.rotation_with_own_translation(Self::rotation_quaternion(quaternion))
        } else {
            self.post_multiply_linear(
                quaternion_block(quaternion),
                self.properties - ROTATION_CLEARED,
            )
        }
    }

    /// Applies a rotation by `angle` radians around the unit axis
    /// `(x, y, z)` after this transform.
    pub fn rotate_local(&self, angle: F, x: F, y: F, z: F) -> Self {
        self.pre_multiply_linear(
            rodrigues_block(angle, x, y, z),
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies a rotation by `angle` radians around the x-axis after this
    /// transform.
    pub fn rotate_local_x(&self, angle: F) -> Self {
        let (sin, cos) = sin_cos(angle);
        self.map_columns(
            |[x, y, z]| [x, cos * y - sin * z, sin * y + cos * z],
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies a rotation by `angle` radians around the y-axis after this
    /// transform.
    pub fn rotate_local_y(&self, angle: F) -> Self {
        let (sin, cos) = sin_cos(angle);
        self.map_columns(
            |[x, y, z]| [cos * x + sin * z, y, -sin * x + cos * z],
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies a rotation by `angle` radians around the z-axis after this
    /// transform.
    pub fn rotate_local_z(&self, angle: F) -> Self {
        let (sin, cos) = sin_cos(angle);
        self.map_columns(
            |[x, y, z]| [cos * x - sin * y, sin * x + cos * y, z],
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies the rotation represented by `quaternion` after this
    /// transform.
    pub fn rotate_local_quaternion(&self, quaternion: &UnitQuaternion<F>) -> Self {
        self.pre_multiply_linear(
            quaternion_block(quaternion),
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies the rotation represented by `quaternion` about the point
    /// `(ox, oy, oz)` before this transform.
    pub fn rotate_around(&self, quaternion: &UnitQuaternion<F>, ox: F, oy: F, oz: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::rotation_around(quaternion, ox, oy, oz);
        }
        let tm30 = self.m00 * ox + self.m10 * oy + self.m20 * oz + self.m30;
        let tm31 = self.m01 * ox + self.m11 * oy + self.m21 * oz + self.m31;
        let tm32 = self.m02 * ox + self.m12 * oy + self.m22 * oz + self.m32;
        let mut result = self.post_multiply_linear(
            quaternion_block(quaternion),
            self.properties - ROTATION_CLEARED,
        );
        result.m30 = -result.m00 * ox - result.m10 * oy - result.m20 * oz + tm30;
        result.m31 = -result.m01 * ox - result.m11 * oy - result.m21 * oz + tm31;
        result.m32 = -result.m02 * ox - result.m12 * oy - result.m22 * oz + tm32;
        result
    }

    /// Applies a rotation mapping `+z` to `direction` before this
    /// transform, with `up` fixing the rotation about that direction.
    pub fn rotate_towards(&self, direction: &Vector3<F>, up: &Vector3<F>) -> Self {
        self.post_multiply_linear(towards_block(direction, up), self.properties - ROTATION_CLEARED)
    }

    /// Applies a reflection about the plane `a*x + b*y + c*z + d = 0`, with
    /// unit normal `(a, b, c)`, before this transform.
    pub fn reflect(&self, a: F, b: F, c: F, d: F) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::reflection(a, b, c, d);
        }
        let (linear, translation) = reflection_block(a, b, c, d);
        self.post_multiply(
            &Self::from_linear_and_translation(linear, translation, AffineProperties::empty()),
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies a reflection about the plane with the given normal
    /// (normalized here) through the given point before this transform.
    pub fn reflect_normal_point(&self, nx: F, ny: F, nz: F, px: F, py: F, pz: F) -> Self {
        let inv_length = scalar::invsqrt(nx * nx + ny * ny + nz * nz);
        let (nnx, nny, nnz) = (nx * inv_length, ny * inv_length, nz * inv_length);
        self.reflect(nnx, nny, nnz, -nnx * px - nny * py - nnz * pz)
    }

    /// Applies a reflection about the plane through the given point whose
    /// normal is the z-axis rotated by `orientation`, before this transform.
    pub fn reflect_orientation_point(
        &self,
        orientation: &UnitQuaternion<F>,
        px: F,
        py: F,
        pz: F,
    ) -> Self {
        let (nx, ny, nz) = orientation_normal(orientation);
        self.reflect_normal_point(nx, ny, nz, px, py, pz)
    }

    /// Applies the view rotation of [`Self::looking_along`] before this
    /// transform.
    pub fn look_along(&self, direction: &Vector3<F>, up: &Vector3<F>) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::looking_along(direction, up);
        }
        self.post_multiply_linear(
            look_along_block(direction, up),
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies the right-handed view transform of [`Self::looking_at`]
    /// before this transform.
    pub fn look_at(&self, eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::looking_at(eye, center, up);
        }
        let (linear, translation) = look_at_block(eye, &(eye - center), up);
        self.post_multiply(
            &Self::from_linear_and_translation(linear, translation, AffineProperties::empty()),
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies the left-handed view transform of [`Self::looking_at_lh`]
    /// before this transform.
    pub fn look_at_lh(&self, eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> Self {
        if self.properties.contains(AffineProperties::IDENTITY) {
            return Self::looking_at_lh(eye, center, up);
        }
        let (linear, translation) = look_at_block(eye, &(center - eye), up);
        self.post_multiply(
            &Self::from_linear_and_translation(linear, translation, AffineProperties::empty()),
            self.properties - ROTATION_CLEARED,
        )
    }

    /// Applies the projection of [`Self::ortho_projection`] before this
    /// transform.
    pub fn ortho(
        &self,
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        self.post_multiply(
            &Self::ortho_projection(left, right, bottom, top, z_near, z_far, z_zero_to_one),
            AffineProperties::empty(),
        )
    }

    /// Applies the projection of [`Self::ortho_projection_lh`] before this
    /// transform.
    pub fn ortho_lh(
        &self,
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        self.post_multiply(
            &Self::ortho_projection_lh(left, right, bottom, top, z_near, z_far, z_zero_to_one),
            AffineProperties::empty(),
        )
    }

    /// Applies the projection of [`Self::ortho_symmetric_projection`]
    /// before this transform.
    pub fn ortho_symmetric(
        &self,
        width: F,
        height: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        self.post_multiply(
            &Self::ortho_symmetric_projection(width, height, z_near, z_far, z_zero_to_one),
            AffineProperties::empty(),
        )
    }

    /// Applies the projection of [`Self::ortho_symmetric_projection_lh`]
    /// before this transform.
    pub fn ortho_symmetric_lh(
        &self,
        width: F,
        height: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        self.post_multiply(
            &Self::ortho_symmetric_projection_lh(width, height, z_near, z_far, z_zero_to_one),
            AffineProperties::empty(),
        )
    }

    /// Applies the projection of [`Self::ortho2d_projection`] before this
    /// transform.
    pub fn ortho2d(&self, left: F, right: F, bottom: F, top: F) -> Self {
        self.post_multiply(
            &Self::ortho2d_projection(left, right, bottom, top),
            AffineProperties::empty(),
        )
    }

    /// Applies the projection of [`Self::ortho2d_projection_lh`] before
    /// this transform.
    pub fn ortho2d_lh(&self, left: F, right: F, bottom: F, top: F) -> Self {
        self.post_multiply(
            &Self::ortho2d_projection_lh(left, right, bottom, top),
            AffineProperties::empty(),
        )
    }

    /// Applies a projection flattening geometry onto the plane
    /// `a*x + b*y + c*z + d = 0` as seen from `light` before this transform.
    ///
    /// A light with `w = 0` is directional, with `w = 1` it is a point
    /// light.
    pub fn shadow(&self, light: &Vector4<F>, a: F, b: F, c: F, d: F) -> Self {
        let inv_plane_length = scalar::invsqrt(a * a + b * b + c * c);
        let an = a * inv_plane_length;
        let bn = b * inv_plane_length;
        let cn = c * inv_plane_length;
        let dn = d * inv_plane_length;
        let (lx, ly, lz, lw) = (light.x, light.y, light.z, light.w);
        let dot = an * lx + bn * ly + cn * lz + dn * lw;

        // Columns of the 4x4 shadow matrix
        let r = [
            [dot - an * lx, -an * ly, -an * lz, -an * lw],
            [-bn * lx, dot - bn * ly, -bn * lz, -bn * lw],
            [-cn * lx, -cn * ly, dot - cn * lz, -cn * lw],
            [-dn * lx, -dn * ly, -dn * lz, dot - dn * lw],
        ];
        let m = [
            [self.m00, self.m01, self.m02],
            [self.m10, self.m11, self.m12],
            [self.m20, self.m21, self.m22],
            [self.m30, self.m31, self.m32],
        ];
        let element =
            |i: usize, j: usize| (0..4).fold(F::ZERO, |acc, k| acc + m[k][j] * r[i][k]);
        Self::from_fields(
            std::array::from_fn(|idx| element(idx / 3, idx % 3)),
            AffineProperties::empty(),
        )
    }

    /// Applies the shadow projection of [`Self::shadow`] onto the plane
    /// spanned by the x- and z-axis of `plane_transform` before this
    /// transform.
    pub fn shadow_with_plane_transform(&self, light: &Vector4<F>, plane_transform: &Self) -> Self {
        let a = plane_transform.m10;
        let b = plane_transform.m11;
        let c = plane_transform.m12;
        let d = -a * plane_transform.m30 - b * plane_transform.m31 - c * plane_transform.m32;
        self.shadow(light, a, b, c, d)
    }

    /// Applies a picking transform mapping the `width` by `height` window
    /// region centered at `(x, y)` in the given viewport
    /// (`[x, y, width, height]`) to the full clip-space extent, before this
    /// transform.
    pub fn pick(&self, x: F, y: F, width: F, height: F, viewport: &[i32; 4]) -> Self {
        let [vx, vy, vw, vh] = viewport.map(|value| float!(F, f64::from(value)));
        let sx = vw / width;
        let sy = vh / height;
        let tx = (vw + F::TWO * (vx - x)) / width;
        let ty = (vh + F::TWO * (vy - y)) / height;
        Self::from_fields(
            [
                self.m00 * sx,
                self.m01 * sx,
                self.m02 * sx,
                self.m10 * sy,
                self.m11 * sy,
                self.m12 * sy,
                self.m20,
                self.m21,
                self.m22,
                self.m00 * tx + self.m10 * ty + self.m30,
                self.m01 * tx + self.m11 * ty + self.m31,
                self.m02 * tx + self.m12 * ty + self.m32,
            ],
            AffineProperties::empty(),
        )
    }

    /// Applies an arcball rotation, orbiting at `radius` around `center`
    /// by `angle_x` about the x-axis followed by `angle_y` about the y-axis,
    /// before this transform.
    pub fn arcball(&self, radius: F, center: &Vector3<F>, angle_x: F, angle_y: F) -> Self {
        let [c0, c1, c2] = self.linear_columns();
        let t = combine(&c2, -radius, &[self.m30, self.m31, self.m32], F::ONE);

        let (sin, cos) = sin_cos(angle_x);
        let nc1 = combine(&c1, cos, &c2, sin);
        let c2 = combine(&c2, cos, &c1, -sin);

        let (sin, cos) = sin_cos(angle_y);
        let nc0 = combine(&c0, cos, &c2, -sin);
        let nc2 = combine(&c0, sin, &c2, cos);

        let mut result =
            self.with_linear_columns([nc0, nc1, nc2], self.properties - ROTATION_CLEARED);
        result.m30 = -nc0[0] * center.x - nc1[0] * center.y - nc2[0] * center.z + t[0];
        result.m31 = -nc0[1] * center.x - nc1[1] * center.y - nc2[1] * center.z + t[1];
        result.m32 = -nc0[2] * center.x - nc1[2] * center.y - nc2[2] * center.z + t[2];
        result
    }

    /// Applies an oblique projection shearing the z-axis by `a` along x and
    /// `b` along y, before this transform.
    pub fn oblique_z(&self, a: F, b: F) -> Self {
        let mut result = *self;
        result.m20 = self.m00 * a + self.m10 * b + self.m20;
        result.m21 = self.m01 * a + self.m11 * b + self.m21;
        result.m22 = self.m02 * a + self.m12 * b + self.m22;
        result.properties = AffineProperties::empty();
        result
    }

    /// Negates the first column of the linear block.
    pub fn negate_x(&self) -> Self {
        let mut result = *self;
        result.m00 = -self.m00;
        result.m01 = -self.m01;
        result.m02 = -self.m02;
        result.properties &= AffineProperties::ORTHONORMAL;
        result
    }

    /// Negates the second column of the linear block.
    pub fn negate_y(&self) -> Self {
        let mut result = *self;
        result.m10 = -self.m10;
        result.m11 = -self.m11;
        result.m12 = -self.m12;
        result.properties &= AffineProperties::ORTHONORMAL;
        result
    }

    /// Negates the third column of the linear block.
    pub fn negate_z(&self) -> Self {
        let mut result = *self;
        result.m20 = -self.m20;
        result.m21 = -self.m21;
        result.m22 = -self.m22;
        result.properties &= AffineProperties::ORTHONORMAL;
        result
    }

    fn linear_columns(&self) -> [[F; 3]; 3] {
        [
            [self.m00, self.m01, self.m02],
            [self.m10, self.m11, self.m12],
            [self.m20, self.m21, self.m22],
        ]
    }

    fn with_linear_columns(&self, columns: [[F; 3]; 3], properties: AffineProperties) -> Self {
        let [c0, c1, c2] = columns;
        Self::from_linear_and_translation(
            [
                c0[0], c0[1], c0[2], c1[0], c1[1], c1[2], c2[0], c2[1], c2[2],
            ],
            self.translation_array(),
            properties,
        )
    }
}

fn sin_cos<F: Float>(angle: F) -> (F, F) {
    let sin = scalar::sin(angle);
    (sin, scalar::cos_from_sin(sin, angle))
}

/// Computes `a * wa + b * wb` component-wise.
fn combine<F: Float>(a: &[F; 3], wa: F, b: &[F; 3], wb: F) -> [F; 3] {
    [
        a[0] * wa + b[0] * wb,
        a[1] * wa + b[1] * wb,
        a[2] * wa + b[2] * wb,
    ]
}
