//! Constructors for canonical transforms.

use super::Affine3;
use crate::{axis_angle::AxisAngle, num::Float, properties::AffineProperties, scalar};
use nalgebra::{UnitQuaternion, Vector3};

impl<F: Float> Affine3<F> {
    /// Creates a pure translation by the given offset.
    pub fn translation(x: F, y: F, z: F) -> Self {
        let mut transform = Self::identity();
        transform.set_translation(x, y, z);
        transform
    }

    /// Creates a pure translation by the given offset vector.
    pub fn translation_by(offset: &Vector3<F>) -> Self {
        Self::translation(offset.x, offset.y, offset.z)
    }

    /// Replaces the translation column, keeping the linear block.
    ///
    /// The identity flag is cleared if the new translation is non-zero.
    pub fn set_translation(&mut self, x: F, y: F, z: F) -> &mut Self {
        self.m30 = x;
        self.m31 = y;
        self.m32 = z;
        if x != F::ZERO || y != F::ZERO || z != F::ZERO {
            self.properties -= AffineProperties::IDENTITY;
        }
        self
    }

    /// Creates a scaling along the coordinate axes.
    ///
    /// The result is flagged as orthonormal only when every factor has
    /// absolute value exactly one.
    pub fn scaling(x: F, y: F, z: F) -> Self {
        Self::from_linear_and_translation(
            [x, F::ZERO, F::ZERO, F::ZERO, y, F::ZERO, F::ZERO, F::ZERO, z],
            [F::ZERO; 3],
            unit_scaling_properties(x, y, z),
        )
    }

    /// Creates a uniform scaling.
    pub fn scaling_uniform(factor: F) -> Self {
        Self::scaling(factor, factor, factor)
    }

    /// Creates a scaling by the components of the given vector.
    pub fn scaling_by(factors: &Vector3<F>) -> Self {
        Self::scaling(factors.x, factors.y, factors.z)
    }

    /// Creates a rotation by `angle` radians around the axis `(x, y, z)`,
    /// which must have unit length.
    ///
    /// Axes exactly aligned with a coordinate axis use the corresponding
    /// single-axis rotation.
    pub fn rotation(angle: F, x: F, y: F, z: F) -> Self {
        if y == F::ZERO && z == F::ZERO && scalar::abs_equals_one(x) {
            Self::rotation_x(x * angle)
        } else if x == F::ZERO && z == F::ZERO && scalar::abs_equals_one(y) {
            Self::rotation_y(y * angle)
        } else if x == F::ZERO && y == F::ZERO && scalar::abs_equals_one(z) {
            Self::rotation_z(z * angle)
        } else {
            Self::from_linear_and_translation(
                rodrigues_block(angle, x, y, z),
                [F::ZERO; 3],
                AffineProperties::ORTHONORMAL,
            )
        }
    }

    /// Creates the rotation described by the given axis and angle. The axis
    /// is normalized first.
    pub fn rotation_axis_angle(axis_angle: &AxisAngle<F>) -> Self {
        let AxisAngle { axis, angle } = axis_angle.normalized();
        let sin = scalar::sin(angle);
        let cos = scalar::cos_from_sin(sin, angle);
        let omc = F::ONE - cos;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        Self::from_linear_and_translation(
            [
                cos + x * x * omc,
                xy * omc + z * sin,
                xz * omc - y * sin,
                xy * omc - z * sin,
                cos + y * y * omc,
                yz * omc + x * sin,
                xz * omc + y * sin,
                yz * omc - x * sin,
                cos + z * z * omc,
            ],
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates a rotation by `angle` radians around the x-axis.
    pub fn rotation_x(angle: F) -> Self {
        let sin = scalar::sin(angle);
        let cos = scalar::cos_from_sin(sin, angle);
        Self::from_linear_and_translation(
            [F::ONE, F::ZERO, F::ZERO, F::ZERO, cos, sin, F::ZERO, -sin, cos],
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates a rotation by `angle` radians around the y-axis.
    pub fn rotation_y(angle: F) -> Self {
        let sin = scalar::sin(angle);
        let cos = scalar::cos_from_sin(sin, angle);
        Self::from_linear_and_translation(
            [cos, F::ZERO, -sin, F::ZERO, F::ONE, F::ZERO, sin, F::ZERO, cos],
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates a rotation by `angle` radians around the z-axis.
    pub fn rotation_z(angle: F) -> Self {
        let sin = scalar::sin(angle);
        let cos = scalar::cos_from_sin(sin, angle);
        Self::from_linear_and_translation(
            [cos, sin, F::ZERO, -sin, cos, F::ZERO, F::ZERO, F::ZERO, F::ONE],
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates the rotation `Rx(angle_x) * Ry(angle_y) * Rz(angle_z)`.
    pub fn rotation_xyz(angle_x: F, angle_y: F, angle_z: F) -> Self {
        Self::from_linear_and_translation(
            euler_xyz_block(angle_x, angle_y, angle_z),
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates the rotation `Rz(angle_z) * Ry(angle_y) * Rx(angle_x)`.
    pub fn rotation_zyx(angle_z: F, angle_y: F, angle_x: F) -> Self {
        Self::from_linear_and_translation(
            euler_zyx_block(angle_z, angle_y, angle_x),
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates the rotation `Ry(angle_y) * Rx(angle_x) * Rz(angle_z)`.
    pub fn rotation_yxz(angle_y: F, angle_x: F, angle_z: F) -> Self {
        Self::from_linear_and_translation(
            euler_yxz_block(angle_y, angle_x, angle_z),
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Replaces the linear block with `Rx(angle_x) * Ry(angle_y) *
    /// Rz(angle_z)`, keeping the translation.
    pub fn set_rotation_xyz(&mut self, angle_x: F, angle_y: F, angle_z: F) -> &mut Self {
        self.replace_rotation(euler_xyz_block(angle_x, angle_y, angle_z))
    }

    /// Replaces the linear block with `Rz(angle_z) * Ry(angle_y) *
    /// Rx(angle_x)`, keeping the translation.
    pub fn set_rotation_zyx(&mut self, angle_z: F, angle_y: F, angle_x: F) -> &mut Self {
        self.replace_rotation(euler_zyx_block(angle_z, angle_y, angle_x))
    }

    /// Replaces the linear block with `Ry(angle_y) * Rx(angle_x) *
    /// Rz(angle_z)`, keeping the translation.
    pub fn set_rotation_yxz(&mut self, angle_y: F, angle_x: F, angle_z: F) -> &mut Self {
        self.replace_rotation(euler_yxz_block(angle_y, angle_x, angle_z))
    }

    /// Creates the rotation represented by the given unit quaternion.
    pub fn rotation_quaternion(quaternion: &UnitQuaternion<F>) -> Self {
        Self::from_linear_and_translation(
            quaternion_block(quaternion),
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates `T * R`, where `T` translates by `(tx, ty, tz)` and `R` is
    /// the rotation represented by `quaternion`.
    pub fn translation_rotate(tx: F, ty: F, tz: F, quaternion: &UnitQuaternion<F>) -> Self {
        Self::from_linear_and_translation(
            quaternion_block(quaternion),
            [tx, ty, tz],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates `T * R * M`, with `T` and `R` as for
    /// [`Self::translation_rotate`].
    pub fn translation_rotate_mul(
        tx: F,
        ty: F,
        tz: F,
        quaternion: &UnitQuaternion<F>,
        transform: &Self,
    ) -> Self {
        Self::translation_rotate(tx, ty, tz, quaternion)
            .post_multiply(transform, AffineProperties::empty())
    }

    /// Creates the inverse of `T * R`, with `T` and `R` as for
    /// [`Self::translation_rotate`].
    pub fn translation_rotate_invert(tx: F, ty: F, tz: F, quaternion: &UnitQuaternion<F>) -> Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] =
            quaternion_block(&quaternion.conjugate());
        Self::from_linear_and_translation(
            [m00, m01, m02, m10, m11, m12, m20, m21, m22],
            [
                -(m00 * tx + m10 * ty + m20 * tz),
                -(m01 * tx + m11 * ty + m21 * tz),
                -(m02 * tx + m12 * ty + m22 * tz),
            ],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates `T * R * S`, where `T` translates by `(tx, ty, tz)`, `R` is
    /// the rotation represented by `quaternion` and `S` scales by
    /// `(sx, sy, sz)`.
    pub fn translation_rotate_scale(
        tx: F,
        ty: F,
        tz: F,
        quaternion: &UnitQuaternion<F>,
        sx: F,
        sy: F,
        sz: F,
    ) -> Self {
        let q = &quaternion.coords;
        let dqx = q.x + q.x;
        let dqy = q.y + q.y;
        let dqz = q.z + q.z;
        let q00 = dqx * q.x;
        let q11 = dqy * q.y;
        let q22 = dqz * q.z;
        let q01 = dqx * q.y;
        let q02 = dqx * q.z;
        let q03 = dqx * q.w;
        let q12 = dqy * q.z;
        let q13 = dqy * q.w;
        let q23 = dqz * q.w;
        Self::from_linear_and_translation(
            [
                sx - (q11 + q22) * sx,
                (q01 + q23) * sx,
                (q02 - q13) * sx,
                (q01 - q23) * sy,
                sy - (q22 + q00) * sy,
                (q12 + q03) * sy,
                (q02 + q13) * sz,
                (q12 - q03) * sz,
                sz - (q11 + q00) * sz,
            ],
            [tx, ty, tz],
            AffineProperties::empty(),
        )
    }

    /// Creates `T * R * S * M`, with `T`, `R` and `S` as for
    /// [`Self::translation_rotate_scale`].
    pub fn translation_rotate_scale_mul(
        tx: F,
        ty: F,
        tz: F,
        quaternion: &UnitQuaternion<F>,
        sx: F,
        sy: F,
        sz: F,
        transform: &Self,
    ) -> Self {
        Self::translation_rotate_scale(tx, ty, tz, quaternion, sx, sy, sz)
            .post_multiply(transform, AffineProperties::empty())
    }

    /// Creates the rotation represented by `quaternion` around the point
    /// `(ox, oy, oz)`.
    pub fn rotation_around(quaternion: &UnitQuaternion<F>, ox: F, oy: F, oz: F) -> Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = quaternion_block(quaternion);
        Self::from_linear_and_translation(
            [m00, m01, m02, m10, m11, m12, m20, m21, m22],
            [
                -m00 * ox - m10 * oy - m20 * oz + ox,
                -m01 * ox - m11 * oy - m21 * oz + oy,
                -m02 * ox - m12 * oy - m22 * oz + oz,
            ],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates a reflection about the plane `a*x + b*y + c*z + d = 0`,
    /// where `(a, b, c)` must have unit length.
    pub fn reflection(a: F, b: F, c: F, d: F) -> Self {
        let (linear, translation) = reflection_block(a, b, c, d);
        Self::from_linear_and_translation(linear, translation, AffineProperties::ORTHONORMAL)
    }

    /// Creates a reflection about the plane with the given normal
    /// (normalized here) passing through the given point.
    pub fn reflection_normal_point(nx: F, ny: F, nz: F, px: F, py: F, pz: F) -> Self {
        let inv_length = scalar::invsqrt(nx * nx + ny * ny + nz * nz);
        let (nnx, nny, nnz) = (nx * inv_length, ny * inv_length, nz * inv_length);
        Self::reflection(nnx, nny, nnz, -nnx * px - nny * py - nnz * pz)
    }

    /// Creates a reflection about the plane through the given point whose
    /// normal is the z-axis rotated by `orientation`.
    pub fn reflection_orientation_point(
        orientation: &UnitQuaternion<F>,
        px: F,
        py: F,
        pz: F,
    ) -> Self {
        let (nx, ny, nz) = orientation_normal(orientation);
        Self::reflection_normal_point(nx, ny, nz, px, py, pz)
    }

    /// Creates a right-handed orthographic projection mapping the given
    /// box to normalized device coordinates. Depth maps to `[0, 1]` if
    /// `z_zero_to_one` is set, otherwise to `[-1, 1]`.
    pub fn ortho_projection(
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let (m22, m32) = ortho_depth_terms(z_near, z_far, z_zero_to_one, false);
        ortho_block(
            F::TWO / (right - left),
            F::TWO / (top - bottom),
            m22,
            (right + left) / (left - right),
            (top + bottom) / (bottom - top),
            m32,
        )
    }

    /// Left-handed variant of [`Self::ortho_projection`].
    pub fn ortho_projection_lh(
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let (m22, m32) = ortho_depth_terms(z_near, z_far, z_zero_to_one, true);
        ortho_block(
            F::TWO / (right - left),
            F::TWO / (top - bottom),
            m22,
            (right + left) / (left - right),
            (top + bottom) / (bottom - top),
            m32,
        )
    }

    /// Creates a right-handed orthographic projection for a box centered on
    /// the view axis with the given width and height.
    pub fn ortho_symmetric_projection(
        width: F,
        height: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let (m22, m32) = ortho_depth_terms(z_near, z_far, z_zero_to_one, false);
        ortho_block(F::TWO / width, F::TWO / height, m22, F::ZERO, F::ZERO, m32)
    }

    /// Left-handed variant of [`Self::ortho_symmetric_projection`].
    pub fn ortho_symmetric_projection_lh(
        width: F,
        height: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let (m22, m32) = ortho_depth_terms(z_near, z_far, z_zero_to_one, true);
        ortho_block(F::TWO / width, F::TWO / height, m22, F::ZERO, F::ZERO, m32)
    }

    /// Creates a right-handed 2D orthographic projection with depth range
    /// `[-1, 1]`.
    pub fn ortho2d_projection(left: F, right: F, bottom: F, top: F) -> Self {
        ortho_block(
            F::TWO / (right - left),
            F::TWO / (top - bottom),
            F::NEG_ONE,
            -(right + left) / (right - left),
            -(top + bottom) / (top - bottom),
            F::ZERO,
        )
    }

    /// Left-handed variant of [`Self::ortho2d_projection`].
    pub fn ortho2d_projection_lh(left: F, right: F, bottom: F, top: F) -> Self {
        ortho_block(
            F::TWO / (right - left),
            F::TWO / (top - bottom),
            F::ONE,
            -(right + left) / (right - left),
            -(top + bottom) / (top - bottom),
            F::ZERO,
        )
    }

    /// Creates a rotation making `-z` point along `direction`, with `up`
    /// used to fix the rotation about that direction.
    pub fn looking_along(direction: &Vector3<F>, up: &Vector3<F>) -> Self {
        let linear = look_along_block(direction, up);
        Self::from_linear_and_translation(linear, [F::ZERO; 3], AffineProperties::ORTHONORMAL)
    }

    /// Creates a right-handed view transform for a camera at `eye` looking
    /// at `center`.
    pub fn looking_at(eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> Self {
        look_at_transform(eye, &(eye - center), up)
    }

    /// Creates a left-handed view transform for a camera at `eye` looking
    /// at `center`.
    pub fn looking_at_lh(eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> Self {
        look_at_transform(eye, &(center - eye), up)
    }

    /// Creates a rotation mapping `+z` to `direction`, with `up` used to fix
    /// the rotation about that direction.
    pub fn rotation_towards(direction: &Vector3<F>, up: &Vector3<F>) -> Self {
        Self::from_linear_and_translation(
            towards_block(direction, up),
            [F::ZERO; 3],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates the rotation of [`Self::rotation_towards`] followed by a
    /// translation to `position`.
    pub fn translation_rotate_towards(
        position: &Vector3<F>,
        direction: &Vector3<F>,
        up: &Vector3<F>,
    ) -> Self {
        Self::from_linear_and_translation(
            towards_block(direction, up),
            [position.x, position.y, position.z],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates a transform placing an object at `object` and rotating it
    /// about `up` so that its `+z` axis faces `target` as closely as
    /// possible. `up` must have unit length.
    pub fn billboard_cylindrical(
        object: &Vector3<F>,
        target: &Vector3<F>,
        up: &Vector3<F>,
    ) -> Self {
        let to_target = target - object;
        let left = up.cross(&to_target).normalize();
        let direction = left.cross(up).normalize();
        Self::from_linear_and_translation(
            [
                left.x,
                left.y,
                left.z,
                up.x,
                up.y,
                up.z,
                direction.x,
                direction.y,
                direction.z,
            ],
            [object.x, object.y, object.z],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates a transform placing an object at `object` and rotating it so
    /// that its `+z` axis faces `target`, with `up` fixing the roll.
    pub fn billboard_spherical(object: &Vector3<F>, target: &Vector3<F>, up: &Vector3<F>) -> Self {
        let direction = (target - object).normalize();
        let left = up.cross(&direction).normalize();
        let up = direction.cross(&left);
        Self::from_linear_and_translation(
            [
                left.x,
                left.y,
                left.z,
                up.x,
                up.y,
                up.z,
                direction.x,
                direction.y,
                direction.z,
            ],
            [object.x, object.y, object.z],
            AffineProperties::ORTHONORMAL,
        )
    }

    /// Creates a transform placing an object at `object` and rotating it
    /// along the shortest arc so that its `+z` axis faces `target`.
    pub fn billboard_spherical_shortest_arc(object: &Vector3<F>, target: &Vector3<F>) -> Self {
        let to_target = target - object;
        let mut x = -to_target.y;
        let mut w = to_target.norm() + to_target.z;
        let inv_norm = scalar::invsqrt(x * x + to_target.x * to_target.x + w * w);
        x *= inv_norm;
        let y = to_target.x * inv_norm;
        w *= inv_norm;
        let q00 = (x + x) * x;
        let q11 = (y + y) * y;
        let q01 = (x + x) * y;
        let q03 = (x + x) * w;
        let q13 = (y + y) * w;
        Self::from_linear_and_translation(
            [
                F::ONE - q11,
                q01,
                -q13,
                q01,
                F::ONE - q00,
                q03,
                q13,
                -q03,
                F::ONE - q11 - q00,
            ],
            [object.x, object.y, object.z],
            AffineProperties::ORTHONORMAL,
        )
    }

    fn replace_rotation(&mut self, linear: [F; 9]) -> &mut Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = linear;
        self.m00 = m00;
        self.m01 = m01;
        self.m02 = m02;
        self.m10 = m10;
        self.m11 = m11;
        self.m12 = m12;
        self.m20 = m20;
        self.m21 = m21;
        self.m22 = m22;
        self.properties = (self.properties
            - (AffineProperties::IDENTITY | AffineProperties::TRANSLATION))
            | AffineProperties::ORTHONORMAL;
        self
    }
}

/// Properties of a scaling by `(x, y, z)`.
pub(super) fn unit_scaling_properties<F: Float>(x: F, y: F, z: F) -> AffineProperties {
    if scalar::abs_equals_one(x) && scalar::abs_equals_one(y) && scalar::abs_equals_one(z) {
        AffineProperties::ORTHONORMAL
    } else {
        AffineProperties::empty()
    }
}

/// Column-major linear block of a rotation by `angle` around the unit axis
/// `(x, y, z)`.
pub(super) fn rodrigues_block<F: Float>(angle: F, x: F, y: F, z: F) -> [F; 9] {
    let sin = scalar::sin(angle);
    let cos = scalar::cos_from_sin(sin, angle);
    let c = F::ONE - cos;
    let xy = x * y;
    let xz = x * z;
    let yz = y * z;
    [
        cos + x * x * c,
        xy * c + z * sin,
        xz * c - y * sin,
        xy * c - z * sin,
        cos + y * y * c,
        yz * c + x * sin,
        xz * c + y * sin,
        yz * c - x * sin,
        cos + z * z * c,
    ]
}

/// Column-major linear block of the rotation represented by the given unit
/// quaternion.
pub(super) fn quaternion_block<F: Float>(quaternion: &UnitQuaternion<F>) -> [F; 9] {
    let q = &quaternion.coords;
    let w2 = q.w * q.w;
    let x2 = q.x * q.x;
    let y2 = q.y * q.y;
    let z2 = q.z * q.z;
    let zw = q.z * q.w;
    let dzw = zw + zw;
    let xy = q.x * q.y;
    let dxy = xy + xy;
    let xz = q.x * q.z;
    let dxz = xz + xz;
    let yw = q.y * q.w;
    let dyw = yw + yw;
    let yz = q.y * q.z;
    let dyz = yz + yz;
    let xw = q.x * q.w;
    let dxw = xw + xw;
    [
        w2 + x2 - z2 - y2,
        dxy + dzw,
        dxz - dyw,
        dxy - dzw,
        y2 - z2 + w2 - x2,
        dyz + dxw,
        dyw + dxz,
        dyz - dxw,
        z2 - y2 - x2 + w2,
    ]
}

pub(super) fn euler_xyz_block<F: Float>(angle_x: F, angle_y: F, angle_z: F) -> [F; 9] {
    let sin_x = scalar::sin(angle_x);
    let cos_x = scalar::cos_from_sin(sin_x, angle_x);
    let sin_y = scalar::sin(angle_y);
    let cos_y = scalar::cos_from_sin(sin_y, angle_y);
    let sin_z = scalar::sin(angle_z);
    let cos_z = scalar::cos_from_sin(sin_z, angle_z);
    let m_sin_x = -sin_x;
    let m_sin_y = -sin_y;
    let m_sin_z = -sin_z;

    let nm01 = m_sin_x * m_sin_y;
    let nm02 = cos_x * m_sin_y;
    [
        cos_y * cos_z,
        nm01 * cos_z + cos_x * sin_z,
        nm02 * cos_z + sin_x * sin_z,
        cos_y * m_sin_z,
        nm01 * m_sin_z + cos_x * cos_z,
        nm02 * m_sin_z + sin_x * cos_z,
        sin_y,
        m_sin_x * cos_y,
        cos_x * cos_y,
    ]
}

pub(super) fn euler_zyx_block<F: Float>(angle_z: F, angle_y: F, angle_x: F) -> [F; 9] {
    let sin_x = scalar::sin(angle_x);
    let cos_x = scalar::cos_from_sin(sin_x, angle_x);
    let sin_y = scalar::sin(angle_y);
    let cos_y = scalar::cos_from_sin(sin_y, angle_y);
    let sin_z = scalar::sin(angle_z);
    let cos_z = scalar::cos_from_sin(sin_z, angle_z);
    let m_sin_z = -sin_z;
    let m_sin_y = -sin_y;
    let m_sin_x = -sin_x;

    let nm20 = cos_z * sin_y;
    let nm21 = sin_z * sin_y;
    [
        cos_z * cos_y,
        sin_z * cos_y,
        m_sin_y,
        m_sin_z * cos_x + nm20 * sin_x,
        cos_z * cos_x + nm21 * sin_x,
        cos_y * sin_x,
        m_sin_z * m_sin_x + nm20 * cos_x,
        cos_z * m_sin_x + nm21 * cos_x,
        cos_y * cos_x,
    ]
}

pub(super) fn euler_yxz_block<F: Float>(angle_y: F, angle_x: F, angle_z: F) -> [F; 9] {
    let sin_x = scalar::sin(angle_x);
    let cos_x = scalar::cos_from_sin(sin_x, angle_x);
    let sin_y = scalar::sin(angle_y);
    let cos_y = scalar::cos_from_sin(sin_y, angle_y);
    let sin_z = scalar::sin(angle_z);
    let cos_z = scalar::cos_from_sin(sin_z, angle_z);
    let m_sin_y = -sin_y;
    let m_sin_x = -sin_x;
    let m_sin_z = -sin_z;

    let nm10 = sin_y * sin_x;
    let nm12 = cos_y * sin_x;
    [
        cos_y * cos_z + nm10 * sin_z,
        cos_x * sin_z,
        m_sin_y * cos_z + nm12 * sin_z,
        cos_y * m_sin_z + nm10 * cos_z,
        cos_x * cos_z,
        m_sin_y * m_sin_z + nm12 * cos_z,
        sin_y * cos_x,
        m_sin_x,
        cos_y * cos_x,
    ]
}

/// Linear block and translation of the reflection about the plane
/// `a*x + b*y + c*z + d = 0` with unit normal `(a, b, c)`.
pub(super) fn reflection_block<F: Float>(a: F, b: F, c: F, d: F) -> ([F; 9], [F; 3]) {
    let da = a + a;
    let db = b + b;
    let dc = c + c;
    let dd = d + d;
    (
        [
            F::ONE - da * a,
            -da * b,
            -da * c,
            -db * a,
            F::ONE - db * b,
            -db * c,
            -dc * a,
            -dc * b,
            F::ONE - dc * c,
        ],
        [-dd * a, -dd * b, -dd * c],
    )
}

/// The z-axis rotated by the given orientation.
pub(super) fn orientation_normal<F: Float>(orientation: &UnitQuaternion<F>) -> (F, F, F) {
    let q = &orientation.coords;
    let num1 = q.x + q.x;
    let num2 = q.y + q.y;
    let num3 = q.z + q.z;
    (
        q.x * num3 + q.w * num2,
        q.y * num3 - q.w * num1,
        F::ONE - (q.x * num1 + q.y * num2),
    )
}

/// The `m22` and `m32` elements of an orthographic projection.
pub(super) fn ortho_depth_terms<F: Float>(
    z_near: F,
    z_far: F,
    z_zero_to_one: bool,
    left_handed: bool,
) -> (F, F) {
    let depth_scale = if z_zero_to_one { F::ONE } else { F::TWO };
    let m22 = if left_handed {
        depth_scale / (z_far - z_near)
    } else {
        depth_scale / (z_near - z_far)
    };
    let m32 = if z_zero_to_one {
        z_near / (z_near - z_far)
    } else {
        (z_far + z_near) / (z_near - z_far)
    };
    (m22, m32)
}

fn ortho_block<F: Float>(m00: F, m11: F, m22: F, m30: F, m31: F, m32: F) -> Affine3<F> {
    Affine3::from_linear_and_translation(
        [m00, F::ZERO, F::ZERO, F::ZERO, m11, F::ZERO, F::ZERO, F::ZERO, m22],
        [m30, m31, m32],
        AffineProperties::empty(),
    )
}

/// Column-major view rotation making `-z` point along `direction`.
pub(super) fn look_along_block<F: Float>(direction: &Vector3<F>, up: &Vector3<F>) -> [F; 9] {
    let direction = -direction.normalize();
    let (left, up) = view_basis(&direction, up);
    [
        left.x,
        up.x,
        direction.x,
        left.y,
        up.y,
        direction.y,
        left.z,
        up.z,
        direction.z,
    ]
}

/// Orthonormal `(left, up)` pair completing the given unit backward
/// direction.
pub(super) fn view_basis<F: Float>(
    direction: &Vector3<F>,
    up: &Vector3<F>,
) -> (Vector3<F>, Vector3<F>) {
    let left = up.cross(direction).normalize();
    let up = direction.cross(&left);
    (left, up)
}

fn look_at_transform<F: Float>(
    eye: &Vector3<F>,
    backward: &Vector3<F>,
    up: &Vector3<F>,
) -> Affine3<F> {
    let (linear, translation) = look_at_block(eye, backward, up);
    Affine3::from_linear_and_translation(linear, translation, AffineProperties::ORTHONORMAL)
}

/// Linear block and translation of a view transform for a camera at `eye`
/// whose backward axis points along `backward`.
pub(super) fn look_at_block<F: Float>(
    eye: &Vector3<F>,
    backward: &Vector3<F>,
    up: &Vector3<F>,
) -> ([F; 9], [F; 3]) {
    let direction = backward.normalize();
    let (left, up) = view_basis(&direction, up);
    (
        [
            left.x,
            up.x,
            direction.x,
            left.y,
            up.y,
            direction.y,
            left.z,
            up.z,
            direction.z,
        ],
        [-left.dot(eye), -up.dot(eye), -direction.dot(eye)],
    )
}

/// Column-major rotation block mapping `+z` to `direction`.
pub(super) fn towards_block<F: Float>(direction: &Vector3<F>, up: &Vector3<F>) -> [F; 9] {
    let direction = direction * scalar::invsqrt(direction.norm_squared());
    let left = up.cross(&direction);
    let left = left * scalar::invsqrt(left.norm_squared());
    let up = direction.cross(&left);
    [
        left.x,
        left.y,
        left.z,
        up.x,
        up.y,
        up.z,
        direction.x,
        direction.y,
        direction.z,
    ]
}
