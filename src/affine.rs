//! Affine transforms with cached structural properties.

mod composition;
mod construction;
mod inversion;
mod query;

#[cfg(any(test, feature = "fuzzing"))]
pub mod fuzzing;

use crate::{num::Float, properties::AffineProperties, scalar};
use anyhow::{Result, bail};
use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use std::mem;

/// A 3D affine transform `p -> L * p + t`, stored as a 4x3 column-major
/// matrix (the 3x3 linear block `L` followed by the translation column
/// `t`), together with a conservative set of [`AffineProperties`] used to
/// select cheaper algorithms.
///
/// Elements are named `m<column><row>`, so `m30`, `m31` and `m32` hold the
/// translation. The implicit fourth row is `[0, 0, 0, 1]`.
///
/// Operations take `&self` and return a new transform. The most common
/// ones also have an in-place `_mut` variant. Degenerate input (singular
/// matrices, zero-length vectors) is not reported as an error; the result
/// simply contains infinities or NaNs, which can be detected with
/// [`Self::is_finite`].
#[derive(Clone, Copy, Debug)]
pub struct Affine3<F: Float> {
    m00: F,
    m01: F,
    m02: F,
    m10: F,
    m11: F,
    m12: F,
    m20: F,
    m21: F,
    m22: F,
    m30: F,
    m31: F,
    m32: F,
    properties: AffineProperties,
}

impl<F: Float> Affine3<F> {
    /// Creates a transform from the given elements in column-major order,
    /// determining its properties from the values.
    pub fn new(
        m00: F,
        m01: F,
        m02: F,
        m10: F,
        m11: F,
        m12: F,
        m20: F,
        m21: F,
        m22: F,
        m30: F,
        m31: F,
        m32: F,
    ) -> Self {
        let mut transform = Self::from_fields(
            [m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32],
            AffineProperties::empty(),
        );
        transform.determine_properties();
        transform
    }

    /// Creates the identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self::from_fields(
            [
                F::ONE,
                F::ZERO,
                F::ZERO,
                F::ZERO,
                F::ONE,
                F::ZERO,
                F::ZERO,
                F::ZERO,
                F::ONE,
                F::ZERO,
                F::ZERO,
                F::ZERO,
            ],
            AffineProperties::IDENTITY_MASK,
        )
    }

    /// Creates a transform from the three linear-block columns and the
    /// translation, determining its properties from the values.
    pub fn from_columns(
        col0: &Vector3<F>,
        col1: &Vector3<F>,
        col2: &Vector3<F>,
        col3: &Vector3<F>,
    ) -> Self {
        Self::new(
            col0.x, col0.y, col0.z, col1.x, col1.y, col1.z, col2.x, col2.y, col2.z, col3.x,
            col3.y, col3.z,
        )
    }

    /// Creates a transform from the upper three rows of the given 4x4
    /// matrix. The bottom row is ignored.
    pub fn from_matrix4(matrix: &Matrix4<F>) -> Self {
        Self::new(
            matrix[(0, 0)],
            matrix[(1, 0)],
            matrix[(2, 0)],
            matrix[(0, 1)],
            matrix[(1, 1)],
            matrix[(2, 1)],
            matrix[(0, 2)],
            matrix[(1, 2)],
            matrix[(2, 2)],
            matrix[(0, 3)],
            matrix[(1, 3)],
            matrix[(2, 3)],
        )
    }

    /// Creates a transform with the given linear block and no translation.
    pub fn from_matrix3(matrix: &Matrix3<F>) -> Self {
        let mut transform = Self::identity();
        transform.set_linear(matrix);
        transform.determine_properties();
        transform
    }

    /// Returns the transform as a homogeneous 4x4 matrix.
    pub fn to_matrix4(&self) -> Matrix4<F> {
        Matrix4::new(
            self.m00,
            self.m10,
            self.m20,
            self.m30,
            self.m01,
            self.m11,
            self.m21,
            self.m31,
            self.m02,
            self.m12,
            self.m22,
            self.m32,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ONE,
        )
    }

    /// Returns the 3x3 linear block.
    pub fn linear_part(&self) -> Matrix3<F> {
        Matrix3::new(
            self.m00, self.m10, self.m20, self.m01, self.m11, self.m21, self.m02, self.m12,
            self.m22,
        )
    }

    affine_field_accessors!(
        linear: [
            m00 = ONE,
            m01 = ZERO,
            m02 = ZERO,
            m10 = ZERO,
            m11 = ONE,
            m12 = ZERO,
            m20 = ZERO,
            m21 = ZERO,
            m22 = ONE,
        ],
        translation: [m30, m31, m32],
    );

    /// Returns the element in the given column (0 to 3) and row (0 to 2).
    ///
    /// # Errors
    /// Returns an error if the column or row is out of range.
    pub fn element(&self, column: usize, row: usize) -> Result<F> {
        if column > 3 || row > 2 {
            bail!("Invalid element index ({column}, {row}) for 4x3 matrix");
        }
        Ok(self.to_array()[3 * column + row])
    }

    /// Sets the element in the given column (0 to 3) and row (0 to 2),
    /// updating the properties like the corresponding field setter.
    ///
    /// # Errors
    /// Returns an error if the column or row is out of range.
    pub fn set_element(&mut self, column: usize, row: usize, value: F) -> Result<&mut Self> {
        match (column, row) {
            (0, 0) => self.set_m00(value),
            (0, 1) => self.set_m01(value),
            (0, 2) => self.set_m02(value),
            (1, 0) => self.set_m10(value),
            (1, 1) => self.set_m11(value),
            (1, 2) => self.set_m12(value),
            (2, 0) => self.set_m20(value),
            (2, 1) => self.set_m21(value),
            (2, 2) => self.set_m22(value),
            (3, 0) => self.set_m30(value),
            (3, 1) => self.set_m31(value),
            (3, 2) => self.set_m32(value),
            _ => bail!("Invalid element index ({column}, {row}) for 4x3 matrix"),
        };
        Ok(self)
    }

    /// Returns the currently known properties of the transform.
    #[inline]
    pub fn properties(&self) -> AffineProperties {
        self.properties
    }

    /// Recomputes the properties by exact inspection of the elements.
    ///
    /// Only an exactly identity linear block is recognized as orthonormal,
    /// so this may discard an orthonormality flag that was known before.
    pub fn determine_properties(&mut self) -> &mut Self {
        self.properties =
            AffineProperties::of_fields(&self.linear_array(), &self.translation_array());
        self
    }

    /// Replaces the properties with the given ones without checking them.
    ///
    /// The caller is responsible for the properties actually holding.
    /// Claiming a property that does not hold makes subsequent operations
    /// select algorithms that produce wrong results.
    pub fn assume(&mut self, properties: AffineProperties) -> &mut Self {
        #[cfg(all(debug_assertions, not(feature = "unchecked")))]
        {
            let ground_truth = self.ground_truth_properties(float!(F, 1e-4));
            if !properties.is_sound_for(ground_truth) {
                log::warn!(
                    "Assuming properties {properties} for transform with properties {ground_truth}"
                );
            }
        }
        self.properties = properties;
        self
    }

    /// Determines every property that actually holds for the elements,
    /// using the given tolerance for the orthonormality check.
    pub fn ground_truth_properties(&self, epsilon: F) -> AffineProperties {
        AffineProperties::ground_truth(&self.linear_array(), &self.translation_array(), epsilon)
    }

    /// Whether the currently known properties all hold for the elements,
    /// using the given tolerance for the orthonormality check.
    pub fn properties_are_sound(&self, epsilon: F) -> bool {
        self.properties
            .is_sound_for(self.ground_truth_properties(epsilon))
    }

    /// Whether all elements are finite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|&value| scalar::is_finite(value))
    }

    /// Exchanges the contents of this transform with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Returns the translation column.
    pub fn translation_vector(&self) -> Vector3<F> {
        Vector3::new(self.m30, self.m31, self.m32)
    }

    /// Replaces the linear block with that of `other`, keeping the
    /// translation. Only properties held by both transforms are kept.
    pub fn set3x3(&mut self, other: &Self) -> &mut Self {
        self.m00 = other.m00;
        self.m01 = other.m01;
        self.m02 = other.m02;
        self.m10 = other.m10;
        self.m11 = other.m11;
        self.m12 = other.m12;
        self.m20 = other.m20;
        self.m21 = other.m21;
        self.m22 = other.m22;
        self.properties &= other.properties;
        self
    }

    /// Replaces the linear block with the given matrix, keeping the
    /// translation and clearing the properties.
    pub fn set_linear(&mut self, matrix: &Matrix3<F>) -> &mut Self {
        self.m00 = matrix[(0, 0)];
        self.m01 = matrix[(1, 0)];
        self.m02 = matrix[(2, 0)];
        self.m10 = matrix[(0, 1)];
        self.m11 = matrix[(1, 1)];
        self.m12 = matrix[(2, 1)];
        self.m20 = matrix[(0, 2)];
        self.m21 = matrix[(1, 2)];
        self.m22 = matrix[(2, 2)];
        self.properties = AffineProperties::empty();
        self
    }

    /// Returns the elements in column-major order.
    pub fn to_array(&self) -> [F; 12] {
        [
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12, self.m20, self.m21,
            self.m22, self.m30, self.m31, self.m32,
        ]
    }

    /// Creates a transform from elements in column-major order,
    /// determining its properties from the values.
    pub fn from_array(elements: &[F; 12]) -> Self {
        let mut transform = Self::from_fields(*elements, AffineProperties::empty());
        transform.determine_properties();
        transform
    }

    /// Writes the elements in column-major order into `slice`, starting at
    /// `offset`.
    ///
    /// # Errors
    /// Returns an error if the slice cannot hold 12 elements from `offset`.
    pub fn write_to_slice(&self, slice: &mut [F], offset: usize) -> Result<()> {
        let Some(target) = slice.get_mut(offset..offset.saturating_add(12)) else {
            bail!(
                "Slice of length {} too short to hold 12 elements at offset {offset}",
                slice.len()
            );
        };
        target.copy_from_slice(&self.to_array());
        Ok(())
    }

    /// Creates a transform from 12 column-major elements in `slice`,
    /// starting at `offset`.
    ///
    /// # Errors
    /// Returns an error if the slice does not hold 12 elements from
    /// `offset`.
    pub fn from_slice(slice: &[F], offset: usize) -> Result<Self> {
        let Some(source) = slice.get(offset..offset.saturating_add(12)) else {
            bail!(
                "Slice of length {} too short to read 12 elements at offset {offset}",
                slice.len()
            );
        };
        let mut elements = [F::ZERO; 12];
        elements.copy_from_slice(source);
        Ok(Self::from_array(&elements))
    }

    /// Returns the elements of the equivalent homogeneous 4x4 matrix in
    /// column-major order.
    pub fn to_array4x4(&self) -> [F; 16] {
        [
            self.m00,
            self.m01,
            self.m02,
            F::ZERO,
            self.m10,
            self.m11,
            self.m12,
            F::ZERO,
            self.m20,
            self.m21,
            self.m22,
            F::ZERO,
            self.m30,
            self.m31,
            self.m32,
            F::ONE,
        ]
    }

    /// Creates a transform from the column-major elements of a 4x4 matrix.
    /// The bottom row is ignored.
    pub fn from_array4x4(elements: &[F; 16]) -> Self {
        Self::new(
            elements[0],
            elements[1],
            elements[2],
            elements[4],
            elements[5],
            elements[6],
            elements[8],
            elements[9],
            elements[10],
            elements[12],
            elements[13],
            elements[14],
        )
    }

    /// Returns the elements in row-major order, i.e. the column-major
    /// elements of the transposed 3x4 matrix.
    pub fn to_transposed_array(&self) -> [F; 12] {
        [
            self.m00, self.m10, self.m20, self.m30, self.m01, self.m11, self.m21, self.m31,
            self.m02, self.m12, self.m22, self.m32,
        ]
    }

    /// Returns the elements of the linear block in column-major order.
    pub fn to_array3x3(&self) -> [F; 9] {
        self.linear_array()
    }

    /// Returns the given row (0 to 2) as `(m0r, m1r, m2r, m3r)`.
    ///
    /// # Errors
    /// Returns an error if the row index is out of range.
    pub fn row(&self, row: usize) -> Result<Vector4<F>> {
        Ok(match row {
            0 => Vector4::new(self.m00, self.m10, self.m20, self.m30),
            1 => Vector4::new(self.m01, self.m11, self.m21, self.m31),
            2 => Vector4::new(self.m02, self.m12, self.m22, self.m32),
            _ => bail!("Invalid row index {row} for 4x3 matrix"),
        })
    }

    /// Sets the given row (0 to 2) and clears the properties.
    ///
    /// # Errors
    /// Returns an error if the row index is out of range.
    pub fn set_row(&mut self, row: usize, values: &Vector4<F>) -> Result<&mut Self> {
        let (c0, c1, c2, c3) = match row {
            0 => (&mut self.m00, &mut self.m10, &mut self.m20, &mut self.m30),
            1 => (&mut self.m01, &mut self.m11, &mut self.m21, &mut self.m31),
            2 => (&mut self.m02, &mut self.m12, &mut self.m22, &mut self.m32),
            _ => bail!("Invalid row index {row} for 4x3 matrix"),
        };
        *c0 = values.x;
        *c1 = values.y;
        *c2 = values.z;
        *c3 = values.w;
        self.properties = AffineProperties::empty();
        Ok(self)
    }

    /// Returns the given column (0 to 3), where column 3 is the
    /// translation.
    ///
    /// # Errors
    /// Returns an error if the column index is out of range.
    pub fn column(&self, column: usize) -> Result<Vector3<F>> {
        Ok(match column {
            0 => Vector3::new(self.m00, self.m01, self.m02),
            1 => Vector3::new(self.m10, self.m11, self.m12),
            2 => Vector3::new(self.m20, self.m21, self.m22),
            3 => Vector3::new(self.m30, self.m31, self.m32),
            _ => bail!("Invalid column index {column} for 4x3 matrix"),
        })
    }

    /// Sets the given column (0 to 3) and clears the properties.
    ///
    /// # Errors
    /// Returns an error if the column index is out of range.
    pub fn set_column(&mut self, column: usize, values: &Vector3<F>) -> Result<&mut Self> {
        let (r0, r1, r2) = match column {
            0 => (&mut self.m00, &mut self.m01, &mut self.m02),
            1 => (&mut self.m10, &mut self.m11, &mut self.m12),
            2 => (&mut self.m20, &mut self.m21, &mut self.m22),
            3 => (&mut self.m30, &mut self.m31, &mut self.m32),
            _ => bail!("Invalid column index {column} for 4x3 matrix"),
        };
        *r0 = values.x;
        *r1 = values.y;
        *r2 = values.z;
        self.properties = AffineProperties::empty();
        Ok(self)
    }

    /// Adds the elements of `other` to the elements of this transform.
    pub fn component_add(&self, other: &Self) -> Self {
        self.zip_elements(other, |a, b| a + b)
    }

    /// Subtracts the elements of `other` from the elements of this
    /// transform.
    pub fn component_sub(&self, other: &Self) -> Self {
        self.zip_elements(other, |a, b| a - b)
    }

    /// Multiplies the elements of this transform with the elements of
    /// `other`.
    pub fn component_mul(&self, other: &Self) -> Self {
        self.zip_elements(other, |a, b| a * b)
    }

    /// Multiplies the linear-block elements of this transform with those of
    /// `other`, keeping the translation.
    pub fn component_mul3x3(&self, other: &Self) -> Self {
        let mut result = self.zip_elements(other, |a, b| a * b);
        result.m30 = self.m30;
        result.m31 = self.m31;
        result.m32 = self.m32;
        result
    }

    /// Adds the elements of `other` scaled by `factor` to the elements of
    /// this transform, using fused multiply-add.
    pub fn fma(&self, other: &Self, factor: F) -> Self {
        self.zip_elements(other, |a, b| scalar::fma(b, factor, a))
    }

    /// Linearly interpolates element-wise between this transform (`t = 0`)
    /// and `other` (`t = 1`).
    ///
    /// Orthonormality survives only when both linear blocks are the
    /// identity, since blending two rotations does not give a rotation.
    pub fn lerp(&self, other: &Self, t: F) -> Self {
        let mut result = self.zip_elements(other, |a, b| scalar::fma(b - a, t, a));
        let common = self.properties & other.properties;
        result.properties = if common.contains(AffineProperties::TRANSLATION) {
            common
        } else {
            common - AffineProperties::ORTHONORMAL
        };
        result
    }

    in_place_variants! {
        multiply(right: &Self);
        invert();
        transpose3x3();
        normalize3x3();
        translate(x: F, y: F, z: F);
        translate_by(offset: &nalgebra::Vector3<F>);
        translate_local(x: F, y: F, z: F);
        scale(x: F, y: F, z: F);
        scale_xy(x: F, y: F);
        scale_uniform(factor: F);
        scale_by(factors: &nalgebra::Vector3<F>);
        scale_around(sx: F, sy: F, sz: F, ox: F, oy: F, oz: F);
        scale_local(x: F, y: F, z: F);
        rotate(angle: F, x: F, y: F, z: F);
        rotate_axis_angle(axis_angle: &crate::axis_angle::AxisAngle<F>);
        rotate_translation(angle: F, x: F, y: F, z: F);
        rotate_x(angle: F);
        rotate_y(angle: F);
        rotate_z(angle: F);
        rotate_xyz(angle_x: F, angle_y: F, angle_z: F);
        rotate_zyx(angle_z: F, angle_y: F, angle_x: F);
        rotate_yxz(angle_y: F, angle_x: F, angle_z: F);
        rotate_quaternion(quaternion: &nalgebra::UnitQuaternion<F>);
        rotate_local(angle: F, x: F, y: F, z: F);
        rotate_local_x(angle: F);
        rotate_local_y(angle: F);
        rotate_local_z(angle: F);
        rotate_local_quaternion(quaternion: &nalgebra::UnitQuaternion<F>);
        rotate_around(quaternion: &nalgebra::UnitQuaternion<F>, ox: F, oy: F, oz: F);
        rotate_towards(direction: &nalgebra::Vector3<F>, up: &nalgebra::Vector3<F>);
    }

    #[inline]
    pub(crate) fn from_fields(fields: [F; 12], properties: AffineProperties) -> Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32] = fields;
        Self {
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
            properties,
        }
    }

    /// Creates a transform with the given column-major linear block and
    /// translation.
    #[inline]
    pub(crate) fn from_linear_and_translation(
        linear: [F; 9],
        translation: [F; 3],
        properties: AffineProperties,
    ) -> Self {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = linear;
        let [m30, m31, m32] = translation;
        Self::from_fields(
            [m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32],
            properties,
        )
    }

    fn linear_array(&self) -> [F; 9] {
        [
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12, self.m20, self.m21,
            self.m22,
        ]
    }

    fn translation_array(&self) -> [F; 3] {
        [self.m30, self.m31, self.m32]
    }

    fn zip_elements(&self, other: &Self, op: impl Fn(F, F) -> F) -> Self {
        let a = self.to_array();
        let b = other.to_array();
        Self::from_fields(
            std::array::from_fn(|idx| op(a[idx], b[idx])),
            AffineProperties::empty(),
        )
    }
}

impl<F: Float> Default for Affine3<F> {
    fn default() -> Self {
        Self::identity()
    }
}

/// Compares the elements exactly. The properties are not compared.
impl<F: Float> PartialEq for Affine3<F> {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl<F: Float> AbsDiffEq for Affine3<F> {
    type Epsilon = F;

    fn default_epsilon() -> F {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: F) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<F: Float> RelativeEq for Affine3<F> {
    fn default_max_relative() -> F {
        F::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: F, max_relative: F) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl_binop!(Mul, mul, Affine3<F>, Affine3<F>, Affine3<F>, |a, b| {
    a.multiply(b)
});

impl_binop!(Mul, mul, Affine3<F>, Point3<F>, Point3<F>, |a, b| {
    a.transform_position(b)
});

impl_binop!(Mul, mul, Affine3<F>, Vector3<F>, Vector3<F>, |a, b| {
    a.transform_direction(b)
});

impl_binop_assign!(MulAssign, mul_assign, Affine3<F>, Affine3<F>, |a, b| {
    a.multiply_mut(b);
});

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};

    fn general() -> Affine3<f64> {
        Affine3::new(
            2.0, 0.5, -1.0, 0.25, 3.0, 1.5, -0.75, 1.0, 1.25, 4.0, -2.0, 7.0,
        )
    }

    #[test]
    fn identity_has_all_properties_and_no_translation() {
        let identity = Affine3::<f64>::identity();
        assert_eq!(identity.translation_vector(), Vector3::zeros());
        assert_eq!(identity.properties(), AffineProperties::IDENTITY_MASK);
        assert_eq!(Affine3::<f32>::default(), Affine3::<f32>::identity());
    }

    #[test]
    fn creating_from_elements_determines_properties() {
        let translation = Affine3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0);
        assert_eq!(
            translation.properties(),
            AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL
        );
        assert!(general().properties().is_empty());
        assert_eq!(
            Affine3::<f64>::from_array(&Affine3::identity().to_array()).properties(),
            AffineProperties::IDENTITY_MASK
        );
    }

    #[test]
    fn setting_linear_element_to_identity_value_keeps_translation_flag() {
        let mut transform = Affine3::<f64>::translation(1.0, 2.0, 3.0);
        transform.set_m00(1.0);
        assert_eq!(transform.properties(), AffineProperties::TRANSLATION);
    }

    #[test]
    fn setting_linear_element_to_other_value_clears_flags() {
        let mut transform = Affine3::<f64>::identity();
        transform.set_m12(0.5);
        assert!(transform.properties().is_empty());
        assert_eq!(transform.m12(), 0.5);
    }

    #[test]
    fn setting_nonzero_translation_element_clears_only_identity() {
        let mut transform = Affine3::<f64>::identity();
        transform.set_m31(0.0);
        assert_eq!(transform.properties(), AffineProperties::IDENTITY_MASK);
        transform.set_m31(2.0);
        assert_eq!(
            transform.properties(),
            AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL
        );
    }

    #[test]
    fn element_access_is_bounds_checked() {
        let mut transform = general();
        assert_eq!(transform.element(3, 2).unwrap(), 7.0);
        assert_eq!(transform.element(1, 0).unwrap(), 0.25);
        assert!(transform.element(4, 0).is_err());
        assert!(transform.element(0, 3).is_err());
        transform.set_element(2, 1, 9.0).unwrap();
        assert_eq!(transform.m21(), 9.0);
        assert!(transform.set_element(0, 3, 1.0).is_err());
    }

    #[test]
    fn rows_and_columns_are_bounds_checked() {
        let mut transform = general();
        assert_eq!(transform.row(1).unwrap(), vector![0.5, 3.0, 1.0, -2.0]);
        assert_eq!(transform.column(3).unwrap(), vector![4.0, -2.0, 7.0]);
        assert!(transform.row(3).is_err());
        assert!(transform.column(4).is_err());

        let mut identity = Affine3::<f64>::identity();
        identity.set_row(0, &vector![1.0, 0.0, 0.0, 0.0]).unwrap();
        assert!(identity.properties().is_empty());
        identity.set_column(3, &vector![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(identity.translation_vector(), vector![1.0, 2.0, 3.0]);
        assert!(transform.set_row(3, &Vector4::zeros()).is_err());
        assert!(transform.set_column(4, &Vector3::zeros()).is_err());
    }

    #[test]
    fn array_layouts_follow_column_major_order() {
        let transform = general();
        assert_eq!(
            transform.to_array(),
            [2.0, 0.5, -1.0, 0.25, 3.0, 1.5, -0.75, 1.0, 1.25, 4.0, -2.0, 7.0]
        );
        assert_eq!(
            transform.to_transposed_array(),
            [2.0, 0.25, -0.75, 4.0, 0.5, 3.0, 1.0, -2.0, -1.0, 1.5, 1.25, 7.0]
        );
        assert_eq!(
            transform.to_array4x4(),
            [
                2.0, 0.5, -1.0, 0.0, 0.25, 3.0, 1.5, 0.0, -0.75, 1.0, 1.25, 0.0, 4.0, -2.0, 7.0,
                1.0
            ]
        );
        assert_eq!(
            Affine3::from_array4x4(&transform.to_array4x4()),
            transform
        );
        assert_eq!(Affine3::from_matrix4(&transform.to_matrix4()), transform);
    }

    #[test]
    fn slices_are_length_checked() {
        let transform = general();
        let mut buffer = [0.0; 14];
        transform.write_to_slice(&mut buffer, 2).unwrap();
        assert_eq!(Affine3::from_slice(&buffer, 2).unwrap(), transform);
        assert!(transform.write_to_slice(&mut buffer, 3).is_err());
        assert!(Affine3::from_slice(&buffer, 3).is_err());
    }

    #[test]
    fn component_arithmetic_clears_properties() {
        let identity = Affine3::<f64>::identity();
        let sum = identity.component_add(&identity);
        assert_eq!(sum.m00(), 2.0);
        assert!(sum.properties().is_empty());
        let difference = identity.component_sub(&identity);
        assert_eq!(difference, Affine3::from_fields([0.0; 12], AffineProperties::empty()));
        let product = general().component_mul(&general());
        assert_eq!(product.m32(), 49.0);
        let product3x3 = general().component_mul3x3(&general());
        assert_eq!(product3x3.m32(), 7.0);
        assert_eq!(product3x3.m00(), 4.0);
        let fused = identity.fma(&general(), 2.0);
        assert_eq!(fused.m00(), 5.0);
        assert!(fused.properties().is_empty());
    }

    #[test]
    fn lerp_keeps_common_properties() {
        let a = Affine3::<f64>::translation(0.0, 0.0, 2.0);
        let b = Affine3::<f64>::translation(4.0, 0.0, 0.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.translation_vector(), vector![2.0, 0.0, 1.0]);
        assert_eq!(
            mid.properties(),
            AffineProperties::TRANSLATION | AffineProperties::ORTHONORMAL
        );

        let blended = Affine3::<f64>::rotation_x(0.2).lerp(&Affine3::rotation_x(1.4), 0.5);
        assert!(blended.properties().is_empty());
    }

    #[test]
    fn set3x3_keeps_properties_held_by_both() {
        let mut transform = Affine3::<f64>::translation(1.0, 2.0, 3.0);
        transform.set3x3(&Affine3::rotation_z(0.5));
        assert_eq!(transform.properties(), AffineProperties::ORTHONORMAL);
        assert_eq!(transform.translation_vector(), vector![1.0, 2.0, 3.0]);
    }

    #[test]
    fn equality_ignores_properties() {
        let mut a = general();
        let b = general();
        a.assume(AffineProperties::ORTHONORMAL);
        assert_eq!(a, b);
        assert_abs_diff_eq!(a, b);
    }

    #[test]
    fn swapping_exchanges_elements_and_properties() {
        let mut a = general();
        let mut b = Affine3::identity();
        a.swap(&mut b);
        assert_eq!(a.properties(), AffineProperties::IDENTITY_MASK);
        assert_eq!(b, general());
        assert!(b.properties().is_empty());
    }

    #[test]
    fn operators_delegate_to_methods() {
        let a = Affine3::<f64>::translation(1.0, 0.0, 0.0);
        let b = Affine3::<f64>::scaling(2.0, 2.0, 2.0);
        assert_eq!(&a * &b, a.multiply(&b));
        assert_eq!(a * point![1.0, 1.0, 1.0], point![2.0, 1.0, 1.0]);
        assert_eq!(a * vector![1.0, 1.0, 1.0], vector![1.0, 1.0, 1.0]);
        let mut c = a;
        c *= b;
        assert_eq!(c, a.multiply(&b));
    }

    #[test]
    fn non_finite_elements_are_detected() {
        let mut transform = Affine3::<f64>::identity();
        assert!(transform.is_finite());
        transform.set_m21(f64::NAN);
        assert!(!transform.is_finite());
    }

    #[test]
    fn converting_from_matrix3_determines_properties() {
        let transform = Affine3::from_matrix3(&Matrix3::<f64>::identity());
        assert_eq!(transform.properties(), AffineProperties::IDENTITY_MASK);
        let scaled = Affine3::from_matrix3(&Matrix3::<f64>::from_diagonal_element(2.0));
        assert!(scaled.properties().is_empty());
        assert_eq!(scaled.linear_part(), Matrix3::from_diagonal_element(2.0));
    }
}
