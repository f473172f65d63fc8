//! Random sequences of operations for checking that the properties tracked
//! by [`Affine3`] stay sound and that fast paths agree with the generic
//! algorithms.

use super::Affine3;
use crate::{axis_angle::AxisAngle, num::Float, properties::AffineProperties};
use approx::relative_eq;
use arbitrary::{Arbitrary, Result, Unstructured};
use nalgebra::{UnitQuaternion, Vector3, Vector4};
use std::f64::consts::TAU;

/// How closely results must agree for a given floating point precision.
#[derive(Clone, Copy, Debug)]
struct Tolerances {
    /// Tolerance for the orthonormality check.
    soundness: f64,
    /// Relative tolerance when comparing a fast path with the generic path.
    equivalence: f64,
    max_operations: usize,
}

const DOUBLE_PRECISION: Tolerances = Tolerances {
    soundness: 1e-6,
    equivalence: 1e-9,
    max_operations: 48,
};

// Shorter sequences keep accumulated orthonormality drift well below both
// tolerances, since orthonormal fast paths such as the transposing inverse
// differ from the generic path by that drift.
const SINGLE_PRECISION: Tolerances = Tolerances {
    soundness: 1e-4,
    equivalence: 1e-4,
    max_operations: 24,
};

/// A coordinate in `[-100, 100]` with two decimals.
#[derive(Clone, Copy, Debug)]
pub struct Coord(pub f64);

/// An angle in `[-2π, 2π]` radians.
#[derive(Clone, Copy, Debug)]
pub struct Angle(pub f64);

/// A scale factor that is either exactly `±1` or has a magnitude in
/// `[0.25, 4]`.
#[derive(Clone, Copy, Debug)]
pub struct Factor(pub f64);

/// A unit direction, or the z-axis if the sampled direction was zero.
#[derive(Clone, Copy, Debug)]
pub struct Direction(pub Vector3<f64>);

/// A position with [`Coord`] components.
#[derive(Clone, Copy, Debug)]
pub struct Position(pub Vector3<f64>);

/// A unit quaternion built from three [`Angle`]s.
#[derive(Clone, Copy, Debug)]
pub struct Orientation(pub UnitQuaternion<f64>);

/// A way of creating a transform from scratch.
#[derive(Clone, Debug, Arbitrary)]
pub enum AffineSource {
    Identity,
    Translation(Position),
    Scaling(Factor, Factor, Factor),
    Rotation(Angle, Direction),
    RotationAxisAngle(Angle, Position),
    RotationX(Angle),
    RotationY(Angle),
    RotationZ(Angle),
    RotationXyz(Angle, Angle, Angle),
    RotationZyx(Angle, Angle, Angle),
    RotationYxz(Angle, Angle, Angle),
    RotationQuaternion(Orientation),
    TranslationRotate(Position, Orientation),
    TranslationRotateInvert(Position, Orientation),
    TranslationRotateScale(Position, Orientation, Factor, Factor, Factor),
    RotationAround(Orientation, Position),
    Reflection(Direction, Position),
    ReflectionOrientation(Orientation, Position),
    OrthoProjection(Coord, Coord, Coord, Coord, Coord, Coord, bool),
    OrthoSymmetricProjectionLh(Factor, Factor, Coord, Coord, bool),
    Ortho2dProjection(Coord, Coord, Coord, Coord),
    LookingAlong(Direction, Direction),
    LookingAt(Position, Position, Direction),
    LookingAtLh(Position, Position, Direction),
    RotationTowards(Direction, Direction),
    TranslationRotateTowards(Position, Direction, Direction),
    BillboardCylindrical(Position, Position, Direction),
    BillboardSpherical(Position, Position, Direction),
    BillboardSphericalShortestArc(Position, Position),
    Elements([Coord; 12]),
}

/// An operation applied to a transform.
///
/// Operations with preconditions on the receiver (`multiply_translation`,
/// `multiply_ortho`, `invert_ortho`, `rotate_translation`) are not included,
/// since violating them is allowed to produce unsound properties.
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, Arbitrary)]
pub enum AffineOperation {
    Multiply(AffineSource),
    MultiplyFromLeft(AffineSource),
    Multiply3x3([Coord; 9]),
    Translate(Position),
    TranslateLocal(Position),
    Scale(Factor, Factor, Factor),
    ScaleXy(Factor, Factor),
    ScaleAround(Factor, Factor, Factor, Position),
    ScaleLocal(Factor, Factor, Factor),
    Rotate(Angle, Direction),
    RotateAxisAngle(Angle, Position),
    RotateX(Angle),
    RotateY(Angle),
    RotateZ(Angle),
    RotateXyz(Angle, Angle, Angle),
    RotateZyx(Angle, Angle, Angle),
    RotateYxz(Angle, Angle, Angle),
    RotateQuaternion(Orientation),
    RotateLocal(Angle, Direction),
    RotateLocalX(Angle),
    RotateLocalY(Angle),
    RotateLocalZ(Angle),
    RotateLocalQuaternion(Orientation),
    RotateAround(Orientation, Position),
    RotateTowards(Direction, Direction),
    Reflect(Direction, Position),
    ReflectOrientation(Orientation, Position),
    LookAlong(Direction, Direction),
    LookAt(Position, Position, Direction),
    LookAtLh(Position, Position, Direction),
    Ortho(Coord, Coord, Coord, Coord, Coord, Coord, bool),
    OrthoLh(Coord, Coord, Coord, Coord, Coord, Coord, bool),
    OrthoSymmetric(Factor, Factor, Coord, Coord, bool),
    Ortho2d(Coord, Coord, Coord, Coord),
    Shadow(Position, bool, Direction, Coord),
    ShadowWithPlaneTransform(Position, bool, AffineSource),
    Pick(Coord, Coord, Factor, Factor, [i16; 4]),
    Arcball(Coord, Position, Angle, Angle),
    ObliqueZ(Coord, Coord),
    NegateX,
    NegateY,
    NegateZ,
    Invert,
    Transpose3x3,
    Normal,
    Cofactor3x3,
    Normalize3x3,
    SetRotationXyz(Angle, Angle, Angle),
    SetRotationZyx(Angle, Angle, Angle),
    SetRotationYxz(Angle, Angle, Angle),
    SetTranslation(Position),
    Set3x3(AffineSource),
    SetElement(u8, u8, Coord),
    ComponentAdd(AffineSource),
    Fma(AffineSource, Coord),
    Lerp(AffineSource, Coord),
    DetermineProperties,
}

/// A starting transform and the operations to apply to it in order.
#[derive(Clone, Debug, Arbitrary)]
pub struct AffineFuzzInput {
    pub initial: AffineSource,
    pub operations: Vec<AffineOperation>,
}

impl Arbitrary<'_> for Coord {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        Ok(Self(f64::from(u.int_in_range::<i32>(-10000..=10000)?) / 100.0))
    }
}

impl Arbitrary<'_> for Angle {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        Ok(Self(
            TAU * f64::from(u.int_in_range::<i32>(-1000000..=1000000)?) / 1000000.0,
        ))
    }
}

impl Arbitrary<'_> for Factor {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        let sign = if u.arbitrary::<bool>()? { -1.0 } else { 1.0 };
        let magnitude = if u.arbitrary::<bool>()? {
            1.0
        } else {
            0.25 + 3.75 * f64::from(u.int_in_range::<i32>(0..=10000)?) / 10000.0
        };
        Ok(Self(sign * magnitude))
    }
}

impl Arbitrary<'_> for Direction {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        let x = f64::from(u.int_in_range::<i32>(-10..=10)?);
        let y = f64::from(u.int_in_range::<i32>(-10..=10)?);
        let z = f64::from(u.int_in_range::<i32>(-10..=10)?);
        let direction = Vector3::new(x, y, z);
        Ok(Self(if direction == Vector3::zeros() {
            Vector3::z()
        } else {
            direction.normalize()
        }))
    }
}

impl Arbitrary<'_> for Position {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        let Coord(x) = u.arbitrary()?;
        let Coord(y) = u.arbitrary()?;
        let Coord(z) = u.arbitrary()?;
        Ok(Self(Vector3::new(x, y, z)))
    }
}

impl Coord {
    fn value<F: Float>(self) -> F {
        float!(F, self.0)
    }
}

impl Angle {
    fn value<F: Float>(self) -> F {
        float!(F, self.0)
    }
}

impl Factor {
    fn value<F: Float>(self) -> F {
        float!(F, self.0)
    }
}

impl Direction {
    fn value<F: Float>(&self) -> Vector3<F> {
        self.0.cast()
    }
}

impl Position {
    fn value<F: Float>(&self) -> Vector3<F> {
        self.0.cast()
    }
}

impl Orientation {
    fn value<F: Float>(&self) -> UnitQuaternion<F> {
        self.0.cast()
    }
}

impl Arbitrary<'_> for Orientation {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self> {
        let Angle(roll) = u.arbitrary()?;
        let Angle(pitch) = u.arbitrary()?;
        let Angle(yaw) = u.arbitrary()?;
        Ok(Self(UnitQuaternion::from_euler_angles(roll, pitch, yaw)))
    }
}

impl AffineSource {
    /// Creates the transform described by this source.
    pub fn build<F: Float>(&self) -> Affine3<F> {
        match self {
            Self::Identity => Affine3::identity(),
            Self::Translation(t) => Affine3::translation_by(&t.value()),
            Self::Scaling(x, y, z) => Affine3::scaling(x.value(), y.value(), z.value()),
            Self::Rotation(angle, axis) => {
                let axis = axis.value::<F>();
                Affine3::rotation(angle.value(), axis.x, axis.y, axis.z)
            }
            Self::RotationAxisAngle(angle, axis) => {
                Affine3::rotation_axis_angle(&AxisAngle::new(axis.value(), angle.value()))
            }
            Self::RotationX(angle) => Affine3::rotation_x(angle.value()),
            Self::RotationY(angle) => Affine3::rotation_y(angle.value()),
            Self::RotationZ(angle) => Affine3::rotation_z(angle.value()),
            Self::RotationXyz(x, y, z) => Affine3::rotation_xyz(x.value(), y.value(), z.value()),
            Self::RotationZyx(z, y, x) => Affine3::rotation_zyx(z.value(), y.value(), x.value()),
            Self::RotationYxz(y, x, z) => Affine3::rotation_yxz(y.value(), x.value(), z.value()),
            Self::RotationQuaternion(q) => Affine3::rotation_quaternion(&q.value()),
            Self::TranslationRotate(t, q) => {
                let t = t.value::<F>();
                Affine3::translation_rotate(t.x, t.y, t.z, &q.value())
            }
            Self::TranslationRotateInvert(t, q) => {
                let t = t.value::<F>();
                Affine3::translation_rotate_invert(t.x, t.y, t.z, &q.value())
            }
            Self::TranslationRotateScale(t, q, x, y, z) => {
                let t = t.value::<F>();
                Affine3::translation_rotate_scale(
                    t.x,
                    t.y,
                    t.z,
                    &q.value(),
                    x.value(),
                    y.value(),
                    z.value(),
                )
            }
            Self::RotationAround(q, origin) => {
                let o = origin.value::<F>();
                Affine3::rotation_around(&q.value(), o.x, o.y, o.z)
            }
            Self::Reflection(normal, point) => {
                let (n, p) = (normal.value::<F>(), point.value::<F>());
                Affine3::reflection_normal_point(n.x, n.y, n.z, p.x, p.y, p.z)
            }
            Self::ReflectionOrientation(q, point) => {
                let p = point.value::<F>();
                Affine3::reflection_orientation_point(&q.value(), p.x, p.y, p.z)
            }
            Self::OrthoProjection(left, right, bottom, top, near, far, zero_to_one) => {
                Affine3::ortho_projection(
                    left.value(),
                    right.value(),
                    bottom.value(),
                    top.value(),
                    near.value(),
                    far.value(),
                    *zero_to_one,
                )
            }
            Self::OrthoSymmetricProjectionLh(width, height, near, far, zero_to_one) => {
                Affine3::ortho_symmetric_projection_lh(
                    width.value(),
                    height.value(),
                    near.value(),
                    far.value(),
                    *zero_to_one,
                )
            }
            Self::Ortho2dProjection(left, right, bottom, top) => {
                Affine3::ortho2d_projection(left.value(), right.value(), bottom.value(), top.value())
            }
            Self::LookingAlong(direction, up) => {
                Affine3::looking_along(&direction.value(), &up.value())
            }
            Self::LookingAt(eye, center, up) => {
                Affine3::looking_at(&eye.value(), &center.value(), &up.value())
            }
            Self::LookingAtLh(eye, center, up) => {
                Affine3::looking_at_lh(&eye.value(), &center.value(), &up.value())
            }
            Self::RotationTowards(direction, up) => {
                Affine3::rotation_towards(&direction.value(), &up.value())
            }
            Self::TranslationRotateTowards(position, direction, up) => {
                Affine3::translation_rotate_towards(
                    &position.value(),
                    &direction.value(),
                    &up.value(),
                )
            }
            Self::BillboardCylindrical(object, target, up) => {
                Affine3::billboard_cylindrical(&object.value(), &target.value(), &up.value())
            }
            Self::BillboardSpherical(object, target, up) => {
                Affine3::billboard_spherical(&object.value(), &target.value(), &up.value())
            }
            Self::BillboardSphericalShortestArc(object, target) => {
                Affine3::billboard_spherical_shortest_arc(&object.value(), &target.value())
            }
            Self::Elements(elements) => Affine3::from_array(&elements.map(Coord::value)),
        }
    }
}

impl AffineOperation {
    /// Applies the operation to the given transform.
    pub fn apply<F: Float>(&self, transform: &Affine3<F>) -> Affine3<F> {
        match self {
            Self::Multiply(source) => transform.multiply(&source.build()),
            Self::MultiplyFromLeft(source) => source.build().multiply(transform),
            Self::Multiply3x3(r) => {
                let [r00, r01, r02, r10, r11, r12, r20, r21, r22] = r.map(Coord::value::<F>);
                transform.multiply3x3(r00, r01, r02, r10, r11, r12, r20, r21, r22)
            }
            Self::Translate(t) => transform.translate_by(&t.value()),
            Self::TranslateLocal(t) => {
                let t = t.value::<F>();
                transform.translate_local(t.x, t.y, t.z)
            }
            Self::Scale(x, y, z) => transform.scale(x.value(), y.value(), z.value()),
            Self::ScaleXy(x, y) => transform.scale_xy(x.value(), y.value()),
            Self::ScaleAround(x, y, z, origin) => {
                let o = origin.value::<F>();
                transform.scale_around(x.value(), y.value(), z.value(), o.x, o.y, o.z)
            }
            Self::ScaleLocal(x, y, z) => transform.scale_local(x.value(), y.value(), z.value()),
            Self::Rotate(angle, axis) => {
                let axis = axis.value::<F>();
                transform.rotate(angle.value(), axis.x, axis.y, axis.z)
            }
            Self::RotateAxisAngle(angle, axis) => {
                transform.rotate_axis_angle(&AxisAngle::new(axis.value(), angle.value()))
            }
            Self::RotateX(angle) => transform.rotate_x(angle.value()),
            Self::RotateY(angle) => transform.rotate_y(angle.value()),
            Self::RotateZ(angle) => transform.rotate_z(angle.value()),
            Self::RotateXyz(x, y, z) => transform.rotate_xyz(x.value(), y.value(), z.value()),
            Self::RotateZyx(z, y, x) => transform.rotate_zyx(z.value(), y.value(), x.value()),
            Self::RotateYxz(y, x, z) => transform.rotate_yxz(y.value(), x.value(), z.value()),
            Self::RotateQuaternion(q) => transform.rotate_quaternion(&q.value()),
            Self::RotateLocal(angle, axis) => {
                let axis = axis.value::<F>();
                transform.rotate_local(angle.value(), axis.x, axis.y, axis.z)
            }
            Self::RotateLocalX(angle) => transform.rotate_local_x(angle.value()),
            Self::RotateLocalY(angle) => transform.rotate_local_y(angle.value()),
            Self::RotateLocalZ(angle) => transform.rotate_local_z(angle.value()),
            Self::RotateLocalQuaternion(q) => transform.rotate_local_quaternion(&q.value()),
            Self::RotateAround(q, origin) => {
                let o = origin.value::<F>();
                transform.rotate_around(&q.value(), o.x, o.y, o.z)
            }
            Self::RotateTowards(direction, up) => {
                transform.rotate_towards(&direction.value(), &up.value())
            }
            Self::Reflect(normal, point) => {
                let (n, p) = (normal.value::<F>(), point.value::<F>());
                transform.reflect_normal_point(n.x, n.y, n.z, p.x, p.y, p.z)
            }
            Self::ReflectOrientation(q, point) => {
                let p = point.value::<F>();
                transform.reflect_orientation_point(&q.value(), p.x, p.y, p.z)
            }
            Self::LookAlong(direction, up) => transform.look_along(&direction.value(), &up.value()),
            Self::LookAt(eye, center, up) => {
                transform.look_at(&eye.value(), &center.value(), &up.value())
            }
            Self::LookAtLh(eye, center, up) => {
                transform.look_at_lh(&eye.value(), &center.value(), &up.value())
            }
            Self::Ortho(left, right, bottom, top, near, far, zero_to_one) => transform.ortho(
                left.value(),
                right.value(),
                bottom.value(),
                top.value(),
                near.value(),
                far.value(),
                *zero_to_one,
            ),
            Self::OrthoLh(left, right, bottom, top, near, far, zero_to_one) => transform
                .ortho_lh(
                    left.value(),
                    right.value(),
                    bottom.value(),
                    top.value(),
                    near.value(),
                    far.value(),
                    *zero_to_one,
                ),
            Self::OrthoSymmetric(width, height, near, far, zero_to_one) => transform
                .ortho_symmetric(
                    width.value(),
                    height.value(),
                    near.value(),
                    far.value(),
                    *zero_to_one,
                ),
            Self::Ortho2d(left, right, bottom, top) => {
                transform.ortho2d(left.value(), right.value(), bottom.value(), top.value())
            }
            Self::Shadow(light, is_point, normal, d) => {
                let n = normal.value::<F>();
                transform.shadow(&light_vector(light, *is_point), n.x, n.y, n.z, d.value())
            }
            Self::ShadowWithPlaneTransform(light, is_point, plane) => transform
                .shadow_with_plane_transform(&light_vector(light, *is_point), &plane.build()),
            Self::Pick(x, y, width, height, viewport) => transform.pick(
                x.value(),
                y.value(),
                width.value(),
                height.value(),
                &viewport.map(i32::from),
            ),
            Self::Arcball(radius, center, angle_x, angle_y) => {
                transform.arcball(radius.value(), &center.value(), angle_x.value(), angle_y.value())
            }
            Self::ObliqueZ(a, b) => transform.oblique_z(a.value(), b.value()),
            Self::NegateX => transform.negate_x(),
            Self::NegateY => transform.negate_y(),
            Self::NegateZ => transform.negate_z(),
            Self::Invert => transform.invert(),
            Self::Transpose3x3 => transform.transpose3x3(),
            Self::Normal => transform.normal(),
            Self::Cofactor3x3 => transform.cofactor3x3(),
            Self::Normalize3x3 => transform.normalize3x3(),
            Self::SetRotationXyz(x, y, z) => {
                let mut result = *transform;
                result.set_rotation_xyz(x.value(), y.value(), z.value());
                result
            }
            Self::SetRotationZyx(z, y, x) => {
                let mut result = *transform;
                result.set_rotation_zyx(z.value(), y.value(), x.value());
                result
            }
            Self::SetRotationYxz(y, x, z) => {
                let mut result = *transform;
                result.set_rotation_yxz(y.value(), x.value(), z.value());
                result
            }
            Self::SetTranslation(t) => {
                let t = t.value::<F>();
                let mut result = *transform;
                result.set_translation(t.x, t.y, t.z);
                result
            }
            Self::Set3x3(source) => {
                let mut result = *transform;
                result.set3x3(&source.build());
                result
            }
            Self::SetElement(column, row, value) => {
                let mut result = *transform;
                result
                    .set_element(usize::from(column % 4), usize::from(row % 3), value.value())
                    .expect("reduced index is in range");
                result
            }
            Self::ComponentAdd(source) => transform.component_add(&source.build()),
            Self::Fma(source, factor) => transform.fma(&source.build(), factor.value()),
            Self::Lerp(source, t) => transform.lerp(&source.build(), float!(F, t.0 / 100.0)),
            Self::DetermineProperties => {
                let mut result = *transform;
                result.determine_properties();
                result
            }
        }
    }
}

fn light_vector<F: Float>(position: &Position, is_point: bool) -> Vector4<F> {
    let p = position.value::<F>();
    let w = if is_point { F::ONE } else { F::ZERO };
    Vector4::new(p.x, p.y, p.z, w)
}

/// Applies the given operations in order to a double precision transform,
/// panicking if any result claims a property that does not hold or if an
/// operation gives a different result when the receiver's properties are
/// unknown.
///
/// The sequence stops at the first result with non-finite elements.
pub fn fuzz_test_property_soundness(input: AffineFuzzInput) {
    check_property_soundness::<f64>(&input, DOUBLE_PRECISION);
}

/// Like [`fuzz_test_property_soundness`], but for a single precision
/// transform.
pub fn fuzz_test_single_precision_property_soundness(input: AffineFuzzInput) {
    check_property_soundness::<f32>(&input, SINGLE_PRECISION);
}

fn check_property_soundness<F: Float>(input: &AffineFuzzInput, tolerances: Tolerances) {
    let mut transform = input.initial.build::<F>();
    log::debug!("Initial transform {:?}", input.initial);

    if !transform.is_finite() {
        return;
    }
    assert_sound(&transform, tolerances, "initial transform");

    for operation in input.operations.iter().take(tolerances.max_operations) {
        let result = operation.apply(&transform);
        log::trace!("{operation:?} gave properties {}", result.properties());

        if !result.is_finite() {
            log::debug!("Stopping at non-finite result of {operation:?}");
            return;
        }
        assert_sound(&result, tolerances, &format!("{operation:?}"));
        assert_matches_generic_path(&transform, operation, &result, tolerances);

        transform = result;
    }
}

fn assert_sound<F: Float>(transform: &Affine3<F>, tolerances: Tolerances, origin: &str) {
    let ground_truth = transform.ground_truth_properties(float!(F, tolerances.soundness));
    assert!(
        transform.properties().is_sound_for(ground_truth),
        "{origin} claimed properties {} but only {ground_truth} hold for {transform:?}",
        transform.properties(),
    );
}

fn assert_matches_generic_path<F: Float>(
    transform: &Affine3<F>,
    operation: &AffineOperation,
    result: &Affine3<F>,
    tolerances: Tolerances,
) {
    let mut unflagged = *transform;
    unflagged.assume(AffineProperties::empty());
    let generic = operation.apply(&unflagged);
    if !generic.is_finite() {
        return;
    }
    let equivalence = float!(F, tolerances.equivalence);
    let magnitude = F::ONE + max_abs_element(transform).max(max_abs_element(result));
    assert!(
        relative_eq!(
            *result,
            generic,
            epsilon = equivalence * magnitude,
            max_relative = equivalence
        ),
        "{operation:?} on transform with properties {} gave {result:?}, \
         but the generic path gave {generic:?}",
        transform.properties(),
    );
}

fn max_abs_element<F: Float>(transform: &Affine3<F>) -> F {
    transform
        .to_array()
        .into_iter()
        .fold(F::ZERO, |max, value| value.abs().max(max))
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn run(initial: AffineSource, operations: Vec<AffineOperation>) {
        init_logging();
        let input = AffineFuzzInput {
            initial,
            operations,
        };
        fuzz_test_single_precision_property_soundness(input.clone());
        fuzz_test_property_soundness(input);
    }

    #[test]
    fn rigid_sequence_stays_sound() {
        run(
            AffineSource::Translation(Position(Vector3::new(1.0, 2.0, 3.0))),
            vec![
                AffineOperation::RotateX(Angle(0.3)),
                AffineOperation::Translate(Position(Vector3::new(-4.0, 0.5, 2.0))),
                AffineOperation::RotateQuaternion(Orientation(UnitQuaternion::from_euler_angles(
                    0.1, 0.2, 0.3,
                ))),
                AffineOperation::Invert,
                AffineOperation::Reflect(Direction(Vector3::y()), Position(Vector3::zeros())),
                AffineOperation::Normal,
                AffineOperation::Cofactor3x3,
                AffineOperation::Scale(Factor(-1.0), Factor(1.0), Factor(-1.0)),
            ],
        );
    }

    #[test]
    fn identity_fast_paths_match_generic_paths() {
        let up = Direction(Vector3::y());
        let eye = Position(Vector3::new(1.0, 2.0, 3.0));
        let center = Position(Vector3::new(-2.0, 0.0, 1.0));
        for operation in [
            AffineOperation::LookAlong(Direction(Vector3::x()), up),
            AffineOperation::LookAt(eye, center, up),
            AffineOperation::LookAtLh(eye, center, up),
            AffineOperation::RotateAround(
                Orientation(UnitQuaternion::from_euler_angles(0.4, -0.3, 1.2)),
                eye,
            ),
            AffineOperation::Reflect(Direction(Vector3::x()), eye),
            AffineOperation::ScaleLocal(Factor(2.0), Factor(0.5), Factor(1.0)),
            AffineOperation::RotateYxz(Angle(0.5), Angle(1.0), Angle(-0.5)),
        ] {
            run(AffineSource::Identity, vec![operation]);
        }
    }

    #[test]
    fn translation_fast_paths_match_generic_paths() {
        let initial = AffineSource::Translation(Position(Vector3::new(5.0, -1.0, 0.5)));
        for operation in [
            AffineOperation::Multiply(AffineSource::RotationX(Angle(0.7))),
            AffineOperation::Translate(Position(Vector3::new(1.0, 1.0, 1.0))),
            AffineOperation::Scale(Factor(2.0), Factor(3.0), Factor(0.5)),
            AffineOperation::Rotate(Angle(1.0), Direction(Vector3::new(0.6, 0.0, 0.8))),
            AffineOperation::RotateZyx(Angle(0.5), Angle(1.0), Angle(-0.5)),
            AffineOperation::Invert,
        ] {
            run(initial.clone(), vec![operation]);
        }
    }

    #[test]
    fn unsound_properties_are_detected() {
        let mut transform = Affine3::<f64>::scaling(2.0, 1.0, 1.0);
        transform.assume(AffineProperties::ORTHONORMAL);
        let result =
            std::panic::catch_unwind(|| assert_sound(&transform, DOUBLE_PRECISION, "scaling"));
        assert!(result.is_err());
    }

    #[test]
    fn single_precision_rotations_keep_orthonormality_within_tolerance() {
        let operations = (0..24_u8)
            .map(|i| {
                let angle = Angle(0.37 * f64::from(i));
                match i % 3 {
                    0 => AffineOperation::RotateX(angle),
                    1 => AffineOperation::RotateLocalY(angle),
                    _ => AffineOperation::Rotate(angle, Direction(Vector3::new(0.6, 0.0, 0.8))),
                }
            })
            .chain([AffineOperation::Invert, AffineOperation::Normal])
            .collect();
        init_logging();
        let input = AffineFuzzInput {
            initial: AffineSource::Translation(Position(Vector3::new(10.0, -20.0, 5.0))),
            operations,
        };
        let mut transform = input.initial.build::<f32>();
        for operation in &input.operations {
            transform = operation.apply(&transform);
        }
        assert!(
            transform
                .properties()
                .contains(AffineProperties::ORTHONORMAL)
        );
        fuzz_test_single_precision_property_soundness(input);
    }

    #[test]
    fn precisions_agree_on_built_transforms() {
        let source = AffineSource::TranslationRotateScale(
            Position(Vector3::new(1.0, -2.0, 3.5)),
            Orientation(UnitQuaternion::from_euler_angles(0.3, -1.1, 2.0)),
            Factor(2.0),
            Factor(-1.0),
            Factor(0.5),
        );
        let single = source.build::<f32>();
        let double = source.build::<f64>();
        assert_eq!(single.properties(), double.properties());
        for (a, b) in single.to_array().into_iter().zip(double.to_array()) {
            assert!((f64::from(a) - b).abs() < 1e-5);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn random_operation_sequences_keep_properties_sound(
            bytes in prop::collection::vec(any::<u8>(), 0..2048)
        ) {
            let mut u = Unstructured::new(&bytes);
            if let Ok(input) = AffineFuzzInput::arbitrary(&mut u) {
                init_logging();
                fuzz_test_property_soundness(input);
            }
        }

        #[test]
        fn random_single_precision_operation_sequences_keep_properties_sound(
            bytes in prop::collection::vec(any::<u8>(), 0..2048)
        ) {
            let mut u = Unstructured::new(&bytes);
            if let Ok(input) = AffineFuzzInput::arbitrary(&mut u) {
                init_logging();
                fuzz_test_single_precision_property_soundness(input);
            }
        }
    }
}
