use criterion::{Criterion, black_box, criterion_group, criterion_main};
use impact_affine::{Affine3, AffineProperties};
use nalgebra::{Point3, Vector3};

fn general_transform() -> Affine3<f64> {
    Affine3::<f64>::translation(1.0, -2.0, 3.0)
        .rotate_xyz(0.3, -0.7, 1.1)
        .scale(1.5, 0.5, 2.0)
}

fn rigid_transform() -> Affine3<f64> {
    Affine3::<f64>::translation(1.0, -2.0, 3.0).rotate_xyz(0.3, -0.7, 1.1)
}

pub fn bench_multiply(c: &mut Criterion) {
    let general = general_transform();
    let rigid = rigid_transform();
    let translation = Affine3::<f64>::translation(4.0, 5.0, 6.0);

    c.bench_function("multiply_general", |b| {
        b.iter(|| black_box(&general).multiply(black_box(&general)));
    });
    c.bench_function("multiply_rigid", |b| {
        b.iter(|| black_box(&rigid).multiply(black_box(&rigid)));
    });
    c.bench_function("multiply_translation_receiver", |b| {
        b.iter(|| black_box(&translation).multiply(black_box(&general)));
    });
}

pub fn bench_invert(c: &mut Criterion) {
    let general = general_transform();
    let rigid = rigid_transform();
    let mut unflagged_rigid = rigid;
    unflagged_rigid.assume(AffineProperties::empty());

    c.bench_function("invert_general", |b| {
        b.iter(|| black_box(&general).invert());
    });
    c.bench_function("invert_orthonormal", |b| {
        b.iter(|| black_box(&rigid).invert());
    });
    c.bench_function("invert_orthonormal_unflagged", |b| {
        b.iter(|| black_box(&unflagged_rigid).invert());
    });
}

pub fn bench_rotate(c: &mut Criterion) {
    let general = general_transform();
    let translation = Affine3::<f64>::translation(4.0, 5.0, 6.0);
    let axis = Vector3::new(1.0, 2.0, -0.5).normalize();

    c.bench_function("rotate_arbitrary_axis", |b| {
        b.iter(|| black_box(&general).rotate(black_box(0.4), axis.x, axis.y, axis.z));
    });
    c.bench_function("rotate_translation_receiver", |b| {
        b.iter(|| black_box(&translation).rotate(black_box(0.4), axis.x, axis.y, axis.z));
    });
    c.bench_function("rotate_xyz", |b| {
        b.iter(|| black_box(&general).rotate_xyz(black_box(0.1), 0.2, 0.3));
    });
}

pub fn bench_transform_points(c: &mut Criterion) {
    let general = general_transform();
    let min = Point3::new(-1.0, -2.0, -3.0);
    let max = Point3::new(1.0, 2.0, 3.0);

    c.bench_function("transform_position", |b| {
        b.iter(|| black_box(&general).transform_position(black_box(&max)));
    });
    c.bench_function("transform_aabb", |b| {
        b.iter(|| black_box(&general).transform_aabb(black_box(&min), black_box(&max)));
    });
}

criterion_group!(
    benches,
    bench_multiply,
    bench_invert,
    bench_rotate,
    bench_transform_points
);
criterion_main!(benches);
