use criterion::{criterion_group, criterion_main, Criterion, black_box};

use voxdraw::core::{DrawConfig, IVec3, NoiseDefaults};
use voxdraw::field::{Calibration, NoiseField, Transform};
use voxdraw::math::BoundingBox;
use voxdraw::session::{AllowAll, Session};
use voxdraw::voxel::block::Block;
use voxdraw::voxel::brush::{Brush, BrushKind};
use voxdraw::voxel::edit::{DrawContext, DrawKind, DrawOperation};
use voxdraw::voxel::grid::VoxelGrid;

fn config() -> DrawConfig {
    DrawConfig { seed: Some(1), ..DrawConfig::default() }
}

fn run_to_end(kind: DrawKind, brush: &Brush, marks: &[IVec3], size: i32) -> u64 {
    let mut grid = VoxelGrid::new(IVec3::splat(size));
    let mut actor = Session::new("bench");
    let mut ctx = DrawContext::new(&mut grid, &AllowAll, &mut actor);
    let mut op = DrawOperation::new(kind, brush.instance(), &config());
    op.prepare(marks, &mut ctx).unwrap();
    while op.is_running() {
        op.run_batch(2048, &mut ctx);
    }
    op.finish(&mut ctx).stats.mutated
}

fn bench_cuboid_fill_64(c: &mut Criterion) {
    let brush = Brush::solid(Block::Stone);
    let marks = [IVec3::ZERO, IVec3::splat(63)];

    c.bench_function("cuboid_fill_64", |b| {
        b.iter(|| run_to_end(DrawKind::Cuboid, black_box(&brush), &marks, 64));
    });
}

fn bench_hollow_fill_64(c: &mut Criterion) {
    let brush = Brush::solid(Block::Glass);
    let marks = [IVec3::ZERO, IVec3::splat(63)];

    c.bench_function("hollow_fill_64", |b| {
        b.iter(|| run_to_end(DrawKind::CuboidHollow, black_box(&brush), &marks, 64));
    });
}

fn bench_random_fill_32(c: &mut Criterion) {
    let actor = Session::new("bench");
    let brush = BrushKind::Random.make_brush(&actor, &["stone/3", "dirt", "gravel/2"]).unwrap();
    let marks = [IVec3::ZERO, IVec3::splat(31)];

    c.bench_function("random_fill_32", |b| {
        b.iter(|| run_to_end(DrawKind::Cuboid, black_box(&brush), &marks, 32));
    });
}

fn bench_marbled_sphere_32(c: &mut Criterion) {
    let actor = Session::new("bench");
    let brush = BrushKind::Marbled.make_brush(&actor, &["white", "black"]).unwrap();
    let marks = [IVec3::splat(16), IVec3::new(16, 16, 31)];

    c.bench_function("marbled_sphere_32", |b| {
        b.iter(|| run_to_end(DrawKind::Sphere, black_box(&brush), &marks, 32));
    });
}

fn bench_calibration_32(c: &mut Criterion) {
    let field = NoiseField::new(9, NoiseDefaults::default().cloudy);
    let region = BoundingBox::from_corners(IVec3::ZERO, IVec3::splat(31));
    let samples = field.sample_region(&region);

    c.bench_function("calibration_32", |b| {
        b.iter(|| Calibration::calibrate(black_box(samples.clone()), &[1, 2, 3, 4], Transform::Fold));
    });
}

criterion_group!(
    benches,
    bench_cuboid_fill_64,
    bench_hollow_fill_64,
    bench_random_fill_32,
    bench_marbled_sphere_32,
    bench_calibration_32,
);
criterion_main!(benches);
