//! Benchmarks for the per-tick pose update

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use head_tracker::head::Head;
use head_tracker::landmarks::LandmarkSample;
use nalgebra::Point3;

fn face(shift: f64) -> LandmarkSample {
    LandmarkSample {
        top: Point3::new(0.5 + shift, 0.1, 0.02),
        bottom: Point3::new(0.5 + shift, 0.9, 0.03),
        left: Point3::new(0.2 + shift, 0.5, 0.01),
        right: Point3::new(0.8 + shift, 0.5, -0.01),
        center: Point3::new(0.5 + shift, 0.5, -0.05),
    }
}

fn benchmark_pose_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_estimation");

    group.bench_function("update_rotation", |b| {
        let mut head = Head::new(&face(0.0), 0.0);
        b.iter(|| {
            head.update_rotation();
            black_box(head.pose())
        });
    });

    group.bench_function("full_tick", |b| {
        let mut head = Head::new(&face(0.0), 0.0);
        let moved = face(0.05);
        let mut t = 0.0;
        b.iter(|| {
            t += 1.0 / 30.0;
            head.update_points(&moved, t);
            head.update_rotation();
            head.update_position();
            black_box(head.pose())
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_pose_update);
criterion_main!(benches);
