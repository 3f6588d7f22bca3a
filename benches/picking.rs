use bevy::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use moonquakes::QuakeId;
use moonquakes::picking::{PickTarget, PickTargets};
use moonquakes::utils::geo::{to_cartesian, to_cartesian_f64, to_geo_f64};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

const MOON_RADIUS: f32 = 10.0;
const MARKER_HALF_SIZE: f32 = 0.15;

/// Markers spread uniformly over the sphere, as in a large dataset
fn generate_targets(count: usize, seed: u64) -> PickTargets {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let markers = (0..count)
        .map(|i| {
            let latitude = libm::asin(rng.random_range(-1.0..=1.0)).to_degrees();
            let longitude = rng.random_range(-180.0..180.0);
            let position = to_cartesian(latitude, longitude, f64::from(MOON_RADIUS) + 0.1);
            PickTarget::Marker {
                id: QuakeId::new(format!("q{i}")),
                position,
                rotation: Quat::from_rotation_arc(Vec3::Z, position.normalize()),
                half_size: Vec3::splat(MARKER_HALF_SIZE),
            }
        })
        .collect();

    PickTargets {
        surface: Some(PickTarget::Surface {
            center: Vec3::ZERO,
            radius: MOON_RADIUS,
        }),
        markers,
        surface_radius: MOON_RADIUS,
    }
}

/// Rays from a camera orbit towards random visible surface points
fn generate_rays(count: usize, seed: u64) -> Vec<Ray3d> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let origin = to_cartesian(0.0, 0.0, 40.0);
    (0..count)
        .filter_map(|_| {
            let latitude = rng.random_range(-60.0..60.0);
            let longitude = rng.random_range(-60.0..60.0);
            let target = to_cartesian(latitude, longitude, f64::from(MOON_RADIUS));
            Dir3::new(target - origin)
                .ok()
                .map(|direction| Ray3d::new(origin, direction))
        })
        .collect()
}

fn bench_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick");
    let rays = generate_rays(256, 1);

    for marker_count in [10, 100, 1000, 5000] {
        let targets = generate_targets(marker_count, 42);
        group.throughput(Throughput::Elements(rays.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markers", marker_count),
            &targets,
            |b, targets| {
                b.iter(|| {
                    for ray in &rays {
                        black_box(targets.pick(black_box(*ray), true));
                    }
                })
            },
        );
    }

    let targets = generate_targets(1000, 42);
    group.bench_function("surface_only", |b| {
        b.iter(|| {
            for ray in &rays {
                black_box(targets.pick(black_box(*ray), false));
            }
        })
    });

    group.finish();
}

fn bench_geo_round_trip(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let points: Vec<(f64, f64)> = (0..1000)
        .map(|_| {
            (
                rng.random_range(-90.0..=90.0),
                rng.random_range(-180.0..180.0),
            )
        })
        .collect();

    c.bench_function("geo_round_trip", |b| {
        b.iter(|| {
            for &(latitude, longitude) in &points {
                let point = to_cartesian_f64(black_box(latitude), black_box(longitude), 10.0);
                black_box(to_geo_f64(point, 10.0));
            }
        })
    });
}

criterion_group!(benches, bench_pick, bench_geo_round_trip);
criterion_main!(benches);
