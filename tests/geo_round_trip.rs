//! Property-style checks of the geographic mapping over seeded random points.

use moonquakes::utils::geo::{normalize_longitude, to_cartesian_f64, to_geo_f64};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SAMPLES: usize = 1000;
const TOLERANCE: f64 = 1e-6;

fn longitude_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[test]
fn test_random_points_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..SAMPLES {
        let latitude = rng.random_range(-89.999..89.999);
        let longitude = rng.random_range(-180.0..=180.0);
        let radius = rng.random_range(0.5..100.0);

        let point = to_cartesian_f64(latitude, longitude, radius);
        let geo = to_geo_f64(point, radius);

        assert!(
            (geo.latitude - latitude).abs() < TOLERANCE,
            "latitude {latitude} came back as {}",
            geo.latitude
        );
        assert!(
            longitude_difference(geo.longitude, longitude) < TOLERANCE,
            "longitude {longitude} came back as {}",
            geo.longitude
        );
    }
}

#[test]
fn test_random_points_lie_on_the_sphere() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..SAMPLES {
        let latitude = rng.random_range(-90.0..=90.0);
        let longitude = rng.random_range(-180.0..=180.0);
        let radius = rng.random_range(0.5..100.0);

        let (x, y, z) = to_cartesian_f64(latitude, longitude, radius);
        let length = (x * x + y * y + z * z).sqrt();
        assert!((length - radius).abs() < TOLERANCE * radius);
    }
}

#[test]
fn test_decoded_longitude_is_normalized() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..SAMPLES {
        let longitude = rng.random_range(-720.0..720.0);
        let geo = to_geo_f64(to_cartesian_f64(0.0, longitude, 10.0), 10.0);
        assert!(geo.longitude > -180.0 - TOLERANCE && geo.longitude <= 180.0 + TOLERANCE);
        assert!(longitude_difference(geo.longitude, normalize_longitude(longitude)) < TOLERANCE);
    }
}
