//! Geographic coordinate mapping for a sphere of a given radius.
//!
//! Latitude is measured from the equator and longitude from the prime
//! meridian, which lies along `+Z`. `+Y` is the polar axis, so a point at
//! latitude 0°, longitude 90° sits on `+X`.
//!
//! This convention matches the yaw/pitch convention of the orbit camera:
//! a camera with yaw `λ` and pitch `φ` looks at the surface point at
//! longitude `λ`, latitude `φ`.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// A point on the surface given as latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Cartesian position of this point on a sphere of `radius`.
    #[inline]
    pub fn to_cartesian(self, radius: f64) -> Vec3 {
        to_cartesian(self.latitude, self.longitude, radius)
    }

    /// Unit vector pointing from the centre of the sphere through this point.
    #[inline]
    pub fn direction(self) -> Vec3 {
        to_cartesian(self.latitude, self.longitude, 1.0)
    }
}

/// Converts latitude/longitude (degrees) to a position on a sphere of `radius`.
///
/// With `φ = 90° - lat` and `λ = lon`:
/// `x = r·sin(φ)·sin(λ)`, `y = r·cos(φ)`, `z = r·sin(φ)·cos(λ)`.
pub fn to_cartesian(latitude: f64, longitude: f64, radius: f64) -> Vec3 {
    let (x, y, z) = to_cartesian_f64(latitude, longitude, radius);
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Double precision variant of [`to_cartesian`].
pub fn to_cartesian_f64(latitude: f64, longitude: f64, radius: f64) -> (f64, f64, f64) {
    let polar = (90.0 - latitude).to_radians();
    let azimuth = longitude.to_radians();

    (
        radius * libm::sin(polar) * libm::sin(azimuth),
        radius * libm::cos(polar),
        radius * libm::sin(polar) * libm::cos(azimuth),
    )
}

/// Converts a position on a sphere of `radius` back to latitude/longitude.
///
/// Points not exactly on the sphere are treated as lying on it along the same
/// direction; `y / radius` is clamped so rounding never produces `NaN`.
pub fn to_geo(point: Vec3, radius: f64) -> GeoPoint {
    to_geo_f64(
        (f64::from(point.x), f64::from(point.y), f64::from(point.z)),
        radius,
    )
}

/// Double precision variant of [`to_geo`].
///
/// Longitude is `atan(x / z)` on the front hemisphere (`z > 0`); on the back
/// hemisphere 180° is added or subtracted depending on the sign of `x`, so the
/// result always lies in `(-180, 180]`. On the `z = 0` meridian the longitude
/// is ±90°; at the poles it is 0°.
pub fn to_geo_f64((x, y, z): (f64, f64, f64), radius: f64) -> GeoPoint {
    let sin_latitude = (y / radius).clamp(-1.0, 1.0);
    let latitude = libm::asin(sin_latitude).to_degrees();

    let longitude = if z > 0.0 {
        libm::atan(x / z).to_degrees()
    } else if z < 0.0 {
        let base = libm::atan(x / z).to_degrees();
        if x >= 0.0 { base + 180.0 } else { base - 180.0 }
    } else if x > 0.0 {
        90.0
    } else if x < 0.0 {
        -90.0
    } else {
        0.0
    };

    GeoPoint {
        latitude,
        longitude: normalize_longitude(longitude),
    }
}

/// Wraps a longitude into `(-180, 180]`.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}

/// Wraps an angle in radians into `(-π, π]`.
pub fn wrap_angle(radians: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (radians + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
