//! Magnitude color ramp and marker material helpers.
//!
//! Magnitudes are mapped onto a four band hue ramp
//! (blue → cyan → green → yellow → red). Each band covers a quarter of
//! `[0, max]`; inside a band one channel moves linearly between 0 and 255 while
//! the other two are held at 0 or 255.
//!
//! | band | range            | red      | green    | blue     |
//! |------|------------------|----------|----------|----------|
//! | 1    | `[0, ¼max]`      | 0        | 0 → 255  | 255      |
//! | 2    | `(¼max, ½max]`   | 0        | 255      | 255 → 0  |
//! | 3    | `(½max, ¾max]`   | 0 → 255  | 255      | 0        |
//! | 4    | `(¾max, ∞)`      | 255      | 255 → 0  | 0        |
//!
//! Values outside `[0, max]` fall into the first or last band and the moving
//! channel is clamped, so out-of-range magnitudes saturate to pure blue or pure
//! red instead of wrapping. The same function drives the marker tint, the
//! selection highlight and the on-screen legend.

use bevy::prelude::*;

const MAX_CHANNEL: f64 = 255.0;
const BAND_COUNT: f64 = 4.0;

/// Magnitude used as the top of the ramp when no events are loaded.
pub const DEFAULT_MAX_MAGNITUDE: f64 = 4.0;

/// An 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const RED: Self = Self::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_color(self) -> Color {
        Color::srgb_u8(self.r, self.g, self.b)
    }

    /// Hex form used in logs, e.g. `#00ff80`.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb8> for Color {
    fn from(rgb: Rgb8) -> Self {
        rgb.to_color()
    }
}

/// Maps `value` onto the magnitude ramp whose top is `max_value`.
///
/// A non-positive or non-finite `max_value` falls back to
/// [`DEFAULT_MAX_MAGNITUDE`].
#[must_use]
pub fn color_for(value: f64, max_value: f64) -> Rgb8 {
    let max_value = if max_value.is_finite() && max_value > 0.0 {
        max_value
    } else {
        DEFAULT_MAX_MAGNITUDE
    };
    let value = if value.is_finite() { value } else { 0.0 };

    let unit = max_value / BAND_COUNT;
    let ramp = |band_start: f64| channel((value - band_start) / unit);
    let fall = |band_start: f64| channel(1.0 - (value - band_start) / unit);

    if value > unit * 3.0 {
        Rgb8::new(255, fall(unit * 3.0), 0)
    } else if value > unit * 2.0 {
        Rgb8::new(ramp(unit * 2.0), 255, 0)
    } else if value > unit {
        Rgb8::new(0, 255, fall(unit))
    } else {
        Rgb8::new(0, ramp(0.0), 255)
    }
}

/// Rounds a `[0, 1]` fraction to a channel value, clamping out-of-range input.
#[inline]
fn channel(fraction: f64) -> u8 {
    (fraction * MAX_CHANNEL).round().clamp(0.0, MAX_CHANNEL) as u8
}

/// Samples the ramp at `steps` evenly spaced magnitudes from `min` to `max`,
/// lowest first. Used to paint the legend gradient.
pub fn gradient_samples(min: f64, max: f64, steps: usize) -> Vec<(f64, Rgb8)> {
    if steps == 0 {
        return Vec::new();
    }
    if steps == 1 {
        return vec![(min, color_for(min, max))];
    }

    (0..steps)
        .map(|step| {
            let value = min + (max - min) * step as f64 / (steps - 1) as f64;
            (value, color_for(value, max))
        })
        .collect()
}

/// Creates the material used for an event marker.
///
/// The marker is tinted with `rgb` and given a matching emissive term so it
/// stays readable on the night side of the moon.
pub fn create_marker_material(
    materials: &mut Assets<StandardMaterial>,
    rgb: Rgb8,
    emissive_strength: f32,
) -> Handle<StandardMaterial> {
    let color = rgb.to_color();
    let emissive = LinearRgba::from(color) * emissive_strength;

    materials.add(StandardMaterial {
        base_color: color,
        emissive,
        perceptual_roughness: 0.6,
        ..default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_pure_blue() {
        assert_eq!(color_for(0.0, 4.0), Rgb8::BLUE);
    }

    #[test]
    fn test_max_is_pure_red() {
        assert_eq!(color_for(4.0, 4.0), Rgb8::RED);
        assert_eq!(color_for(10.0, 10.0), Rgb8::RED);
    }

    #[test]
    fn test_midpoint_is_green_with_blue_at_extreme() {
        let mid = color_for(2.0, 4.0);
        assert_eq!(mid.g, 255);
        assert_eq!(mid.b, 0);
        assert_eq!(mid.r, 0);
    }

    #[test]
    fn test_band_values_scale_with_max() {
        // An eighth of the range is half way through the first band.
        let color = color_for(1.25, 10.0);
        assert_eq!(color, Rgb8::new(0, 128, 255));

        let color = color_for(6.25, 10.0);
        assert_eq!(color, Rgb8::new(128, 255, 0));
    }

    #[test]
    fn test_continuous_at_band_boundaries() {
        let max = 4.0;
        let epsilon = 1e-6;
        for boundary in [1.0, 2.0, 3.0] {
            let below = color_for(boundary - epsilon, max);
            let above = color_for(boundary + epsilon, max);
            let distance = (i16::from(below.r) - i16::from(above.r)).abs()
                + (i16::from(below.g) - i16::from(above.g)).abs()
                + (i16::from(below.b) - i16::from(above.b)).abs();
            assert!(distance <= 1, "jump of {distance} at {boundary}");
        }
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(color_for(100.0, 4.0), Rgb8::RED);
        assert_eq!(color_for(-3.0, 4.0), Rgb8::BLUE);
    }

    #[test]
    fn test_invalid_max_uses_default() {
        assert_eq!(color_for(2.0, 0.0), color_for(2.0, DEFAULT_MAX_MAGNITUDE));
        assert_eq!(color_for(2.0, f64::NAN), color_for(2.0, DEFAULT_MAX_MAGNITUDE));
    }

    #[test]
    fn test_gradient_samples_cover_range() {
        let samples = gradient_samples(0.0, 4.0, 5);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].1, Rgb8::BLUE);
        assert_eq!(samples[4].1, Rgb8::RED);
        assert!(gradient_samples(0.0, 4.0, 0).is_empty());
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb8::new(0, 255, 16).hex(), "#00ff10");
    }
}
