//! Easing curves for the docking and light transitions.
//!
//! Pure functions of a normalized time `t` in `[0, 1]`. The default curve is
//! a "back out" ease that overshoots its target slightly before settling,
//! which gives camera docking its bouncy feel.

use serde::{Deserialize, Serialize};

/// Overshoot constant of the classic back-out curve (about 10% overshoot).
pub const DEFAULT_OVERSHOOT: f32 = 1.701_58;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    CubicInOut,
    /// Overshoot past the end, then settle. Larger `overshoot` bounces further.
    BackOut { overshoot: f32 },
}

impl Default for Easing {
    fn default() -> Self {
        Self::BackOut {
            overshoot: DEFAULT_OVERSHOOT,
        }
    }
}

impl Easing {
    /// Applies the curve to `t`, which is clamped to `[0, 1]` first.
    ///
    /// Always returns exactly `0.0` at `t = 0` and `1.0` at `t = 1`; in between
    /// `BackOut` may exceed `1.0`.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BackOut { overshoot } => {
                let c3 = overshoot + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + overshoot * (t - 1.0).powi(2)
            }
        }
    }
}

/// Linearly interpolates between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolates between `a` and `b` along `easing`.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}
