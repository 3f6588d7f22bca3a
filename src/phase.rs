//! Phase synchronization between the selection, the phase control and the
//! light rig.
//!
//! The phase fraction has two producers: selecting a quake, and the user
//! stepping the phase control. The control shows the phase inverted,
//! `value = (1 - phase) * max`, so that a full control means a new moon.
//!
//! Setting the control from code makes it notify its listeners just like a
//! user edit would. [`PhaseControl`] counts those programmatic updates and
//! swallows exactly one notification for each, so a selection never feeds
//! back into itself through the control.

use crate::utils::easing::{Easing, ease};
use crate::utils::geo::wrap_angle;
use bevy::prelude::*;
use core::f32::consts::TAU;

/// Upper end of the phase control.
pub const DEFAULT_CONTROL_MAX: f64 = 100.0;

/// Default light transition duration in seconds.
pub const DEFAULT_LIGHT_DURATION: f32 = 0.5;

/// Where a phase change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseSource {
    /// Derived from the timestamp of a selected quake.
    Selection,
    /// Entered by the user on the phase control.
    Control,
}

/// Control value shown for `phase`.
pub fn control_value_for(phase: f64, max: f64) -> f64 {
    (1.0 - phase.rem_euclid(1.0)) * max
}

/// Phase for a control value. Both ends of the control map to a new moon.
pub fn phase_for_control(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let phase = (1.0 - value.clamp(0.0, max) / max).rem_euclid(1.0);
    if phase >= 1.0 { 0.0 } else { phase }
}

/// Rotation of the light rig about the polar axis for `phase`.
///
/// Phase 0 leaves the rig at rest, with the sun behind the moon as seen from
/// the default view.
pub fn light_rig_angle(phase: f64) -> f32 {
    (phase.rem_euclid(1.0) as f32) * TAU
}

pub fn light_rig_rotation(phase: f64) -> Quat {
    Quat::from_rotation_y(light_rig_angle(phase))
}

/// Sun position relative to the rig at rest.
pub const SUN_REST_DIRECTION: Vec3 = Vec3::NEG_Z;

/// Direction from the moon towards the sun for `phase`.
pub fn sun_direction(phase: f64) -> Vec3 {
    light_rig_rotation(phase) * SUN_REST_DIRECTION
}

/// A notification the phase control sends to its listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlNotification {
    pub value: f64,
}

/// The numeric phase control and its re-entrancy guard.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhaseControl {
    value: f64,
    max: f64,
    step: f64,
    suppressed: u32,
}

impl Default for PhaseControl {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROL_MAX)
    }
}

impl PhaseControl {
    pub fn new(max: f64) -> Self {
        Self {
            value: max,
            max,
            step: 1.0,
            suppressed: 0,
        }
    }

    /// A control already showing `phase`, with nothing to suppress.
    pub fn showing(max: f64, phase: f64) -> Self {
        Self {
            value: control_value_for(phase, max),
            ..Self::new(max)
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Phase the control currently represents.
    pub fn phase(&self) -> f64 {
        phase_for_control(self.value, self.max)
    }

    /// Notifications still to be swallowed.
    pub fn pending_suppressions(&self) -> u32 {
        self.suppressed
    }

    /// Shows `phase` on the control from code. The returned notification must
    /// still be delivered; [`Self::accept`] will drop it.
    pub fn set_from_phase(&mut self, phase: f64) -> ControlNotification {
        self.value = control_value_for(phase, self.max);
        self.suppressed += 1;
        ControlNotification { value: self.value }
    }

    /// A user edit of `steps` control steps.
    pub fn step(&mut self, steps: i32) -> Option<ControlNotification> {
        let snapped = (self.value / self.step).round() * self.step;
        let value = (snapped + f64::from(steps) * self.step).clamp(0.0, self.max);
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(ControlNotification { value })
    }

    /// A user edit setting the control to `value`.
    pub fn set_by_user(&mut self, value: f64) -> ControlNotification {
        self.value = value.clamp(0.0, self.max);
        ControlNotification { value: self.value }
    }

    /// Handles a delivered notification. Returns the phase to apply, or
    /// `None` when the notification came from a programmatic update.
    pub fn accept(&mut self, notification: ControlNotification) -> Option<f64> {
        if self.suppressed > 0 {
            self.suppressed -= 1;
            return None;
        }
        Some(phase_for_control(notification.value, self.max))
    }
}

/// Eased rotation of the light rig towards the current phase.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LightAnimator {
    pub duration: f32,
    pub easing: Easing,
    angle: f32,
    from: f32,
    to: f32,
    elapsed: f32,
    running: bool,
}

impl Default for LightAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_LIGHT_DURATION, Easing::default())
    }
}

impl LightAnimator {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            angle: 0.0,
            from: 0.0,
            to: 0.0,
            elapsed: 0.0,
            running: false,
        }
    }

    /// Places the rig at `phase` immediately.
    pub fn snap_to(&mut self, phase: f64) {
        self.angle = light_rig_angle(phase);
        self.to = self.angle;
        self.running = false;
    }

    /// Starts turning towards `phase` from wherever the rig is now.
    pub fn retarget(&mut self, phase: f64) {
        let target = light_rig_angle(phase);
        self.from = self.angle;
        self.to = self.angle + wrap_angle(target - self.angle);
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle)
    }

    /// Advances by `delta` seconds and returns the rig angle.
    pub fn tick(&mut self, delta: f32) -> f32 {
        if !self.running {
            return self.angle;
        }
        self.elapsed += delta.max(0.0);
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        if t >= 1.0 {
            self.angle = self.to.rem_euclid(TAU);
            self.running = false;
        } else {
            self.angle = ease(self.from, self.to, t, self.easing);
        }
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_is_inverted_phase() {
        assert_eq!(control_value_for(0.0, 100.0), 100.0);
        assert_eq!(control_value_for(0.5, 100.0), 50.0);
        assert!((control_value_for(0.75, 100.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_control_ends_are_new_moon() {
        assert_eq!(phase_for_control(100.0, 100.0), 0.0);
        assert_eq!(phase_for_control(0.0, 100.0), 0.0);
        assert!((phase_for_control(25.0, 100.0) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_programmatic_update_is_swallowed_once() {
        let mut control = PhaseControl::default();
        let notification = control.set_from_phase(0.3);
        assert!((control.value() - 70.0).abs() < 1e-9);

        assert_eq!(control.accept(notification), None);
        assert_eq!(control.pending_suppressions(), 0);

        let user = control.step(-10).unwrap();
        let phase = control.accept(user).unwrap();
        assert!((phase - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_each_programmatic_update_is_counted() {
        let mut control = PhaseControl::default();
        let first = control.set_from_phase(0.1);
        let second = control.set_from_phase(0.2);
        assert_eq!(control.pending_suppressions(), 2);
        assert_eq!(control.accept(first), None);
        assert_eq!(control.accept(second), None);
        let user = control.set_by_user(50.0);
        assert!(control.accept(user).is_some());
    }

    #[test]
    fn test_step_clamps_and_reports_no_change_at_limit() {
        let mut control = PhaseControl::default();
        assert_eq!(control.step(1), None);
        assert_eq!(control.step(-1).unwrap().value, 99.0);
        control.set_by_user(0.0);
        assert_eq!(control.step(-5), None);
    }

    #[test]
    fn test_full_moon_faces_default_view() {
        let sun = sun_direction(0.5);
        assert!((sun - Vec3::Z).length() < 1e-5);
        let new_moon = sun_direction(0.0);
        assert!((new_moon - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_light_turns_short_way_and_settles() {
        let mut light = LightAnimator::new(0.5, Easing::Linear);
        light.snap_to(0.9);
        light.retarget(0.1);
        let halfway = light.tick(0.25);
        assert!((halfway - TAU).abs() < 1e-4);
        let end = light.tick(0.25);
        assert!(!light.is_running());
        assert!((end - light_rig_angle(0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_light_is_animated_not_snapped() {
        let mut light = LightAnimator::default();
        light.retarget(0.5);
        let first = light.tick(1.0 / 60.0);
        assert!(first > 0.0 && first < light_rig_angle(0.5));
        assert!(light.is_running());
    }
}
