//! Camera docking: turn the orbit camera to face a point on the moon.
//!
//! Docking keeps the orbit radius and tweens the camera's yaw and pitch
//! towards the direction of the picked point. User orbit controls are locked
//! while a dock runs. The lock is released exactly once per dock, when the
//! tween finishes, when it is cancelled, or when starting it fails.
//!
//! Orientation follows the orbit camera convention: the camera sits at
//! `focus + radius * (cos(pitch) sin(yaw), sin(pitch), cos(pitch) cos(yaw))`,
//! so yaw is the longitude and pitch the latitude of the camera direction.

use crate::utils::easing::{Easing, ease};
use crate::utils::geo::wrap_angle;
use bevy::prelude::*;
use core::f32::consts::FRAC_PI_2;
use std::fmt;

/// Keeps the camera just off the poles, where yaw is undefined.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-3;

/// Default dock duration in seconds.
pub const DEFAULT_DOCK_DURATION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DockError {
    /// The target point coincides with the orbit focus.
    ZeroDirection,
    /// The orbit radius is not a positive finite number.
    InvalidRadius(f32),
}

impl fmt::Display for DockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockError::ZeroDirection => write!(f, "dock target has no direction from the focus"),
            DockError::InvalidRadius(radius) => write!(f, "invalid orbit radius {radius}"),
        }
    }
}

impl std::error::Error for DockError {}

/// Goal of a single dock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockTarget {
    pub direction: Dir3,
    pub hold_radius: f32,
    pub duration: f32,
}

impl DockTarget {
    /// Builds a target facing `point` as seen from `focus`.
    pub fn towards(
        point: Vec3,
        focus: Vec3,
        hold_radius: f32,
        duration: f32,
    ) -> Result<Self, DockError> {
        if !hold_radius.is_finite() || hold_radius <= 0.0 {
            return Err(DockError::InvalidRadius(hold_radius));
        }
        let direction = Dir3::new(point - focus).map_err(|_| DockError::ZeroDirection)?;
        Ok(Self {
            direction,
            hold_radius,
            duration: duration.max(0.0),
        })
    }

    /// Yaw and pitch that put the camera on `direction`.
    pub fn orientation(&self) -> (f32, f32) {
        yaw_pitch_of(self.direction)
    }
}

/// Yaw and pitch of a direction, in the orbit camera convention.
pub fn yaw_pitch_of(direction: Dir3) -> (f32, f32) {
    let d = direction.as_vec3();
    let pitch = d.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    let yaw = if d.x == 0.0 && d.z == 0.0 {
        0.0
    } else {
        d.x.atan2(d.z)
    };
    (yaw, pitch)
}

/// Camera position for an orbit orientation.
pub fn orbit_position(focus: Vec3, yaw: f32, pitch: f32, radius: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    focus + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * radius
}

/// One sample of a running dock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockFrame {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub finished: bool,
}

/// Eased interpolation from a starting orientation to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockTween {
    target: DockTarget,
    easing: Easing,
    from: (f32, f32),
    to: (f32, f32),
    elapsed: f32,
}

impl DockTween {
    /// Starts from `(yaw, pitch)`. Yaw turns the short way round.
    pub fn new(from: (f32, f32), target: DockTarget, easing: Easing) -> Self {
        let (target_yaw, target_pitch) = target.orientation();
        let yaw = from.0 + wrap_angle(target_yaw - from.0);
        Self {
            target,
            easing,
            from,
            to: (yaw, target_pitch),
            elapsed: 0.0,
        }
    }

    pub fn target(&self) -> &DockTarget {
        &self.target
    }

    /// Final yaw and pitch.
    pub fn end(&self) -> (f32, f32) {
        self.to
    }

    pub fn progress(&self) -> f32 {
        if self.target.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.target.duration).min(1.0)
        }
    }

    /// Advances by `delta` seconds.
    pub fn tick(&mut self, delta: f32) -> DockFrame {
        self.elapsed += delta.max(0.0);
        let t = self.progress();
        let finished = t >= 1.0;
        let (yaw, pitch) = if finished {
            self.to
        } else {
            (
                ease(self.from.0, self.to.0, t, self.easing),
                ease(self.from.1, self.to.1, t, self.easing).clamp(-PITCH_LIMIT, PITCH_LIMIT),
            )
        };
        DockFrame {
            yaw,
            pitch,
            radius: self.target.hold_radius,
            finished,
        }
    }
}

/// Lock on user orbit controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlsLock {
    held: bool,
}

impl ControlsLock {
    /// Takes the lock. Returns `false` when it was already held.
    pub fn acquire(&mut self) -> bool {
        !core::mem::replace(&mut self.held, true)
    }

    /// Releases the lock. Returns `true` only for the call that released it.
    pub fn release(&mut self) -> bool {
        core::mem::replace(&mut self.held, false)
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// What the camera should do after a call into the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DockUpdate {
    /// Apply this orientation; controls stay locked.
    Moving(DockFrame),
    /// Apply this orientation and re-enable controls.
    Finished(DockFrame),
    /// Nothing to apply, but controls must be re-enabled.
    Released,
    Idle,
}

/// Owns the running dock, if any, and the controls lock.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DockAnimator {
    pub duration: f32,
    pub easing: Easing,
    active: Option<DockTween>,
    lock: ControlsLock,
    completed: u32,
    cancelled: u32,
}

impl Default for DockAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_DOCK_DURATION, Easing::default())
    }
}

impl DockAnimator {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            active: None,
            lock: ControlsLock::default(),
            completed: 0,
            cancelled: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn controls_enabled(&self) -> bool {
        !self.lock.is_held()
    }

    pub fn active(&self) -> Option<&DockTween> {
        self.active.as_ref()
    }

    /// Docks that ran to completion.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Docks replaced or cancelled before finishing.
    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }

    /// Starts docking towards `point`, replacing any running dock.
    ///
    /// On error the previous dock is cancelled and the controls are unlocked.
    pub fn start(
        &mut self,
        from: (f32, f32),
        focus: Vec3,
        radius: f32,
        point: Vec3,
    ) -> Result<DockTarget, DockError> {
        if self.active.take().is_some() {
            self.cancelled += 1;
            debug!("Replacing running dock");
        }

        let target = match DockTarget::towards(point, focus, radius, self.duration) {
            Ok(target) => target,
            Err(e) => {
                self.lock.release();
                return Err(e);
            }
        };

        self.lock.acquire();
        self.active = Some(DockTween::new(from, target, self.easing));
        Ok(target)
    }

    /// Advances the running dock by `delta` seconds.
    pub fn tick(&mut self, delta: f32) -> DockUpdate {
        let Some(tween) = self.active.as_mut() else {
            return if self.lock.release() {
                DockUpdate::Released
            } else {
                DockUpdate::Idle
            };
        };

        let frame = tween.tick(delta);
        if frame.finished {
            self.active = None;
            self.completed += 1;
            self.lock.release();
            DockUpdate::Finished(frame)
        } else {
            DockUpdate::Moving(frame)
        }
    }

    /// Stops the running dock where it is and unlocks the controls.
    pub fn cancel(&mut self) -> DockUpdate {
        if self.active.take().is_some() {
            self.cancelled += 1;
        }
        if self.lock.release() {
            DockUpdate::Released
        } else {
            DockUpdate::Idle
        }
    }
}
