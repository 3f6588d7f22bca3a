//! Centralized event definitions
//!
//! All events in the moonquakes viewer are defined in this module to maintain
//! clear boundaries between systems and improve discoverability. Events are the
//! primary mechanism for cross-system communication in the ECS architecture.
//!
//! Events are organized by category:
//! - Viewer command pattern
//! - Pointer input
//! - Selection, phase and docking notifications

use crate::phase::{ControlNotification, PhaseSource};
use crate::quakes::QuakeId;
use bevy::prelude::*;
use core::time::Duration;

// Unified viewer command pattern
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    ToggleAxes,
    ToggleMarkers,
    StepPhase(i32),
    StepAmbient(i32),
    StepSun(i32),
    StepRelief(i32),
    Quit,
}

/// Mouse-like pointers hover; touch pointers only tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Fine,
    Coarse,
}

/// Platform independent pointer input, in logical window pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move {
        position: Vec2,
        kind: PointerKind,
    },
    Down {
        position: Vec2,
        kind: PointerKind,
        at: Duration,
    },
    Up {
        position: Vec2,
        kind: PointerKind,
        at: Duration,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            PointerEvent::Move { position, .. }
            | PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. } => position,
        }
    }

    pub fn kind(&self) -> PointerKind {
        match *self {
            PointerEvent::Move { kind, .. }
            | PointerEvent::Down { kind, .. }
            | PointerEvent::Up { kind, .. } => kind,
        }
    }
}

/// Hover state must be recomputed at the last pointer position, e.g. because
/// the camera moved underneath it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResamplePointer;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SelectionChanged {
    pub previous: Option<QuakeId>,
    pub selected: Option<QuakeId>,
    /// Window position of the click that caused the change.
    pub click_position: Option<Vec2>,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PhaseChanged {
    pub phase: f64,
    pub source: PhaseSource,
}

/// The phase control reported a new value.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PhaseControlChanged(pub ControlNotification);

/// Turn the camera to face `point`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DockRequested {
    pub point: Vec3,
}
