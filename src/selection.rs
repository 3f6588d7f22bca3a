//! Selection and hover rules.
//!
//! The [`SelectionController`] decides how pointer samples and pick results
//! turn into hover feedback and selection changes:
//!
//! - every pointer move updates the hovered marker and the coordinate readout,
//!   never the selection;
//! - a press/release pair shorter than the click threshold is a click, longer
//!   holds are camera drags and are ignored;
//! - a click on a marker selects its quake, a click anywhere else clears the
//!   selection;
//! - selecting a quake derives the lunar phase from its timestamp.

use crate::picking::PickResult;
use crate::quakes::{QuakeCatalog, QuakeId};
use crate::utils::geo::GeoPoint;
use crate::utils::lunar::{NEUTRAL_PHASE, phase_of};
use bevy::prelude::*;
use core::time::Duration;

/// Default maximum press duration that still counts as a click.
pub const DEFAULT_CLICK_THRESHOLD: Duration = Duration::from_millis(250);

/// The selected quake and the current lunar phase.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Selection {
    selected: Option<QuakeId>,
    phase: f64,
    revision: u64,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            selected: None,
            phase: NEUTRAL_PHASE,
            revision: 0,
        }
    }
}

impl Selection {
    pub fn selected(&self) -> Option<&QuakeId> {
        self.selected.as_ref()
    }

    /// Phase fraction in `[0, 1)`. Defined even when nothing is selected.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Number of times `select` has run. Used to detect feedback loops.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sets the phase directly, as done by the phase control.
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = phase.rem_euclid(1.0);
    }
}

/// What a call to [`SelectionController::select`] changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    pub previous: Option<QuakeId>,
    pub selected: Option<QuakeId>,
    /// New phase, present when a quake was selected.
    pub phase: Option<f64>,
}

/// Coordinates shown in the readout: where the camera is, and where the
/// pointer is when it is over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateReadout {
    pub camera: Option<GeoPoint>,
    pub pointer: Option<GeoPoint>,
}

/// Transient hover state, rebuilt on every pointer sample.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct HoverState {
    pub hovered: Option<QuakeId>,
    pub readout: CoordinateReadout,
    /// Surface point under the pointer, for the cursor ring.
    pub surface_point: Option<Vec3>,
}

/// Hover transition produced by one pointer sample.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverChange {
    pub previous: Option<QuakeId>,
    pub current: Option<QuakeId>,
}

impl HoverChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Press timing for click-versus-drag detection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PressTracker {
    pressed_at: Option<Duration>,
}

impl PressTracker {
    pub fn press(&mut self, at: Duration) {
        self.pressed_at = Some(at);
    }

    /// Ends the press and returns when it started. A release without a press
    /// yields `None`.
    pub fn release(&mut self) -> Option<Duration> {
        self.pressed_at.take()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SelectionController {
    pub click_threshold: Duration,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self {
            click_threshold: DEFAULT_CLICK_THRESHOLD,
        }
    }
}

impl SelectionController {
    pub fn new(click_threshold: Duration) -> Self {
        Self { click_threshold }
    }

    /// Whether a press at `pressed_at` released at `released_at` is a click.
    pub fn is_click(&self, pressed_at: Duration, released_at: Duration) -> bool {
        released_at.saturating_sub(pressed_at) < self.click_threshold
    }

    /// Applies a hover sample. Never touches the selection.
    pub fn on_hover(
        &self,
        pick: &PickResult,
        camera_geo: Option<GeoPoint>,
        hover: &mut HoverState,
    ) -> HoverChange {
        let previous = hover.hovered.take();

        hover.hovered = if pick.is_marker() {
            pick.target.clone()
        } else {
            None
        };
        hover.readout.camera = camera_geo;
        if pick.is_surface() {
            hover.readout.pointer = pick.geo;
            hover.surface_point = pick.hit_point;
        } else {
            hover.readout.pointer = None;
            hover.surface_point = None;
        }

        HoverChange {
            previous,
            current: hover.hovered.clone(),
        }
    }

    /// Resolves a press/release pair. Returns `None` when the pair was a drag.
    pub fn on_click(
        &self,
        pick: &PickResult,
        pressed_at: Duration,
        released_at: Duration,
        selection: &mut Selection,
        catalog: &QuakeCatalog,
    ) -> Option<SelectionChange> {
        if !self.is_click(pressed_at, released_at) {
            debug!(
                "Press held for {:?}, treating as drag",
                released_at.saturating_sub(pressed_at)
            );
            return None;
        }

        let target = if pick.is_marker() {
            pick.target.as_ref()
        } else {
            None
        };
        Some(self.select(target, selection, catalog))
    }

    /// Selects `id`, or clears the selection for `None`.
    ///
    /// Selecting a quake sets the phase from its timestamp. An id that is not
    /// in the catalog clears the selection instead of failing.
    pub fn select(
        &self,
        id: Option<&QuakeId>,
        selection: &mut Selection,
        catalog: &QuakeCatalog,
    ) -> SelectionChange {
        selection.revision += 1;
        let previous = selection.selected.take();

        let Some(id) = id else {
            return SelectionChange {
                previous,
                selected: None,
                phase: None,
            };
        };

        let Some(quake) = catalog.get(id) else {
            warn!("Ignoring selection of unknown quake {id}");
            return SelectionChange {
                previous,
                selected: None,
                phase: None,
            };
        };

        let phase = phase_of(quake.datetime());
        selection.selected = Some(quake.id.clone());
        selection.phase = phase;

        SelectionChange {
            previous,
            selected: Some(quake.id.clone()),
            phase: Some(phase),
        }
    }
}
