//! Interaction plugin - Self-contained plugin pattern
//!
//! This plugin connects pointer input to the selection rules. It has two
//! layers:
//!
//! - an adapter that turns window, mouse and touch events into
//!   [`PointerEvent`]s, ignoring presses that land on UI buttons;
//! - the pointer handler, which picks under each sample, updates hover state,
//!   resolves clicks into selections and requests camera docks.
//!
//! Both layers only run once the scene is [`AppState::Running`].

use crate::components::QuakeMarker;
use crate::phase::PhaseSource;
use crate::picking::{PickResult, PickTargets, pointer_ray};
use crate::plugins::viewer::ViewerSet;
use crate::prelude::*;
use crate::selection::{HoverChange, SelectionChange};
use crate::utils::geo::{GeoPoint, to_geo};
use bevy::input::ButtonState;
use bevy::input::mouse::MouseButtonInput;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::window::{CursorMoved, PrimaryWindow, WindowResized};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Running), request_resample);
        app.add_systems(
            Update,
            (
                read_mouse_input,
                read_touch_input,
                resample_on_resize,
                resample_on_camera_motion,
            )
                .in_set(ViewerSet::Input)
                .run_if(in_state(AppState::Running)),
        );

        app.add_systems(
            Update,
            (
                process_pointer_events,
                apply_hover_scale.run_if(resource_changed::<HoverState>),
            )
                .chain()
                .in_set(ViewerSet::Interaction)
                .run_if(in_state(AppState::Running)),
        );
    }
}

/// Everything one pointer sample changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerOutcome {
    pub hover: HoverChange,
    /// Set when the sample completed a click.
    pub selection: Option<SelectionChange>,
    /// Point to dock the camera towards, for clicks on the moon or a marker.
    pub dock: Option<Vec3>,
}

/// Applies one pointer sample, already picked, to the viewer state.
///
/// Hover is refreshed for every sample. A release completes the pending
/// press; when the pair counts as a click the pick at the release position
/// decides the new selection.
#[allow(clippy::too_many_arguments)]
pub fn handle_pointer(
    event: &PointerEvent,
    pick: &PickResult,
    camera_geo: Option<GeoPoint>,
    controller: &SelectionController,
    pointer: &mut PointerState,
    hover: &mut HoverState,
    selection: &mut Selection,
    catalog: &QuakeCatalog,
) -> PointerOutcome {
    pointer.position = Some(event.position());
    pointer.kind = event.kind();

    let hover_change = controller.on_hover(pick, camera_geo, hover);
    let mut outcome = PointerOutcome {
        hover: hover_change,
        selection: None,
        dock: None,
    };

    match *event {
        PointerEvent::Move { .. } => {}
        PointerEvent::Down { at, .. } => pointer.press.press(at),
        PointerEvent::Up { at, .. } => {
            let Some(pressed_at) = pointer.press.release() else {
                return outcome;
            };
            outcome.selection = controller.on_click(pick, pressed_at, at, selection, catalog);
            if outcome.selection.is_some() {
                outcome.dock = pick.hit_point;
            }
        }
    }

    outcome
}

/// Geographic position of the camera over the moon.
pub fn camera_geo(camera_position: Vec3, focus: Vec3) -> Option<GeoPoint> {
    let offset = camera_position - focus;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return None;
    }
    Some(to_geo(offset, f64::from(distance)))
}

fn read_mouse_input(
    mut cursor_moved: EventReader<CursorMoved>,
    mut buttons: EventReader<MouseButtonInput>,
    window: Single<&Window, With<PrimaryWindow>>,
    interactions: Query<&Interaction>,
    time: Res<Time<Real>>,
    mut pointer_events: EventWriter<PointerEvent>,
) {
    for moved in cursor_moved.read() {
        pointer_events.write(PointerEvent::Move {
            position: moved.position,
            kind: PointerKind::Fine,
        });
    }

    let over_ui = interactions.iter().any(|i| *i != Interaction::None);
    for input in buttons.read() {
        if input.button != MouseButton::Left {
            continue;
        }
        let Some(position) = window.cursor_position() else {
            continue;
        };
        let at = time.elapsed();
        match input.state {
            ButtonState::Pressed if !over_ui => {
                pointer_events.write(PointerEvent::Down {
                    position,
                    kind: PointerKind::Fine,
                    at,
                });
            }
            ButtonState::Pressed => {}
            ButtonState::Released => {
                pointer_events.write(PointerEvent::Up {
                    position,
                    kind: PointerKind::Fine,
                    at,
                });
            }
        }
    }
}

fn read_touch_input(
    mut touches: EventReader<TouchInput>,
    interactions: Query<&Interaction>,
    time: Res<Time<Real>>,
    mut pointer_events: EventWriter<PointerEvent>,
) {
    let over_ui = interactions.iter().any(|i| *i != Interaction::None);
    for touch in touches.read() {
        let position = touch.position;
        let kind = PointerKind::Coarse;
        let at = time.elapsed();
        match touch.phase {
            TouchPhase::Started if !over_ui => {
                pointer_events.write(PointerEvent::Down { position, kind, at });
            }
            TouchPhase::Moved => {
                pointer_events.write(PointerEvent::Move { position, kind });
            }
            TouchPhase::Ended => {
                pointer_events.write(PointerEvent::Up { position, kind, at });
            }
            TouchPhase::Started | TouchPhase::Canceled => {}
        }
    }
}

fn request_resample(mut resample: EventWriter<ResamplePointer>) {
    resample.write(ResamplePointer);
}

/// Orbit smoothing keeps moving the camera after the pointer stops.
fn resample_on_camera_motion(
    moved: Query<(), (With<Camera>, Changed<GlobalTransform>)>,
    mut resample: EventWriter<ResamplePointer>,
) {
    if !moved.is_empty() {
        resample.write(ResamplePointer);
    }
}

fn resample_on_resize(
    mut resized: EventReader<WindowResized>,
    mut resample: EventWriter<ResamplePointer>,
) {
    if resized.read().count() > 0 {
        resample.write(ResamplePointer);
    }
}

#[allow(clippy::too_many_arguments)]
fn process_pointer_events(
    mut pointer_events: EventReader<PointerEvent>,
    mut resample: EventReader<ResamplePointer>,
    cameras: Query<(&Projection, &GlobalTransform), With<Camera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    targets: Res<PickTargets>,
    visibility: Res<VisibilitySettings>,
    controller: Res<SelectionController>,
    catalog: Res<QuakeCatalog>,
    mut pointer: ResMut<PointerState>,
    mut hover: ResMut<HoverState>,
    mut selection: ResMut<Selection>,
    mut selection_changed: EventWriter<SelectionChanged>,
    mut phase_changed: EventWriter<PhaseChanged>,
    mut dock_requests: EventWriter<DockRequested>,
) {
    let Ok((projection, camera_transform)) = cameras.single() else {
        pointer_events.clear();
        resample.clear();
        return;
    };
    let viewport = windows.single().map(Window::size).unwrap_or(Vec2::ZERO);
    let geo = camera_geo(camera_transform.translation(), Vec3::ZERO);
    let pick_at = |position: Vec2| {
        pointer_ray(projection, camera_transform, viewport, position)
            .map(|ray| targets.pick(ray, visibility.markers))
            .unwrap_or_default()
    };

    let mut sampled = false;
    for event in pointer_events.read() {
        let pick = pick_at(event.position());
        let outcome = handle_pointer(
            event,
            &pick,
            geo,
            &controller,
            &mut pointer,
            &mut hover,
            &mut selection,
            &catalog,
        );
        sampled = true;

        if outcome.hover.changed() {
            debug!("Hovering {:?}", outcome.hover.current);
        }

        let Some(change) = outcome.selection else {
            continue;
        };
        match &change.selected {
            Some(id) => info!("Selected quake {id}"),
            None => info!("Selection cleared"),
        }
        selection_changed.write(SelectionChanged {
            previous: change.previous,
            selected: change.selected,
            click_position: Some(event.position()),
        });
        if let Some(phase) = change.phase {
            phase_changed.write(PhaseChanged {
                phase,
                source: PhaseSource::Selection,
            });
        }
        if let Some(point) = outcome.dock {
            dock_requests.write(DockRequested { point });
        }
    }

    // Camera moved under a still pointer: refresh hover and readout only.
    if resample.read().count() > 0 && !sampled {
        match pointer.position {
            Some(position) => {
                controller.on_hover(&pick_at(position), geo, &mut hover);
            }
            None => hover.readout.camera = geo,
        }
    }
}

/// Enlarges the hovered marker and restores the one hovered before it. The
/// marker's pick box follows its scale.
fn apply_hover_scale(
    hover: Res<HoverState>,
    config: Res<ViewerConfig>,
    handles: Res<SceneHandles>,
    mut targets: ResMut<PickTargets>,
    mut scaled: Local<Option<QuakeId>>,
    mut markers: Query<&mut Transform, With<QuakeMarker>>,
) {
    if *scaled == hover.hovered {
        return;
    }
    let resting_half_size = config.scene.marker_size / 2.0;
    let mut scale_marker = |id: &QuakeId, scale: f32| {
        targets.resize_marker(id, Vec3::splat(resting_half_size * scale));
        let Some(mut transform) = handles
            .marker(id)
            .and_then(|entity| markers.get_mut(entity).ok())
        else {
            return;
        };
        transform.scale = Vec3::splat(scale);
    };

    if let Some(previous) = scaled.take() {
        scale_marker(&previous, 1.0);
    }
    if let Some(current) = &hover.hovered {
        scale_marker(current, config.interaction.hover_scale);
        *scaled = Some(current.clone());
    }
}
