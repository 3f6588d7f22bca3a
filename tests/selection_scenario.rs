//! End to end: a quick click on a marker selects its quake, moves the phase,
//! highlights the marker in its magnitude colour and docks the camera above
//! it within the dock duration. A slow press is an orbit drag and changes
//! nothing.

use bevy::prelude::*;
use core::time::Duration;
use moonquakes::components::marker::factory;
use moonquakes::docking::{DockAnimator, DockUpdate, orbit_position};
use moonquakes::phase::{PhaseControl, control_value_for};
use moonquakes::picking::{PickTarget, PickTargets};
use moonquakes::plugins::interaction::{PointerOutcome, camera_geo, handle_pointer};
use moonquakes::plugins::scene::highlight_for;
use moonquakes::test_utils::two_quake_catalog;
use moonquakes::utils::color::color_for;
use moonquakes::utils::geo::to_cartesian;
use moonquakes::utils::lunar::phase_of;
use moonquakes::{
    HoverState, MagnitudeRange, PointerEvent, PointerKind, PointerState, QuakeCatalog, QuakeId,
    Selection, SelectionController, ViewerConfig,
};

struct Viewer {
    config: ViewerConfig,
    catalog: QuakeCatalog,
    range: MagnitudeRange,
    targets: PickTargets,
    controller: SelectionController,
    pointer: PointerState,
    hover: HoverState,
    selection: Selection,
    control: PhaseControl,
    dock: DockAnimator,
    camera_position: Vec3,
}

impl Viewer {
    fn new() -> Self {
        let config = ViewerConfig::default();
        let catalog = two_quake_catalog();
        let range = MagnitudeRange::from_catalog(&catalog);

        let mut targets = PickTargets {
            surface: Some(PickTarget::Surface {
                center: Vec3::ZERO,
                radius: config.scene.moon_radius,
            }),
            markers: Vec::new(),
            surface_radius: config.scene.moon_radius,
        };
        for quake in catalog.iter() {
            let transform = factory::marker_transform(quake, &config);
            targets
                .markers
                .push(factory::pick_target(quake, &transform, &config));
        }

        Self {
            controller: SelectionController::new(Duration::from_millis(
                config.interaction.click_threshold_ms,
            )),
            dock: DockAnimator::new(
                config.interaction.dock_duration_secs,
                config.interaction.dock_easing,
            ),
            control: PhaseControl::new(config.ui.phase_control_max),
            camera_position: to_cartesian(0.0, 0.0, f64::from(config.camera.distance)),
            pointer: PointerState::default(),
            hover: HoverState::default(),
            selection: Selection::default(),
            config,
            catalog,
            range,
            targets,
        }
    }

    /// Feeds a pointer sample aimed from the camera at `point`.
    fn pointer_at(&mut self, event: PointerEvent, point: Vec3) -> PointerOutcome {
        let ray = Ray3d::new(
            self.camera_position,
            Dir3::new(point - self.camera_position).unwrap(),
        );
        let pick = self.targets.pick(ray, true);
        handle_pointer(
            &event,
            &pick,
            camera_geo(self.camera_position, Vec3::ZERO),
            &self.controller,
            &mut self.pointer,
            &mut self.hover,
            &mut self.selection,
            &self.catalog,
        )
    }

    fn press_and_release(&mut self, point: Vec3, held_ms: u64) -> PointerOutcome {
        let start = Duration::from_secs(5);
        self.pointer_at(
            PointerEvent::Down {
                position: Vec2::new(640.0, 400.0),
                kind: PointerKind::Fine,
                at: start,
            },
            point,
        );
        self.pointer_at(
            PointerEvent::Up {
                position: Vec2::new(641.0, 400.0),
                kind: PointerKind::Fine,
                at: start + Duration::from_millis(held_ms),
            },
            point,
        )
    }
}

#[test]
fn test_click_on_marker_selects_highlights_and_docks() {
    let mut viewer = Viewer::new();
    let marker_a = factory::marker_transform(
        viewer.catalog.get(&QuakeId::from("a")).unwrap(),
        &viewer.config,
    )
    .translation;

    let outcome = viewer.press_and_release(marker_a, 100);

    // Selection and phase
    let change = outcome.selection.expect("a quick click selects");
    assert_eq!(change.previous, None);
    assert_eq!(change.selected, Some(QuakeId::from("a")));
    let quake = viewer.catalog.get(&QuakeId::from("a")).unwrap();
    let expected_phase = phase_of(quake.datetime());
    assert!((viewer.selection.phase() - expected_phase).abs() < 1e-9);

    // The control shows the new phase without feeding it back
    let notification = viewer.control.set_from_phase(viewer.selection.phase());
    assert_eq!(viewer.control.accept(notification), None);
    assert!(
        (viewer.control.value() - control_value_for(expected_phase, 100.0)).abs() < 1e-9
    );
    assert!((viewer.selection.phase() - expected_phase).abs() < 1e-9);

    // Highlight
    let (position, colour) =
        highlight_for(&viewer.selection, &viewer.catalog, &viewer.range, &viewer.config)
            .expect("selection is highlighted");
    assert_eq!(colour, color_for(2.0, 4.0));
    assert!(position.normalize().dot(quake.location.direction()) > 0.9999);

    // Dock
    let dock_point = outcome.dock.expect("a selecting click docks");
    viewer
        .dock
        .start(
            (0.0, 0.0),
            Vec3::ZERO,
            viewer.config.camera.distance,
            dock_point,
        )
        .unwrap();
    assert!(!viewer.dock.controls_enabled());

    let step = 1.0 / 60.0;
    let mut elapsed = 0.0;
    let frame = loop {
        elapsed += step;
        match viewer.dock.tick(step) {
            DockUpdate::Finished(frame) => break frame,
            DockUpdate::Moving(_) => assert!(!viewer.dock.controls_enabled()),
            other => panic!("unexpected dock update {other:?}"),
        }
        assert!(elapsed < 1.0, "dock did not finish");
    };
    assert!(elapsed <= viewer.config.interaction.dock_duration_secs + step + 1e-4);
    assert!(viewer.dock.controls_enabled());

    let camera = orbit_position(Vec3::ZERO, frame.yaw, frame.pitch, frame.radius);
    let towards_quake = to_cartesian(10.0, 20.0, 1.0);
    assert!(camera.normalize().dot(towards_quake) > 0.9999);
    assert!((camera.length() - viewer.config.camera.distance).abs() < 1e-3);
}

#[test]
fn test_slow_press_is_an_orbit_drag() {
    let mut viewer = Viewer::new();
    let marker_b = factory::marker_transform(
        viewer.catalog.get(&QuakeId::from("b")).unwrap(),
        &viewer.config,
    )
    .translation;
    let phase_before = viewer.selection.phase();

    let outcome = viewer.press_and_release(marker_b, 400);

    assert_eq!(outcome.selection, None);
    assert_eq!(outcome.dock, None);
    assert_eq!(viewer.selection.selected(), None);
    assert_eq!(viewer.selection.phase(), phase_before);
    assert_eq!(
        highlight_for(&viewer.selection, &viewer.catalog, &viewer.range, &viewer.config),
        None
    );
}

#[test]
fn test_click_on_bare_surface_clears_and_docks_there() {
    let mut viewer = Viewer::new();
    let marker_a = factory::marker_transform(
        viewer.catalog.get(&QuakeId::from("a")).unwrap(),
        &viewer.config,
    )
    .translation;
    viewer.press_and_release(marker_a, 50);

    let bare = to_cartesian(-20.0, 40.0, 10.0);
    let outcome = viewer.press_and_release(bare, 50);

    let change = outcome.selection.expect("clicking the surface clears");
    assert_eq!(change.previous, Some(QuakeId::from("a")));
    assert_eq!(change.selected, None);
    let dock = outcome.dock.expect("surface clicks dock to the hit point");
    assert!(dock.normalize().dot(bare.normalize()) > 0.999);
    assert!(viewer.hover.readout.pointer.is_some());
}
