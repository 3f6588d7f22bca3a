//! Phase, light and control stay in step without feeding back into each
//! other.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use core::f32::consts::TAU;
use core::time::Duration;
use moonquakes::LightingPlugin;
use moonquakes::phase::{LightAnimator, PhaseControl, PhaseSource, light_rig_angle};
use moonquakes::test_utils::{create_test_app, send_command};
use moonquakes::{PhaseChanged, PhaseControlChanged, Selection, ViewerCommand};

fn phase_app() -> App {
    let mut app = create_test_app();
    app.add_plugins(LightingPlugin);
    app
}

/// Runs `frames` updates and returns every phase change seen along the way.
fn run_collecting(app: &mut App, frames: usize) -> Vec<PhaseChanged> {
    let mut seen = Vec::new();
    for _ in 0..frames {
        app.update();
        let events = app.world().resource::<Events<PhaseChanged>>();
        seen.extend(events.iter_current_update_events().copied());
    }
    seen
}

#[test]
fn test_programmatic_control_update_never_echoes() {
    let mut app = phase_app();
    app.world_mut().send_event(PhaseChanged {
        phase: 0.6,
        source: PhaseSource::Selection,
    });

    let seen = run_collecting(&mut app, 4);

    assert!(seen.iter().all(|change| change.source == PhaseSource::Selection));
    let control = app.world().resource::<PhaseControl>();
    assert!((control.value() - 40.0).abs() < 1e-9);
    assert_eq!(control.pending_suppressions(), 0);
    assert_eq!(app.world().resource::<Selection>().revision(), 0);
}

#[test]
fn test_user_step_moves_phase_and_light_once() {
    let mut app = phase_app();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    send_command(&mut app, ViewerCommand::StepPhase(-25));
    let seen = run_collecting(&mut app, 10);

    let world = app.world();
    assert!((world.resource::<Selection>().phase() - 0.25).abs() < 1e-9);
    assert!(seen.iter().all(|change| change.source == PhaseSource::Control));
    assert_eq!(world.resource::<PhaseControl>().pending_suppressions(), 0);
    let light = world.resource::<LightAnimator>();
    assert!(!light.is_running());
    assert!((light.angle() - light_rig_angle(0.25).rem_euclid(TAU)).abs() < 1e-5);
}

#[test]
fn test_control_at_limit_sends_nothing() {
    let mut app = phase_app();
    send_command(&mut app, ViewerCommand::StepPhase(1));

    let events = app.world().resource::<Events<PhaseControlChanged>>();
    assert_eq!(events.len(), 0);
    assert_eq!(app.world().resource::<PhaseControl>().value(), 100.0);
}
