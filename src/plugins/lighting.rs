//! Lighting plugin - Self-contained plugin pattern
//!
//! This plugin keeps the phase, the light rig and the phase control in step,
//! and applies the light level steppers.
//!
//! The phase flows through three events:
//!
//! 1. `StepPhase` commands edit the [`PhaseControl`], which reports the new
//!    value as a [`PhaseControlChanged`].
//! 2. A control notification that survives the control's guard becomes the
//!    new phase and is announced as a [`PhaseChanged`] from the control.
//! 3. Every [`PhaseChanged`] retargets the light rig. A phase that came from a
//!    selection is also pushed into the control; the notification that push
//!    produces is swallowed in step 2, so it never reaches the phase again.

use crate::components::{LightRig, Sun};
use crate::phase::{LightAnimator, PhaseControl, PhaseSource};
use crate::plugins::viewer::ViewerSet;
use crate::prelude::*;

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                handle_phase_commands,
                handle_control_notifications,
                handle_phase_changes,
                animate_light_rig,
                handle_level_commands,
                apply_light_levels.run_if(resource_changed::<LightLevels>),
            )
                .chain()
                .in_set(ViewerSet::Sync),
        );
    }
}

/// Applies one stepper command to the light levels. Levels never go negative.
pub fn step_levels(levels: &mut LightLevels, command: ViewerCommand, config: &ViewerConfig) {
    let step = |value: f32, steps: i32, size: f32| (value + steps as f32 * size).max(0.0);
    match command {
        ViewerCommand::StepAmbient(steps) => {
            levels.ambient = step(levels.ambient, steps, config.lighting.ambient_step);
        }
        ViewerCommand::StepSun(steps) => {
            levels.sun = step(levels.sun, steps, config.lighting.sun_step);
        }
        ViewerCommand::StepRelief(steps) => {
            levels.relief = step(levels.relief, steps, config.scene.relief_step);
        }
        _ => {}
    }
}

fn handle_phase_commands(
    mut commands: EventReader<ViewerCommand>,
    mut control: ResMut<PhaseControl>,
    mut notifications: EventWriter<PhaseControlChanged>,
) {
    for command in commands.read() {
        if let ViewerCommand::StepPhase(steps) = *command {
            if let Some(notification) = control.step(steps) {
                notifications.write(PhaseControlChanged(notification));
            }
        }
    }
}

fn handle_control_notifications(
    mut notifications: EventReader<PhaseControlChanged>,
    mut control: ResMut<PhaseControl>,
    mut selection: ResMut<Selection>,
    mut phase_changed: EventWriter<PhaseChanged>,
) {
    for PhaseControlChanged(notification) in notifications.read() {
        match control.accept(*notification) {
            Some(phase) => {
                selection.set_phase(phase);
                debug!("Phase control set phase to {phase:.3}");
                phase_changed.write(PhaseChanged {
                    phase,
                    source: PhaseSource::Control,
                });
            }
            None => debug!("Ignoring programmatic phase control update"),
        }
    }
}

fn handle_phase_changes(
    mut phase_changed: EventReader<PhaseChanged>,
    mut control: ResMut<PhaseControl>,
    mut light: ResMut<LightAnimator>,
    mut notifications: EventWriter<PhaseControlChanged>,
) {
    for change in phase_changed.read() {
        info!("Phase {:.3} from {:?}", change.phase, change.source);
        light.retarget(change.phase);
        if change.source == PhaseSource::Selection {
            notifications.write(PhaseControlChanged(control.set_from_phase(change.phase)));
        }
    }
}

fn animate_light_rig(
    time: Res<Time>,
    mut light: ResMut<LightAnimator>,
    mut rigs: Query<&mut Transform, With<LightRig>>,
) {
    if !light.is_running() {
        return;
    }
    light.tick(time.delta_secs());
    for mut transform in &mut rigs {
        transform.rotation = light.rotation();
    }
}

fn handle_level_commands(
    mut commands: EventReader<ViewerCommand>,
    mut levels: ResMut<LightLevels>,
    config: Res<ViewerConfig>,
) {
    for command in commands.read() {
        if matches!(
            command,
            ViewerCommand::StepAmbient(_) | ViewerCommand::StepSun(_) | ViewerCommand::StepRelief(_)
        ) {
            step_levels(&mut levels, *command, &config);
        }
    }
}

fn apply_light_levels(
    levels: Res<LightLevels>,
    ambient: Option<ResMut<AmbientLight>>,
    mut suns: Query<&mut DirectionalLight, With<Sun>>,
) {
    if let Some(mut ambient) = ambient {
        ambient.brightness = levels.ambient;
    }
    for mut sun in &mut suns {
        sun.illuminance = levels.sun;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, send_command};

    fn lighting_app() -> App {
        let mut app = create_test_app();
        app.add_plugins(LightingPlugin);
        app
    }

    fn control_phases(app: &App) -> usize {
        let events = app.world().resource::<Events<PhaseChanged>>();
        events
            .iter_current_update_events()
            .filter(|change| change.source == PhaseSource::Control)
            .count()
    }

    #[test]
    fn test_selection_phase_updates_control_once() {
        let mut app = lighting_app();
        app.world_mut().send_event(PhaseChanged {
            phase: 0.3,
            source: PhaseSource::Selection,
        });

        let mut control_sourced = 0;
        for _ in 0..3 {
            app.update();
            control_sourced += control_phases(&app);
        }

        let control = app.world().resource::<PhaseControl>();
        assert!((control.value() - 70.0).abs() < 1e-9);
        assert_eq!(control.pending_suppressions(), 0);
        assert_eq!(control_sourced, 0);
        assert!(app.world().resource::<LightAnimator>().is_running());
    }

    #[test]
    fn test_step_phase_feeds_selection_phase() {
        let mut app = lighting_app();
        send_command(&mut app, ViewerCommand::StepPhase(-50));

        let selection = app.world().resource::<Selection>();
        assert!((selection.phase() - 0.5).abs() < 1e-9);
        assert_eq!(selection.revision(), 0);
        assert_eq!(
            app.world().resource::<PhaseControl>().pending_suppressions(),
            0
        );
    }

    #[test]
    fn test_levels_never_go_negative() {
        let config = ViewerConfig::default();
        let mut levels = LightLevels::from_config(&config);
        step_levels(&mut levels, ViewerCommand::StepAmbient(-1000), &config);
        step_levels(&mut levels, ViewerCommand::StepSun(2), &config);
        assert_eq!(levels.ambient, 0.0);
        assert_eq!(
            levels.sun,
            config.lighting.sun_illuminance + 2.0 * config.lighting.sun_step
        );
    }

    #[test]
    fn test_level_commands_reach_lights() {
        let mut app = lighting_app();
        app.insert_resource(AmbientLight::default());
        let sun = app
            .world_mut()
            .spawn((Sun, DirectionalLight::default()))
            .id();

        send_command(&mut app, ViewerCommand::StepSun(1));

        let expected = {
            let config = ViewerConfig::default();
            config.lighting.sun_illuminance + config.lighting.sun_step
        };
        assert_eq!(
            app.world().get::<DirectionalLight>(sun).unwrap().illuminance,
            expected
        );
        assert_eq!(
            app.world().resource::<AmbientLight>().brightness,
            ViewerConfig::default().lighting.ambient_brightness
        );
    }
}
