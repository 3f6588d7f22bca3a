//! Controls plugin - Self-contained plugin pattern
//!
//! This plugin handles all user input aimed at the viewer settings (keyboard
//! and UI buttons) and translates it into ViewerCommand events. It provides a
//! unified interface for controlling the viewer, regardless of input method.
//! Pointer input on the 3D scene is handled by the interaction plugin.

use crate::plugins::viewer::ViewerSet;
use crate::prelude::*;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::window::SystemCursorIcon;
use bevy::winit::cursor::CursorIcon;

mod builder;
mod buttons;
mod constants;

pub use builder::ButtonWithLabel;
use builder::ControlsCommandsExt;
pub use buttons::*;
use constants::*;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ViewerCommand>();
        app.add_systems(Startup, setup_controls_ui);

        app.add_systems(
            Update,
            (
                keyboard_input_handler,
                button_interaction_handler::<AxesToggleButton>,
                button_interaction_handler::<MarkersToggleButton>,
                #[cfg(not(target_arch = "wasm32"))]
                button_interaction_handler::<QuitButton>,
                stepper_interaction_handler,
                #[cfg(not(target_arch = "wasm32"))]
                quit_on_command,
            )
                .in_set(ViewerSet::Input),
        );

        app.add_systems(
            Update,
            (
                axes::sync_axes_button_text,
                markers::sync_markers_button_text,
                stepper::sync_stepper_labels,
            )
                .in_set(ViewerSet::UI),
        );
    }
}

/// Maps a pressed logical key to a viewer command.
pub fn command_for_key(key: &Key) -> Option<ViewerCommand> {
    match key {
        Key::Character(c) => match c.to_lowercase().as_str() {
            "a" => Some(ViewerCommand::ToggleAxes),
            "m" => Some(ViewerCommand::ToggleMarkers),
            "[" => Some(ViewerCommand::StepPhase(-1)),
            "]" => Some(ViewerCommand::StepPhase(1)),
            #[cfg(not(target_arch = "wasm32"))]
            "q" => Some(ViewerCommand::Quit),
            _ => None,
        },
        #[cfg(not(target_arch = "wasm32"))]
        Key::Escape => Some(ViewerCommand::Quit),
        _ => None,
    }
}

fn keyboard_input_handler(
    mut keyboard_events: EventReader<KeyboardInput>,
    mut commands: EventWriter<ViewerCommand>,
) {
    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }

        if let Some(command) = command_for_key(&event.logical_key) {
            commands.write(command);
        }
    }
}

fn set_cursor(commands: &mut Commands, window: Entity, icon: SystemCursorIcon) {
    commands.entity(window).insert(CursorIcon::System(icon));
}

#[allow(clippy::type_complexity)]
fn button_interaction_handler<T: ButtonWithLabel>(
    mut commands: Commands,
    window: Single<Entity, With<Window>>,
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<T>),
    >,
    mut command_writer: EventWriter<ViewerCommand>,
) {
    for (interaction, mut color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                set_cursor(&mut commands, *window, SystemCursorIcon::Pointer);
                *color = BackgroundColor(BUTTON_COLOR_PRESSED);
                command_writer.write(T::command());
            }
            Interaction::Hovered => {
                set_cursor(&mut commands, *window, SystemCursorIcon::Pointer);
                *color = BackgroundColor(BUTTON_COLOR_HOVERED);
            }
            Interaction::None => {
                set_cursor(&mut commands, *window, SystemCursorIcon::Default);
                *color = BackgroundColor(BUTTON_COLOR_NORMAL);
            }
        }
    }
}

#[allow(clippy::type_complexity)]
fn stepper_interaction_handler(
    mut commands: Commands,
    window: Single<Entity, With<Window>>,
    mut interaction_query: Query<
        (&Interaction, &StepperButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut command_writer: EventWriter<ViewerCommand>,
) {
    for (interaction, button, mut color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                set_cursor(&mut commands, *window, SystemCursorIcon::Pointer);
                *color = BackgroundColor(BUTTON_COLOR_PRESSED);
                command_writer.write(button.stepper.command(button.steps));
            }
            Interaction::Hovered => {
                set_cursor(&mut commands, *window, SystemCursorIcon::Pointer);
                *color = BackgroundColor(BUTTON_COLOR_HOVERED);
            }
            Interaction::None => {
                set_cursor(&mut commands, *window, SystemCursorIcon::Default);
                *color = BackgroundColor(BUTTON_COLOR_NORMAL);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn quit_on_command(mut commands: EventReader<ViewerCommand>, mut exit: EventWriter<AppExit>) {
    if commands.read().any(|command| *command == ViewerCommand::Quit) {
        exit.write_default();
    }
}

#[derive(Component)]
pub struct UIRoot;

fn setup_controls_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(BUTTON_MARGIN_PX),
                left: Val::Px(BUTTON_MARGIN_PX),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                row_gap: Val::Px(BUTTON_GAP_PX),
                ..default()
            },
            UIRoot,
        ))
        .with_children(|parent| {
            for stepper in Stepper::ALL {
                parent.spawn_stepper_row(stepper);
            }
            parent.spawn_control_button::<AxesToggleButton>();
            parent.spawn_control_button::<MarkersToggleButton>();
            #[cfg(not(target_arch = "wasm32"))]
            parent.spawn_control_button::<QuitButton>();
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app;

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            command_for_key(&Key::Character("A".into())),
            Some(ViewerCommand::ToggleAxes)
        );
        assert_eq!(
            command_for_key(&Key::Character("]".into())),
            Some(ViewerCommand::StepPhase(1))
        );
        assert_eq!(command_for_key(&Key::Character("x".into())), None);
        assert_eq!(command_for_key(&Key::Space), None);
    }

    #[test]
    fn test_stepper_labels_follow_phase_control() {
        let mut app = create_test_app();
        app.add_systems(Update, stepper::sync_stepper_labels);
        let label = app
            .world_mut()
            .spawn((Text::new(""), StepperLabel(Stepper::Phase)))
            .id();

        app.update();
        assert_eq!(app.world().get::<Text>(label).unwrap().0, "Phase 100");

        app.world_mut()
            .resource_mut::<crate::phase::PhaseControl>()
            .set_from_phase(0.5);
        app.update();
        assert_eq!(app.world().get::<Text>(label).unwrap().0, "Phase 50");
    }

    fn texts(app: &mut App) -> Vec<String> {
        let world = app.world_mut();
        let mut texts = world.query::<&Text>();
        texts.iter(world).map(|text| text.0.clone()).collect()
    }

    #[test]
    fn test_plugin_keeps_button_labels_in_sync() {
        let mut app = create_test_app();
        app.add_plugins(ControlsPlugin);
        app.update();

        let labels = texts(&mut app);
        assert!(labels.iter().any(|label| label == "Show Axes (A)"));
        assert!(labels.iter().any(|label| label == "Hide Markers (M)"));
        assert!(labels.iter().any(|label| label == "Phase 100"));

        {
            let mut visibility = app.world_mut().resource_mut::<VisibilitySettings>();
            visibility.axes = true;
            visibility.markers = false;
        }
        app.update();

        let labels = texts(&mut app);
        assert!(labels.iter().any(|label| label == "Hide Axes (A)"));
        assert!(labels.iter().any(|label| label == "Show Markers (M)"));
    }
}
