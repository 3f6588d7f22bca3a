//! Builder pattern utilities for controls UI
//!
//! This module provides a CommandsExt trait and associated builder types
//! to simplify the creation and management of control buttons in the UI.

use super::buttons::{Stepper, StepperButton, StepperLabel};
use crate::plugins::controls::constants::*;
use crate::prelude::*;
use bevy::ecs::hierarchy::ChildSpawnerCommands;

pub trait ControlsCommandsExt {
    fn spawn_control_button<T: ButtonWithLabel>(&mut self) -> Entity;

    /// A `-` / value / `+` row for one stepper.
    fn spawn_stepper_row(&mut self, stepper: Stepper) -> Entity;
}

fn button_text(text: impl Into<String>) -> impl Bundle {
    (
        Text::new(text),
        TextColor(Color::WHITE),
        TextFont {
            font_size: BUTTON_FONT_SIZE_PX,
            ..default()
        },
    )
}

fn button_node(width: f32) -> Node {
    Node {
        width: Val::Px(width),
        height: Val::Auto,
        padding: UiRect::all(Val::Px(BUTTON_PADDING_PX)),
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        row_gap: Val::Px(1.0),
        ..default()
    }
}

fn spawn_stepper_button(row: &mut ChildSpawnerCommands, stepper: Stepper, steps: i32) {
    row.spawn((
        Button,
        button_node(STEPPER_BUTTON_WIDTH_PX),
        BorderRadius::all(Val::Px(BUTTON_BORDER_RADIUS_PX)),
        BackgroundColor(BUTTON_COLOR_NORMAL),
        StepperButton { stepper, steps },
    ))
    .with_children(|parent| {
        parent.spawn(button_text(if steps < 0 { "-" } else { "+" }));
    });
}

impl ControlsCommandsExt for ChildSpawnerCommands<'_> {
    fn spawn_control_button<T: ButtonWithLabel>(&mut self) -> Entity {
        self.spawn((
            Button,
            Node {
                align_items: AlignItems::FlexStart,
                ..button_node(BUTTON_WIDTH_PX)
            },
            BorderRadius::all(Val::Px(BUTTON_BORDER_RADIUS_PX)),
            BackgroundColor(BUTTON_COLOR_NORMAL),
            T::marker(),
        ))
        .with_children(|parent| {
            parent.spawn(button_text(T::label()));
        })
        .id()
    }

    fn spawn_stepper_row(&mut self, stepper: Stepper) -> Entity {
        self.spawn(Node {
            width: Val::Px(BUTTON_WIDTH_PX),
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceBetween,
            column_gap: Val::Px(BUTTON_GAP_PX),
            ..default()
        })
        .with_children(|row| {
            spawn_stepper_button(row, stepper, -1);
            row.spawn((button_text(stepper.name()), StepperLabel(stepper)));
            spawn_stepper_button(row, stepper, 1);
        })
        .id()
    }
}

pub trait ButtonWithLabel: Component + 'static {
    /// The command this button triggers
    fn command() -> ViewerCommand;

    /// The marker component instance
    fn marker() -> Self;

    /// The base text for the button (without shortcut)
    fn base_text() -> &'static str;

    /// The keyboard shortcut for this button
    fn shortcut() -> &'static str;

    /// The base text with shortcut appended
    fn label() -> String {
        format!("{} ({})", Self::base_text(), Self::shortcut())
    }
}
