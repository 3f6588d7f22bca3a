//! Helper axes toggle button component

use crate::plugins::controls::ButtonWithLabel;
use crate::prelude::*;

#[derive(Component, Default)]
pub struct AxesToggleButton;

impl ButtonWithLabel for AxesToggleButton {
    fn command() -> ViewerCommand {
        ViewerCommand::ToggleAxes
    }

    fn marker() -> Self {
        Self
    }

    fn base_text() -> &'static str {
        "Show Axes"
    }

    fn shortcut() -> &'static str {
        "A"
    }
}

pub fn sync_axes_button_text(
    settings: Res<VisibilitySettings>,
    mut initialized: Local<bool>,
    button_children_query: Query<&Children, With<AxesToggleButton>>,
    mut text_query: Query<&mut Text>,
) {
    if !*initialized || settings.is_changed() {
        *initialized = true;

        let text_str = if settings.axes {
            "Hide Axes (A)"
        } else {
            "Show Axes (A)"
        };

        for children in button_children_query.iter() {
            for child in children.iter() {
                if let Ok(mut text) = text_query.get_mut(child) {
                    *text = Text::new(text_str.to_string());
                    break;
                }
            }
        }
    }
}
