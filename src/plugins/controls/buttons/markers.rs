//! Quake marker visibility toggle button component

use crate::plugins::controls::ButtonWithLabel;
use crate::prelude::*;

#[derive(Component, Default)]
pub struct MarkersToggleButton;

impl ButtonWithLabel for MarkersToggleButton {
    fn command() -> ViewerCommand {
        ViewerCommand::ToggleMarkers
    }

    fn marker() -> Self {
        Self
    }

    fn base_text() -> &'static str {
        "Hide Markers"
    }

    fn shortcut() -> &'static str {
        "M"
    }
}

pub fn sync_markers_button_text(
    settings: Res<VisibilitySettings>,
    mut initialized: Local<bool>,
    button_children_query: Query<&Children, With<MarkersToggleButton>>,
    mut text_query: Query<&mut Text>,
) {
    if !*initialized || settings.is_changed() {
        *initialized = true;

        let text_str = if settings.markers {
            "Hide Markers (M)"
        } else {
            "Show Markers (M)"
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
