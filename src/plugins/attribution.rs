//! Attribution plugin - Displays program name and version
//!
//! This plugin shows the attribution text in the lower right corner of the
//! screen. Clicking the attribution opens the project repository.

use crate::prelude::*;

const ATTRIBUTION_COLOR_NORMAL: Color = Color::srgba(1.0, 1.0, 1.0, 0.3);
const ATTRIBUTION_COLOR_HOVERED: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);

/// Text shown in the attribution corner.
pub fn attribution_text() -> String {
    format!(
        "Moonquakes v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_DATE")
    )
}

#[derive(Component)]
pub struct AttributionText;

pub struct AttributionPlugin;

impl Plugin for AttributionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_attribution);
        app.add_systems(Update, handle_attribution_interaction);
    }
}

fn setup_attribution(mut commands: Commands) {
    commands.spawn((
        Button,
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(5.0),
            right: Val::Px(5.0),
            padding: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BackgroundColor(Color::NONE),
        BorderColor(Color::NONE),
        Text::new(attribution_text()),
        TextFont::from_font_size(10.0),
        TextColor(ATTRIBUTION_COLOR_NORMAL),
        AttributionText,
        Interaction::default(),
    ));
}

fn handle_attribution_interaction(
    mut interaction_query: Query<
        (&Interaction, &mut TextColor),
        (Changed<Interaction>, With<AttributionText>),
    >,
) {
    for (interaction, mut text_color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                // Open the repository URL from package metadata
                if let Some(repo_url) = option_env!("CARGO_PKG_REPOSITORY") {
                    if let Err(e) = webbrowser::open(repo_url) {
                        warn!("Failed to open repository URL: {}", e);
                    }
                } else {
                    warn!("Repository URL not found in package metadata");
                }
                text_color.0 = ATTRIBUTION_COLOR_HOVERED;
            }
            Interaction::Hovered => {
                text_color.0 = ATTRIBUTION_COLOR_HOVERED;
            }
            Interaction::None => {
                text_color.0 = ATTRIBUTION_COLOR_NORMAL;
            }
        }
    }
}
