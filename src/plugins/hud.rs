//! HUD plugin - Self-contained plugin pattern
//!
//! On-screen feedback that is not a control: the info panel for the selected
//! quake, the coordinate readout, the magnitude legend and the pointer
//! feedback. A fine pointer gets a ring on the surface under it; a coarse
//! pointer only gets a short-lived indicator where it tapped.

use crate::panels::{Legend, info_panel_position, info_text, readout_text};
use crate::plugins::viewer::ViewerSet;
use crate::prelude::*;
use crate::utils::lunar::phase_of;
use bevy::window::PrimaryWindow;

const HUD_FONT_SIZE_PX: f32 = 12.0;
const HUD_MARGIN_PX: f32 = 10.0;
const HUD_PADDING_PX: f32 = 8.0;
const HUD_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.05, 0.8);
const LEGEND_STOP_HEIGHT_PX: f32 = 6.0;
const LEGEND_WIDTH_PX: f32 = 14.0;
const TAP_INDICATOR_SIZE_PX: f32 = 36.0;
const CURSOR_RING_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.8);

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud);
        app.add_systems(
            Update,
            (
                update_info_panel,
                update_readout.run_if(resource_changed::<HoverState>),
                sync_legend_visibility.run_if(resource_changed::<VisibilitySettings>),
                spawn_tap_indicators,
                fade_tap_indicators,
                draw_cursor_ring,
            )
                .in_set(ViewerSet::UI),
        );
    }
}

#[derive(Component)]
pub struct InfoPanel;

#[derive(Component)]
pub struct InfoPanelText;

#[derive(Component)]
pub struct ReadoutText;

#[derive(Component)]
pub struct LegendPanel;

/// Tap feedback for coarse pointers, removed when its timer runs out.
#[derive(Component)]
pub struct TapIndicator {
    pub timer: Timer,
}

fn hud_font() -> TextFont {
    TextFont::from_font_size(HUD_FONT_SIZE_PX)
}

fn setup_hud(mut commands: Commands, range: Res<MagnitudeRange>, config: Res<ViewerConfig>) {
    // Info panel, hidden until something is selected
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                padding: UiRect::all(Val::Px(HUD_PADDING_PX)),
                display: Display::None,
                ..default()
            },
            BackgroundColor(HUD_BACKGROUND),
            BorderRadius::all(Val::Px(config.ui.button_border_radius)),
            InfoPanel,
        ))
        .with_children(|parent| {
            parent.spawn((Text::new(""), hud_font(), InfoPanelText));
        });

    // Coordinate readout along the bottom edge
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(HUD_MARGIN_PX),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                hud_font(),
                TextLayout::new_with_justify(JustifyText::Center),
                ReadoutText,
            ));
        });

    // Magnitude legend on the right
    let legend = Legend::new(range.min, range.max, config.ui.legend_steps);
    let labels = legend.labels();
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(HUD_MARGIN_PX),
                top: Val::Px(HUD_MARGIN_PX),
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(HUD_PADDING_PX),
                padding: UiRect::all(Val::Px(HUD_PADDING_PX)),
                ..default()
            },
            BackgroundColor(HUD_BACKGROUND),
            BorderRadius::all(Val::Px(config.ui.button_border_radius)),
            LegendPanel,
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    width: Val::Px(LEGEND_WIDTH_PX),
                    ..default()
                })
                .with_children(|gradient| {
                    for stop in &legend.stops {
                        gradient.spawn((
                            Node {
                                width: Val::Percent(100.0),
                                height: Val::Px(LEGEND_STOP_HEIGHT_PX),
                                ..default()
                            },
                            BackgroundColor(stop.to_color()),
                        ));
                    }
                });
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::SpaceBetween,
                    ..default()
                })
                .with_children(|column| {
                    for label in labels {
                        column.spawn((Text::new(label), hud_font()));
                    }
                });
        });
}

fn update_info_panel(
    mut changes: EventReader<SelectionChanged>,
    catalog: Res<QuakeCatalog>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut panels: Query<&mut Node, With<InfoPanel>>,
    mut texts: Query<&mut Text, With<InfoPanelText>>,
) {
    let Some(change) = changes.read().last() else {
        return;
    };
    let (Ok(mut panel), Ok(mut text)) = (panels.single_mut(), texts.single_mut()) else {
        return;
    };

    let Some(quake) = change.selected.as_ref().and_then(|id| catalog.get(id)) else {
        panel.display = Display::None;
        return;
    };

    text.0 = info_text(quake, phase_of(quake.datetime()));
    let click = change.click_position.unwrap_or(Vec2::ZERO);
    let position = match windows.single() {
        Ok(window) => info_panel_position(click, window.size()),
        Err(_) => click,
    };
    panel.left = Val::Px(position.x);
    panel.top = Val::Px(position.y);
    panel.display = Display::Flex;
}

fn update_readout(hover: Res<HoverState>, mut texts: Query<&mut Text, With<ReadoutText>>) {
    for mut text in &mut texts {
        text.0 = readout_text(&hover.readout);
    }
}

fn sync_legend_visibility(
    visibility: Res<VisibilitySettings>,
    mut legends: Query<&mut Node, With<LegendPanel>>,
) {
    for mut node in &mut legends {
        node.display = if visibility.markers {
            Display::Flex
        } else {
            Display::None
        };
    }
}

fn spawn_tap_indicators(
    mut commands: Commands,
    mut pointer_events: EventReader<PointerEvent>,
    config: Res<ViewerConfig>,
) {
    for event in pointer_events.read() {
        let PointerEvent::Down {
            position,
            kind: PointerKind::Coarse,
            ..
        } = *event
        else {
            continue;
        };
        let half = TAP_INDICATOR_SIZE_PX / 2.0;
        commands.spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(position.x - half),
                top: Val::Px(position.y - half),
                width: Val::Px(TAP_INDICATOR_SIZE_PX),
                height: Val::Px(TAP_INDICATOR_SIZE_PX),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor(Color::WHITE),
            BorderRadius::MAX,
            TapIndicator {
                timer: Timer::from_seconds(config.interaction.tap_indicator_secs, TimerMode::Once),
            },
        ));
    }
}

fn fade_tap_indicators(
    mut commands: Commands,
    time: Res<Time>,
    mut indicators: Query<(Entity, &mut TapIndicator, &mut BorderColor)>,
) {
    for (entity, mut indicator, mut border) in &mut indicators {
        indicator.timer.tick(time.delta());
        if indicator.timer.finished() {
            commands.entity(entity).despawn();
        } else {
            border.0 = Color::WHITE.with_alpha(indicator.timer.fraction_remaining());
        }
    }
}

fn draw_cursor_ring(
    mut gizmos: Gizmos,
    pointer: Res<PointerState>,
    hover: Res<HoverState>,
    config: Res<ViewerConfig>,
) {
    if pointer.kind != PointerKind::Fine {
        return;
    }
    let Some(point) = hover.surface_point else {
        return;
    };
    let Ok(normal) = Dir3::new(point) else {
        return;
    };
    let rotation = Quat::from_rotation_arc(Vec3::Z, *normal);
    gizmos.circle(
        Isometry3d::new(point + *normal * 0.01, rotation),
        config.scene.marker_size,
        CURSOR_RING_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::CoordinateReadout;
    use crate::test_utils::create_test_app;
    use crate::utils::geo::GeoPoint;
    use core::time::Duration;

    fn hud_app() -> App {
        let mut app = create_test_app();
        app.add_systems(Startup, setup_hud);
        app.add_systems(
            Update,
            (
                update_info_panel,
                update_readout.run_if(resource_changed::<HoverState>),
                sync_legend_visibility.run_if(resource_changed::<VisibilitySettings>),
                spawn_tap_indicators,
            ),
        );
        app.update();
        app
    }

    fn panel_display(app: &mut App) -> Display {
        let world = app.world_mut();
        let mut panels = world.query_filtered::<&Node, With<InfoPanel>>();
        panels.single(world).unwrap().display
    }

    fn panel_text(app: &mut App) -> String {
        let world = app.world_mut();
        let mut texts = world.query_filtered::<&Text, With<InfoPanelText>>();
        texts.single(world).unwrap().0.clone()
    }

    #[test]
    fn test_info_panel_shows_selected_quake() {
        let mut app = hud_app();
        assert_eq!(panel_display(&mut app), Display::None);

        app.world_mut().send_event(SelectionChanged {
            previous: None,
            selected: Some("a".into()),
            click_position: Some(Vec2::new(120.0, 80.0)),
        });
        app.update();

        assert_eq!(panel_display(&mut app), Display::Flex);
        let text = panel_text(&mut app);
        assert!(text.contains("Year: 1972"));
        assert!(text.contains("Magnitude: 2"));

        app.world_mut().send_event(SelectionChanged {
            previous: Some("a".into()),
            selected: None,
            click_position: Some(Vec2::ZERO),
        });
        app.update();
        assert_eq!(panel_display(&mut app), Display::None);
    }

    #[test]
    fn test_readout_follows_hover() {
        let mut app = hud_app();
        app.world_mut().resource_mut::<HoverState>().readout = CoordinateReadout {
            camera: Some(GeoPoint::new(-60.0, 0.0)),
            pointer: None,
        };
        app.update();

        let world = app.world_mut();
        let mut texts = world.query_filtered::<&Text, With<ReadoutText>>();
        assert_eq!(
            texts.single(world).unwrap().0,
            "Camera Latitude: -60.000000; Longitude: 0.000000"
        );
    }

    #[test]
    fn test_legend_hidden_with_markers() {
        let mut app = hud_app();
        app.world_mut().resource_mut::<VisibilitySettings>().markers = false;
        app.update();

        let world = app.world_mut();
        let mut legends = world.query_filtered::<&Node, With<LegendPanel>>();
        assert_eq!(legends.single(world).unwrap().display, Display::None);
    }

    #[test]
    fn test_only_coarse_presses_leave_tap_indicator() {
        let mut app = hud_app();
        app.world_mut().send_event(PointerEvent::Down {
            position: Vec2::new(50.0, 50.0),
            kind: PointerKind::Fine,
            at: Duration::ZERO,
        });
        app.world_mut().send_event(PointerEvent::Down {
            position: Vec2::new(60.0, 60.0),
            kind: PointerKind::Coarse,
            at: Duration::ZERO,
        });
        app.update();

        let world = app.world_mut();
        let mut indicators = world.query::<&TapIndicator>();
        assert_eq!(indicators.iter(world).count(), 1);
    }
}
