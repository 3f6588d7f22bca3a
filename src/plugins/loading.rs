//! Loading plugin - Self-contained plugin pattern
//!
//! Shows a "Loading" overlay while the optional moon textures load, then
//! switches the app to [`AppState::Running`]. A texture that fails to load
//! does not block startup; the moon is drawn without it.

use crate::components::{LoadingScreen, LoadingText};
use crate::prelude::*;
use bevy::asset::LoadState;

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadingAssets>();
        app.add_systems(OnEnter(AppState::Loading), setup_loading_screen);
        app.add_systems(
            Update,
            check_assets_loaded.run_if(in_state(AppState::Loading)),
        );
        app.add_systems(OnExit(AppState::Loading), despawn_loading_screen);
    }
}

/// Assets the scene waits for before it becomes interactive.
#[derive(Resource, Debug, Clone, Default)]
pub struct LoadingAssets {
    handles: Vec<UntypedHandle>,
}

impl LoadingAssets {
    pub fn track<A: Asset>(&mut self, handle: Handle<A>) {
        self.handles.push(handle.untyped());
    }

    pub fn handles(&self) -> &[UntypedHandle] {
        &self.handles
    }
}

/// Whether an asset in `state` no longer holds up loading.
pub fn is_settled(state: &LoadState) -> bool {
    matches!(state, LoadState::Loaded | LoadState::Failed(_))
}

fn setup_loading_screen(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
            ZIndex(1000),
            LoadingScreen,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading"),
                TextFont::from_font_size(24.0),
                TextColor(Color::WHITE),
                LoadingText,
            ));
        });
}

fn check_assets_loaded(
    asset_server: Res<AssetServer>,
    loading: Res<LoadingAssets>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let mut settled = true;
    for handle in loading.handles() {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Failed(e)) => {
                warn!("Texture failed to load, continuing without it: {e}");
            }
            Some(state) if !is_settled(&state) => settled = false,
            _ => {}
        }
    }

    if settled {
        info!("Assets ready");
        next_state.set(AppState::Running);
    }
}

fn despawn_loading_screen(mut commands: Commands, screens: Query<Entity, With<LoadingScreen>>) {
    for entity in &screens {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app;

    #[test]
    fn test_loaded_and_failed_are_settled() {
        assert!(is_settled(&LoadState::Loaded));
        assert!(!is_settled(&LoadState::Loading));
        assert!(!is_settled(&LoadState::NotLoaded));
    }

    #[test]
    fn test_no_assets_means_running() {
        let mut app = create_test_app();
        app.add_plugins(LoadingPlugin);

        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Running
        );
        let world = app.world_mut();
        let mut screens = world.query_filtered::<Entity, With<LoadingScreen>>();
        assert_eq!(screens.iter(world).count(), 0);
    }
}
