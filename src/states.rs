use bevy::prelude::*;

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    /// Optional moon textures are still loading.
    #[default]
    Loading,
    Running,
}
