//! Moonquakes library
//!
//! This provides the core functionality of the moonquakes viewer as a library
//! to enable integration testing.

pub mod cli;
pub mod components;
pub mod config;
pub mod docking;
pub mod events;
pub mod panels;
pub mod phase;
pub mod picking;
pub mod plugins;
pub mod prelude;
pub mod quakes;
pub mod resources;
pub mod selection;
pub mod states;
pub mod utils;

// Test utilities are public for integration tests
pub mod test_utils;

// Re-export commonly used items
pub use config::ViewerConfig;
pub use events::*;
pub use plugins::{
    attribution::AttributionPlugin, camera::CameraPlugin, controls::ControlsPlugin,
    hud::HudPlugin, interaction::InteractionPlugin, lighting::LightingPlugin,
    loading::LoadingPlugin, scene::ScenePlugin, viewer::ViewerPlugin,
};
pub use prelude::*;
pub use states::AppState;
