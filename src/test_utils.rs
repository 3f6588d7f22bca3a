//! Test utilities for plugin testing

use bevy::prelude::*;

use crate::docking::DockAnimator;
use crate::phase::{LightAnimator, PhaseControl};
use crate::picking::PickTargets;
use crate::prelude::*;

/// Two quakes used throughout the tests: "a" (magnitude 2 at 10°N 20°E) and
/// "b" (magnitude 4 at 10°S 20°W).
pub const TWO_QUAKES_JSON: &str = r#"[
    {"_id":"a","year":"1972","day":"10","hour":"1","minute":"2","seconds":"3",
     "latitude":10,"longitude":20,"magnitude":2,
     "station":[{"value":"S12","label":"Apollo 12"}]},
    {"_id":"b","year":"1975","day":"200","hour":"23","minute":"59","seconds":"59",
     "latitude":-10,"longitude":-20,"magnitude":4}
]"#;

/// Catalog holding the two test quakes.
pub fn two_quake_catalog() -> QuakeCatalog {
    match QuakeCatalog::from_json_str(TWO_QUAKES_JSON) {
        Ok((catalog, _)) => catalog,
        Err(e) => panic!("test dataset is invalid: {e}"),
    }
}

/// Creates a minimal test app with core Bevy plugins needed for testing
pub fn create_test_app() -> App {
    let mut app = App::new();

    // Add minimal plugins needed for testing
    app.add_plugins((
        MinimalPlugins,
        bevy::asset::AssetPlugin::default(),
        bevy::input::InputPlugin,
        bevy::state::app::StatesPlugin,
        bevy::transform::TransformPlugin,
    ));

    // Initialize assets needed by various plugins
    app.init_asset::<bevy::text::Font>();
    app.init_asset::<bevy::render::mesh::Mesh>();
    app.init_asset::<bevy::pbr::StandardMaterial>();

    // Add gizmo-related resources
    app.init_resource::<bevy::gizmos::config::GizmoConfigStore>();

    // Viewer state, as the viewer plugin would insert it
    let config = ViewerConfig::default();
    let catalog = two_quake_catalog();
    app.insert_resource(MagnitudeRange::from_catalog(&catalog));
    app.insert_resource(catalog);
    app.insert_resource(VisibilitySettings::from_config(&config));
    app.insert_resource(LightLevels::from_config(&config));
    app.insert_resource(SharedRng::from_seed(0));
    app.insert_resource(config);
    app.init_resource::<Selection>();
    app.init_resource::<SelectionController>();
    app.init_resource::<HoverState>();
    app.init_resource::<PointerState>();
    app.init_resource::<DockAnimator>();
    app.init_resource::<PhaseControl>();
    app.init_resource::<LightAnimator>();
    app.init_resource::<PickTargets>();
    app.init_resource::<SceneHandles>();

    // Add events used by plugins
    app.add_event::<ViewerCommand>();
    app.add_event::<PointerEvent>();
    app.add_event::<ResamplePointer>();
    app.add_event::<SelectionChanged>();
    app.add_event::<PhaseChanged>();
    app.add_event::<PhaseControlChanged>();
    app.add_event::<DockRequested>();
    app.add_event::<bevy::window::CursorMoved>();
    app.add_event::<bevy::window::WindowResized>();

    // Add states
    app.init_state::<AppState>();

    app
}

/// Helper to send a viewer command and run one frame
pub fn send_command(app: &mut App, command: ViewerCommand) {
    app.world_mut().send_event(command);
    app.update();
}
