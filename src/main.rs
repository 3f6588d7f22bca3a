use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use clap::Parser;
use moonquakes::cli::{Args, handle_list_events, load_and_apply_config, load_dataset};
use moonquakes::{
    AttributionPlugin, CameraPlugin, ControlsPlugin, HudPlugin, InteractionPlugin, LightingPlugin,
    LoadingPlugin, ScenePlugin, ViewerPlugin,
};

fn main() {
    let args = Args::parse();

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let catalog = match load_dataset(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if args.list_events {
        handle_list_events(&catalog);
        return;
    }

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Moonquakes".to_string(),
                    resolution: WindowResolution::new(1280.0, 800.0),
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                level: log_level,
                ..default()
            }),
    );
    app.add_plugins(PanOrbitCameraPlugin);
    app.add_plugins(ViewerPlugin::with_config(config).with_catalog(catalog));
    app.add_plugins((
        LoadingPlugin,
        ScenePlugin,
        CameraPlugin,
        InteractionPlugin,
        LightingPlugin,
        ControlsPlugin,
        HudPlugin,
        AttributionPlugin,
    ));

    app.run();
}
