//! Camera plugin - Self-contained plugin pattern
//!
//! This plugin spawns the orbit camera around the moon and drives camera
//! docking. While a dock runs the orbit controls are disabled; they are turned
//! back on when the dock finishes or is cancelled. Every docking frame asks
//! for the pointer to be re-sampled so hover feedback follows the camera.

use crate::docking::{DockAnimator, DockFrame, DockUpdate};
use crate::plugins::viewer::ViewerSet;
use crate::prelude::*;
use bevy::core_pipeline::bloom::Bloom;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::TouchControls;
use bevy_panorbit_camera::TrackpadBehavior;

/// Plugin that handles camera setup and docking
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
        app.add_systems(
            Update,
            (start_dock, tick_dock).chain().in_set(ViewerSet::Camera),
        );
    }
}

/// Orbit camera set up from the camera configuration.
///
/// Pan is disabled so the orbit focus stays on the moon's centre.
pub fn orbit_camera(config: &ViewerConfig) -> PanOrbitCamera {
    let camera = &config.camera;
    PanOrbitCamera {
        focus: Vec3::ZERO,
        yaw: Some(camera.initial_longitude.to_radians()),
        pitch: Some(camera.initial_latitude.to_radians()),
        radius: Some(camera.distance),
        zoom_lower_limit: camera.min_distance,
        zoom_upper_limit: Some(camera.max_distance),
        orbit_smoothness: camera.orbit_smoothness,
        zoom_smoothness: camera.zoom_smoothness,
        pan_sensitivity: 0.0,
        pan_smoothness: 0.0,
        touch_enabled: true,
        touch_controls: TouchControls::OneFingerOrbit,
        trackpad_behavior: TrackpadBehavior::blender_default(),
        trackpad_pinch_to_zoom_enabled: true,
        ..default()
    }
}

/// Writes a docking frame into the orbit camera, bypassing its smoothing.
pub fn apply_dock_frame(camera: &mut PanOrbitCamera, frame: &DockFrame) {
    camera.yaw = Some(frame.yaw);
    camera.pitch = Some(frame.pitch);
    camera.radius = Some(frame.radius);
    camera.target_yaw = frame.yaw;
    camera.target_pitch = frame.pitch;
    camera.target_radius = frame.radius;
    camera.force_update = true;
}

/// Current orbit orientation, preferring the settled value over the target.
fn current_orientation(camera: &PanOrbitCamera) -> (f32, f32) {
    (
        camera.yaw.unwrap_or(camera.target_yaw),
        camera.pitch.unwrap_or(camera.target_pitch),
    )
}

fn spawn_camera(mut commands: Commands, config: Res<ViewerConfig>) {
    commands.spawn((
        Name::new("Main Camera"),
        Camera {
            hdr: true,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.field_of_view_degrees.to_radians(),
            ..default()
        }),
        Tonemapping::AcesFitted,
        Bloom::NATURAL,
        Msaa::Sample4,
        orbit_camera(&config),
    ));
}

fn start_dock(
    mut requests: EventReader<DockRequested>,
    mut dock: ResMut<DockAnimator>,
    mut cameras: Query<&mut PanOrbitCamera>,
    config: Res<ViewerConfig>,
) {
    let Ok(mut camera) = cameras.single_mut() else {
        requests.clear();
        return;
    };

    for request in requests.read() {
        let radius = camera.radius.unwrap_or(config.camera.distance);
        match dock.start(
            current_orientation(&camera),
            camera.focus,
            radius,
            request.point,
        ) {
            Ok(target) => {
                let (yaw, pitch) = target.orientation();
                info!(
                    "Docking to yaw {:.3}, pitch {:.3} at radius {:.2}",
                    yaw, pitch, target.hold_radius
                );
            }
            Err(e) => warn!("Dock request ignored: {e}"),
        }
        camera.enabled = dock.controls_enabled();
    }
}

fn tick_dock(
    time: Res<Time>,
    mut dock: ResMut<DockAnimator>,
    mut cameras: Query<&mut PanOrbitCamera>,
    mut resample: EventWriter<ResamplePointer>,
) {
    let Ok(mut camera) = cameras.single_mut() else {
        dock.cancel();
        return;
    };

    match dock.tick(time.delta_secs()) {
        DockUpdate::Moving(frame) => {
            apply_dock_frame(&mut camera, &frame);
            camera.enabled = false;
            resample.write(ResamplePointer);
        }
        DockUpdate::Finished(frame) => {
            apply_dock_frame(&mut camera, &frame);
            camera.enabled = true;
            resample.write(ResamplePointer);
            debug!("Dock finished, orbit controls enabled");
        }
        DockUpdate::Released => {
            camera.enabled = true;
            debug!("Dock released, orbit controls enabled");
        }
        DockUpdate::Idle => {}
    }
}
