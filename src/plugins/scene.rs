//! Scene plugin - Self-contained plugin pattern
//!
//! This plugin builds the 3D scene once at startup: the moon, the invisible
//! surface helper, one marker per quake, the light rig with its sun, the
//! selection highlight and the star field. Every spawned entity is recorded in
//! [`SceneHandles`] and every pickable object in [`PickTargets`], so later
//! systems look objects up by role instead of by name.

use crate::components::marker::factory as marker_factory;
use crate::components::star::factory as star_factory;
use crate::components::*;
use crate::phase::{LightAnimator, SUN_REST_DIRECTION};
use crate::picking::{PickTarget, PickTargets};
use crate::plugins::loading::LoadingAssets;
use crate::plugins::viewer::ViewerSet;
use crate::prelude::*;
use crate::utils::color::{Rgb8, color_for};
use bevy::color::palettes::css;

/// Height of the selection highlight above the surface.
pub const HIGHLIGHT_LIFT: f32 = 1.0;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_scene);

        app.add_systems(
            Update,
            (
                handle_visibility_commands,
                sync_marker_visibility.run_if(resource_changed::<VisibilitySettings>),
                apply_relief_scale.run_if(resource_changed::<LightLevels>),
                update_selection_highlight.run_if(resource_changed::<Selection>),
            )
                .chain()
                .in_set(ViewerSet::Sync),
        );

        app.add_systems(Update, draw_axes.in_set(ViewerSet::UI));
    }
}

/// Position and colour of the selection highlight, or `None` when nothing is
/// selected.
pub fn highlight_for(
    selection: &Selection,
    catalog: &QuakeCatalog,
    range: &MagnitudeRange,
    config: &ViewerConfig,
) -> Option<(Vec3, Rgb8)> {
    let quake = catalog.get(selection.selected()?)?;
    let radius = config.scene.moon_radius + config.scene.marker_altitude + HIGHLIGHT_LIFT;
    Some((
        quake.location.to_cartesian(f64::from(radius)),
        color_for(quake.magnitude, range.max),
    ))
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    mut loading: ResMut<LoadingAssets>,
    mut handles: ResMut<SceneHandles>,
    mut targets: ResMut<PickTargets>,
    mut rng: ResMut<SharedRng>,
    catalog: Res<QuakeCatalog>,
    range: Res<MagnitudeRange>,
    levels: Res<LightLevels>,
    light: Res<LightAnimator>,
    config: Res<ViewerConfig>,
) {
    let scene = &config.scene;

    // Moon
    let color_map: Option<Handle<Image>> = scene.color_map.as_ref().map(|path| {
        let handle = asset_server.load(path.clone());
        loading.track(handle.clone());
        handle
    });
    let relief_map: Option<Handle<Image>> = scene.relief_map.as_ref().map(|path| {
        let handle = asset_server.load(path.clone());
        loading.track(handle.clone());
        handle
    });

    let mut moon_mesh = Sphere::new(scene.moon_radius)
        .mesh()
        .uv(scene.moon_sectors, scene.moon_stacks);
    if relief_map.is_some() {
        // Parallax mapping needs tangents.
        moon_mesh = match moon_mesh.clone().with_generated_tangents() {
            Ok(mesh) => mesh,
            Err(e) => {
                warn!("Could not generate moon tangents, relief disabled: {e}");
                moon_mesh
            }
        };
    }

    let moon_material = materials.add(StandardMaterial {
        base_color: if color_map.is_some() {
            Color::WHITE
        } else {
            Color::srgb(0.62, 0.61, 0.59)
        },
        base_color_texture: color_map,
        depth_map: relief_map,
        parallax_depth_scale: levels.relief,
        perceptual_roughness: 1.0,
        reflectance: 0.05,
        ..default()
    });

    let moon = commands
        .spawn((
            Name::new("Moon"),
            Moon,
            Mesh3d(meshes.add(moon_mesh)),
            MeshMaterial3d(moon_material.clone()),
            Transform::default(),
        ))
        .id();

    // Surface helper: picked analytically, never rendered.
    let surface_helper = commands
        .spawn((Name::new("Surface Helper"), SurfaceHelper, Transform::default()))
        .id();
    targets.surface = Some(PickTarget::Surface {
        center: Vec3::ZERO,
        radius: scene.moon_radius,
    });
    targets.surface_radius = scene.moon_radius;

    // Markers
    let marker_mesh = marker_factory::create_marker_mesh(&mut meshes, &config);
    targets.markers.clear();
    handles.markers.clear();
    for quake in catalog.iter() {
        let (bundle, target) = marker_factory::create_marker(
            quake,
            marker_mesh.clone(),
            &mut materials,
            range.max,
            &config,
        );
        let entity = commands.spawn(bundle).id();
        handles.markers.insert(quake.id.clone(), entity);
        targets.markers.push(target);
    }
    debug!("Spawned {} quake markers", handles.markers.len());

    // Light rig, rotated by the phase, carrying the sun
    let mut sun = None;
    let light_rig = commands
        .spawn((
            Name::new("Light Rig"),
            LightRig,
            Transform::from_rotation(light.rotation()),
            Visibility::default(),
        ))
        .with_children(|parent| {
            sun = Some(
                parent
                    .spawn((
                        Name::new("Sun"),
                        Sun,
                        DirectionalLight {
                            color: config.lighting.sun_color(),
                            illuminance: levels.sun,
                            shadows_enabled: false,
                            ..default()
                        },
                        Transform::from_translation(
                            SUN_REST_DIRECTION * config.lighting.sun_distance,
                        )
                        .looking_at(Vec3::ZERO, Vec3::Y),
                    ))
                    .id(),
            );
        })
        .id();

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: levels.ambient,
        ..default()
    });

    let highlight = commands
        .spawn((
            Name::new("Selection Highlight"),
            SelectionHighlight,
            PointLight {
                intensity: config.lighting.highlight_intensity,
                range: config.lighting.highlight_range,
                shadows_enabled: false,
                ..default()
            },
            Transform::default(),
            Visibility::Hidden,
        ))
        .id();

    // Star field
    let star_mesh = star_factory::create_star_mesh(&mut meshes);
    let star_materials = star_factory::create_star_materials(&mut materials);
    for position in star_factory::star_positions(&mut rng, &config) {
        let material = star_materials[rng.random_range(0..star_materials.len())].clone();
        let scale = rng.random_range(0.5..=1.5);
        commands.spawn(star_factory::create_star(
            position,
            scale,
            star_mesh.clone(),
            material,
        ));
    }

    handles.moon = Some(moon);
    handles.surface_helper = Some(surface_helper);
    handles.light_rig = Some(light_rig);
    handles.sun = sun;
    handles.highlight = Some(highlight);
    handles.moon_material = Some(moon_material);

    info!(
        "Scene ready: {} markers, {} stars",
        handles.markers.len(),
        scene.star_count
    );
}

fn handle_visibility_commands(
    mut commands: EventReader<ViewerCommand>,
    mut visibility: ResMut<VisibilitySettings>,
) {
    for command in commands.read() {
        match command {
            ViewerCommand::ToggleAxes => {
                visibility.axes = !visibility.axes;
                info!("Axes visible: {}", visibility.axes);
            }
            ViewerCommand::ToggleMarkers => {
                visibility.markers = !visibility.markers;
                info!("Markers visible: {}", visibility.markers);
            }
            _ => {}
        }
    }
}

fn sync_marker_visibility(
    visibility: Res<VisibilitySettings>,
    mut markers: Query<&mut Visibility, With<QuakeMarker>>,
) {
    let value = if visibility.markers {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut marker in &mut markers {
        marker.set_if_neq(value);
    }
}

fn apply_relief_scale(
    levels: Res<LightLevels>,
    handles: Res<SceneHandles>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(handle) = handles.moon_material.as_ref() else {
        return;
    };
    if let Some(material) = materials.get_mut(handle) {
        material.parallax_depth_scale = levels.relief;
    }
}

fn update_selection_highlight(
    selection: Res<Selection>,
    catalog: Res<QuakeCatalog>,
    range: Res<MagnitudeRange>,
    config: Res<ViewerConfig>,
    mut highlights: Query<
        (&mut Transform, &mut PointLight, &mut Visibility),
        With<SelectionHighlight>,
    >,
) {
    let Ok((mut transform, mut light, mut visibility)) = highlights.single_mut() else {
        return;
    };

    match highlight_for(&selection, &catalog, &range, &config) {
        Some((position, color)) => {
            transform.translation = position;
            light.color = color.to_color();
            *visibility = Visibility::Inherited;
            debug!("Highlight at {position} in {}", color.hex());
        }
        None => {
            *visibility = Visibility::Hidden;
        }
    }
}

fn draw_axes(mut gizmos: Gizmos, visibility: Res<VisibilitySettings>, config: Res<ViewerConfig>) {
    if !visibility.axes {
        return;
    }
    let length = config.scene.axes_length;
    gizmos.line(Vec3::ZERO, Vec3::X * length, css::RED);
    gizmos.line(Vec3::ZERO, Vec3::Y * length, css::LIME);
    gizmos.line(Vec3::ZERO, Vec3::Z * length, css::BLUE);
}
