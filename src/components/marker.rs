use super::QuakeMarker;
use crate::config::ViewerConfig;
use crate::picking::PickTarget;
use crate::quakes::Quake;
use crate::utils::color::{color_for, create_marker_material};
use bevy::prelude::*;

/// Bundle containing all components needed for a quake marker.
///
/// Asset creation and placement are handled by the factory functions below so
/// the bundle itself only organizes components.
#[derive(Bundle)]
pub struct MarkerBundle {
    pub marker: QuakeMarker,
    pub name: Name,
    pub transform: Transform,
    pub mesh_material: MeshMaterial3d<StandardMaterial>,
    pub mesh: Mesh3d,
    pub visibility: Visibility,
}

impl MarkerBundle {
    pub fn new(
        quake: &Quake,
        transform: Transform,
        material: Handle<StandardMaterial>,
        mesh: Handle<Mesh>,
        visible: bool,
    ) -> Self {
        Self {
            marker: QuakeMarker {
                id: quake.id.clone(),
            },
            name: Name::new(format!("Quake {}", quake.id)),
            transform,
            mesh_material: MeshMaterial3d(material),
            mesh: Mesh3d(mesh),
            visibility: if visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            },
        }
    }
}

/// Factory functions for marker placement, assets and pick targets.
pub mod factory {
    use super::*;

    /// Marker placement: at the quake location, lifted off the surface, with
    /// its local +Z along the surface normal.
    pub fn marker_transform(quake: &Quake, config: &ViewerConfig) -> Transform {
        let radius = config.scene.moon_radius + config.scene.marker_altitude;
        let position = quake.location.to_cartesian(f64::from(radius));
        let normal = quake.location.direction();
        Transform::from_translation(position).with_rotation(Quat::from_rotation_arc(Vec3::Z, normal))
    }

    /// One shared cube mesh for all markers.
    pub fn create_marker_mesh(meshes: &mut Assets<Mesh>, config: &ViewerConfig) -> Handle<Mesh> {
        meshes.add(Cuboid::from_length(config.scene.marker_size))
    }

    /// Pick box matching a marker at `transform` at its resting scale.
    pub fn pick_target(quake: &Quake, transform: &Transform, config: &ViewerConfig) -> PickTarget {
        PickTarget::Marker {
            id: quake.id.clone(),
            position: transform.translation,
            rotation: transform.rotation,
            half_size: Vec3::splat(config.scene.marker_size / 2.0),
        }
    }

    /// Builds the bundle for `quake`, coloured by its magnitude against
    /// `max_magnitude`.
    pub fn create_marker(
        quake: &Quake,
        mesh: Handle<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        max_magnitude: f64,
        config: &ViewerConfig,
    ) -> (MarkerBundle, PickTarget) {
        let transform = marker_transform(quake, config);
        let color = color_for(quake.magnitude, max_magnitude);
        let material = create_marker_material(materials, color, 2.0);
        let target = pick_target(quake, &transform, config);
        (
            MarkerBundle::new(quake, transform, material, mesh, config.scene.show_markers),
            target,
        )
    }
}
