//! Pointer picking against the moon surface and the event markers.
//!
//! A ray is cast from the camera through the pointer and intersected with
//! every pickable target. Only the nearest hit is reported; when two targets
//! are hit at the same distance the one listed first wins.
//!
//! The surface target is an invisible helper sphere of the moon radius. A
//! surface hit carries the geographic coordinate under the pointer; a marker
//! hit carries the id of its quake and the marker position.

use crate::quakes::QuakeId;
use crate::utils::geo::{GeoPoint, to_geo};
use bevy::math::bounding::{Aabb3d, BoundingSphere, RayCast3d};
use bevy::prelude::*;
use bevy::render::camera::CameraProjection;

/// Something a pointer ray can hit.
#[derive(Debug, Clone, PartialEq)]
pub enum PickTarget {
    /// The surface helper sphere.
    Surface { center: Vec3, radius: f32 },
    /// A box marker for one quake, oriented by `rotation`.
    Marker {
        id: QuakeId,
        position: Vec3,
        rotation: Quat,
        half_size: Vec3,
    },
}

impl PickTarget {
    /// Distance along `ray` to the first intersection, if any.
    pub fn intersect(&self, ray: Ray3d) -> Option<f32> {
        match self {
            PickTarget::Surface { center, radius } => RayCast3d::from_ray(ray, f32::MAX)
                .sphere_intersection_at(&BoundingSphere::new(*center, *radius)),
            PickTarget::Marker {
                position,
                rotation,
                half_size,
                ..
            } => {
                // Intersect in the marker's local frame, where the box is axis aligned.
                let inverse = rotation.inverse();
                let local_direction = Dir3::new(inverse * ray.direction.as_vec3()).ok()?;
                let local_ray = Ray3d {
                    origin: inverse * (ray.origin - *position),
                    direction: local_direction,
                };
                RayCast3d::from_ray(local_ray, f32::MAX)
                    .aabb_intersection_at(&Aabb3d::new(Vec3::ZERO, *half_size))
            }
        }
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickKind {
    Marker,
    Surface,
    #[default]
    None,
}

/// Result of one pointer sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickResult {
    pub kind: PickKind,
    /// Quake under the pointer, for marker hits.
    pub target: Option<QuakeId>,
    /// Marker position for marker hits, intersection point for surface hits.
    pub hit_point: Option<Vec3>,
    /// Coordinate under the pointer, for surface hits.
    pub geo: Option<GeoPoint>,
    pub distance: Option<f32>,
}

impl PickResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_marker(&self) -> bool {
        self.kind == PickKind::Marker
    }

    pub fn is_surface(&self) -> bool {
        self.kind == PickKind::Surface
    }

    pub fn is_none(&self) -> bool {
        self.kind == PickKind::None
    }
}

/// Casts `ray` against `targets` and reports the nearest hit.
///
/// `surface_radius` is the helper sphere radius used to turn a surface hit
/// point into a geographic coordinate. An empty target list yields
/// [`PickKind::None`].
pub fn pick<'a>(
    ray: Ray3d,
    targets: impl IntoIterator<Item = &'a PickTarget>,
    surface_radius: f32,
) -> PickResult {
    let mut nearest: Option<(f32, &PickTarget)> = None;

    for target in targets {
        let Some(distance) = target.intersect(ray) else {
            continue;
        };
        if nearest.is_none_or(|(best, _)| distance < best) {
            nearest = Some((distance, target));
        }
    }

    match nearest {
        Some((distance, PickTarget::Marker { id, position, .. })) => PickResult {
            kind: PickKind::Marker,
            target: Some(id.clone()),
            hit_point: Some(*position),
            geo: None,
            distance: Some(distance),
        },
        Some((distance, PickTarget::Surface { center, .. })) => {
            let hit_point = ray.get_point(distance);
            PickResult {
                kind: PickKind::Surface,
                target: None,
                hit_point: Some(hit_point),
                geo: Some(to_geo(hit_point - *center, f64::from(surface_radius))),
                distance: Some(distance),
            }
        }
        None => PickResult::none(),
    }
}

/// World space ray from the camera through a pointer position in logical
/// window pixels, for a viewport of `viewport_size` logical pixels.
pub fn pointer_ray(
    projection: &Projection,
    camera_transform: &GlobalTransform,
    viewport_size: Vec2,
    pointer: Vec2,
) -> Option<Ray3d> {
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
        return None;
    }
    let mut projection = projection.clone();
    projection.update(viewport_size.x, viewport_size.y);

    // Window y grows downwards, NDC y upwards.
    let relative = pointer / viewport_size;
    let ndc = Vec2::new(relative.x * 2.0 - 1.0, 1.0 - relative.y * 2.0);
    let ndc_to_world =
        camera_transform.compute_matrix() * projection.get_clip_from_view().inverse();
    let near = ndc_to_world.project_point3(ndc.extend(1.0));
    let far = ndc_to_world.project_point3(ndc.extend(f32::EPSILON));

    Dir3::new(far - near)
        .ok()
        .map(|direction| Ray3d::new(near, direction))
}

/// Every pickable object in the scene, in a stable order: markers first, then
/// the surface helper.
#[derive(Resource, Debug, Clone, Default)]
pub struct PickTargets {
    pub surface: Option<PickTarget>,
    pub markers: Vec<PickTarget>,
    pub surface_radius: f32,
}

impl PickTargets {
    /// Targets that can currently be hit. Hidden markers are skipped.
    pub fn active(&self, markers_visible: bool) -> impl Iterator<Item = &PickTarget> {
        let markers = if markers_visible {
            self.markers.as_slice()
        } else {
            &[]
        };
        markers.iter().chain(self.surface.iter())
    }

    /// Picks along `ray` against the active targets.
    pub fn pick(&self, ray: Ray3d, markers_visible: bool) -> PickResult {
        pick(ray, self.active(markers_visible), self.surface_radius)
    }

    /// Resizes the pick box of marker `id`. Returns false for unknown ids.
    pub fn resize_marker(&mut self, id: &QuakeId, size: Vec3) -> bool {
        for target in &mut self.markers {
            if let PickTarget::Marker {
                id: target_id,
                half_size,
                ..
            } = target
            {
                if target_id == id {
                    *half_size = size;
                    return true;
                }
            }
        }
        false
    }
}
