use super::Star;
use crate::config::ViewerConfig;
use crate::resources::SharedRng;
use bevy::prelude::*;
use rand::Rng;

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut SharedRng) -> Vec3 {
    let theta = rng.random_range(0.0..=2.0 * std::f32::consts::PI);
    let phi = libm::acosf(rng.random_range(-1.0..=1.0));

    Vec3::new(
        libm::sinf(phi) * libm::cosf(theta),
        libm::sinf(phi) * libm::sinf(theta),
        libm::cosf(phi),
    )
}

/// Factory functions for the star field backdrop.
pub mod factory {
    use super::*;

    /// Positions of `config.scene.star_count` stars on a sphere well outside
    /// the camera's reach.
    pub fn star_positions(rng: &mut SharedRng, config: &ViewerConfig) -> Vec<Vec3> {
        (0..config.scene.star_count)
            .map(|_| {
                let jitter = rng.random_range(0.9..=1.1);
                random_unit_vector(rng) * config.scene.star_distance * jitter
            })
            .collect()
    }

    pub fn create_star_mesh(meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        meshes.add(Sphere::new(0.6).mesh().uv(8, 6))
    }

    /// A small palette of unlit star materials of varying brightness.
    pub fn create_star_materials(
        materials: &mut Assets<StandardMaterial>,
    ) -> Vec<Handle<StandardMaterial>> {
        [0.45, 0.7, 1.0]
            .into_iter()
            .map(|brightness| {
                materials.add(StandardMaterial {
                    base_color: Color::srgb(brightness, brightness, brightness * 0.95),
                    unlit: true,
                    ..default()
                })
            })
            .collect()
    }

    pub fn create_star(
        position: Vec3,
        scale: f32,
        mesh: Handle<Mesh>,
        material: Handle<StandardMaterial>,
    ) -> impl Bundle {
        (
            Star,
            Transform::from_translation(position).with_scale(Vec3::splat(scale)),
            Mesh3d(mesh),
            MeshMaterial3d(material),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::factory::star_positions;
    use super::*;

    #[test]
    fn test_random_unit_vector_is_unit_length() {
        let mut rng = SharedRng::from_seed(7);
        for _ in 0..100 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_star_field_is_seeded() {
        let config = ViewerConfig::default();
        let first = star_positions(&mut SharedRng::from_seed(3), &config);
        let second = star_positions(&mut SharedRng::from_seed(3), &config);
        assert_eq!(first.len(), config.scene.star_count);
        assert_eq!(first, second);
        assert!(
            first
                .iter()
                .all(|star| star.length() >= config.scene.star_distance * 0.89)
        );
    }
}
