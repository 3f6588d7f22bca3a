use crate::events::PointerKind;
use crate::prelude::*;
use crate::quakes::{QuakeCatalog, QuakeId};
use crate::selection::PressTracker;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use std::collections::HashMap;

#[derive(Resource, Deref, DerefMut, Debug, Clone, PartialEq)]
pub struct SharedRng(pub ChaCha8Rng);

impl SharedRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::default(),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

/// Live scene objects by role. Filled once the scene is spawned.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneHandles {
    pub moon: Option<Entity>,
    pub surface_helper: Option<Entity>,
    pub light_rig: Option<Entity>,
    pub sun: Option<Entity>,
    pub highlight: Option<Entity>,
    pub markers: HashMap<QuakeId, Entity>,
    pub moon_material: Option<Handle<StandardMaterial>>,
}

impl SceneHandles {
    pub fn marker(&self, id: &QuakeId) -> Option<Entity> {
        self.markers.get(id).copied()
    }
}

/// Last known pointer position and press state.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub position: Option<Vec2>,
    pub kind: PointerKind,
    pub press: PressTracker,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilitySettings {
    pub axes: bool,
    pub markers: bool,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            axes: false,
            markers: true,
        }
    }
}

impl VisibilitySettings {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            axes: config.scene.show_axes,
            markers: config.scene.show_markers,
        }
    }
}

/// Values behind the intensity and relief steppers.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LightLevels {
    pub ambient: f32,
    pub sun: f32,
    pub relief: f32,
}

impl Default for LightLevels {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl LightLevels {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            ambient: config.lighting.ambient_brightness,
            sun: config.lighting.sun_illuminance,
            relief: config.scene.relief_scale,
        }
    }
}

/// Magnitude span of the loaded catalog, for marker colours and the legend.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeRange {
    pub min: f64,
    pub max: f64,
}

impl Default for MagnitudeRange {
    fn default() -> Self {
        Self::from_catalog(&QuakeCatalog::default())
    }
}

impl MagnitudeRange {
    pub fn from_catalog(catalog: &QuakeCatalog) -> Self {
        Self {
            min: catalog.min_magnitude(),
            max: catalog.max_magnitude(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_rng_deterministic_with_seed() {
        let seed = 12345u64;
        let mut rng1 = SharedRng::from_seed(seed);
        let mut rng2 = SharedRng::from_seed(seed);

        let values1: Vec<f64> = (0..10).map(|_| rng1.random_range(0.0..1.0)).collect();
        let values2: Vec<f64> = (0..10).map(|_| rng2.random_range(0.0..1.0)).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_shared_rng_from_optional_seed() {
        let seed = 54321u64;
        let mut rng_with_seed = SharedRng::from_optional_seed(Some(seed));
        let mut rng_with_same_seed = SharedRng::from_seed(seed);

        let value1: f64 = rng_with_seed.random_range(0.0..1.0);
        let value2: f64 = rng_with_same_seed.random_range(0.0..1.0);

        assert_eq!(value1, value2);
    }

    #[test]
    fn test_visibility_follows_config() {
        let mut config = ViewerConfig::default();
        config.scene.show_axes = true;
        config.scene.show_markers = false;
        let visibility = VisibilitySettings::from_config(&config);
        assert!(visibility.axes);
        assert!(!visibility.markers);
    }

    #[test]
    fn test_empty_catalog_range() {
        let range = MagnitudeRange::default();
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 4.0);
    }
}
