use crate::quakes::QuakeId;
use bevy::prelude::*;

pub mod marker;
pub mod star;

pub use marker::MarkerBundle;

/// The rendered moon sphere.
#[derive(Component)]
pub struct Moon;

/// Invisible sphere of the moon radius that receives pointer rays.
#[derive(Component)]
pub struct SurfaceHelper;

/// Parent of the sun, rotated about the polar axis by the phase.
#[derive(Component)]
pub struct LightRig;

#[derive(Component)]
pub struct Sun;

/// Point light that follows the selected marker.
#[derive(Component)]
pub struct SelectionHighlight;

/// Box marker for one quake.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct QuakeMarker {
    pub id: QuakeId,
}

#[derive(Component)]
pub struct Star;

#[derive(Component)]
pub struct LoadingScreen;

#[derive(Component)]
pub struct LoadingText;
