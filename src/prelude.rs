//! Moonquakes prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across the viewer to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;
pub use rand::Rng;

// Internal re-exports - Config
pub use crate::config::ViewerConfig;

// Internal re-exports - States
pub use crate::states::AppState;

// Internal re-exports - Resources (most commonly used)
pub use crate::resources::{
    LightLevels, MagnitudeRange, PointerState, SceneHandles, SharedRng, VisibilitySettings,
};

// Internal re-exports - Events
pub use crate::events::{
    DockRequested, PhaseChanged, PhaseControlChanged, PointerEvent, PointerKind, ResamplePointer,
    SelectionChanged, ViewerCommand,
};

// Internal re-exports - Core
pub use crate::quakes::{Quake, QuakeCatalog, QuakeId};
pub use crate::selection::{HoverState, Selection, SelectionController};
