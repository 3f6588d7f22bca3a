//! Viewer plugin - Self-contained plugin pattern
//!
//! This plugin owns the application state shared by every other plugin: the
//! configuration, the quake catalog, the selection and phase state, and the
//! event types they communicate through. It also fixes the order in which
//! the per-frame system sets run.

use crate::docking::DockAnimator;
use crate::phase::{LightAnimator, PhaseControl};
use crate::picking::PickTargets;
use crate::prelude::*;
use crate::quakes::CatalogError;
use crate::utils::lunar::NEUTRAL_PHASE;
use core::time::Duration;

/// Per-frame ordering of the viewer's systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// Platform input is translated into viewer events.
    Input,
    /// Picking, hover and selection.
    Interaction,
    /// Phase, light and control synchronization.
    Sync,
    /// Docking and other camera updates.
    Camera,
    /// HUD refresh.
    UI,
}

pub struct ViewerPlugin {
    config: Option<ViewerConfig>,
    catalog: Option<QuakeCatalog>,
}

impl ViewerPlugin {
    pub fn new() -> Self {
        Self {
            config: None,
            catalog: None,
        }
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            config: Some(config),
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: QuakeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

impl Default for ViewerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads the dataset named in the configuration, logging skipped records.
pub fn load_catalog(config: &ViewerConfig) -> Result<QuakeCatalog, CatalogError> {
    let (catalog, rejected) = QuakeCatalog::load(&config.data.dataset_path)?;
    for record in &rejected {
        warn!(
            "Skipping dataset record #{} ({}): {}",
            record.index, record.id, record.reason
        );
    }
    Ok(catalog)
}

/// Like [`load_catalog`], but a dataset that cannot be read yields an empty
/// catalog.
pub fn load_catalog_or_empty(config: &ViewerConfig) -> QuakeCatalog {
    load_catalog(config).unwrap_or_else(|e| {
        error!("{e}");
        QuakeCatalog::default()
    })
}

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(ViewerConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let catalog = self
            .catalog
            .clone()
            .unwrap_or_else(|| load_catalog_or_empty(&config));
        info!("Loaded {} quakes", catalog.len());

        let phase = config.lighting.initial_phase.unwrap_or(NEUTRAL_PHASE);
        let mut selection = Selection::default();
        selection.set_phase(phase);
        let mut light = LightAnimator::new(
            config.lighting.transition_secs,
            config.lighting.transition_easing,
        );
        light.snap_to(phase);

        app.insert_resource(MagnitudeRange::from_catalog(&catalog));
        app.insert_resource(catalog);
        app.insert_resource(SharedRng::from_optional_seed(config.scene.seed));
        app.insert_resource(VisibilitySettings::from_config(&config));
        app.insert_resource(LightLevels::from_config(&config));
        app.insert_resource(selection);
        app.insert_resource(SelectionController::new(Duration::from_millis(
            config.interaction.click_threshold_ms,
        )));
        app.insert_resource(DockAnimator::new(
            config.interaction.dock_duration_secs,
            config.interaction.dock_easing,
        ));
        app.insert_resource(PhaseControl::showing(config.ui.phase_control_max, phase));
        app.insert_resource(light);
        app.init_resource::<HoverState>();
        app.init_resource::<PointerState>();
        app.init_resource::<SceneHandles>();
        app.init_resource::<PickTargets>();
        app.insert_resource(config);

        app.init_state::<AppState>();

        app.add_event::<ViewerCommand>();
        app.add_event::<PointerEvent>();
        app.add_event::<ResamplePointer>();
        app.add_event::<SelectionChanged>();
        app.add_event::<PhaseChanged>();
        app.add_event::<PhaseControlChanged>();
        app.add_event::<DockRequested>();

        app.configure_sets(
            Update,
            (
                ViewerSet::Input,
                ViewerSet::Interaction,
                ViewerSet::Sync,
                ViewerSet::Camera,
                ViewerSet::UI,
            )
                .chain(),
        );
    }
}
