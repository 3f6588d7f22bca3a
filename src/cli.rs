//! Command line interface for Moonquakes

use clap::Parser;
use std::fmt;
use std::path::Path;

use crate::config::{ConfigError, ViewerConfig};
use crate::plugins::viewer::load_catalog;
use crate::quakes::{CatalogError, QuakeCatalog};
use crate::utils::lunar::{phase_name, phase_of};

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// A command-line override produced an unusable configuration
    InvalidOption(ConfigError),
    /// The dataset could not be read
    Catalog(CatalogError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidOption(e) => write!(f, "Invalid option: {e}"),
            CliError::Catalog(e) => write!(f, "Failed to load dataset: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigLoad(_) => None,
            CliError::InvalidOption(e) => Some(e),
            CliError::Catalog(e) => Some(e),
        }
    }
}

/// Moonquakes - interactive moon globe of recorded moonquakes
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format), used instead of the user config
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Path to the moonquake dataset (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub dataset: Option<String>,

    /// Random seed for the star field
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Longest press, in milliseconds, that still counts as a click
    #[arg(long, value_name = "MS")]
    pub click_threshold_ms: Option<u64>,

    /// Start with the quake markers hidden
    #[arg(long)]
    pub hide_markers: bool,

    /// Start with the coordinate axes shown
    #[arg(long)]
    pub show_axes: bool,

    /// Initial lunar phase in [0, 1)
    #[arg(short = 'p', long, value_name = "FRACTION")]
    pub phase: Option<f64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// List the events in the dataset and exit
    #[arg(long)]
    pub list_events: bool,
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<ViewerConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        let path = Path::new(config_path);
        if !path.is_file() {
            return Err(CliError::ConfigLoad(format!("{config_path} does not exist")));
        }
        ViewerConfig::load_layered(Some(path)).map_err(|e| CliError::ConfigLoad(e.to_string()))?
    } else {
        ViewerConfig::load_from_user_config()
    };

    if let Some(dataset) = &args.dataset {
        println!("Using dataset: {dataset}");
        config.data.dataset_path = dataset.clone();
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.scene.seed = Some(seed);
    }

    if let Some(threshold) = args.click_threshold_ms {
        println!("Overriding click threshold to: {threshold} ms");
        config.interaction.click_threshold_ms = threshold;
    }

    if args.hide_markers {
        config.scene.show_markers = false;
    }

    if args.show_axes {
        config.scene.show_axes = true;
    }

    if let Some(phase) = args.phase {
        println!("Starting at phase: {phase}");
        config.lighting.initial_phase = Some(phase);
    }

    config.validate().map_err(CliError::InvalidOption)?;
    Ok(config)
}

/// Loads the configured dataset, failing if the file cannot be read
pub fn load_dataset(config: &ViewerConfig) -> Result<QuakeCatalog, CliError> {
    load_catalog(config).map_err(CliError::Catalog)
}

/// One line of `--list-events` output.
pub fn event_line(quake: &crate::quakes::Quake) -> String {
    let phase = phase_of(quake.datetime());
    format!(
        "{:<12} {} {:>6.2}  {:.3} ({})",
        quake.id.as_str(),
        quake.datetime().format("%Y-%m-%d %H:%M:%S"),
        quake.magnitude,
        phase,
        phase_name(phase)
    )
}

/// Handles the --list-events flag by printing every event in the dataset
pub fn handle_list_events(catalog: &QuakeCatalog) {
    println!("{} events:", catalog.len());
    for quake in catalog.iter() {
        println!("  {}", event_line(quake));
    }
}
