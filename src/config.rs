use crate::utils::easing::Easing;
use bevy::color::Srgba;
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix of environment overrides, e.g. `MOONQUAKES__CAMERA__DISTANCE=60`.
pub const ENV_PREFIX: &str = "MOONQUAKES";

/// Errors raised while loading, validating or saving the configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
    Source(::config::ConfigError),
    Serialize(toml::ser::Error),
    Invalid {
        field: &'static str,
        reason: String,
    },
    NoConfigDirectory,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot access {}: {source}", path.display())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "cannot parse {}: {message}", path.display())
            }
            ConfigError::Source(e) => write!(f, "cannot merge configuration sources: {e}"),
            ConfigError::Serialize(e) => write!(f, "cannot serialize configuration: {e}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
            ConfigError::NoConfigDirectory => write!(f, "no configuration directory available"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Source(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<::config::ConfigError> for ConfigError {
    fn from(e: ::config::ConfigError) -> Self {
        ConfigError::Source(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
    pub scene: SceneConfig,
    pub lighting: LightingConfig,
    pub ui: UiConfig,
    pub data: DataConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Orbit radius at startup.
    pub distance: f32,
    /// Latitude of the camera at startup, in degrees.
    pub initial_latitude: f32,
    /// Longitude of the camera at startup, in degrees.
    pub initial_longitude: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub orbit_smoothness: f32,
    pub zoom_smoothness: f32,
    pub field_of_view_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 40.0,
            initial_latitude: -60.0,
            initial_longitude: 0.0,
            min_distance: 14.0,
            max_distance: 120.0,
            orbit_smoothness: 0.1,
            zoom_smoothness: 0.1,
            field_of_view_degrees: 45.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Longest press that still counts as a click.
    pub click_threshold_ms: u64,
    pub dock_duration_secs: f32,
    pub dock_easing: Easing,
    /// Scale of the marker under the pointer.
    pub hover_scale: f32,
    /// How long the tap indicator stays up on touch screens.
    pub tap_indicator_secs: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_threshold_ms: 250,
            dock_duration_secs: 0.5,
            dock_easing: Easing::default(),
            hover_scale: 1.6,
            tap_indicator_secs: 0.6,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub moon_radius: f32,
    pub moon_sectors: u32,
    pub moon_stacks: u32,
    /// Optional colour texture, relative to the asset directory.
    pub color_map: Option<String>,
    /// Optional relief (depth) texture, relative to the asset directory.
    pub relief_map: Option<String>,
    pub relief_scale: f32,
    pub relief_step: f32,
    pub marker_size: f32,
    /// Height of marker centres above the surface.
    pub marker_altitude: f32,
    pub show_markers: bool,
    pub show_axes: bool,
    pub axes_length: f32,
    pub star_count: usize,
    pub star_distance: f32,
    /// Seed for the star field; random when unset.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            moon_radius: 10.0,
            moon_sectors: 128,
            moon_stacks: 64,
            color_map: None,
            relief_map: None,
            relief_scale: 0.02,
            relief_step: 0.005,
            marker_size: 0.3,
            marker_altitude: 0.1,
            show_markers: true,
            show_axes: false,
            axes_length: 15.0,
            star_count: 1500,
            star_distance: 400.0,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_brightness: f32,
    pub ambient_step: f32,
    pub sun_illuminance: f32,
    pub sun_step: f32,
    /// Sun colour as a hex string.
    pub sun_color: String,
    pub sun_distance: f32,
    pub transition_secs: f32,
    pub transition_easing: Easing,
    pub highlight_intensity: f32,
    pub highlight_range: f32,
    /// Phase shown before any quake is selected.
    pub initial_phase: Option<f64>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_brightness: 80.0,
            ambient_step: 20.0,
            sun_illuminance: 4_000.0,
            sun_step: 500.0,
            sun_color: "#fdfbd3".to_string(),
            sun_distance: 60.0,
            transition_secs: 0.5,
            transition_easing: Easing::default(),
            highlight_intensity: 200_000.0,
            highlight_range: 8.0,
            initial_phase: None,
        }
    }
}

impl LightingConfig {
    /// Parsed sun colour. Falls back to white if the string is not valid hex;
    /// [`ViewerConfig::validate`] rejects such strings earlier.
    pub fn sun_color(&self) -> Color {
        Srgba::hex(&self.sun_color)
            .map(Color::Srgba)
            .unwrap_or(Color::WHITE)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub button_padding: f32,
    pub button_gap: f32,
    pub button_margin: f32,
    pub button_border_radius: f32,
    pub font_size: f32,
    /// Upper end of the phase control.
    pub phase_control_max: f64,
    /// Colour stops in the magnitude legend.
    pub legend_steps: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            button_padding: 5.0,
            button_gap: 10.0,
            button_margin: 10.0,
            button_border_radius: 5.0,
            font_size: 12.0,
            phase_control_max: 100.0,
            legend_steps: 24,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub dataset_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: "assets/data/moonquakes.json".to_string(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must not be negative, got {value}"),
        })
    }
}

impl ViewerConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io { .. }) => {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("{e}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Location of `config.toml` in the platform configuration directory.
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "moonquakes").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults, then the user config file, then `MOONQUAKES__*` environment
    /// variables. Any failure falls back to defaults with a warning.
    pub fn load_from_user_config() -> Self {
        match Self::load_layered(Self::user_config_path().as_deref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load user configuration: {e}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Merges defaults, an optional TOML file and the environment.
    pub fn load_layered(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to the user config file, creating its directory.
    pub fn save_to_user_config(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::user_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.save(&path)?;
        Ok(path)
    }

    /// Rejects values the viewer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("camera.distance", self.camera.distance)?;
        positive("camera.min_distance", self.camera.min_distance)?;
        positive("camera.max_distance", self.camera.max_distance)?;
        positive("camera.field_of_view_degrees", self.camera.field_of_view_degrees)?;
        if self.camera.min_distance > self.camera.max_distance {
            return Err(ConfigError::Invalid {
                field: "camera.min_distance",
                reason: "exceeds camera.max_distance".to_string(),
            });
        }
        if !(-90.0..=90.0).contains(&self.camera.initial_latitude) {
            return Err(ConfigError::Invalid {
                field: "camera.initial_latitude",
                reason: format!("{} is outside [-90, 90]", self.camera.initial_latitude),
            });
        }

        if self.interaction.click_threshold_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "interaction.click_threshold_ms",
                reason: "must be positive".to_string(),
            });
        }
        positive(
            "interaction.dock_duration_secs",
            self.interaction.dock_duration_secs,
        )?;
        positive("interaction.hover_scale", self.interaction.hover_scale)?;
        non_negative(
            "interaction.tap_indicator_secs",
            self.interaction.tap_indicator_secs,
        )?;

        positive("scene.moon_radius", self.scene.moon_radius)?;
        positive("scene.marker_size", self.scene.marker_size)?;
        non_negative("scene.marker_altitude", self.scene.marker_altitude)?;
        non_negative("scene.relief_scale", self.scene.relief_scale)?;
        positive("scene.star_distance", self.scene.star_distance)?;
        if self.camera.min_distance <= self.scene.moon_radius {
            return Err(ConfigError::Invalid {
                field: "camera.min_distance",
                reason: "must be outside the moon".to_string(),
            });
        }

        non_negative(
            "lighting.ambient_brightness",
            self.lighting.ambient_brightness,
        )?;
        non_negative("lighting.sun_illuminance", self.lighting.sun_illuminance)?;
        positive("lighting.transition_secs", self.lighting.transition_secs)?;
        if Srgba::hex(&self.lighting.sun_color).is_err() {
            return Err(ConfigError::Invalid {
                field: "lighting.sun_color",
                reason: format!("{:?} is not a hex colour", self.lighting.sun_color),
            });
        }
        match self.lighting.initial_phase {
            Some(phase) if !(0.0..1.0).contains(&phase) => {
                return Err(ConfigError::Invalid {
                    field: "lighting.initial_phase",
                    reason: format!("{phase} is outside [0, 1)"),
                });
            }
            _ => {}
        }

        if !(self.ui.phase_control_max.is_finite() && self.ui.phase_control_max > 0.0) {
            return Err(ConfigError::Invalid {
                field: "ui.phase_control_max",
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interaction.click_threshold_ms, 250);
        assert_eq!(config.scene.moon_radius, 10.0);
        assert_eq!(config.camera.distance, 40.0);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [interaction]
            click_threshold_ms = 300

            [scene]
            show_axes = true
            "#,
        )
        .unwrap();
        assert_eq!(config.interaction.click_threshold_ms, 300);
        assert_eq!(config.interaction.hover_scale, 1.6);
        assert!(config.scene.show_axes);
        assert_eq!(config.lighting.sun_color, "#fdfbd3");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ViewerConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ViewerConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let mut config = ViewerConfig::default();
        config.scene.moon_radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "scene.moon_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_click_threshold() {
        let mut config = ViewerConfig::default();
        config.interaction.click_threshold_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_sun_colour() {
        let mut config = ViewerConfig::default();
        config.lighting.sun_color = "sunny".to_string();
        assert!(config.validate().is_err());
        assert_eq!(config.lighting.sun_color(), Color::WHITE);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ViewerConfig::load_or_default("/definitely/not/here.toml");
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "moonquakes-config-test-{}.toml",
            std::process::id()
        ));
        let mut config = ViewerConfig::default();
        config.camera.distance = 55.0;
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.camera.distance, 55.0);
    }

    #[test]
    fn test_layered_without_file_is_default() {
        let config = ViewerConfig::load_layered(None).unwrap();
        assert_eq!(config.scene.moon_radius, 10.0);
    }
}
