//! Layered configuration: defaults, a TOML file, then `FORCEDRIFT__*` environment overrides

use crate::physics::export::{ExportMode, ExportScope};
use crate::physics::history::DEFAULT_HISTORY_CAPACITY;
use crate::physics::math::Scalar;
use crate::physics::parameters::SimulationParameters;
use crate::physics::state::MAX_STEP;
use bevy::prelude::*;
use directories::ProjectDirs;
use forcedrift_macros::ConfigDefaults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `FORCEDRIFT__PARAMETERS__MASS=250`
pub const ENV_PREFIX: &str = "FORCEDRIFT";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug)]
pub enum ConfigError {
    /// Reading or deserializing configuration sources failed
    Load(::config::ConfigError),
    /// Serializing to TOML failed
    Serialize(toml::ser::Error),
    /// Writing the configuration file failed
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(err) => write!(f, "{err}"),
            ConfigError::Serialize(err) => write!(f, "Failed to serialize configuration: {err}"),
            ConfigError::Io(err) => write!(f, "Failed to write configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Load(err) => Some(err),
            ConfigError::Serialize(err) => Some(err),
            ConfigError::Io(err) => Some(err),
        }
    }
}

impl From<::config::ConfigError> for ConfigError {
    fn from(err: ::config::ConfigError) -> Self {
        ConfigError::Load(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

#[derive(Resource, ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    #[default(SimulationParameters::default())]
    pub parameters: SimulationParameters,

    #[default(HistoryConfig::default())]
    pub history: HistoryConfig,

    #[default(DriverConfig::default())]
    pub driver: DriverConfig,

    #[default(ExportConfig::default())]
    pub export: ExportConfig,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Samples retained before the oldest are evicted
    #[default(DEFAULT_HISTORY_CAPACITY)]
    pub capacity: usize,

    /// Length of the plotting and partial-export window, in seconds
    #[default(12.0)]
    pub window_seconds: Scalar,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    /// Upper bound on the frame delta handed to the simulation
    #[default(MAX_STEP)]
    pub max_step: Scalar,

    /// Fixed frame delta used by the headless runner
    #[default(1.0 / 60.0)]
    pub frame_dt: Scalar,

    /// Seconds of driver time before the headless runner stops
    #[default(10.0)]
    pub duration: Scalar,

    /// Seconds of simulated time between telemetry log lines
    #[default(1.0)]
    pub telemetry_interval: Scalar,

    #[default(false)]
    pub start_paused: bool,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Write a CSV export when the headless run finishes
    #[default(true)]
    pub on_exit: bool,

    #[default(ExportScope::All)]
    pub mode: ExportScope,

    #[default(".")]
    pub output_dir: String,
}

impl SimulationConfig {
    /// Load from `path` plus environment overrides.
    ///
    /// Missing files are an error here; use [`SimulationConfig::load_or_default`]
    /// when the file is optional.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::build(Some((path.as_ref(), true)))
    }

    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found. Using defaults.", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to parse config file {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load from `path` if the file exists, plus environment overrides.
    ///
    /// A missing file yields defaults; a file that exists but fails to parse
    /// is an error.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(path.map(|path| (path, false)))
    }

    /// Load the per-user configuration file, if any, plus environment overrides
    pub fn load_from_user_config() -> Self {
        let path = Self::user_config_path();

        match Self::load_optional(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load user configuration: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Location of the per-user configuration file for this platform
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "forcedrift")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Export mode with the configured window length attached
    pub fn export_mode(&self) -> ExportMode {
        self.export.mode.with_window(self.history.window_seconds)
    }

    fn build(file: Option<(&Path, bool)>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some((path, required)) = file {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(required),
            );
        }

        let config = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::integrators::IntegratorKind;
    use crate::physics::parameters::DragModel;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("forcedrift-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.history.capacity, 20_000);
        assert_eq!(config.history.window_seconds, 12.0);
        assert_eq!(config.driver.max_step, 0.05);
        assert_eq!(config.driver.duration, 10.0);
        assert_eq!(config.export.mode, ExportScope::All);
        assert_eq!(config.export.output_dir, ".");
        assert_eq!(config.parameters, SimulationParameters::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = scratch_path("partial.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"
            [parameters]
            mass = 250.0
            drag_enabled = true
            drag_model = "linear"
            integrator = "runge_kutta_4"

            [history]
            window_seconds = 4.0

            [export]
            mode = "window"
            "#,
        )
        .unwrap();

        let config = SimulationConfig::load(&path).unwrap();
        assert_eq!(config.parameters.mass, 250.0);
        assert_eq!(config.parameters.drag_model, DragModel::Linear);
        assert_eq!(
            config.parameters.integrator,
            IntegratorKind::RungeKuttaFourthOrder
        );
        assert_eq!(config.parameters.applied_force, 2000.0);
        assert_eq!(config.history.capacity, 20_000);
        assert_eq!(config.export_mode(), ExportMode::Window(4.0));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let path = scratch_path("does-not-exist.toml");
        assert!(matches!(
            SimulationConfig::load(&path),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = SimulationConfig::load_or_default(scratch_path("missing.toml"));
        assert_eq!(config, SimulationConfig::default());

        let path = scratch_path("broken.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[parameters]\nintegrator = \"leapfrog\"\n").unwrap();

        let config = SimulationConfig::load_or_default(&path);
        assert_eq!(config, SimulationConfig::default());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_optional() {
        let config = SimulationConfig::load_optional(None).unwrap();
        assert_eq!(config, SimulationConfig::default());

        let missing = scratch_path("optional-missing.toml");
        let config = SimulationConfig::load_optional(Some(&missing)).unwrap();
        assert_eq!(config, SimulationConfig::default());

        let broken = scratch_path("optional-broken.toml");
        std::fs::create_dir_all(broken.parent().unwrap()).unwrap();
        std::fs::write(&broken, "[driver]\nduration = \"forever\"\n").unwrap();
        assert!(matches!(
            SimulationConfig::load_optional(Some(&broken)),
            Err(ConfigError::Load(_))
        ));

        std::fs::remove_file(&broken).unwrap();
    }

    #[test]
    fn test_save_then_load() {
        let mut config = SimulationConfig::default();
        config.parameters.applied_force = -750.0;
        config.parameters.integrator = IntegratorKind::RungeKuttaFourthOrder;
        config.driver.frame_dt = 0.01;
        config.export.output_dir = "exports".to_string();

        let path = scratch_path("saved/config.toml");
        config.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("integrator = \"rk4\""));

        let loaded = SimulationConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_file(&path).unwrap();
    }
}
