//! Configuration loading and typed config structures for Vigil.
//!
//! The configuration lives in `vigil-config.yaml` in the working
//! directory. Every field has a default, so a missing file or a partial
//! file is valid. Environment variables override the infrastructure
//! section after parsing.

use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds inconsistent values.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VigilConfig {
    /// Presentation tuning for the scene deriver.
    #[serde(default)]
    pub scene: SceneConfig,

    /// History stack behaviour.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Raw event log sizing.
    #[serde(default)]
    pub events: EventLogConfig,

    /// Connection settings.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VigilConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for infrastructure:
    /// - `NATS_URL` overrides `infrastructure.nats_url`
    /// - `GOVERNOR_SUBJECT` overrides `infrastructure.governor_subject`
    /// - `OBSERVER_PORT` overrides `infrastructure.observer_port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, apply environment
    /// overrides, and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.infrastructure.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate()?;
        if self.events.log_capacity == 0 {
            return Err(ConfigError::Invalid(
                "events.log_capacity must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Presentation tuning.
///
/// The paused ambient level is a fixed floor independent of the zone and
/// must sit strictly below the nominal level so a pause is visible.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneConfig {
    /// Ambient intensity while the governor has paused the simulation.
    #[serde(default = "default_paused_ambient")]
    pub paused_ambient: f64,
    /// Ambient intensity while the simulation runs.
    #[serde(default = "default_nominal_ambient")]
    pub nominal_ambient: f64,
    /// Exposure while paused.
    #[serde(default = "default_paused_exposure")]
    pub paused_exposure: f64,
    /// Exposure while running.
    #[serde(default = "default_nominal_exposure")]
    pub nominal_exposure: f64,
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f64,
    /// Near clipping plane.
    #[serde(default = "default_near")]
    pub near: f64,
    /// Far clipping plane.
    #[serde(default = "default_far")]
    pub far: f64,
    /// Device pixel ratio while running.
    #[serde(default = "default_dpr")]
    pub dpr: f64,
    /// Device pixel ratio while paused.
    #[serde(default = "default_paused_dpr")]
    pub paused_dpr: f64,
}

impl SceneConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("paused_ambient", self.paused_ambient),
            ("nominal_ambient", self.nominal_ambient),
            ("paused_exposure", self.paused_exposure),
            ("nominal_exposure", self.nominal_exposure),
            ("fov", self.fov),
            ("near", self.near),
            ("far", self.far),
            ("dpr", self.dpr),
            ("paused_dpr", self.paused_dpr),
        ];
        if let Some((name, value)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "scene.{name} ({value}) must be a finite number"
            )));
        }

        // Written positively: a NaN fails both.
        let floor_below_nominal = self.paused_ambient < self.nominal_ambient;
        if !floor_below_nominal {
            return Err(ConfigError::Invalid(format!(
                "scene.paused_ambient ({}) must be below scene.nominal_ambient ({})",
                self.paused_ambient, self.nominal_ambient
            )));
        }
        let clip_planes_ordered = self.near > 0.0 && self.near < self.far;
        if !clip_planes_ordered {
            return Err(ConfigError::Invalid(format!(
                "scene.near ({}) must be positive and below scene.far ({})",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            paused_ambient: default_paused_ambient(),
            nominal_ambient: default_nominal_ambient(),
            paused_exposure: default_paused_exposure(),
            nominal_exposure: default_nominal_exposure(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            dpr: default_dpr(),
            paused_dpr: default_paused_dpr(),
        }
    }
}

/// History stack configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    /// Replace the current entry instead of appending when a capture has
    /// the same signature.
    #[serde(default)]
    pub dedupe: bool,
    /// Maximum number of entries retained (absent = unbounded).
    #[serde(default)]
    pub max_size: Option<NonZeroUsize>,
}

/// Raw event log configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EventLogConfig {
    /// Number of recent events kept for display.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
        }
    }
}

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// NATS messaging URL.
    #[serde(default = "default_nats_url")]
    pub nats_url: String,
    /// Subject the governor publishes telemetry on.
    #[serde(default = "default_governor_subject")]
    pub governor_subject: String,
    /// Observer API port.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,
}

impl InfrastructureConfig {
    /// Override connection settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `OBSERVER_PORT` is set but is
    /// not a valid port number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override connection settings from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `OBSERVER_PORT` is not a port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("NATS_URL") {
            self.nats_url = val;
        }
        if let Some(val) = lookup("GOVERNOR_SUBJECT") {
            self.governor_subject = val;
        }
        if let Some(val) = lookup("OBSERVER_PORT") {
            self.observer_port = val
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("invalid OBSERVER_PORT {val}: {e}")))?;
        }
        Ok(())
    }
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            nats_url: default_nats_url(),
            governor_subject: default_governor_subject(),
            observer_port: default_observer_port(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_paused_ambient() -> f64 {
    0.4
}

const fn default_nominal_ambient() -> f64 {
    0.8
}

const fn default_paused_exposure() -> f64 {
    0.7
}

const fn default_nominal_exposure() -> f64 {
    1.0
}

const fn default_fov() -> f64 {
    50.0
}

const fn default_near() -> f64 {
    0.1
}

const fn default_far() -> f64 {
    500.0
}

const fn default_dpr() -> f64 {
    1.5
}

const fn default_paused_dpr() -> f64 {
    1.0
}

const fn default_log_capacity() -> usize {
    vigil_events::DEFAULT_LOG_CAPACITY
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_owned()
}

fn default_governor_subject() -> String {
    "governor.events.>".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}
