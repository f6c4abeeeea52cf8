//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `greenhouse.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Sensors may not be polled faster than this.
pub const MIN_SENSOR_FREQUENCY_MS: u64 = 2000;

const DEFAULT_CONNECTION: &str = "mock://fake";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stat and log storage.
    pub storage: StorageConfig,
    /// Sensor connections and polling.
    pub sensors: SensorsConfig,
    /// Unit connections.
    pub units: UnitsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Schedules issued once at startup.
    pub schedule: Vec<ScheduleConfig>,
}

/// Storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Connection string, e.g. `mock://fake/40`.
    pub url: String,
}

/// Sensor configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    /// Milliseconds between readings.
    pub frequency_ms: u64,
    /// Thermometer connection string.
    pub thermometer: String,
    /// Hygrometer connection string.
    pub hygrometer: String,
}

/// Unit configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UnitsConfig {
    /// Water unit connection string.
    pub water: String,
    /// Fan unit connection string.
    pub fan: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Which unit a startup schedule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Water,
    Fan,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Water => f.write_str("water"),
            Self::Fan => f.write_str("fan"),
        }
    }
}

/// Turn `unit` on after `delay_secs` for `duration_secs`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub unit: UnitKind,
    #[serde(default)]
    pub delay_secs: u64,
    pub duration_secs: u64,
}

impl ScheduleConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl Config {
    /// Load configuration from `greenhouse.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, if an
    /// override cannot be parsed, or if the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("greenhouse.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("GH_DATABASE") {
            self.storage.url = val;
        }
        if let Some(val) = var("GH_SENSOR_FRQ") {
            self.sensors.frequency_ms = val.parse().map_err(|_| {
                ConfigError::Validation(format!("GH_SENSOR_FRQ must be milliseconds, got {val}"))
            })?;
        }
        if let Some(val) = var("GH_THERMOMETER") {
            self.sensors.thermometer = val;
        }
        if let Some(val) = var("GH_HYGROMETER") {
            self.sensors.hygrometer = val;
        }
        if let Some(val) = var("GH_WATER") {
            self.units.water = val;
        }
        if let Some(val) = var("GH_FAN") {
            self.units.fan = val;
        }
        if let Some(val) = var("GH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sensors.frequency_ms < MIN_SENSOR_FREQUENCY_MS {
            return Err(ConfigError::Validation(format!(
                "sensor frequency must be at least {MIN_SENSOR_FREQUENCY_MS}ms"
            )));
        }
        if let Some(index) = self.schedule.iter().position(|entry| entry.duration_secs == 0) {
            return Err(ConfigError::Validation(format!(
                "schedule #{index}: duration_secs must be non-zero"
            )));
        }
        Ok(())
    }

    /// Interval between sensor readings.
    #[must_use]
    pub fn sensor_frequency(&self) -> Duration {
        Duration::from_millis(self.sensors.frequency_ms)
    }

    /// Connection string of the given unit.
    #[must_use]
    pub fn unit_connection(&self, kind: UnitKind) -> &str {
        match kind {
            UnitKind::Water => &self.units.water,
            UnitKind::Fan => &self.units.fan,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "mock://fake/40".to_string(),
        }
    }
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            frequency_ms: 30_000,
            thermometer: DEFAULT_CONNECTION.to_string(),
            hygrometer: DEFAULT_CONNECTION.to_string(),
        }
    }
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            water: DEFAULT_CONNECTION.to_string(),
            fan: DEFAULT_CONNECTION.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "greenhoused=info,greenhouse=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
