//! Configuration loading and typed config structures for the Clock & Weather
//! engine.
//!
//! The configuration lives in `clockweather-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, and provides a
//! loader that reads and validates the file. Every field has a default, so
//! an empty document (or no file at all) is a valid configuration.

use std::path::{Path, PathBuf};

use clockweather_types::{Altitude, CalendarDate, TimeOfDay};
use serde::Deserialize;
use tracing::info;

/// Environment variable overriding [`WeatherConfig::table_path`].
pub const ENV_WEATHER_FILE: &str = "CLOCKWEATHER_WEATHER_FILE";

/// Environment variable overriding [`StateConfig::path`].
pub const ENV_STATE_FILE: &str = "CLOCKWEATHER_STATE_FILE";

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

    /// The YAML parsed but a value is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `clockweather-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClockweatherConfig {
    /// Starting clock for a world with no saved state.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Weather table and altitude.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Ambient effect settings.
    #[serde(default)]
    pub effects: EffectsConfig,

    /// Scene lighting settings.
    #[serde(default)]
    pub lighting: LightingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the clock is persisted between runs.
    #[serde(default)]
    pub state: StateConfig,
}

impl ClockweatherConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for file locations:
    /// - `CLOCKWEATHER_WEATHER_FILE` overrides `weather.table_path`
    /// - `CLOCKWEATHER_STATE_FILE` overrides `state.path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`Self::from_file`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_file`] for any failure other than the file not
    /// existing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        info!(path = %path.display(), "No config file, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. Does not consult the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_altitude(self.weather.altitude)?;
        Ok(())
    }

    /// Apply the process environment on top of the parsed values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_WEATHER_FILE) {
            self.weather.table_path = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_STATE_FILE) {
            self.state.path = PathBuf::from(val);
        }
    }
}

/// Reject altitudes off the selectable `0..=3900` m, step-150 grid.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for any other value.
pub fn validate_altitude(altitude: Altitude) -> Result<Altitude, ConfigError> {
    if altitude.is_selectable() {
        Ok(altitude)
    } else {
        Err(ConfigError::Invalid {
            reason: format!(
                "altitude {altitude} must be between 0m and {} in steps of {}m",
                Altitude::MAX,
                Altitude::STEP_M
            ),
        })
    }
}

/// Starting clock for a world with no saved state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// First in-world date. When unset the earliest table date is used,
    /// then [`fallback_start_date`].
    #[serde(default)]
    pub start_date: Option<CalendarDate>,

    /// First in-world time of day.
    #[serde(default)]
    pub start_time: TimeOfDay,
}

/// Start date used when neither the config nor the table provides one.
pub fn fallback_start_date() -> CalendarDate {
    CalendarDate::from_ymd_opt(2014, 6, 14).unwrap_or_default()
}

/// Weather table and altitude configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherConfig {
    /// Path to the weather table JSON document.
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,

    /// Observer altitude in meters (0-3900, step 150).
    #[serde(default)]
    pub altitude: Altitude,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            table_path: default_table_path(),
            altitude: Altitude::SEA_LEVEL,
        }
    }
}

/// Ambient effect configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EffectsConfig {
    /// Push effects to the renderer after every clock change.
    #[serde(default)]
    pub auto_apply: bool,
}

/// Scene lighting configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LightingConfig {
    /// Report a scene darkness level derived from the hour.
    #[serde(default)]
    pub control_ambient_light: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Persisted clock location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateConfig {
    /// JSON file holding the clock and altitude between runs.
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_table_path() -> PathBuf {
    PathBuf::from("weatherdata/weather.json")
}

fn default_state_path() -> PathBuf {
    PathBuf::from("clockweather-state.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Write as _;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClockweatherConfig::default();
        assert_eq!(config.clock.start_date, None);
        assert_eq!(config.clock.start_time, TimeOfDay::MIDNIGHT);
        assert_eq!(config.weather.table_path, PathBuf::from("weatherdata/weather.json"));
        assert_eq!(config.weather.altitude, Altitude(0));
        assert!(!config.effects.auto_apply);
        assert!(!config.lighting.control_ambient_light);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.state.path, PathBuf::from("clockweather-state.json"));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
clock:
  start_date: "2014-06-14"
  start_time: "06:30"

weather:
  table_path: "data/summer.json"
  altitude: 450

effects:
  auto_apply: true

lighting:
  control_ambient_light: true

logging:
  level: "debug"

state:
  path: "/tmp/cw.json"
"#;
        let config = ClockweatherConfig::parse(yaml).unwrap();
        assert_eq!(
            config.clock.start_date,
            CalendarDate::from_ymd_opt(2014, 6, 14)
        );
        assert_eq!(config.clock.start_time, TimeOfDay::new(6, 30).unwrap());
        assert_eq!(config.weather.table_path, PathBuf::from("data/summer.json"));
        assert_eq!(config.weather.altitude, Altitude(450));
        assert!(config.effects.auto_apply);
        assert!(config.lighting.control_ambient_light);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.state.path, PathBuf::from("/tmp/cw.json"));
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = ClockweatherConfig::parse("weather:\n  altitude: 150\n").unwrap();
        assert_eq!(config.weather.altitude, Altitude(150));
        assert_eq!(config.weather.table_path, PathBuf::from("weatherdata/weather.json"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(
            ClockweatherConfig::parse("").unwrap(),
            ClockweatherConfig::default()
        );
    }

    #[test]
    fn rejects_off_grid_altitude() {
        let err = ClockweatherConfig::parse("weather:\n  altitude: 100\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = ClockweatherConfig::parse("weather:\n  altitude: 4050\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_malformed_time() {
        let err = ClockweatherConfig::parse("clock:\n  start_time: \"25:00\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn overrides_replace_paths() {
        let vars: BTreeMap<&str, &str> = [
            (ENV_WEATHER_FILE, "/srv/weather.json"),
            (ENV_STATE_FILE, "/srv/state.json"),
        ]
        .into_iter()
        .collect();
        let mut config = ClockweatherConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| (*v).to_owned()));
        assert_eq!(config.weather.table_path, PathBuf::from("/srv/weather.json"));
        assert_eq!(config.state.path, PathBuf::from("/srv/state.json"));
    }

    #[test]
    fn from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"lighting:\n  control_ambient_light: true\n").unwrap();
        let config = ClockweatherConfig::from_file(file.path()).unwrap();
        assert!(config.lighting.control_ambient_light);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClockweatherConfig::load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert!(!config.effects.auto_apply);
    }
}
