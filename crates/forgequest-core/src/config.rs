//! Configuration loading and typed config structures for Forgequest.
//!
//! The configuration lives in `forgequest-config.yaml` next to the binary's
//! working directory. Every section and field has a default, so an empty or
//! missing file yields a playable game.

use std::path::Path;

use serde::Deserialize;

/// Environment variable overriding `heat.tick_interval_ms`.
pub const ENV_TICK_INTERVAL_MS: &str = "FORGEQUEST_TICK_INTERVAL_MS";

/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "FORGEQUEST_LOG_LEVEL";

/// Environment variable overriding `telemetry.otlp_enabled`.
pub const ENV_OTLP_ENABLED: &str = "FORGEQUEST_OTLP_ENABLED";

/// Environment variable overriding `telemetry.otlp_endpoint`.
pub const ENV_OTLP_ENDPOINT: &str = "FORGEQUEST_OTLP_ENDPOINT";

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

    /// An environment override could not be parsed.
    #[error("invalid value for {variable}: {reason}")]
    Env {
        /// The environment variable name.
        variable: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A value is out of its allowed range.
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

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Forge heat timing and limits.
    #[serde(default)]
    pub heat: HeatConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Gauge reporting configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::Env`] or [`ConfigError::Invalid`] if the result does
    /// not validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides read through `lookup` (normally the process
    /// environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if an override is present but malformed.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = lookup(ENV_TICK_INTERVAL_MS) {
            self.heat.tick_interval_ms =
                raw.trim().parse().map_err(|e| ConfigError::Env {
                    variable: ENV_TICK_INTERVAL_MS,
                    reason: format!("{e}"),
                })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(raw) = lookup(ENV_OTLP_ENABLED) {
            self.telemetry.otlp_enabled =
                raw.trim().parse().map_err(|e| ConfigError::Env {
                    variable: ENV_OTLP_ENABLED,
                    reason: format!("{e}"),
                })?;
        }
        if let Some(endpoint) = lookup(ENV_OTLP_ENDPOINT) {
            self.telemetry.otlp_endpoint = endpoint;
        }
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the overheat threshold is zero,
    /// or if OTLP export is enabled without an endpoint or export interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heat.overheat_threshold == 0 {
            return Err(ConfigError::Invalid {
                reason: "heat.overheat_threshold must be at least 1".to_owned(),
            });
        }
        if self.telemetry.otlp_enabled {
            if self.telemetry.otlp_endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    reason: "telemetry.otlp_endpoint is required when OTLP export is enabled"
                        .to_owned(),
                });
            }
            if self.telemetry.gauge_interval_ms == 0 {
                return Err(ConfigError::Invalid {
                    reason: "telemetry.gauge_interval_ms must be positive when OTLP export \
                             is enabled"
                        .to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Forge heat configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeatConfig {
    /// Real-time milliseconds between heat ticks. 0 disables the background
    /// scheduler; ticks must then be driven manually.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Heat at which the forge burns the blacksmith down.
    #[serde(default = "default_overheat_threshold")]
    pub overheat_threshold: u32,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            overheat_threshold: default_overheat_threshold(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Gauge reporting and OpenTelemetry export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// Milliseconds between gauge reports (0 = disabled). Also the metric
    /// export interval when OTLP export is on.
    #[serde(default = "default_gauge_interval_ms")]
    pub gauge_interval_ms: u64,

    /// Export spans, log events and gauges over OTLP.
    #[serde(default)]
    pub otlp_enabled: bool,

    /// OTLP gRPC collector endpoint.
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,

    /// `service.name` resource attribute attached to exported telemetry.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            gauge_interval_ms: default_gauge_interval_ms(),
            otlp_enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
        }
    }
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_overheat_threshold() -> u32 {
    100
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_gauge_interval_ms() -> u64 {
    10_000
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_owned()
}

fn default_service_name() -> String {
    "forgequest".to_owned()
}
