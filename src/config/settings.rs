//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::error::ConfigError;

/// Default scratch-buffer ceiling: 256 MiB, per the wire format's own cap
/// (see `Session` in `crate::blueprint::codec`).
const DEFAULT_MAX_BLUEPRINT_BYTES: usize = 256 * 1024 * 1024;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file. It
/// only ever affects how a [`crate::blueprint::codec::Session`] is
/// constructed — the codec itself performs no file I/O.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Session settings (scratch-buffer sizing).
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ),
            });
        }
        if self.session.max_blueprint_bytes == 0 {
            return Err(ConfigError::ValidationError {
                message: "session.max_blueprint_bytes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Session (scratch-buffer) configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Ceiling, in bytes, for a single blueprint's decompressed binary
    /// payload. A [`crate::blueprint::codec::Session`] allocates its scratch
    /// buffers to this size once and reuses them across calls.
    #[serde(default = "default_max_blueprint_bytes")]
    pub max_blueprint_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_blueprint_bytes: default_max_blueprint_bytes(),
        }
    }
}

fn default_max_blueprint_bytes() -> usize {
    DEFAULT_MAX_BLUEPRINT_BYTES
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
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

fn default_log_level() -> String {
    "warn".to_string()
}
