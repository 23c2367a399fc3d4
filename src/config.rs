//! Boot configuration.
//!
//! Every field has a default matching the stock page layout, so an empty JSON
//! object (or no config at all) boots against `<canvas id="webgl">` with a
//! WebGL2 context and input wiring disabled.

use serde::Deserialize;

use crate::consts::{CANVAS_ID, CLEAR_COLOR, CONTEXT_KIND};

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Error returned by [`BootConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input is not valid JSON or has fields of the wrong type.
    #[error("failed to parse boot config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The input parsed but a field value is out of range.
    #[error("invalid boot config: {0}")]
    Invalid(String),
}

/// Settings consumed by the bootstrap sequence and the application handle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootConfig {
    /// Element id of the target canvas.
    pub canvas_id: String,
    /// Context name passed to `canvas.getContext`.
    pub context_kind: String,
    /// RGBA clear colour, each channel in `0.0..=1.0`.
    pub clear_color: [f32; 4],
    /// Wire pointer and resize listeners after the first render.
    pub input_enabled: bool,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            canvas_id: CANVAS_ID.to_owned(),
            context_kind: CONTEXT_KIND.to_owned(),
            clear_color: CLEAR_COLOR,
            input_enabled: false,
            log_level: "info".to_owned(),
        }
    }
}

impl BootConfig {
    /// Parse and validate a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] when a value fails [`BootConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values that the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_id.trim().is_empty() {
            return Err(ConfigError::Invalid("canvas_id must not be empty".into()));
        }
        if self.context_kind.trim().is_empty() {
            return Err(ConfigError::Invalid("context_kind must not be empty".into()));
        }
        if let Some(channel) = self
            .clear_color
            .iter()
            .find(|c| !(0.0..=1.0).contains(*c))
        {
            return Err(ConfigError::Invalid(format!("clear_color channel {channel} outside 0.0..=1.0")));
        }
        self.level_filter()?;
        Ok(())
    }

    /// The configured log level as a [`log::LevelFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `log_level` is not a known level name.
    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log_level {:?}", self.log_level)))
    }
}
