//! # Demo Configuration
//!
//! Loaded once at startup from a TOML file; every field has a default so
//! the demo runs without one.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading the demo configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or has the wrong shape.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Demo parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Number of update calls to drive.
    pub frames: u64,
    /// Counter value at which incrementing entities turn around.
    pub ceiling: i32,
    /// Counter value at which decrementing entities turn around.
    pub floor: i32,
    /// Frame after which the display is narrowed to one line (sent as a
    /// message mid-run to exercise synchronous dispatch).
    pub narrow_display_after: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 24,
            ceiling: 10,
            floor: -10,
            narrow_display_after: Some(12),
        }
    }
}

impl DemoConfig {
    /// Loads the config from `path`, or returns the defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
