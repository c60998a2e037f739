//! Loader configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is
//! a valid configuration. Command-line flags override what is loaded here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Largest feather the authoring slider offers.
pub const DEFAULT_MAX_FEATHER: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory images are listed from and resolved against.
    pub input_dir: PathBuf,
    /// Upper bound enforced by [`crate::host::InputDirectory::validate`].
    pub max_feather: u32,
    /// Feather used when none is given on the command line.
    pub default_feather: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            max_feather: DEFAULT_MAX_FEATHER,
            default_feather: 0,
        }
    }
}

impl Config {
    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
