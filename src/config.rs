//! File-based configuration for augmentation runs.
//!
//! A config file holds the sampling parameters and the knobs that select
//! between sampling and serialization variants. Every field is optional:
//!
//! ```yaml
//! params:
//!   lambda_shift: 5.0
//!   lambda_scale: 15.0
//!   min_scale: -0.4
//!   max_scale: 0.4
//!   lambda_rotation: 24.0
//! mode: motion-model
//! layout: corners
//! seed: 7
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bbox::{BBParams, ShiftMode, VectorLayout};
use crate::error::TrackaugError;

/// Settings for an augmentation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentConfig {
    pub params: BBParams,
    pub mode: ShiftMode,
    pub layout: VectorLayout,
    /// Seed for reproducible runs. A fresh random seed is used when absent.
    pub seed: Option<u64>,
}

impl AugmentConfig {
    /// Reads a config from a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    /// Returns an error if the extension is not recognized, the file cannot
    /// be read, or its contents do not parse.
    pub fn from_path(path: &Path) -> Result<Self, TrackaugError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("yaml") | Some("yml") => {
                let data = fs::read_to_string(path)?;
                Self::from_yaml_str(&data).map_err(|source| TrackaugError::ConfigYamlParse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Some("json") => {
                let data = fs::read_to_string(path)?;
                Self::from_json_str(&data).map_err(|source| TrackaugError::ConfigJsonParse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Err(TrackaugError::UnsupportedFormat(format!(
                "config file '{}' must end in .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Parses a YAML config.
    pub fn from_yaml_str(data: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(data)
    }

    /// Parses a JSON config.
    pub fn from_json_str(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
