// src/config.rs
//! Data-driven pipeline tuning (`pipeline.ron`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::geometry::core::GeometryConfig;
use crate::spawn::core::SpawnTuning;

/// Starting values for a session; the session resource owns them afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub random_seed: u64,
    pub obstacle_count: usize,
    pub item_count: usize,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self { random_seed: 1337, obstacle_count: 3, item_count: 6 }
    }
}

/// Every recognized option, grouped by stage.
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub geometry: GeometryConfig,
    pub placement: SpawnTuning,
    pub session: SessionDefaults,
}

impl PipelineConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::de::from_str(text).map_err(|e| ConfigError::Ron(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Load `path`, or fall back to defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(cfg) => {
                info!("Config: loaded '{}'", path.display());
                cfg
            }
            Err(e) => {
                warn!("Config: using defaults, '{}' unusable: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O while reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
}
