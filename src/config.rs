use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::world::catalog::DEFAULT_NAME_CACHE_SIZE;

pub const DEFAULT_CATALOG_FILE: &str = "items.yaml";
/// Catalog type id of the reward marker container.
pub const DEFAULT_REWARD_CONTAINER_TYPE: u16 = 19250;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
    #[serde(default = "default_reward_container_type")]
    pub reward_container_type: u16,
    #[serde(default = "default_name_cache_size")]
    pub name_cache_size: usize,
}

fn default_catalog_file() -> String {
    DEFAULT_CATALOG_FILE.to_string()
}

fn default_reward_container_type() -> u16 {
    DEFAULT_REWARD_CONTAINER_TYPE
}

fn default_name_cache_size() -> usize {
    DEFAULT_NAME_CACHE_SIZE
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            catalog_file: default_catalog_file(),
            reward_container_type: default_reward_container_type(),
            name_cache_size: default_name_cache_size(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfigError {
    Read(PathBuf, String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(path, msg) => {
                write!(f, "failed to read config {}: {}", path.display(), msg)
            }
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl WorldConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Read(path.to_path_buf(), err.to_string()))?;
        serde_yaml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Defaults when the file is absent; a present-but-broken file is still
    /// an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
