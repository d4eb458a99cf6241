use std::fs;
use std::path::{Path, PathBuf};

use crate::{Config, ConfigError};

/// `<config dir>/vitrine/config.toml`, if the platform has a config dir.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vitrine").join("config.toml"))
}

/// Read and validate a config file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Load the user config, falling back to defaults when it is missing or
    /// unusable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        Self::load_or_default(&path)
    }

    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }

        match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
