//! Loading and saving the tracked-name configuration
//!
//! The configuration is a single TOML file. Callers that persist through
//! `confy` never touch this module; it exists for explicit file paths
//! (import/export, tests, external edits picked up on reload).

use std::fs;
use std::path::{Path, PathBuf};

use spellwatch_types::TrackerConfig;
use thiserror::Error;

/// Load a tracker config from a TOML file
pub fn load_file(path: &Path) -> Result<TrackerConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a config to a TOML file
pub fn save_file(path: &Path, config: &TrackerConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Default directory for config and snapshot files
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("spellwatch"))
}

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
}
