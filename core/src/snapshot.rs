//! Persisted tracker state between sessions.
//!
//! Plain key/value data: running cooldowns by capability name and icon
//! positions. Cooldown starts are stored on the wall clock because the
//! client's uptime clock does not survive a restart. Fields missing from an
//! older file default to empty; unknown fields are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cooldowns: BTreeMap<String, SavedCooldown>,

    /// Capability name -> icon position
    #[serde(default)]
    pub positions: BTreeMap<String, [f32; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedCooldown {
    /// Wall-clock start, seconds since the Unix epoch
    pub started_at: f64,
    pub duration: f64,
}

impl SavedCooldown {
    pub fn ends_at(&self) -> f64 {
        self.started_at + self.duration
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid snapshot {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_snapshot(path: &Path) -> Result<TrackerSnapshot, SnapshotError> {
    let contents = fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&contents).map_err(|e| SnapshotError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn save_snapshot(path: &Path, snapshot: &TrackerSnapshot) -> Result<(), SnapshotError> {
    let contents = serde_json::to_string_pretty(snapshot).map_err(|e| SnapshotError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| SnapshotError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, contents).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
