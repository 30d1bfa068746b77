use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SIZE: f32 = 36.0;
pub const MIN_SIZE: f32 = 10.0;
pub const MAX_SIZE: f32 = 200.0;
pub const DEFAULT_ALPHA: f32 = 1.0;
pub const DEFAULT_UPDATE_INTERVAL_SECS: f64 = 0.1;

/// User-editable tracker configuration.
///
/// Every field has a serde default so config files written by older
/// versions keep loading when fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Tracked spell names, in display order
    #[serde(default)]
    pub spells: Vec<String>,

    /// Tracked item name -> default icon reference
    #[serde(default)]
    pub items: BTreeMap<String, String>,

    /// Icon edge length in pixels
    #[serde(default = "default_size")]
    pub size: f32,

    /// Icon opacity while the capability is available
    #[serde(default = "default_alpha")]
    pub alpha: f32,

    /// Minimum time between two update passes
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: f64,

    #[serde(default = "default_true")]
    pub show_countdown_text: bool,

    #[serde(default)]
    pub locked: bool,
}

fn default_size() -> f32 {
    DEFAULT_SIZE
}

fn default_alpha() -> f32 {
    DEFAULT_ALPHA
}

fn default_update_interval() -> f64 {
    DEFAULT_UPDATE_INTERVAL_SECS
}

fn default_true() -> bool {
    true
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            spells: Vec::new(),
            items: BTreeMap::new(),
            size: DEFAULT_SIZE,
            alpha: DEFAULT_ALPHA,
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
            show_countdown_text: true,
            locked: false,
        }
    }
}

impl TrackerConfig {
    /// Whether `name` is listed as a spell or an item (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.spells.iter().any(|s| s.to_lowercase() == name)
            || self.items.keys().any(|i| i.to_lowercase() == name)
    }

    /// Remove `name` from whichever listing holds it. Returns true if anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.to_lowercase();
        let spells_before = self.spells.len();
        self.spells.retain(|s| s.to_lowercase() != name);

        let items_before = self.items.len();
        self.items.retain(|i, _| i.to_lowercase() != name);

        spells_before != self.spells.len() || items_before != self.items.len()
    }

    /// Update interval clamped to something the scheduler can use.
    pub fn effective_interval(&self) -> f64 {
        if self.update_interval_secs.is_finite() && self.update_interval_secs > 0.0 {
            self.update_interval_secs
        } else {
            DEFAULT_UPDATE_INTERVAL_SECS
        }
    }
}

/// A user-supplied value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

pub fn validate_size(size: f32) -> Result<f32, ValidationError> {
    if size.is_finite() && (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(ValidationError {
            field: "size",
            message: format!("{size} is outside {MIN_SIZE}..={MAX_SIZE}"),
        })
    }
}

pub fn validate_alpha(alpha: f32) -> Result<f32, ValidationError> {
    if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
        Ok(alpha)
    } else {
        Err(ValidationError {
            field: "alpha",
            message: format!("{alpha} is outside 0..=1"),
        })
    }
}

/// Trim a capability name and reject empty input.
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValidationError {
            field: "name",
            message: "name must not be empty".to_string(),
        })
    } else {
        Ok(trimmed)
    }
}
