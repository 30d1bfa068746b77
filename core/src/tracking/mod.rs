//! Tracked capability set
//!
//! - **Definitions**: what one tracked spell or item looks like at runtime
//! - **Registry**: the ordered, case-insensitive set built from configuration
//! - **Config loading**: TOML persistence of the tracked-name listing
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 TrackerConfig (TOML)                   │
//! │   spells = ["Fireball"], items = { "Healing Potion" }  │
//! └───────────────────────────────────────────────────────┘
//!                           │
//!                 CapabilityRegistry::from_config
//!                           │
//!                           ▼
//! ┌───────────────────────────────────────────────────────┐
//! │              TrackedCapability (runtime)               │
//! │   "Fireball": Spell in slot 12, cooling down 4s        │
//! └───────────────────────────────────────────────────────┘
//! ```

mod config;
mod definitions;
mod registry;

pub use config::{ConfigError, default_config_dir, load_file, save_file};
pub use definitions::{CapabilityKind, TrackedCapability, name_key};
pub use registry::CapabilityRegistry;
