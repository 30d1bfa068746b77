//! Cooldown state tracking for spells and bag items.
//!
//! The core resolves tracked names against the client's spellbook and bags,
//! polls cooldowns when something changed and tells a [`VisualSink`] what
//! to draw. The client is abstracted behind [`Host`].

pub mod availability;
pub mod cooldown;
pub mod error;
pub mod host;
pub mod resolver;
pub mod signals;
pub mod snapshot;
pub mod tracker;
pub mod tracking;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use error::TrackerError;
pub use host::{CooldownReading, Host, ItemLocation, SpellSlot, SpellbookTab, VisualSink};
pub use signals::{HostSignal, SignalHandler};
pub use snapshot::{TrackerSnapshot, load_snapshot, save_snapshot};
pub use tracker::{CapabilityStatus, CooldownTracker, StatusKind};
pub use spellwatch_types::{CountdownText, TrackerConfig, UrgencyTier, format_remaining};
