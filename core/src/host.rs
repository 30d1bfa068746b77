//! Ports to the game client hosting the tracker.
//!
//! The core never talks to the client directly. Everything it needs to know
//! (spellbook contents, bag contents, cooldown readings, clocks) comes in
//! through [`Host`], and everything it wants drawn goes out through
//! [`VisualSink`]. The shell implements both against a simulated client;
//! tests implement them with scripted fakes.

use serde::{Deserialize, Serialize};

/// Opaque icon/texture reference understood by the presentation layer.
pub type IconRef = String;

/// One page of the spellbook. Slots `offset + 1 ..= offset + count` belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellbookTab {
    pub offset: u32,
    pub count: u32,
}

impl SpellbookTab {
    pub fn slots(&self) -> impl Iterator<Item = SpellSlot> + use<> {
        let first = self.offset + 1;
        let last = self.offset + self.count;
        (first..=last).map(SpellSlot)
    }
}

/// Spellbook slot index. Only stable until the next spellbook change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellSlot(pub u32);

/// Bag/slot position of an item stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemLocation {
    pub container: u32,
    pub slot: u32,
}

impl ItemLocation {
    pub const fn new(container: u32, slot: u32) -> Self {
        Self { container, slot }
    }
}

impl std::fmt::Display for ItemLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.container, self.slot)
    }
}

/// Raw cooldown reading as the client reports it.
///
/// `start` is on the client's uptime clock (seconds); `start == 0` or
/// `duration == 0` means no cooldown is running.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CooldownReading {
    pub start: f64,
    pub duration: f64,
    pub enabled: bool,
}

impl CooldownReading {
    pub const fn new(start: f64, duration: f64, enabled: bool) -> Self {
        Self {
            start,
            duration,
            enabled,
        }
    }

    /// Reading reported when nothing is cooling down.
    pub const fn idle() -> Self {
        Self::new(0.0, 0.0, true)
    }
}

/// Read-only queries against the game client.
pub trait Host {
    /// Spellbook pages, in display order
    fn spellbook_tabs(&self) -> Vec<SpellbookTab>;

    fn spell_name(&self, slot: SpellSlot) -> Option<String>;

    fn spell_texture(&self, slot: SpellSlot) -> Option<IconRef>;

    fn spell_cooldown(&self, slot: SpellSlot) -> CooldownReading;

    /// Every bag slot the client exposes, whether occupied or not
    fn storage_slots(&self) -> Vec<ItemLocation>;

    /// Item link of the stack at `location`, `None` when the slot is empty
    fn item_link(&self, location: ItemLocation) -> Option<String>;

    fn item_texture(&self, location: ItemLocation) -> Option<IconRef>;

    fn item_cooldown(&self, location: ItemLocation) -> CooldownReading;

    /// Wall clock, seconds since the Unix epoch
    fn wall_clock(&self) -> f64;

    /// Client uptime in seconds. Backed by a 32-bit millisecond counter, so it wraps.
    fn uptime(&self) -> f64;
}

/// Receives everything the tracker wants rendered.
pub trait VisualSink {
    /// A capability resolved and should get an icon
    fn on_capability_added(&mut self, name: &str, icon: Option<&str>);

    fn on_capability_removed(&mut self, name: &str);

    /// New cooldown values. `start == 0 && duration == 0` clears the sweep and timer.
    fn on_cooldown_observation(&mut self, name: &str, reading: CooldownReading);

    fn on_availability_changed(&mut self, name: &str, missing: bool, alpha: f32);
}
