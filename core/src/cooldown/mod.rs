//! Cooldown polling
//!
//! Readings come from the client per capability: spells by spellbook slot,
//! items by the first known bag location (stacks of the same item share one
//! cooldown, so any location is representative).

pub mod clock;
mod state;

pub use state::CooldownState;

use crate::host::{CooldownReading, Host, ItemLocation, SpellSlot};

/// Where a cooldown reading can be taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTarget {
    Spell(SpellSlot),
    Item(ItemLocation),
}

/// Ask the client for the current cooldown of `target`.
pub fn poll(host: &dyn Host, target: PollTarget) -> CooldownReading {
    match target {
        PollTarget::Spell(slot) => host.spell_cooldown(slot),
        PollTarget::Item(location) => host.item_cooldown(location),
    }
}
