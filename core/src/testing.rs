//! Scripted client and recording sink for unit tests.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use crate::host::{
    CooldownReading, Host, IconRef, ItemLocation, SpellSlot, SpellbookTab, VisualSink,
};

const BAGS: u32 = 2;
const SLOTS_PER_BAG: u32 = 4;

pub fn item_link(name: &str) -> String {
    format!("|cffffffff|Hitem:{}:0:0:0|h[{}]|h|r", name.len(), name)
}

/// In-memory client with call counters.
#[derive(Debug, Default)]
pub struct FakeHost {
    tabs: Vec<SpellbookTab>,
    spells: HashMap<SpellSlot, String>,
    /// Lowercase spell name -> reading, so cooldowns follow the spell when slots shift
    spell_cooldowns: HashMap<String, CooldownReading>,
    bags: BTreeMap<ItemLocation, String>,
    /// Lowercase item name -> reading shared by every stack of that item
    item_cooldowns: HashMap<String, CooldownReading>,
    pub uptime: f64,
    pub wall: f64,

    pub storage_scans: Cell<usize>,
    pub link_reads: Cell<usize>,
    pub item_polls: Cell<usize>,
    pub spell_polls: Cell<usize>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            uptime: 1_000.0,
            wall: 1_700_000_000.0,
            ..Self::default()
        }
    }

    /// Replace the spellbook. Each inner slice is one tab.
    pub fn set_spellbook(&mut self, tabs: &[&[&str]]) {
        self.tabs.clear();
        self.spells.clear();
        let mut offset = 0;
        for tab in tabs {
            self.tabs.push(SpellbookTab {
                offset,
                count: tab.len() as u32,
            });
            for (i, name) in tab.iter().enumerate() {
                self.spells
                    .insert(SpellSlot(offset + i as u32 + 1), name.to_string());
            }
            offset += tab.len() as u32;
        }
    }

    pub fn set_spell_cooldown(&mut self, name: &str, start: f64, duration: f64) {
        self.spell_cooldowns.insert(
            name.to_lowercase(),
            CooldownReading::new(start, duration, true),
        );
    }

    pub fn put_item(&mut self, location: ItemLocation, name: &str) {
        self.bags.insert(location, item_link(name));
    }

    pub fn take_item(&mut self, location: ItemLocation) {
        self.bags.remove(&location);
    }

    pub fn set_item_cooldown(&mut self, name: &str, start: f64, duration: f64) {
        self.item_cooldowns.insert(
            name.to_lowercase(),
            CooldownReading::new(start, duration, true),
        );
    }

    pub fn advance(&mut self, secs: f64) {
        self.uptime += secs;
        self.wall += secs;
    }

    pub fn reset_counters(&self) {
        self.storage_scans.set(0);
        self.link_reads.set(0);
        self.item_polls.set(0);
        self.spell_polls.set(0);
    }

    fn item_name_at(&self, location: ItemLocation) -> Option<String> {
        let link = self.bags.get(&location)?;
        let start = link.find("|h[")? + 3;
        let end = link[start..].find("]|h")? + start;
        Some(link[start..end].to_lowercase())
    }
}

impl Host for FakeHost {
    fn spellbook_tabs(&self) -> Vec<SpellbookTab> {
        self.tabs.clone()
    }

    fn spell_name(&self, slot: SpellSlot) -> Option<String> {
        self.spells.get(&slot).cloned()
    }

    fn spell_texture(&self, slot: SpellSlot) -> Option<IconRef> {
        self.spells.get(&slot).map(|name| format!("icon:{name}"))
    }

    fn spell_cooldown(&self, slot: SpellSlot) -> CooldownReading {
        self.spell_polls.set(self.spell_polls.get() + 1);
        self.spells
            .get(&slot)
            .and_then(|name| self.spell_cooldowns.get(&name.to_lowercase()))
            .copied()
            .unwrap_or_else(CooldownReading::idle)
    }

    fn storage_slots(&self) -> Vec<ItemLocation> {
        self.storage_scans.set(self.storage_scans.get() + 1);
        (0..BAGS)
            .flat_map(|bag| (1..=SLOTS_PER_BAG).map(move |slot| ItemLocation::new(bag, slot)))
            .collect()
    }

    fn item_link(&self, location: ItemLocation) -> Option<String> {
        self.link_reads.set(self.link_reads.get() + 1);
        self.bags.get(&location).cloned()
    }

    fn item_texture(&self, location: ItemLocation) -> Option<IconRef> {
        self.item_name_at(location).map(|name| format!("icon:{name}"))
    }

    fn item_cooldown(&self, location: ItemLocation) -> CooldownReading {
        self.item_polls.set(self.item_polls.get() + 1);
        self.item_name_at(location)
            .and_then(|name| self.item_cooldowns.get(&name))
            .copied()
            .unwrap_or_else(CooldownReading::idle)
    }

    fn wall_clock(&self) -> f64 {
        self.wall
    }

    fn uptime(&self) -> f64 {
        self.uptime
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Added { name: String, icon: Option<String> },
    Removed(String),
    Cooldown { name: String, reading: CooldownReading },
    Availability { name: String, missing: bool, alpha: f32 },
}

/// Sink that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn cooldowns_for(&self, name: &str) -> Vec<CooldownReading> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Cooldown { name: n, reading } if n == name => Some(*reading),
                _ => None,
            })
            .collect()
    }

    pub fn availability_for(&self, name: &str) -> Vec<(bool, f32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Availability {
                    name: n,
                    missing,
                    alpha,
                } if n == name => Some((*missing, *alpha)),
                _ => None,
            })
            .collect()
    }

    pub fn added(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Added { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl VisualSink for RecordingSink {
    fn on_capability_added(&mut self, name: &str, icon: Option<&str>) {
        self.events.push(SinkEvent::Added {
            name: name.to_string(),
            icon: icon.map(str::to_string),
        });
    }

    fn on_capability_removed(&mut self, name: &str) {
        self.events.push(SinkEvent::Removed(name.to_string()));
    }

    fn on_cooldown_observation(&mut self, name: &str, reading: CooldownReading) {
        self.events.push(SinkEvent::Cooldown {
            name: name.to_string(),
            reading,
        });
    }

    fn on_availability_changed(&mut self, name: &str, missing: bool, alpha: f32) {
        self.events.push(SinkEvent::Availability {
            name: name.to_string(),
            missing,
            alpha,
        });
    }
}
