//! Simulated game client for the interactive shell.
//!
//! Stands in for the real client: a spellbook, a few bags and two clocks
//! that only move when the shell says so.

use std::collections::{BTreeMap, HashMap};

use spellwatch_core::host::IconRef;
use spellwatch_core::{CooldownReading, Host, ItemLocation, SpellSlot, SpellbookTab, VisualSink};

const BAG_COUNT: u32 = 4;
const SLOTS_PER_BAG: u32 = 16;

/// Uptime the simulated client reports at startup
const INITIAL_UPTIME_SECS: f64 = 3_600.0;

#[derive(Debug, Clone)]
pub struct SimHost {
    /// Spell names per tab
    tabs: Vec<Vec<String>>,
    /// Lowercase spell name -> (start, duration)
    spell_cooldowns: HashMap<String, (f64, f64)>,
    bags: BTreeMap<ItemLocation, String>,
    /// Lowercase item name -> (start, duration), shared by every stack
    item_cooldowns: HashMap<String, (f64, f64)>,
    uptime: f64,
    wall: f64,
}

impl SimHost {
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            tabs: vec![Vec::new()],
            spell_cooldowns: HashMap::new(),
            bags: BTreeMap::new(),
            item_cooldowns: HashMap::new(),
            uptime: INITIAL_UPTIME_SECS,
            wall: now.timestamp_millis() as f64 / 1000.0,
        }
    }

    /// Append a spell to a tab, creating tabs as needed.
    pub fn learn(&mut self, name: &str, tab: usize) {
        while self.tabs.len() <= tab {
            self.tabs.push(Vec::new());
        }
        self.tabs[tab].push(name.to_string());
    }

    pub fn knows(&self, name: &str) -> bool {
        self.tabs
            .iter()
            .flatten()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Start a spell cooldown now.
    pub fn cast(&mut self, name: &str, duration: f64) {
        self.spell_cooldowns
            .insert(name.to_lowercase(), (self.uptime, duration));
    }

    /// Put one stack into the first free slot.
    pub fn put_item(&mut self, name: &str) -> Option<ItemLocation> {
        let free = all_slots().find(|location| !self.bags.contains_key(location))?;
        self.bags.insert(free, item_link(name));
        Some(free)
    }

    /// Remove the first stack of `name`.
    pub fn take_item(&mut self, name: &str) -> Option<ItemLocation> {
        let location = self.find_item(name)?;
        self.bags.remove(&location);
        Some(location)
    }

    /// Start the shared cooldown of an item that is in the bags.
    pub fn use_item(&mut self, name: &str, duration: f64) -> bool {
        if self.find_item(name).is_none() {
            return false;
        }
        self.item_cooldowns
            .insert(name.to_lowercase(), (self.uptime, duration));
        true
    }

    pub fn advance(&mut self, secs: f64) {
        self.uptime += secs;
        self.wall += secs;
    }

    fn find_item(&self, name: &str) -> Option<ItemLocation> {
        self.bags
            .iter()
            .find(|(_, link)| link_name(link).is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|(location, _)| *location)
    }

    fn spell_at(&self, slot: SpellSlot) -> Option<&String> {
        let index = slot.0.checked_sub(1)? as usize;
        self.tabs.iter().flatten().nth(index)
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SimHost {
    fn spellbook_tabs(&self) -> Vec<SpellbookTab> {
        let mut offset = 0;
        self.tabs
            .iter()
            .map(|tab| {
                let count = tab.len() as u32;
                let entry = SpellbookTab { offset, count };
                offset += count;
                entry
            })
            .collect()
    }

    fn spell_name(&self, slot: SpellSlot) -> Option<String> {
        self.spell_at(slot).cloned()
    }

    fn spell_texture(&self, slot: SpellSlot) -> Option<IconRef> {
        self.spell_at(slot).map(|name| icon_path(name))
    }

    fn spell_cooldown(&self, slot: SpellSlot) -> CooldownReading {
        self.spell_at(slot)
            .and_then(|name| self.spell_cooldowns.get(&name.to_lowercase()))
            .map(|&(start, duration)| CooldownReading::new(start, duration, true))
            .unwrap_or_else(CooldownReading::idle)
    }

    fn storage_slots(&self) -> Vec<ItemLocation> {
        all_slots().collect()
    }

    fn item_link(&self, location: ItemLocation) -> Option<String> {
        self.bags.get(&location).cloned()
    }

    fn item_texture(&self, location: ItemLocation) -> Option<IconRef> {
        self.bags
            .get(&location)
            .and_then(|link| link_name(link))
            .map(icon_path)
    }

    fn item_cooldown(&self, location: ItemLocation) -> CooldownReading {
        self.bags
            .get(&location)
            .and_then(|link| link_name(link))
            .and_then(|name| self.item_cooldowns.get(&name.to_lowercase()))
            .map(|&(start, duration)| CooldownReading::new(start, duration, true))
            .unwrap_or_else(CooldownReading::idle)
    }

    fn wall_clock(&self) -> f64 {
        self.wall
    }

    fn uptime(&self) -> f64 {
        self.uptime
    }
}

fn all_slots() -> impl Iterator<Item = ItemLocation> {
    (0..BAG_COUNT).flat_map(|bag| (1..=SLOTS_PER_BAG).map(move |slot| ItemLocation::new(bag, slot)))
}

fn item_link(name: &str) -> String {
    format!("|cffffffff|Hitem:0:0:0:0|h[{name}]|h|r")
}

fn link_name(link: &str) -> Option<&str> {
    spellwatch_core::availability::name_from_link(link)
}

fn icon_path(name: &str) -> IconRef {
    format!("Interface\\Icons\\{}", name.replace(' ', "_"))
}

/// Prints every visual update to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    pub quiet: bool,
}

impl VisualSink for ConsoleSink {
    fn on_capability_added(&mut self, name: &str, icon: Option<&str>) {
        if !self.quiet {
            println!("  [+] {name} ({})", icon.unwrap_or("no icon"));
        }
    }

    fn on_capability_removed(&mut self, name: &str) {
        if !self.quiet {
            println!("  [-] {name}");
        }
    }

    fn on_cooldown_observation(&mut self, name: &str, reading: CooldownReading) {
        if self.quiet {
            return;
        }
        if reading.duration > 0.0 {
            println!("  [cd] {name}: {:.1}s cooldown", reading.duration);
        } else {
            println!("  [cd] {name}: ready");
        }
    }

    fn on_availability_changed(&mut self, name: &str, missing: bool, alpha: f32) {
        if self.quiet {
            return;
        }
        let state = if missing { "not in bags" } else { "available" };
        println!("  [bag] {name}: {state} (alpha {alpha})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_slots_run_across_tabs() {
        let mut host = SimHost::new();
        host.learn("Attack", 0);
        host.learn("Fireball", 1);
        host.learn("Frost Nova", 1);

        let tabs = host.spellbook_tabs();
        assert_eq!(tabs[1], SpellbookTab { offset: 1, count: 2 });
        assert_eq!(host.spell_name(SpellSlot(3)).as_deref(), Some("Frost Nova"));
        assert_eq!(host.spell_name(SpellSlot(0)), None);
    }

    #[test]
    fn test_item_cooldown_follows_stack() {
        let mut host = SimHost::new();
        assert!(!host.use_item("Healing Potion", 60.0));

        host.put_item("Healing Potion");
        let second = host.put_item("Healing Potion").unwrap();
        assert!(host.use_item("healing potion", 60.0));
        assert_eq!(host.item_cooldown(second).duration, 60.0);

        assert_eq!(host.take_item("Healing Potion"), Some(ItemLocation::new(0, 1)));
        assert_eq!(host.item_link(ItemLocation::new(0, 1)), None);
    }
}
