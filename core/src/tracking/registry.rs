use hashbrown::HashMap;
use spellwatch_types::TrackerConfig;

use crate::error::TrackerError;

use super::definitions::{TrackedCapability, name_key};

/// Ordered set of tracked capabilities with case-insensitive name lookup.
///
/// Order is configuration order: spells first, then items.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: Vec<TrackedCapability>,
    /// Lowercase name -> position in `entries`
    index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an unresolved registry from a configuration listing.
    /// Duplicate names keep their first occurrence.
    pub fn from_config(config: &TrackerConfig) -> Self {
        let mut registry = Self::new();

        let spells = config.spells.iter().map(TrackedCapability::spell);
        let items = config
            .items
            .iter()
            .map(|(name, icon)| TrackedCapability::item(name, Some(icon.clone())));

        for capability in spells.chain(items) {
            if let Err(err) = registry.insert(capability) {
                tracing::warn!(error = %err, "Skipping duplicate tracked name");
            }
        }
        registry
    }

    pub fn insert(&mut self, capability: TrackedCapability) -> Result<(), TrackerError> {
        let key = capability.key();
        if self.index.contains_key(&key) {
            return Err(TrackerError::AlreadyTracked(capability.name));
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(capability);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<TrackedCapability> {
        let position = self.index.remove(&name_key(name))?;
        let removed = self.entries.remove(position);
        self.rebuild_index();
        Some(removed)
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, capability) in self.entries.iter().enumerate() {
            self.index.insert(capability.key(), position);
        }
    }

    pub fn get(&self, name: &str) -> Option<&TrackedCapability> {
        self.index
            .get(&name_key(name))
            .and_then(|&position| self.entries.get(position))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TrackedCapability> {
        let position = *self.index.get(&name_key(name))?;
        self.entries.get_mut(position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name_key(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedCapability> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedCapability> {
        self.entries.iter_mut()
    }

    pub fn spells_mut(&mut self) -> impl Iterator<Item = &mut TrackedCapability> {
        self.entries.iter_mut().filter(|c| c.is_spell())
    }

    /// Display names of all tracked items
    pub fn item_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|c| c.is_item())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
