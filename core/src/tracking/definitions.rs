use crate::cooldown::CooldownState;
use crate::host::{IconRef, SpellSlot};

/// Lookup key for a capability name. Names compare case-insensitively.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// What kind of capability is tracked. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    /// A spellbook entry. `slot` is `None` until the name resolves.
    Spell { slot: Option<SpellSlot> },
    /// A bag item. Locations live with the availability reconciler.
    Item,
}

/// One tracked spell or item.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedCapability {
    /// Display name, as configured
    pub name: String,
    pub icon: Option<IconRef>,
    pub kind: CapabilityKind,
    pub cooldown: CooldownState,
}

impl TrackedCapability {
    pub fn spell(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            kind: CapabilityKind::Spell { slot: None },
            cooldown: CooldownState::default(),
        }
    }

    pub fn item(name: impl Into<String>, default_icon: Option<IconRef>) -> Self {
        Self {
            name: name.into(),
            icon: default_icon,
            kind: CapabilityKind::Item,
            cooldown: CooldownState::default(),
        }
    }

    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    pub fn is_spell(&self) -> bool {
        matches!(self.kind, CapabilityKind::Spell { .. })
    }

    pub fn is_item(&self) -> bool {
        matches!(self.kind, CapabilityKind::Item)
    }

    /// Current spellbook slot, for resolved spells only
    pub fn spell_slot(&self) -> Option<SpellSlot> {
        match self.kind {
            CapabilityKind::Spell { slot } => slot,
            CapabilityKind::Item => None,
        }
    }
}
