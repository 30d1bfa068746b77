//! Spell name resolution against the client's spellbook.
//!
//! Slot indices shift whenever the spellbook changes (a new rank learned, a
//! tab added), so a resolved slot is only trusted until the next
//! spellbook-changed signal or until [`check_slot`] finds it stale.
//! Items are not resolved here: their only handle is the bag location,
//! which the availability reconciler owns.

use crate::error::TrackerError;
use crate::host::{Host, IconRef, SpellSlot};

/// A spellbook entry matched to a tracked name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellHandle {
    pub slot: SpellSlot,
    pub icon: Option<IconRef>,
}

/// Find the first spellbook slot whose name matches `name` (case-insensitive).
pub fn resolve_spell(host: &dyn Host, name: &str) -> Result<SpellHandle, TrackerError> {
    let wanted = name.to_lowercase();

    for tab in host.spellbook_tabs() {
        for slot in tab.slots() {
            let Some(slot_name) = host.spell_name(slot) else {
                continue;
            };
            if slot_name.to_lowercase() == wanted {
                return Ok(SpellHandle {
                    slot,
                    icon: host.spell_texture(slot),
                });
            }
        }
    }

    Err(TrackerError::NotFound(name.to_string()))
}

/// Verify that `slot` still holds `name`.
pub fn check_slot(host: &dyn Host, name: &str, slot: SpellSlot) -> Result<(), TrackerError> {
    match host.spell_name(slot) {
        Some(current) if current.to_lowercase() == name.to_lowercase() => Ok(()),
        _ => Err(TrackerError::StaleHandle {
            name: name.to_string(),
            slot,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    #[test]
    fn test_resolves_across_tabs_case_insensitively() {
        let mut host = FakeHost::new();
        host.set_spellbook(&[&["Attack", "Fireball"], &["Frost Nova", "Blink"]]);

        let handle = resolve_spell(&host, "frost nova").unwrap();
        assert_eq!(handle.slot, SpellSlot(3));
        assert_eq!(handle.icon.as_deref(), Some("icon:Frost Nova"));
    }

    #[test]
    fn test_first_match_wins() {
        let mut host = FakeHost::new();
        host.set_spellbook(&[&["Fireball", "Fireball"]]);
        assert_eq!(resolve_spell(&host, "Fireball").unwrap().slot, SpellSlot(1));
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let mut host = FakeHost::new();
        host.set_spellbook(&[&["Attack"]]);
        assert_eq!(
            resolve_spell(&host, "Pyroblast"),
            Err(TrackerError::NotFound("Pyroblast".to_string()))
        );
    }

    #[test]
    fn test_shifted_slot_is_stale() {
        let mut host = FakeHost::new();
        host.set_spellbook(&[&["Attack", "Fireball"]]);
        let handle = resolve_spell(&host, "Fireball").unwrap();
        assert!(check_slot(&host, "Fireball", handle.slot).is_ok());

        host.set_spellbook(&[&["Attack", "Arcane Intellect", "Fireball"]]);
        assert!(matches!(
            check_slot(&host, "Fireball", handle.slot),
            Err(TrackerError::StaleHandle { .. })
        ));
        assert_eq!(resolve_spell(&host, "Fireball").unwrap().slot, SpellSlot(3));
    }
}
