use hashbrown::HashMap;

use crate::host::{Host, ItemLocation};
use crate::tracking::name_key;

use super::item_link::LinkNameCache;

/// Minimum time between two full storage scans, in seconds.
pub const SCAN_THROTTLE_SECS: f64 = 0.5;

/// Where a tracked item currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemPresence {
    /// Not scanned yet
    #[default]
    Unknown,
    Present {
        locations: Vec<ItemLocation>,
    },
    Missing,
}

impl ItemPresence {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn locations(&self) -> &[ItemLocation] {
        match self {
            Self::Present { locations } => locations,
            _ => &[],
        }
    }
}

/// A tracked item entered or left the Missing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityChange {
    pub name: String,
    pub missing: bool,
    /// Location to poll right away (the item just showed up, possibly mid-cooldown)
    pub repoll_at: Option<ItemLocation>,
}

#[derive(Debug, Clone)]
struct ItemEntry {
    name: String,
    presence: ItemPresence,
}

/// Tracks which bag locations hold each tracked item.
///
/// Full scans walk every bag slot and are throttled; `verify_known` only
/// re-reads locations already known and is cheap enough for combat.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityReconciler {
    /// Lowercase item name -> entry
    items: HashMap<String, ItemEntry>,
    link_names: LinkNameCache,
    last_scan_at: Option<f64>,
    scan_pending: bool,
    scan_count: usize,
}

impl AvailabilityReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an item in the Unknown state (no-op if already tracked).
    pub fn track(&mut self, name: &str) {
        self.items
            .entry(name_key(name))
            .or_insert_with(|| ItemEntry {
                name: name.to_string(),
                presence: ItemPresence::Unknown,
            });
    }

    pub fn forget(&mut self, name: &str) {
        self.items.remove(&name_key(name));
    }

    pub fn presence(&self, name: &str) -> Option<&ItemPresence> {
        self.items.get(&name_key(name)).map(|e| &e.presence)
    }

    /// First known location, used as the representative for cooldown polls
    pub fn first_location(&self, name: &str) -> Option<ItemLocation> {
        self.presence(name)
            .and_then(|p| p.locations().first().copied())
    }

    // ─── Throttle ────────────────────────────────────────────────────────────

    /// Record that the inventory changed and a full scan is wanted.
    pub fn request_scan(&mut self) {
        self.scan_pending = true;
    }

    pub fn scan_pending(&self) -> bool {
        self.scan_pending
    }

    /// Whether a pending scan may run at `now` without breaking the throttle.
    pub fn scan_due(&self, now: f64) -> bool {
        self.scan_pending
            && self
                .last_scan_at
                .is_none_or(|last| now - last >= SCAN_THROTTLE_SECS)
    }

    /// Number of full scans performed so far
    pub fn scan_count(&self) -> usize {
        self.scan_count
    }

    // ─── Scans ───────────────────────────────────────────────────────────────

    /// Walk every storage slot and rebuild the location list of every tracked item.
    ///
    /// Ignores the throttle; callers check [`Self::scan_due`] first.
    pub fn scan_all(&mut self, host: &dyn Host, now: f64) -> Vec<AvailabilityChange> {
        self.scan_pending = false;
        self.last_scan_at = Some(now);
        self.scan_count += 1;

        let mut candidates: HashMap<String, Vec<ItemLocation>> = self
            .items
            .keys()
            .map(|key| (key.clone(), Vec::new()))
            .collect();

        for location in host.storage_slots() {
            let Some(link) = host.item_link(location) else {
                continue;
            };
            let Some(name) = self.link_names.name_for(&link) else {
                continue;
            };
            if let Some(found) = candidates.get_mut(&name_key(&name)) {
                found.push(location);
            }
        }

        let mut changes = Vec::new();
        for (key, locations) in candidates {
            let Some(entry) = self.items.get_mut(&key) else {
                continue;
            };
            let was_present = matches!(entry.presence, ItemPresence::Present { .. });

            if locations.is_empty() {
                if !entry.presence.is_missing() {
                    changes.push(AvailabilityChange {
                        name: entry.name.clone(),
                        missing: true,
                        repoll_at: None,
                    });
                }
                entry.presence = ItemPresence::Missing;
            } else {
                if !was_present {
                    changes.push(AvailabilityChange {
                        name: entry.name.clone(),
                        missing: false,
                        repoll_at: locations.first().copied(),
                    });
                }
                entry.presence = ItemPresence::Present { locations };
            }
        }

        tracing::debug!(
            tracked = self.items.len(),
            changes = changes.len(),
            "Full storage scan"
        );
        changes
    }

    /// Re-read only the locations already known for present items and drop
    /// the ones that no longer hold the item. Never discovers new locations.
    pub fn verify_known(&mut self, host: &dyn Host) -> Vec<AvailabilityChange> {
        let mut changes = Vec::new();

        for (key, entry) in self.items.iter_mut() {
            let ItemPresence::Present { locations } = &mut entry.presence else {
                continue;
            };

            let link_names = &mut self.link_names;
            locations.retain(|location| {
                host.item_link(*location)
                    .and_then(|link| link_names.name_for(&link))
                    .is_some_and(|name| name_key(&name) == *key)
            });

            if locations.is_empty() {
                entry.presence = ItemPresence::Missing;
                changes.push(AvailabilityChange {
                    name: entry.name.clone(),
                    missing: true,
                    repoll_at: None,
                });
            }
        }

        if !changes.is_empty() {
            tracing::debug!(changes = changes.len(), "Known-location check dropped items");
        }
        changes
    }

    /// First location holding `name`, found by walking storage without touching state.
    pub fn locate(&mut self, host: &dyn Host, name: &str) -> Option<ItemLocation> {
        let wanted = name_key(name);
        host.storage_slots().into_iter().find(|location| {
            host.item_link(*location)
                .and_then(|link| self.link_names.name_for(&link))
                .is_some_and(|found| name_key(&found) == wanted)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    const POTION: &str = "Healing Potion";

    fn reconciler_for(names: &[&str]) -> AvailabilityReconciler {
        let mut reconciler = AvailabilityReconciler::new();
        for name in names {
            reconciler.track(name);
        }
        reconciler
    }

    #[test]
    fn test_scan_without_item_marks_missing() {
        let host = FakeHost::new();
        let mut reconciler = reconciler_for(&[POTION]);

        let changes = reconciler.scan_all(&host, 0.0);
        assert_eq!(
            changes,
            vec![AvailabilityChange {
                name: POTION.into(),
                missing: true,
                repoll_at: None
            }]
        );
        assert_eq!(reconciler.presence(POTION), Some(&ItemPresence::Missing));
    }

    #[test]
    fn test_scan_collects_every_stack_and_requests_one_repoll() {
        let mut host = FakeHost::new();
        host.put_item(ItemLocation::new(0, 2), POTION);
        host.put_item(ItemLocation::new(1, 1), "healing potion");
        let mut reconciler = reconciler_for(&[POTION]);

        let changes = reconciler.scan_all(&host, 0.0);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].repoll_at, Some(ItemLocation::new(0, 2)));
        assert_eq!(
            reconciler.presence(POTION).unwrap().locations(),
            &[ItemLocation::new(0, 2), ItemLocation::new(1, 1)]
        );
    }

    #[test]
    fn test_repeated_scan_while_present_reports_nothing() {
        let mut host = FakeHost::new();
        host.put_item(ItemLocation::new(0, 1), POTION);
        let mut reconciler = reconciler_for(&[POTION]);

        reconciler.scan_all(&host, 0.0);
        host.put_item(ItemLocation::new(0, 3), POTION);
        assert!(reconciler.scan_all(&host, 1.0).is_empty());
        assert_eq!(reconciler.presence(POTION).unwrap().locations().len(), 2);
    }

    #[test]
    fn test_verify_known_drops_moved_stacks_without_discovering() {
        let mut host = FakeHost::new();
        host.put_item(ItemLocation::new(0, 1), POTION);
        let mut reconciler = reconciler_for(&[POTION]);
        reconciler.scan_all(&host, 0.0);
        host.reset_counters();

        // Moved to another bag: the known slot no longer matches
        host.take_item(ItemLocation::new(0, 1));
        host.put_item(ItemLocation::new(1, 4), POTION);

        let changes = reconciler.verify_known(&host);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].missing);
        assert_eq!(reconciler.presence(POTION), Some(&ItemPresence::Missing));
        assert_eq!(host.storage_scans.get(), 0);
        assert_eq!(host.link_reads.get(), 1);
    }

    #[test]
    fn test_verify_known_ignores_missing_and_unknown() {
        let host = FakeHost::new();
        let mut reconciler = reconciler_for(&[POTION, "Mana Potion"]);
        assert!(reconciler.verify_known(&host).is_empty());
        assert_eq!(reconciler.presence(POTION), Some(&ItemPresence::Unknown));
    }

    #[test]
    fn test_throttle_window() {
        let mut reconciler = reconciler_for(&[POTION]);
        assert!(!reconciler.scan_due(0.0));

        reconciler.request_scan();
        assert!(reconciler.scan_due(0.0));

        let host = FakeHost::new();
        reconciler.scan_all(&host, 10.0);
        reconciler.request_scan();
        assert!(!reconciler.scan_due(10.2));
        assert!(reconciler.scan_due(10.5));
    }

    #[test]
    fn test_locate_finds_untracked_name() {
        let mut host = FakeHost::new();
        host.put_item(ItemLocation::new(1, 2), "Hearthstone");
        let mut reconciler = AvailabilityReconciler::new();
        assert_eq!(
            reconciler.locate(&host, "hearthstone"),
            Some(ItemLocation::new(1, 2))
        );
        assert_eq!(reconciler.locate(&host, "Mana Potion"), None);
    }
}
