//! Item availability
//!
//! Decides per tracked item whether it is currently in the player's bags.
//! State per item: `Unknown` → `Present { locations }` ↔ `Missing`.
//!
//! Full scans are expensive, so they are throttled and skipped in combat;
//! during combat only already-known locations are re-checked.

mod item_link;
mod reconciler;

pub use item_link::{LinkNameCache, name_from_link};
pub use reconciler::{AvailabilityChange, AvailabilityReconciler, ItemPresence, SCAN_THROTTLE_SECS};

/// Alpha applied to the icon of an item that is not in the bags.
pub const MISSING_ALPHA: f32 = 0.3;
