//! User-facing operations: list, add, remove, appearance tweaks, reload.
//!
//! Every operation returns a human-readable message on success and a
//! [`TrackerError`] whose `Display` text is the reason on failure. Failed
//! operations leave the tracker untouched.

use spellwatch_types::{TrackerConfig, format_remaining, validate_alpha, validate_name, validate_size};

use crate::cooldown::{self, PollTarget};
use crate::error::TrackerError;
use crate::host::{Host, VisualSink};
use crate::resolver;
use crate::tracking::{CapabilityKind, CapabilityRegistry, TrackedCapability};

use super::{CooldownTracker, bind_spell, publish};

/// Status of one tracked capability, for listings.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    Ready,
    CoolingDown { remaining: f64 },
    /// Item not in the bags
    Missing,
    /// Spell not in the spellbook
    NotFound,
    /// Item not scanned yet
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityStatus {
    pub name: String,
    pub is_spell: bool,
    pub status: StatusKind,
}

impl std::fmt::Display for CapabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_spell { "spell" } else { "item" };
        write!(f, "{} ({kind}): ", self.name)?;
        match &self.status {
            StatusKind::Ready => write!(f, "ready"),
            StatusKind::CoolingDown { remaining } => {
                write!(f, "cooling down, {} left", format_remaining(*remaining))
            }
            StatusKind::Missing => write!(f, "not in bags"),
            StatusKind::NotFound => write!(f, "not found in spellbook"),
            StatusKind::Pending => write!(f, "not scanned yet"),
        }
    }
}

impl CooldownTracker {
    /// Every tracked capability with its current status, in configuration order.
    pub fn list(&self, host: &dyn Host) -> Vec<CapabilityStatus> {
        let uptime = host.uptime();
        let wall = host.wall_clock();

        self.registry
            .iter()
            .map(|capability| {
                let status = match capability.kind {
                    CapabilityKind::Spell { slot: None } => StatusKind::NotFound,
                    CapabilityKind::Item => match self.availability.presence(&capability.name) {
                        Some(presence) if presence.is_missing() => StatusKind::Missing,
                        Some(presence) if presence.locations().is_empty() => StatusKind::Pending,
                        None => StatusKind::Pending,
                        Some(_) => cooldown_status(capability, uptime, wall),
                    },
                    CapabilityKind::Spell { slot: Some(_) } => {
                        cooldown_status(capability, uptime, wall)
                    }
                };
                CapabilityStatus {
                    name: capability.name.clone(),
                    is_spell: capability.is_spell(),
                    status,
                }
            })
            .collect()
    }

    /// Start tracking `name`: as a spell if the spellbook has it, otherwise as
    /// an item if it is in the bags. Items cannot be added during combat.
    pub fn add(
        &mut self,
        name: &str,
        host: &dyn Host,
        sink: &mut dyn VisualSink,
    ) -> Result<String, TrackerError> {
        let name = validate_name(name)?;
        if self.registry.contains(name) {
            return Err(TrackerError::AlreadyTracked(name.to_string()));
        }

        if let Ok(handle) = resolver::resolve_spell(host, name) {
            let mut capability = TrackedCapability::spell(name);
            bind_spell(&mut capability, handle, sink);
            if let Some(slot) = capability.spell_slot() {
                let reading = cooldown::poll(host, PollTarget::Spell(slot));
                publish(&mut capability, reading, host.uptime(), sink);
            }
            self.registry.insert(capability)?;
            self.config.spells.push(name.to_string());
            tracing::info!(name, "Now tracking spell");
            return Ok(format!("Now tracking spell '{name}'"));
        }

        if self.in_combat {
            return Err(TrackerError::InCombat(name.to_string()));
        }
        let Some(location) = self.availability.locate(host, name) else {
            return Err(TrackerError::NotFound(name.to_string()));
        };

        let icon = host.item_texture(location);
        let capability = TrackedCapability::item(name, icon.clone());
        sink.on_capability_added(name, icon.as_deref());
        self.registry.insert(capability)?;
        self.availability.track(name);
        self.config
            .items
            .insert(name.to_string(), icon.unwrap_or_default());

        self.availability.request_scan();
        if self.availability.scan_due(self.clock) {
            self.run_scan(host, sink);
        }

        tracing::info!(name, %location, "Now tracking item");
        Ok(format!("Now tracking item '{name}'"))
    }

    /// Stop tracking `name` and drop its icon.
    pub fn remove(&mut self, name: &str, sink: &mut dyn VisualSink) -> Result<String, TrackerError> {
        let name = validate_name(name)?;
        let removed = self
            .drop_capability(name, sink)
            .ok_or_else(|| TrackerError::NotTracked(name.to_string()))?;
        self.config.remove(&removed.name);

        tracing::info!(name = %removed.name, "Stopped tracking");
        Ok(format!("No longer tracking '{}'", removed.name))
    }

    pub fn set_alpha(&mut self, alpha: f32, sink: &mut dyn VisualSink) -> Result<String, TrackerError> {
        let alpha = validate_alpha(alpha)?;
        self.config.alpha = alpha;

        for capability in self.registry.iter().filter(|c| has_visual(c)) {
            let missing = self
                .availability
                .presence(&capability.name)
                .is_some_and(|p| p.is_missing());
            if !missing {
                sink.on_availability_changed(&capability.name, false, alpha);
            }
        }
        Ok(format!("Alpha set to {alpha}"))
    }

    pub fn set_size(&mut self, size: f32) -> Result<String, TrackerError> {
        let size = validate_size(size)?;
        self.config.size = size;
        Ok(format!("Size set to {size}"))
    }

    pub fn set_position(&mut self, name: &str, x: f32, y: f32) -> Result<String, TrackerError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TrackerError::InvalidInput(format!(
                "invalid position: ({x}, {y})"
            )));
        }
        let capability = self
            .registry
            .get(name)
            .ok_or_else(|| TrackerError::NotTracked(name.to_string()))?;
        let name = capability.name.clone();
        self.positions.insert(name.clone(), [x, y]);
        Ok(format!("Moved '{name}' to ({x}, {y})"))
    }

    /// Replace the configuration, e.g. after the file was edited externally.
    ///
    /// Capabilities kept across the reload keep their cooldown state and
    /// dropped ones lose their icon. New spells are resolved right away; new
    /// items wait for the next storage scan.
    pub fn reload(&mut self, config: TrackerConfig, host: &dyn Host, sink: &mut dyn VisualSink) {
        let stale: Vec<String> = self
            .registry
            .iter()
            .filter(|c| !config.contains(&c.name))
            .map(|c| c.name.clone())
            .collect();
        for name in &stale {
            self.drop_capability(name, sink);
        }

        let mut fresh = CapabilityRegistry::from_config(&config);

        // Same name, different kind: drop the old one first
        for capability in self.registry.iter() {
            let kind_changed = fresh
                .get(&capability.name)
                .is_some_and(|c| c.is_item() != capability.is_item());
            if !kind_changed {
                continue;
            }
            if has_visual(capability) {
                sink.on_capability_removed(&capability.name);
            }
            if capability.is_item() {
                self.availability.forget(&capability.name);
            }
        }

        for capability in fresh.iter_mut() {
            if let Some(existing) = self.registry.get(&capability.name)
                && existing.is_item() == capability.is_item()
            {
                *capability = existing.clone();
            } else if capability.is_item() {
                self.availability.track(&capability.name);
                sink.on_capability_added(&capability.name, capability.icon.as_deref());
            }
        }

        self.registry = fresh;
        self.config = config;
        self.resolve_spells(host, sink);
        self.dirty = true;

        // New items are discovered by the next scan the throttle and combat allow
        self.availability.request_scan();
        if !self.in_combat && self.availability.scan_due(self.clock) {
            self.run_scan(host, sink);
        }

        tracing::info!(
            tracked = self.registry.len(),
            dropped = stale.len(),
            "Tracker configuration reloaded"
        );
    }

    /// Remove a capability and its icon without touching the configuration.
    fn drop_capability(&mut self, name: &str, sink: &mut dyn VisualSink) -> Option<TrackedCapability> {
        let removed = self.registry.remove(name)?;
        if removed.is_item() {
            self.availability.forget(&removed.name);
        }
        self.positions.remove(&removed.name);
        if has_visual(&removed) {
            sink.on_capability_removed(&removed.name);
        }
        Some(removed)
    }
}

fn cooldown_status(capability: &TrackedCapability, uptime: f64, wall: f64) -> StatusKind {
    match capability.cooldown.remaining(uptime, wall) {
        Some(remaining) => StatusKind::CoolingDown { remaining },
        None => StatusKind::Ready,
    }
}

/// Whether the presentation layer currently has an icon for this capability
fn has_visual(capability: &TrackedCapability) -> bool {
    match capability.kind {
        CapabilityKind::Spell { slot } => slot.is_some(),
        CapabilityKind::Item => true,
    }
}
