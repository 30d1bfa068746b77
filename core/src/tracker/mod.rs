//! Cooldown tracker
//!
//! [`CooldownTracker`] owns every piece of tracking state (capability
//! registry, availability, dirty flag, tick accumulator) and is the single
//! entry point for client signals. Each signal runs to completion; there is
//! no background work.
//!
//! ```text
//!   HostSignal ──► handle_signal ──┬─► resolver (spellbook changed)
//!                                  ├─► availability (inventory changed)
//!                                  └─► dirty flag ──► tick ──► poll ──► VisualSink
//! ```

mod commands;
mod persist;

pub use commands::{CapabilityStatus, StatusKind};

use std::collections::BTreeMap;

use spellwatch_types::{CountdownText, TrackerConfig, format_remaining};

use crate::availability::{AvailabilityChange, AvailabilityReconciler, MISSING_ALPHA};
use crate::cooldown::{self, PollTarget};
use crate::host::{Host, VisualSink};
use crate::resolver::{self, SpellHandle};
use crate::signals::{HostSignal, SignalHandler};
use crate::tracking::{CapabilityKind, CapabilityRegistry, TrackedCapability};

/// Tracks cooldowns and availability of the configured spells and items.
#[derive(Debug)]
pub struct CooldownTracker {
    config: TrackerConfig,
    registry: CapabilityRegistry,
    availability: AvailabilityReconciler,

    /// Icon positions by capability name, persisted with the snapshot
    positions: BTreeMap<String, [f32; 2]>,

    in_combat: bool,
    /// Set by cooldown signals and scans; gates the update pass
    dirty: bool,
    /// Seconds accumulated since the last update pass
    since_last_pass: f64,
    /// Seconds of ticks seen so far; time base for the scan throttle
    clock: f64,
    pass_count: usize,
}

impl CooldownTracker {
    /// Build an unresolved tracker. Call [`Self::initialize`] once the client is ready.
    pub fn new(config: TrackerConfig) -> Self {
        let registry = CapabilityRegistry::from_config(&config);
        let mut availability = AvailabilityReconciler::new();
        for name in registry.item_names() {
            availability.track(&name);
        }

        Self {
            config,
            registry,
            availability,
            positions: BTreeMap::new(),
            in_combat: false,
            dirty: true,
            since_last_pass: 0.0,
            clock: 0.0,
            pass_count: 0,
        }
    }

    /// Resolve every spell, scan storage once and publish initial cooldowns.
    pub fn initialize(&mut self, host: &dyn Host, sink: &mut dyn VisualSink) {
        self.resolve_spells(host, sink);

        for capability in self.registry.iter().filter(|c| c.is_item()) {
            sink.on_capability_added(&capability.name, capability.icon.as_deref());
        }

        self.run_scan(host, sink);
        self.update_pass(host, sink);

        tracing::info!(
            tracked = self.registry.len(),
            "Cooldown tracker initialized"
        );
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn capability(&self, name: &str) -> Option<&TrackedCapability> {
        self.registry.get(name)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &TrackedCapability> {
        self.registry.iter()
    }

    pub fn availability(&self) -> &AvailabilityReconciler {
        &self.availability
    }

    pub fn in_combat(&self) -> bool {
        self.in_combat
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of update passes that actually polled
    pub fn pass_count(&self) -> usize {
        self.pass_count
    }

    pub fn positions(&self) -> &BTreeMap<String, [f32; 2]> {
        &self.positions
    }

    /// Countdown text for a capability; hidden when nothing is running.
    pub fn countdown(&self, name: &str, host: &dyn Host) -> CountdownText {
        if !self.config.show_countdown_text {
            return CountdownText::hidden();
        }
        self.registry
            .get(name)
            .and_then(|c| c.cooldown.remaining(host.uptime(), host.wall_clock()))
            .map(format_remaining)
            .unwrap_or_else(CountdownText::hidden)
    }

    // ─── Resolution ──────────────────────────────────────────────────────────

    /// (Re-)resolve every tracked spell against the current spellbook.
    fn resolve_spells(&mut self, host: &dyn Host, sink: &mut dyn VisualSink) {
        for capability in self.registry.spells_mut() {
            match resolver::resolve_spell(host, &capability.name) {
                Ok(handle) => bind_spell(capability, handle, sink),
                Err(err) => unbind_spell(capability, sink, &err),
            }
        }
    }

    // ─── Availability ────────────────────────────────────────────────────────

    fn run_scan(&mut self, host: &dyn Host, sink: &mut dyn VisualSink) {
        let changes = self.availability.scan_all(host, self.clock);
        self.apply_availability(changes, host, sink);
        self.dirty = true;
    }

    fn apply_availability(
        &mut self,
        changes: Vec<AvailabilityChange>,
        host: &dyn Host,
        sink: &mut dyn VisualSink,
    ) {
        let now = host.uptime();
        for change in changes {
            if change.missing {
                tracing::debug!(name = %change.name, "Item left the bags");
                sink.on_availability_changed(&change.name, true, MISSING_ALPHA);
                continue;
            }

            tracing::debug!(name = %change.name, "Item found in the bags");
            sink.on_availability_changed(&change.name, false, self.config.alpha);
            if let (Some(location), Some(capability)) =
                (change.repoll_at, self.registry.get_mut(&change.name))
            {
                let reading = cooldown::poll(host, PollTarget::Item(location));
                publish(capability, reading, now, sink);
            }
        }
    }

    fn on_inventory_changed(&mut self, host: &dyn Host, sink: &mut dyn VisualSink) {
        self.availability.request_scan();

        if self.in_combat {
            let changes = self.availability.verify_known(host);
            self.apply_availability(changes, host, sink);
            return;
        }

        if self.availability.scan_due(self.clock) {
            self.run_scan(host, sink);
        }
    }

    // ─── Update pass ─────────────────────────────────────────────────────────

    fn on_tick(&mut self, elapsed: f64, host: &dyn Host, sink: &mut dyn VisualSink) {
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        self.clock += elapsed;

        if !self.in_combat && self.availability.scan_due(self.clock) {
            self.run_scan(host, sink);
        }

        self.since_last_pass += elapsed;
        if self.since_last_pass < self.config.effective_interval() {
            return;
        }
        self.since_last_pass = 0.0;

        if self.dirty {
            self.update_pass(host, sink);
        }
    }

    /// Poll every resolved spell and every present item once.
    fn update_pass(&mut self, host: &dyn Host, sink: &mut dyn VisualSink) {
        self.dirty = false;
        self.pass_count += 1;
        let now = host.uptime();

        for capability in self.registry.iter_mut() {
            let target = match capability.kind {
                CapabilityKind::Spell { slot: Some(slot) } => {
                    match resolver::check_slot(host, &capability.name, slot) {
                        Ok(()) => PollTarget::Spell(slot),
                        Err(err) => {
                            tracing::debug!(error = %err, "Re-resolving spell");
                            match resolver::resolve_spell(host, &capability.name) {
                                Ok(handle) => {
                                    let slot = handle.slot;
                                    bind_spell(capability, handle, sink);
                                    PollTarget::Spell(slot)
                                }
                                Err(err) => {
                                    unbind_spell(capability, sink, &err);
                                    continue;
                                }
                            }
                        }
                    }
                }
                CapabilityKind::Spell { slot: None } => continue,
                CapabilityKind::Item => match self.availability.first_location(&capability.name)
                {
                    Some(location) => PollTarget::Item(location),
                    // Not in the bags: a running cooldown keeps counting down on its own
                    None => continue,
                },
            };

            let reading = cooldown::poll(host, target);
            publish(capability, reading, now, sink);
        }
    }
}

impl SignalHandler for CooldownTracker {
    fn handle_signal(&mut self, signal: HostSignal, host: &dyn Host, sink: &mut dyn VisualSink) {
        match signal {
            HostSignal::CooldownChanged => {
                self.dirty = true;
            }
            HostSignal::InventoryChanged => {
                self.on_inventory_changed(host, sink);
            }
            HostSignal::SpellbookChanged => {
                self.resolve_spells(host, sink);
                self.dirty = true;
            }
            HostSignal::CombatEntered => {
                self.in_combat = true;
            }
            HostSignal::CombatExited => {
                self.in_combat = false;
                if self.availability.scan_pending() {
                    tracing::debug!("Running storage scan deferred during combat");
                    self.run_scan(host, sink);
                }
            }
            HostSignal::Tick { elapsed } => {
                self.on_tick(elapsed, host, sink);
            }
        }
    }
}

/// Store a reading and forward it to the sink if (start, duration) changed.
fn publish(
    capability: &mut TrackedCapability,
    reading: crate::host::CooldownReading,
    now: f64,
    sink: &mut dyn VisualSink,
) {
    if let Some(changed) = capability.cooldown.observe(reading, now) {
        sink.on_cooldown_observation(&capability.name, changed);
    }
}

fn bind_spell(capability: &mut TrackedCapability, handle: SpellHandle, sink: &mut dyn VisualSink) {
    let previous = capability.spell_slot();
    capability.kind = CapabilityKind::Spell {
        slot: Some(handle.slot),
    };
    if handle.icon.is_some() {
        capability.icon = handle.icon;
    }

    match previous {
        None => {
            tracing::info!(name = %capability.name, slot = handle.slot.0, "Spell resolved");
            sink.on_capability_added(&capability.name, capability.icon.as_deref());
        }
        Some(old) if old != handle.slot => {
            tracing::info!(
                name = %capability.name,
                from = old.0,
                to = handle.slot.0,
                "Spell moved in spellbook"
            );
        }
        Some(_) => {}
    }
}

fn unbind_spell(
    capability: &mut TrackedCapability,
    sink: &mut dyn VisualSink,
    err: &crate::error::TrackerError,
) {
    if capability.spell_slot().is_some() {
        sink.on_capability_removed(&capability.name);
    }
    capability.kind = CapabilityKind::Spell { slot: None };
    tracing::warn!(error = %err, "Spell has no visual");
}
