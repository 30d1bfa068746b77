use crate::host::{Host, VisualSink};

/// Signals delivered by the game client.
///
/// Every signal is handled to completion by [`SignalHandler::handle_signal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostSignal {
    /// Some spell or item cooldown started, changed or finished
    CooldownChanged,
    /// Bag contents changed
    InventoryChanged,
    /// Spellbook contents changed; slot indices may have shifted
    SpellbookChanged,
    CombatEntered,
    CombatExited,
    /// Frame tick with the seconds elapsed since the previous one
    Tick { elapsed: f64 },
}

impl HostSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CooldownChanged => "cooldown_changed",
            Self::InventoryChanged => "inventory_changed",
            Self::SpellbookChanged => "spellbook_changed",
            Self::CombatEntered => "combat_entered",
            Self::CombatExited => "combat_exited",
            Self::Tick { .. } => "tick",
        }
    }
}

/// Something that reacts to client signals.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: HostSignal, host: &dyn Host, sink: &mut dyn VisualSink);

    fn handle_signals(&mut self, signals: &[HostSignal], host: &dyn Host, sink: &mut dyn VisualSink) {
        for signal in signals {
            self.handle_signal(*signal, host, sink);
        }
    }
}
