use chrono::Utc;

use crate::cooldown::clock;
use crate::host::{Host, VisualSink};
use crate::snapshot::{SavedCooldown, TrackerSnapshot};

use super::CooldownTracker;

impl CooldownTracker {
    /// Capture running cooldowns and icon positions.
    pub fn snapshot(&self, host: &dyn Host) -> TrackerSnapshot {
        let uptime = host.uptime();
        let wall = host.wall_clock();

        let cooldowns = self
            .registry
            .iter()
            .filter(|c| c.cooldown.is_active(uptime, wall))
            .map(|c| {
                let saved = SavedCooldown {
                    started_at: clock::start_to_wall(c.cooldown.start, uptime, wall),
                    duration: c.cooldown.duration,
                };
                (c.name.clone(), saved)
            })
            .collect();

        TrackerSnapshot {
            saved_at: Some(Utc::now()),
            cooldowns,
            positions: self.positions.clone(),
        }
    }

    /// Re-apply a snapshot. Cooldowns still running on the wall clock are
    /// re-expressed on the current uptime clock and published, unless the
    /// client already reported a cooldown for that capability.
    ///
    /// Returns the number of cooldowns restored.
    pub fn restore(
        &mut self,
        snapshot: &TrackerSnapshot,
        host: &dyn Host,
        sink: &mut dyn VisualSink,
    ) -> usize {
        let uptime = host.uptime();
        let wall = host.wall_clock();
        let mut restored = 0;

        for (name, saved) in &snapshot.cooldowns {
            if saved.ends_at() <= wall {
                continue;
            }
            let Some(capability) = self.registry.get_mut(name) else {
                continue;
            };
            if capability.cooldown.is_running() {
                continue;
            }

            let start = clock::start_from_wall(saved.started_at, uptime, wall);
            let reading = capability.cooldown.restore(start, saved.duration, uptime);
            sink.on_cooldown_observation(&capability.name, reading);
            restored += 1;
        }

        for (name, position) in &snapshot.positions {
            if let Some(capability) = self.registry.get(name) {
                self.positions.insert(capability.name.clone(), *position);
            }
        }

        if restored > 0 {
            tracing::info!(restored, "Restored cooldowns from snapshot");
        }
        restored
    }
}
