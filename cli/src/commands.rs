use std::path::{Path, PathBuf};

use spellwatch_core::snapshot::SNAPSHOT_FILE_NAME;
use spellwatch_core::tracking::{default_config_dir, load_file, save_file};
use spellwatch_core::{
    CooldownTracker, HostSignal, SignalHandler, TrackerConfig, load_snapshot, save_snapshot,
};

use crate::APP_NAME;
use crate::sim::{ConsoleSink, SimHost};

/// Seconds per simulated frame when advancing time
const FRAME_SECS: f64 = 0.05;

/// Tracker plus the simulated client it watches.
pub struct Session {
    pub tracker: CooldownTracker,
    pub host: SimHost,
    pub sink: ConsoleSink,
}

impl Session {
    pub fn new(config: TrackerConfig) -> Self {
        let mut session = Self {
            tracker: CooldownTracker::new(config),
            host: SimHost::new(),
            sink: ConsoleSink::default(),
        };
        session
            .tracker
            .initialize(&session.host, &mut session.sink);
        session
    }

    fn signal(&mut self, signal: HostSignal) {
        tracing::trace!(signal = signal.name(), "Dispatching");
        self.tracker
            .handle_signal(signal, &self.host, &mut self.sink);
    }
}

pub fn snapshot_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(SNAPSHOT_FILE_NAME))
}

/// Re-apply the snapshot saved by a previous session, if there is one.
pub fn restore_snapshot(session: &mut Session) {
    let Some(path) = snapshot_path().filter(|p| p.exists()) else {
        return;
    };
    match load_snapshot(&path) {
        Ok(snapshot) => {
            let restored = session
                .tracker
                .restore(&snapshot, &session.host, &mut session.sink);
            println!("Restored {restored} cooldown(s) from {}", path.display());
        }
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable snapshot"),
    }
}

// ─── Tracker commands ────────────────────────────────────────────────────────

pub fn list(session: &Session) -> Result<(), String> {
    let statuses = session.tracker.list(&session.host);
    if statuses.is_empty() {
        println!("Nothing tracked. Use `add <name>`.");
    }
    for status in statuses {
        println!("{status}");
    }
    Ok(())
}

pub fn add(session: &mut Session, name: &str) -> Result<(), String> {
    let message = session
        .tracker
        .add(name, &session.host, &mut session.sink)
        .map_err(|e| e.to_string())?;
    println!("{message}");
    Ok(())
}

pub fn remove(session: &mut Session, name: &str) -> Result<(), String> {
    let message = session
        .tracker
        .remove(name, &mut session.sink)
        .map_err(|e| e.to_string())?;
    println!("{message}");
    Ok(())
}

pub fn set_alpha(session: &mut Session, alpha: f32) -> Result<(), String> {
    let message = session
        .tracker
        .set_alpha(alpha, &mut session.sink)
        .map_err(|e| e.to_string())?;
    println!("{message}");
    Ok(())
}

pub fn set_size(session: &mut Session, size: f32) -> Result<(), String> {
    let message = session.tracker.set_size(size).map_err(|e| e.to_string())?;
    println!("{message}");
    Ok(())
}

pub fn move_icon(session: &mut Session, name: &str, x: f32, y: f32) -> Result<(), String> {
    let message = session
        .tracker
        .set_position(name, x, y)
        .map_err(|e| e.to_string())?;
    println!("{message}");
    Ok(())
}

/// Countdown text of every tracked capability.
pub fn show(session: &Session) -> Result<(), String> {
    for capability in session.tracker.capabilities() {
        let text = session.tracker.countdown(&capability.name, &session.host);
        let [r, g, b, _] = text.color();
        let shown = if text.is_hidden() { "-" } else { text.text.as_str() };
        println!("{:<24} {:>5}  #{r:02x}{g:02x}{b:02x}", capability.name, shown);
    }
    Ok(())
}

/// Re-read the configuration, from `file` when given, otherwise from confy.
pub fn reload(session: &mut Session, file: Option<&Path>) -> Result<(), String> {
    let config: TrackerConfig = match file {
        Some(path) => load_file(path).map_err(|e| e.to_string())?,
        None => confy::load(APP_NAME, None).map_err(|e| e.to_string())?,
    };
    session
        .tracker
        .reload(config, &session.host, &mut session.sink);
    println!("Configuration reloaded");
    Ok(())
}

/// Persist the configuration and the snapshot. `file` additionally exports
/// the configuration as a standalone TOML file.
pub fn save(session: &Session, file: Option<&Path>) -> Result<(), String> {
    confy::store(APP_NAME, None, session.tracker.config().clone()).map_err(|e| e.to_string())?;
    if let Some(path) = file {
        save_file(path, session.tracker.config()).map_err(|e| e.to_string())?;
        println!("Exported configuration to {}", path.display());
    }

    let path = snapshot_path().ok_or("No config directory for the snapshot")?;
    let snapshot = session.tracker.snapshot(&session.host);
    save_snapshot(&path, &snapshot).map_err(|e| e.to_string())?;

    println!(
        "Saved {} tracked name(s) and {} running cooldown(s)",
        session.tracker.capabilities().count(),
        snapshot.cooldowns.len()
    );
    Ok(())
}

// ─── Simulated client ────────────────────────────────────────────────────────

pub fn learn(session: &mut Session, name: &str, tab: usize) -> Result<(), String> {
    if session.host.knows(name) {
        return Err(format!("'{name}' is already in the spellbook"));
    }
    session.host.learn(name, tab);
    session.signal(HostSignal::SpellbookChanged);
    Ok(())
}

pub fn cast(session: &mut Session, name: &str, secs: f64) -> Result<(), String> {
    if !session.host.knows(name) {
        return Err(format!("'{name}' is not in the spellbook"));
    }
    session.host.cast(name, secs);
    session.signal(HostSignal::CooldownChanged);
    Ok(())
}

pub fn bag_put(session: &mut Session, name: &str) -> Result<(), String> {
    let location = session.host.put_item(name).ok_or("Bags are full")?;
    println!("Put '{name}' into {location}");
    session.signal(HostSignal::InventoryChanged);
    Ok(())
}

pub fn bag_take(session: &mut Session, name: &str) -> Result<(), String> {
    let location = session
        .host
        .take_item(name)
        .ok_or_else(|| format!("No '{name}' in the bags"))?;
    println!("Took '{name}' from {location}");
    session.signal(HostSignal::InventoryChanged);
    Ok(())
}

pub fn use_item(session: &mut Session, name: &str, secs: f64) -> Result<(), String> {
    if !session.host.use_item(name, secs) {
        return Err(format!("No '{name}' in the bags"));
    }
    session.signal(HostSignal::CooldownChanged);
    Ok(())
}

pub fn combat(session: &mut Session, entering: bool) -> Result<(), String> {
    if entering == session.tracker.in_combat() {
        return Ok(());
    }
    let signal = if entering {
        HostSignal::CombatEntered
    } else {
        HostSignal::CombatExited
    };
    session.signal(signal);
    println!("{}", if entering { "Entered combat" } else { "Left combat" });
    Ok(())
}

/// Advance both clocks, delivering one tick per simulated frame.
pub fn tick(session: &mut Session, secs: f64) -> Result<(), String> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("invalid duration: {secs}"));
    }
    let mut left = secs;
    while left > 0.0 {
        let step = left.min(FRAME_SECS);
        session.host.advance(step);
        session.signal(HostSignal::Tick { elapsed: step });
        left -= step;
    }
    Ok(())
}

pub fn exit() {
    println!("Bye");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_session(config: TrackerConfig) -> Session {
        let mut session = Session::new(config);
        session.sink.quiet = true;
        session
    }

    #[test]
    fn test_learning_a_tracked_spell_resolves_it() {
        let mut config = TrackerConfig::default();
        config.spells.push("Fireball".into());
        let mut session = quiet_session(config);
        assert!(session.tracker.capability("Fireball").unwrap().spell_slot().is_none());

        learn(&mut session, "Fireball", 0).unwrap();
        assert!(session.tracker.capability("Fireball").unwrap().spell_slot().is_some());
        assert!(learn(&mut session, "fireball", 1).is_err());
    }

    #[test]
    fn test_cast_then_tick_counts_down() {
        let mut session = quiet_session(TrackerConfig::default());
        learn(&mut session, "Blink", 0).unwrap();
        add(&mut session, "Blink").unwrap();

        cast(&mut session, "Blink", 15.0).unwrap();
        tick(&mut session, 0.5).unwrap();
        assert_eq!(session.tracker.countdown("Blink", &session.host).text, "15");

        tick(&mut session, 15.0).unwrap();
        assert!(session.tracker.countdown("Blink", &session.host).is_hidden());
    }

    #[test]
    fn test_item_commands_drive_availability() {
        let mut session = quiet_session(TrackerConfig::default());
        bag_put(&mut session, "Hearthstone").unwrap();
        add(&mut session, "Hearthstone").unwrap();
        tick(&mut session, 1.0).unwrap();

        bag_take(&mut session, "Hearthstone").unwrap();
        tick(&mut session, 1.0).unwrap();
        let presence = session.tracker.availability().presence("Hearthstone");
        assert!(presence.is_some_and(|p| p.is_missing()));

        assert!(bag_take(&mut session, "Hearthstone").is_err());
        assert!(use_item(&mut session, "Hearthstone", 10.0).is_err());
    }

    #[test]
    fn test_reload_from_file_replaces_tracked_names() {
        let path = std::env::temp_dir()
            .join(format!("spellwatch-cli-{}", std::process::id()))
            .join("tracked.toml");
        let mut config = TrackerConfig::default();
        config.spells.push("Blink".into());
        save_file(&path, &config).unwrap();

        let mut session = quiet_session(TrackerConfig::default());
        learn(&mut session, "Blink", 0).unwrap();
        reload(&mut session, Some(&path)).unwrap();
        assert!(session.tracker.capability("Blink").unwrap().spell_slot().is_some());

        assert!(reload(&mut session, Some(Path::new("/definitely/not/here.toml"))).is_err());
        assert!(session.tracker.capability("Blink").is_some());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_rejects_negative_tick() {
        let mut session = quiet_session(TrackerConfig::default());
        assert!(tick(&mut session, -1.0).is_err());
    }
}
