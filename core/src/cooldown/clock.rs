//! Cooldown arithmetic on the client's uptime clock.
//!
//! The uptime clock is a 32-bit millisecond counter and wraps roughly every
//! 49.7 days. A cooldown that started shortly before the wrap reports a
//! `start` larger than the current uptime. Plain `start + duration - uptime`
//! would then report a cooldown of ~49 days, so that case is rebuilt from the
//! wall clock instead.

/// Length of one uptime cycle in seconds (2^32 milliseconds).
pub const UPTIME_WRAP_SECS: f64 = 4_294_967_296.0 / 1000.0;

/// Seconds until a cooldown ends. Negative or zero once it has ended.
///
/// `uptime` and `wall_clock` must be read at the same instant.
pub fn remaining(start: f64, duration: f64, uptime: f64, wall_clock: f64) -> f64 {
    if start > uptime {
        // Started before the counter wrapped.
        let wrapped_start = UPTIME_WRAP_SECS - start;
        let wrap_wall_time = wall_clock - uptime;
        let end_wall_time = wrap_wall_time - wrapped_start + duration;
        end_wall_time - wall_clock
    } else {
        start + duration - uptime
    }
}

/// Wall-clock instant at which a cooldown started.
pub fn start_to_wall(start: f64, uptime: f64, wall_clock: f64) -> f64 {
    if start > uptime {
        let wrapped_start = UPTIME_WRAP_SECS - start;
        (wall_clock - uptime) - wrapped_start
    } else {
        wall_clock - (uptime - start)
    }
}

/// Inverse of [`start_to_wall`]: express a wall-clock start on the current uptime clock.
///
/// A start that falls before the last wrap comes back larger than `uptime`,
/// which [`remaining`] recognizes.
pub fn start_from_wall(wall_start: f64, uptime: f64, wall_clock: f64) -> f64 {
    let start = uptime - (wall_clock - wall_start);
    if start < 0.0 {
        start + UPTIME_WRAP_SECS
    } else {
        start
    }
}
