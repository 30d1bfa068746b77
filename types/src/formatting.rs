//! Countdown text formatting.
//!
//! All cooldown countdown text goes through this module so the overlay and
//! the shell show identical values and colors.

/// Remaining time below which a countdown is shown in the urgent color.
pub const URGENT_BELOW_SECS: f64 = 5.0;

/// Remaining time below which a countdown is shown in the warning color.
pub const WARNING_BELOW_SECS: f64 = 10.0;

const SECS_PER_MINUTE: f64 = 60.0;
const SECS_PER_HOUR: f64 = 3600.0;

/// Color tier of a countdown, picked from the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyTier {
    Urgent,
    Warning,
    Neutral,
}

impl UrgencyTier {
    /// Tier for a remaining duration. First match wins: <5s urgent, <10s warning.
    pub fn for_remaining(secs: f64) -> Self {
        if secs < URGENT_BELOW_SECS {
            Self::Urgent
        } else if secs < WARNING_BELOW_SECS {
            Self::Warning
        } else {
            Self::Neutral
        }
    }

    /// RGBA color for this tier
    pub const fn color(self) -> [u8; 4] {
        match self {
            Self::Urgent => [255, 26, 26, 255],
            Self::Warning => [255, 255, 26, 255],
            Self::Neutral => [255, 255, 255, 255],
        }
    }
}

/// Styled countdown text. An empty `text` means the display should be hidden.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownText {
    pub text: String,
    pub tier: UrgencyTier,
}

impl CountdownText {
    pub fn hidden() -> Self {
        Self {
            text: String::new(),
            tier: UrgencyTier::Neutral,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.text.is_empty()
    }

    pub fn color(&self) -> [u8; 4] {
        self.tier.color()
    }
}

impl std::fmt::Display for CountdownText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Format a remaining cooldown for the icon overlay.
///
/// - Values <= 0, NaN or infinite: hidden (empty text)
/// - Values < 60s: whole seconds
/// - Values < 3600s: whole minutes with an `m` suffix
/// - Otherwise: whole hours with an `h` suffix
///
/// Every unit is rounded up, so a cooldown that is still running never reads `0`.
///
/// # Examples
/// ```
/// use spellwatch_types::formatting::{format_remaining, UrgencyTier};
/// assert_eq!(format_remaining(4.2).text, "5");
/// assert_eq!(format_remaining(4.2).tier, UrgencyTier::Urgent);
/// assert_eq!(format_remaining(61.0).text, "2m");
/// assert_eq!(format_remaining(3601.0).text, "2h");
/// assert!(format_remaining(0.0).is_hidden());
/// ```
pub fn format_remaining(secs: f64) -> CountdownText {
    if !secs.is_finite() || secs <= 0.0 {
        return CountdownText::hidden();
    }

    let text = if secs < SECS_PER_MINUTE {
        format!("{}", secs.ceil() as u64)
    } else if secs < SECS_PER_HOUR {
        format!("{}m", (secs / SECS_PER_MINUTE).ceil() as u64)
    } else {
        format!("{}h", (secs / SECS_PER_HOUR).ceil() as u64)
    };

    CountdownText {
        text,
        tier: UrgencyTier::for_remaining(secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_is_hidden() {
        assert!(format_remaining(0.0).is_hidden());
        assert!(format_remaining(-3.0).is_hidden());
        assert!(format_remaining(f64::NAN).is_hidden());
        assert!(format_remaining(f64::INFINITY).is_hidden());
        assert!(format_remaining(f64::NEG_INFINITY).is_hidden());
    }

    #[test]
    fn test_tiers() {
        assert_eq!(format_remaining(0.01).tier, UrgencyTier::Urgent);
        assert_eq!(format_remaining(4.999).tier, UrgencyTier::Urgent);
        assert_eq!(format_remaining(5.0).tier, UrgencyTier::Warning);
        assert_eq!(format_remaining(9.99).tier, UrgencyTier::Warning);
        assert_eq!(format_remaining(10.0).tier, UrgencyTier::Neutral);
        assert_eq!(format_remaining(7200.0).tier, UrgencyTier::Neutral);
    }

    #[test]
    fn test_ceiling_rounding() {
        assert_eq!(format_remaining(0.01).text, "1");
        assert_eq!(format_remaining(4.2).text, "5");
        assert_eq!(format_remaining(59.5).text, "60");
        assert_eq!(format_remaining(60.0).text, "1m");
        assert_eq!(format_remaining(61.0).text, "2m");
        assert_eq!(format_remaining(3599.0).text, "60m");
        assert_eq!(format_remaining(3600.0).text, "1h");
        assert_eq!(format_remaining(3601.0).text, "2h");
    }

    #[test]
    fn test_display_and_color() {
        let text = format_remaining(4.2);
        assert_eq!(text.to_string(), "5");
        assert_eq!(text.color(), UrgencyTier::Urgent.color());
        assert_eq!(format_remaining(61.0).color(), UrgencyTier::Neutral.color());
    }
}
