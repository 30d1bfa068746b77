//! Shared configuration types for spellwatch.
//!
//! Everything in here is plain data: it is serialized to the user's config
//! file and read by both the tracking core and the shell.

mod config;
pub mod formatting;

pub use config::{
    DEFAULT_ALPHA, DEFAULT_SIZE, DEFAULT_UPDATE_INTERVAL_SECS, MAX_SIZE, MIN_SIZE, TrackerConfig,
    ValidationError, validate_alpha, validate_name, validate_size,
};
pub use formatting::{CountdownText, UrgencyTier, format_remaining};
