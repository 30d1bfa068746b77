use spellwatch_types::ValidationError;
use thiserror::Error;

use crate::host::SpellSlot;

/// Failures of tracker operations.
///
/// Only command failures ever reach the user; resolution and poll failures
/// are logged and degrade to "no visual for this capability".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// The name matches no spell in the spellbook and no item in storage
    #[error("'{0}' is not a known spell or an item in your bags")]
    NotFound(String),

    /// Argument out of range or empty; nothing was changed
    #[error("{0}")]
    InvalidInput(String),

    /// A cached spellbook slot no longer holds the spell it was resolved for
    #[error("spellbook slot {slot:?} no longer holds '{name}'")]
    StaleHandle { name: String, slot: SpellSlot },

    #[error("'{0}' is already tracked")]
    AlreadyTracked(String),

    #[error("'{0}' is not tracked")]
    NotTracked(String),

    /// Looking up a bag item needs a full storage walk, which combat rules out
    #[error("cannot look up '{0}' in your bags during combat")]
    InCombat(String),
}

impl From<ValidationError> for TrackerError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
