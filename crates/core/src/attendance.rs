//! Half-day attendance derivation.
//!
//! Presence for a (user, project, day) triple is derived from the pair of
//! morning/evening updates. The persistence layer applies this with an
//! atomic upsert; the logic lives here so its invariants can be tested
//! without a database:
//!
//! - a half that is already set is never overwritten,
//! - `is_present` holds exactly when both halves are set,
//! - re-applying the same update is a no-op (idempotence).

use crate::types::DbId;

pub const UPDATE_MORNING: &str = "morning";
pub const UPDATE_EVENING: &str = "evening";

/// All valid update type values.
pub const VALID_UPDATE_TYPES: &[&str] = &[UPDATE_MORNING, UPDATE_EVENING];

/// Validate that an update type string is one of the accepted values.
pub fn validate_update_type(update_type: &str) -> Result<(), String> {
    if VALID_UPDATE_TYPES.contains(&update_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid update type '{update_type}'. Must be one of: {}",
            VALID_UPDATE_TYPES.join(", ")
        ))
    }
}

/// The derived state of one attendance row: which update fills each half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HalfDayPair {
    pub morning_update_id: Option<DbId>,
    pub evening_update_id: Option<DbId>,
}

impl HalfDayPair {
    /// Apply one update to the pair, filling the matching half only if it
    /// is still empty. Returns the resulting pair.
    pub fn apply(self, update_type: &str, update_id: DbId) -> Self {
        match update_type {
            UPDATE_MORNING => Self {
                morning_update_id: self.morning_update_id.or(Some(update_id)),
                ..self
            },
            UPDATE_EVENING => Self {
                evening_update_id: self.evening_update_id.or(Some(update_id)),
                ..self
            },
            _ => self,
        }
    }

    /// Present only when both half-day updates exist.
    pub fn is_present(&self) -> bool {
        self.morning_update_id.is_some() && self.evening_update_id.is_some()
    }
}
