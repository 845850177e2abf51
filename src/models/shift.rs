//! Shift type model.
//!
//! A closed, categorical enumeration of what a staff member does on one
//! day. Ordinals are stable and form the domain of every decision
//! variable, so they must never be renumbered.

use serde::{Deserialize, Serialize};

/// What a staff member is assigned on a single day.
///
/// Ordinal-encoded: `Off = 0`, `Early = 1`, `Late = 2`. Extending the
/// roster to more shift kinds means appending new ordinals together with
/// matching coverage treatment — the encoding is categorical, never a
/// working/not-working boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    /// Day off.
    Off,
    /// Early (morning) shift.
    Early,
    /// Late (evening) shift.
    Late,
}

/// The active (working) shift types, in ordinal order.
pub const ACTIVE_SHIFTS: [ShiftType; 2] = [ShiftType::Early, ShiftType::Late];

impl ShiftType {
    /// Stable ordinal used in decision variables and the wire format.
    pub fn ordinal(self) -> i64 {
        match self {
            ShiftType::Off => 0,
            ShiftType::Early => 1,
            ShiftType::Late => 2,
        }
    }

    /// Decodes an ordinal, `None` if it is outside the enumeration.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(ShiftType::Off),
            1 => Some(ShiftType::Early),
            2 => Some(ShiftType::Late),
            _ => None,
        }
    }

    /// Whether this shift counts as working time.
    pub fn is_working(self) -> bool {
        !matches!(self, ShiftType::Off)
    }
}
