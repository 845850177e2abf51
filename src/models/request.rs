//! Day-off requests.
//!
//! A request targets one (staff, day) cell. Priority zero is a mandatory
//! day off, compiled as a hard constraint; any positive priority is a
//! soft preference with that weight, folded into the active objective.
//! This is the single request policy for every code path.

use serde::{Deserialize, Serialize};

use super::StaffId;

/// How strongly a day-off request binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPriority {
    /// The staff member must not work that day. Always honored exactly.
    MustNotWork,
    /// The staff member would prefer not to work that day; the weight
    /// is the penalty applied per working assignment on the cell.
    PreferNotWork(u32),
}

impl RequestPriority {
    /// Decodes the wire-format integer: `0` binds hard, anything
    /// positive is a soft preference of that weight.
    pub fn from_raw(priority: u32) -> Self {
        if priority == 0 {
            RequestPriority::MustNotWork
        } else {
            RequestPriority::PreferNotWork(priority)
        }
    }
}

/// A request that a staff member be off on a specific day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Requesting staff member.
    pub staff_id: StaffId,
    /// Target day index within the horizon.
    pub day: usize,
    /// Hard or soft binding.
    pub priority: RequestPriority,
}

impl ShiftRequest {
    /// Creates a mandatory day-off request.
    pub fn must_not_work(staff_id: StaffId, day: usize) -> Self {
        Self {
            staff_id,
            day,
            priority: RequestPriority::MustNotWork,
        }
    }

    /// Creates a soft day-off preference with the given weight.
    pub fn prefer_not_work(staff_id: StaffId, day: usize, weight: u32) -> Self {
        Self {
            staff_id,
            day,
            priority: RequestPriority::PreferNotWork(weight),
        }
    }

    /// Whether this request binds as a hard constraint.
    pub fn is_mandatory(&self) -> bool {
        matches!(self.priority, RequestPriority::MustNotWork)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_priority_decoding() {
        assert_eq!(RequestPriority::from_raw(0), RequestPriority::MustNotWork);
        assert_eq!(
            RequestPriority::from_raw(3),
            RequestPriority::PreferNotWork(3)
        );
    }

    #[test]
    fn test_mandatory_flag() {
        assert!(ShiftRequest::must_not_work(1, 0).is_mandatory());
        assert!(!ShiftRequest::prefer_not_work(1, 0, 5).is_mandatory());
    }
}
