//! Roster (solution) model.
//!
//! A roster is the solved output: per staff member, one shift type per
//! day of the horizon, in ascending day order. Staff appear in the
//! original staff-list order. Produced only on a feasible or optimal
//! solve — never partially.

use serde::{Deserialize, Serialize};

use super::{ShiftType, StaffId};

/// One staff member's solved day-by-day assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSchedule {
    /// Staff identifier.
    pub staff_id: StaffId,
    /// One shift type per day index, ascending.
    pub days: Vec<ShiftType>,
}

impl StaffSchedule {
    /// Total working (non-Off) days.
    pub fn working_days(&self) -> usize {
        self.days.iter().filter(|s| s.is_working()).count()
    }
}

/// A complete solved roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Schedules in original staff-list order.
    pub entries: Vec<StaffSchedule>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a staff schedule.
    pub fn push(&mut self, staff_id: StaffId, days: Vec<ShiftType>) {
        self.entries.push(StaffSchedule { staff_id, days });
    }

    /// Looks up one staff member's schedule.
    pub fn get(&self, staff_id: StaffId) -> Option<&StaffSchedule> {
        self.entries.iter().find(|e| e.staff_id == staff_id)
    }

    /// Number of staff on the roster.
    pub fn staff_count(&self) -> usize {
        self.entries.len()
    }

    /// Count of staff assigned `shift` on `day`.
    pub fn assigned_count(&self, day: usize, shift: ShiftType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.days.get(day) == Some(&shift))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_lookup_and_counts() {
        let mut roster = Roster::new();
        roster.push(1, vec![ShiftType::Early, ShiftType::Off]);
        roster.push(2, vec![ShiftType::Late, ShiftType::Early]);

        assert_eq!(roster.staff_count(), 2);
        assert_eq!(roster.get(1).unwrap().working_days(), 1);
        assert_eq!(roster.get(2).unwrap().working_days(), 2);
        assert_eq!(roster.assigned_count(0, ShiftType::Early), 1);
        assert_eq!(roster.assigned_count(1, ShiftType::Early), 1);
        assert_eq!(roster.assigned_count(1, ShiftType::Late), 0);
    }

    #[test]
    fn test_entries_preserve_insertion_order() {
        let mut roster = Roster::new();
        roster.push(7, vec![ShiftType::Off]);
        roster.push(3, vec![ShiftType::Off]);
        let ids: Vec<_> = roster.entries.iter().map(|e| e.staff_id).collect();
        assert_eq!(ids, vec![7, 3]);
    }
}
