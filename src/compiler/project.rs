//! Result projector.
//!
//! Reconstructs the roster from solved variable values: per staff
//! member in original list order, per day ascending, the categorical
//! cell value decoded back to a shift type. The paired indicators are
//! cross-checked against the categorical value — any disagreement is a
//! modeling defect, reported as an internal consistency error, never
//! as infeasibility.

use thiserror::Error;

use crate::cp::CpSolution;
use crate::models::{Roster, ShiftProblem, ShiftType, StaffId, ACTIVE_SHIFTS};

use super::vars;

/// A solved model produced an uninterpretable or contradictory
/// assignment. Always a compiler defect, never a data problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The solution carries no value for a cell variable.
    #[error("no solved value for staff {staff_id} on day {day}")]
    MissingValue { staff_id: StaffId, day: usize },

    /// The cell value is outside the shift enumeration.
    #[error("shift ordinal {ordinal} out of range for staff {staff_id} on day {day}")]
    InvalidOrdinal {
        staff_id: StaffId,
        day: usize,
        ordinal: i64,
    },

    /// An indicator disagrees with its cell's categorical value.
    #[error("indicator {literal} contradicts the assigned shift for staff {staff_id} on day {day}")]
    IndicatorMismatch {
        staff_id: StaffId,
        day: usize,
        literal: String,
    },
}

/// Projects a feasible solution onto a roster.
pub fn project_roster(
    problem: &ShiftProblem,
    solution: &CpSolution,
) -> Result<Roster, ProjectionError> {
    let mut roster = Roster::new();

    for staff in &problem.staff {
        let mut days = Vec::with_capacity(problem.day_count);
        for day in problem.days() {
            let cell = vars::shift_var(staff.id, day);
            let ordinal = *solution.int_values.get(&cell).ok_or(
                ProjectionError::MissingValue {
                    staff_id: staff.id,
                    day,
                },
            )?;
            let shift =
                ShiftType::from_ordinal(ordinal).ok_or(ProjectionError::InvalidOrdinal {
                    staff_id: staff.id,
                    day,
                    ordinal,
                })?;

            for &witnessed in &ACTIVE_SHIFTS {
                let literal = vars::indicator_var(staff.id, day, witnessed);
                let expected = shift == witnessed;
                if solution.bool_values.get(&literal) != Some(&expected) {
                    return Err(ProjectionError::IndicatorMismatch {
                        staff_id: staff.id,
                        day,
                        literal,
                    });
                }
            }

            days.push(shift);
        }
        roster.push(staff.id, days);
    }

    Ok(roster)
}
