//! Variable factory.
//!
//! Allocates one categorical integer variable per (staff, day) cell and
//! one reified boolean indicator per active shift type on that cell.
//! Names are pure functions of (staff id, day[, shift type]), so any
//! consumer can re-derive the exact variable it needs from the solved
//! values alone — no side index structure.

use crate::cp::{BoolVar, CpModel, IntVar};
use crate::models::{ShiftProblem, ShiftType, StaffId, ACTIVE_SHIFTS};

/// Name of the categorical shift variable for one (staff, day) cell.
pub fn shift_var(staff_id: StaffId, day: usize) -> String {
    format!("shift_s{staff_id}_d{day}")
}

/// Name of the boolean indicator witnessing `shift_var == shift`.
pub fn indicator_var(staff_id: StaffId, day: usize, shift: ShiftType) -> String {
    format!("is_s{staff_id}_d{day}_t{}", shift.ordinal())
}

/// Name of a staff member's total-working-days counter.
pub fn workload_var(staff_id: StaffId) -> String {
    format!("days_s{staff_id}")
}

/// Name of the maximum-workload aggregate.
pub const MAX_WORKLOAD: &str = "max_workload";

/// Name of the minimum-workload aggregate.
pub const MIN_WORKLOAD: &str = "min_workload";

/// Linear terms that sum to 1 when the cell is working, 0 when off.
pub fn working_terms(staff_id: StaffId, day: usize) -> Vec<(String, i64)> {
    ACTIVE_SHIFTS
        .iter()
        .map(|&shift| (indicator_var(staff_id, day, shift), 1))
        .collect()
}

/// Allocates the decision variables for every (staff, day) cell.
///
/// Each cell gets one integer variable with the full categorical shift
/// domain, plus one indicator boolean per active shift type linked by
/// an equality reification in both directions. Exactly one shift per
/// cell is implied by the categorical domain itself.
pub fn allocate(model: &mut CpModel, problem: &ShiftProblem) {
    let domain_max = ShiftType::Late.ordinal();
    for staff in &problem.staff {
        for day in problem.days() {
            let cell = shift_var(staff.id, day);
            model.add_int_var(IntVar::new(&cell, ShiftType::Off.ordinal(), domain_max));
            for &shift in &ACTIVE_SHIFTS {
                let literal = indicator_var(staff.id, day, shift);
                model.add_bool_var(BoolVar::new(&literal));
                model.reify_eq(literal, &cell, shift.ordinal());
            }
        }
    }
}
