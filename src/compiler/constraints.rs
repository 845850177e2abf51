//! Constraint compiler.
//!
//! Pure functions that translate the roster rules into constraint rows
//! over the cell variables allocated by [`super::vars`]. Emission order
//! is fixed: coverage, role coverage, hard requests, consecutive-day
//! cap. (Exclusivity needs no rows — one shift per cell is implied by
//! the categorical variable domain.)

use crate::cp::{CmpOp, CpModel};
use crate::models::{ShiftProblem, ShiftType, ACTIVE_SHIFTS};

use super::vars;

/// Minimum headcount per day and active shift type.
///
/// One `≥` row per (day, active shift), using the day's override when
/// present, else the plan default. A day with zero staff and a positive
/// requirement compiles to an empty sum that can never reach the bound
/// — legitimately infeasible, by design.
pub fn compile_coverage(model: &mut CpModel, problem: &ShiftProblem) {
    for day in problem.days() {
        let level = problem.coverage.resolve(day);
        for &shift in &ACTIVE_SHIFTS {
            let terms = problem
                .staff
                .iter()
                .map(|s| (vars::indicator_var(s.id, day, shift), 1))
                .collect();
            model.add_linear(terms, CmpOp::Ge, i64::from(level.required(shift)));
        }
    }
}

/// Role minimums: per requirement and day, the count of qualifying
/// staff working any active shift must reach the required count.
///
/// A role with zero qualifying staff still compiles — the resulting
/// empty sum surfaces the configuration error as an infeasible verdict
/// instead of silently dropping the rule.
pub fn compile_role_coverage(model: &mut CpModel, problem: &ShiftProblem) {
    for requirement in &problem.role_requirements {
        for day in problem.days() {
            let mut terms = Vec::new();
            for staff in &problem.staff {
                if staff.qualifies_for(&requirement.role) {
                    terms.extend(vars::working_terms(staff.id, day));
                }
            }
            model.add_linear(terms, CmpOp::Ge, i64::from(requirement.count));
        }
    }
}

/// Mandatory day-off requests, compiled as direct equalities to `Off`.
///
/// Soft preferences are not constraints; the objective compiler folds
/// them in. Requests that do not resolve to a known cell are skipped
/// here — validation has already reported them.
pub fn compile_hard_requests(model: &mut CpModel, problem: &ShiftProblem) {
    for request in &problem.requests {
        if !request.is_mandatory() {
            continue;
        }
        if request.day >= problem.day_count || problem.staff_by_id(request.staff_id).is_none() {
            continue;
        }
        model.fix_int(
            vars::shift_var(request.staff_id, request.day),
            ShiftType::Off.ordinal(),
        );
    }
}

/// Consecutive-workday cap.
///
/// For every staff member and every window of `max_consecutive + 1`
/// days fully inside the horizon, the working-indicator sum over the
/// window stays at or below the cap. Every valid window start is
/// compiled, not just week boundaries. Horizons shorter than the
/// window produce no rows.
pub fn compile_consecutive_cap(model: &mut CpModel, problem: &ShiftProblem, max_consecutive: usize) {
    let window = max_consecutive + 1;
    if problem.day_count < window {
        return;
    }
    for staff in &problem.staff {
        for start in 0..=(problem.day_count - window) {
            let mut terms = Vec::new();
            for day in start..start + window {
                terms.extend(vars::working_terms(staff.id, day));
            }
            model.add_linear(terms, CmpOp::Le, max_consecutive as i64);
        }
    }
}
