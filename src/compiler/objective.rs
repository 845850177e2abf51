//! Objective compiler.
//!
//! Emits the single active optimization goal. Coverage maximization
//! rewards working assignments; workload balancing introduces
//! per-staff working-day counters and minimizes the spread between the
//! busiest and least busy member. Soft day-off preferences fold into
//! whichever objective is active as weighted penalty terms; with no
//! objective they are dropped with a diagnostic note.

use crate::cp::{CmpOp, CpModel, IntVar, Objective};
use crate::models::{ObjectiveMode, RequestPriority, ShiftProblem};

use super::vars;

/// Compiles the configured objective. Returns diagnostic notes for
/// anything the model could not honor (reduced fidelity is reported,
/// never silent).
pub fn compile_objective(
    model: &mut CpModel,
    problem: &ShiftProblem,
    mode: ObjectiveMode,
) -> Vec<String> {
    let mut notes = Vec::new();
    let penalties = soft_penalty_terms(problem, mode, &mut notes);

    match mode {
        ObjectiveMode::None => {}
        ObjectiveMode::MaximizeCoverage => {
            let mut terms = Vec::new();
            for staff in &problem.staff {
                for day in problem.days() {
                    terms.extend(vars::working_terms(staff.id, day));
                }
            }
            // Preferences count against coverage with their weight.
            terms.extend(penalties.into_iter().map(|(name, w)| (name, -w)));
            model.set_objective(Objective::Maximize { terms });
        }
        ObjectiveMode::BalanceWorkload => {
            let day_count = problem.day_count as i64;
            let mut workload_names = Vec::new();
            for staff in &problem.staff {
                let counter = vars::workload_var(staff.id);
                model.add_int_var(IntVar::new(&counter, 0, day_count));
                let mut terms = vec![(counter.clone(), -1)];
                for day in problem.days() {
                    terms.extend(vars::working_terms(staff.id, day));
                }
                model.add_linear(terms, CmpOp::Eq, 0);
                workload_names.push(counter);
            }

            model.add_int_var(IntVar::new(vars::MAX_WORKLOAD, 0, day_count));
            model.add_int_var(IntVar::new(vars::MIN_WORKLOAD, 0, day_count));
            model.add_max_of(vars::MAX_WORKLOAD, workload_names.clone());
            model.add_min_of(vars::MIN_WORKLOAD, workload_names);

            let mut terms = vec![
                (vars::MAX_WORKLOAD.to_string(), 1),
                (vars::MIN_WORKLOAD.to_string(), -1),
            ];
            terms.extend(penalties);
            model.set_objective(Objective::Minimize { terms });
        }
    }

    notes
}

/// Weighted working-indicator terms for every resolvable soft request.
///
/// With `ObjectiveMode::None` there is nothing to fold them into, so
/// each is reported as a note instead.
fn soft_penalty_terms(
    problem: &ShiftProblem,
    mode: ObjectiveMode,
    notes: &mut Vec<String>,
) -> Vec<(String, i64)> {
    let mut terms = Vec::new();
    for request in &problem.requests {
        let RequestPriority::PreferNotWork(weight) = request.priority else {
            continue;
        };
        if request.day >= problem.day_count || problem.staff_by_id(request.staff_id).is_none() {
            continue; // validation has already reported the dangling reference
        }
        if mode == ObjectiveMode::None {
            notes.push(format!(
                "soft day-off preference (staff {}, day {}) dropped: no active objective",
                request.staff_id, request.day
            ));
            continue;
        }
        for (name, coeff) in vars::working_terms(request.staff_id, request.day) {
            terms.push((name, coeff * i64::from(weight)));
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShiftRequest, StaffMember};

    fn problem() -> ShiftProblem {
        ShiftProblem::new(
            vec![StaffMember::new(1, "A"), StaffMember::new(2, "B")],
            3,
        )
    }

    fn allocated(problem: &ShiftProblem) -> CpModel {
        let mut model = CpModel::new("test");
        vars::allocate(&mut model, problem);
        model
    }

    #[test]
    fn test_balance_mode_builds_counters_and_spread() {
        let problem = problem();
        let mut model = allocated(&problem);
        let ints_before = model.int_var_count();

        let notes = compile_objective(&mut model, &problem, ObjectiveMode::BalanceWorkload);
        assert!(notes.is_empty());
        // One counter per staff member plus the two aggregates.
        assert_eq!(model.int_var_count() - ints_before, 2 + 2);
        assert!(matches!(model.objective, Some(Objective::Minimize { .. })));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_coverage_mode_rewards_every_working_indicator() {
        let problem = problem();
        let mut model = allocated(&problem);

        compile_objective(&mut model, &problem, ObjectiveMode::MaximizeCoverage);
        let Some(Objective::Maximize { terms }) = &model.objective else {
            panic!("expected maximize objective");
        };
        // Two indicators per cell, 2 staff x 3 days.
        assert_eq!(terms.len(), 2 * 3 * 2);
        assert!(terms.iter().all(|(_, c)| *c == 1));
    }

    #[test]
    fn test_soft_requests_become_weighted_penalties() {
        let problem = problem().with_request(ShiftRequest::prefer_not_work(1, 2, 4));
        let mut model = allocated(&problem);

        compile_objective(&mut model, &problem, ObjectiveMode::MaximizeCoverage);
        let Some(Objective::Maximize { terms }) = &model.objective else {
            panic!("expected maximize objective");
        };
        assert!(terms
            .iter()
            .any(|(name, c)| name == "is_s1_d2_t1" && *c == -4));
    }

    #[test]
    fn test_none_mode_notes_dropped_preferences() {
        let problem = problem().with_request(ShiftRequest::prefer_not_work(2, 0, 1));
        let mut model = allocated(&problem);

        let notes = compile_objective(&mut model, &problem, ObjectiveMode::None);
        assert!(model.objective.is_none());
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("staff 2"));
    }
}
