//! Solving driver.
//!
//! Orchestrates one roster solve: validate → compile → solve →
//! project. Each invocation builds an independent model and holds no
//! state afterwards; concurrent solves share nothing. Infeasibility
//! and budget expiry are verdicts, not errors, and the two are never
//! conflated — an `Unknown` input may still have a solution the budget
//! did not reach.

use thiserror::Error;
use tracing::{info, warn};

use crate::compiler::{ProjectionError, RosterCompiler};
use crate::cp::{BacktrackingSolver, CpSolver, SolverConfig, SolverStatus};
use crate::models::{PlannerConfig, Roster, ShiftProblem};
use crate::validation::{validate_problem, ValidationError};

/// Canonical outcome of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveVerdict {
    /// Proven optimal roster.
    Optimal,
    /// Feasible roster, optimality not proven.
    Feasible,
    /// The rules cannot be simultaneously satisfied. A legitimate
    /// business outcome, not a defect.
    Infeasible,
    /// Budget exhausted before a conclusion; the input may still have
    /// a solution.
    Unknown,
}

/// Result of one solve invocation.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Canonical verdict.
    pub verdict: SolveVerdict,
    /// The roster, present only on `Optimal`/`Feasible` — never
    /// partial.
    pub roster: Option<Roster>,
    /// Objective value, when an objective was active and a roster was
    /// found.
    pub objective_value: Option<i64>,
    /// Validation warnings and compile notes (ignored requests,
    /// dropped preferences).
    pub diagnostics: Vec<String>,
    /// Wall-clock solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl SolveOutcome {
    /// Whether a roster was produced.
    pub fn is_scheduled(&self) -> bool {
        matches!(self.verdict, SolveVerdict::Optimal | SolveVerdict::Feasible)
    }
}

/// Failures that are errors rather than verdicts.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Structural input problems, reported in full.
    #[error("malformed input: {0:?}")]
    Malformed(Vec<ValidationError>),

    /// A solved model produced a contradictory assignment — a compiler
    /// defect, reported distinctly from infeasibility.
    #[error(transparent)]
    Inconsistent(#[from] ProjectionError),

    /// The backend rejected the compiled model.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Solves a roster problem with the built-in backtracking backend.
pub fn plan(
    problem: &ShiftProblem,
    config: &PlannerConfig,
    solver_config: &SolverConfig,
) -> Result<SolveOutcome, PlanError> {
    plan_with(&BacktrackingSolver::new(), problem, config, solver_config)
}

/// Solves a roster problem with any conforming solving backend.
pub fn plan_with<S: CpSolver>(
    solver: &S,
    problem: &ShiftProblem,
    config: &PlannerConfig,
    solver_config: &SolverConfig,
) -> Result<SolveOutcome, PlanError> {
    let warnings = validate_problem(problem).map_err(PlanError::Malformed)?;
    let mut diagnostics: Vec<String> = warnings.into_iter().map(|w| w.message).collect();
    for note in &diagnostics {
        warn!("{note}");
    }

    let compiler = RosterCompiler::new(problem, config);
    let compiled = compiler.build();
    diagnostics.extend(compiled.notes);

    let solution = solver.solve(&compiled.model, solver_config);

    let verdict = match solution.status {
        SolverStatus::Optimal => SolveVerdict::Optimal,
        SolverStatus::Feasible => SolveVerdict::Feasible,
        SolverStatus::Infeasible => SolveVerdict::Infeasible,
        SolverStatus::Timeout | SolverStatus::Unknown => SolveVerdict::Unknown,
        SolverStatus::ModelInvalid => {
            return Err(PlanError::Internal(
                "solver backend rejected the compiled model".into(),
            ))
        }
    };

    let roster = if solution.is_solution_found() {
        Some(compiler.project(&solution)?)
    } else {
        None
    };

    info!(
        ?verdict,
        solve_time_ms = solution.solve_time_ms,
        decisions = solution.decisions,
        "roster solve finished"
    );

    Ok(SolveOutcome {
        verdict,
        roster,
        objective_value: solution.objective_value,
        diagnostics,
        solve_time_ms: solution.solve_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CoverageLevel, CoveragePlan, ObjectiveMode, RoleRequirement, Roster, ShiftRequest,
        ShiftType, StaffMember, ACTIVE_SHIFTS,
    };

    fn staff(n: u32) -> Vec<StaffMember> {
        (1..=n)
            .map(|id| StaffMember::new(id, format!("S{id}")))
            .collect()
    }

    fn test_solver_config() -> SolverConfig {
        SolverConfig {
            time_limit_ms: 5_000,
            decision_limit: 200_000,
            stop_after_first: false,
        }
    }

    /// Checks every invariant a produced roster must satisfy.
    fn assert_roster_invariants(
        problem: &ShiftProblem,
        config: &PlannerConfig,
        roster: &Roster,
    ) {
        // Exactly one shift per (staff, day): one entry per staff
        // member, one value per day.
        assert_eq!(roster.staff_count(), problem.staff.len());
        for entry in &roster.entries {
            assert_eq!(entry.days.len(), problem.day_count);
        }

        // Coverage per day and active shift.
        for day in problem.days() {
            let level = problem.coverage.resolve(day);
            for &shift in &ACTIVE_SHIFTS {
                assert!(
                    roster.assigned_count(day, shift) >= level.required(shift) as usize,
                    "coverage violated on day {day} for {shift:?}"
                );
            }
        }

        // Role coverage per requirement and day.
        for requirement in &problem.role_requirements {
            for day in problem.days() {
                let working = problem
                    .staff
                    .iter()
                    .filter(|s| s.qualifies_for(&requirement.role))
                    .filter(|s| {
                        roster
                            .get(s.id)
                            .map(|e| e.days[day].is_working())
                            .unwrap_or(false)
                    })
                    .count();
                assert!(working >= requirement.count as usize);
            }
        }

        // Sliding-window consecutive cap.
        let window = config.max_consecutive_work_days + 1;
        for entry in &roster.entries {
            if problem.day_count < window {
                continue;
            }
            for start in 0..=(problem.day_count - window) {
                let worked = entry.days[start..start + window]
                    .iter()
                    .filter(|s| s.is_working())
                    .count();
                assert!(
                    worked <= config.max_consecutive_work_days,
                    "staff {} exceeds the consecutive cap at window {start}",
                    entry.staff_id
                );
            }
        }

        // Hard requests honored exactly.
        for request in &problem.requests {
            if !request.is_mandatory() || request.day >= problem.day_count {
                continue;
            }
            if let Some(entry) = roster.get(request.staff_id) {
                assert_eq!(entry.days[request.day], ShiftType::Off);
            }
        }
    }

    #[test]
    fn test_scenario_a_small_roster_is_solvable() {
        let problem = ShiftProblem::new(staff(3), 7)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)));
        let config = PlannerConfig::default();

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        assert!(outcome.is_scheduled(), "verdict was {:?}", outcome.verdict);
        assert_roster_invariants(&problem, &config, outcome.roster.as_ref().unwrap());
    }

    #[test]
    fn test_month_horizon_solves_within_default_budget() {
        let problem = ShiftProblem::new(staff(5), 30)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)));
        let config = PlannerConfig::default().with_objective(ObjectiveMode::None);

        let outcome = plan(&problem, &config, &SolverConfig::default()).unwrap();
        assert!(outcome.is_scheduled(), "verdict was {:?}", outcome.verdict);
        assert_roster_invariants(&problem, &config, outcome.roster.as_ref().unwrap());
    }

    #[test]
    fn test_scenario_b_one_person_cannot_cover_two_shifts() {
        let problem = ShiftProblem::new(staff(1), 7)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)));
        let config = PlannerConfig::default();

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        assert_eq!(outcome.verdict, SolveVerdict::Infeasible);
        assert!(outcome.roster.is_none());
    }

    #[test]
    fn test_scenario_c_hard_requests_force_all_days_off() {
        let mut problem = ShiftProblem::new(staff(6), 6)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)));
        for day in 0..6 {
            problem = problem.with_request(ShiftRequest::must_not_work(1, day));
        }
        let config = PlannerConfig::default();

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        assert!(outcome.is_scheduled(), "verdict was {:?}", outcome.verdict);
        let roster = outcome.roster.unwrap();
        assert!(roster.get(1).unwrap().days.iter().all(|s| *s == ShiftType::Off));
        assert_roster_invariants(&problem, &config, &roster);
    }

    #[test]
    fn test_scenario_d_sole_leader_covers_every_day() {
        // Horizon shorter than the consecutive window, so the single
        // leader can legally work every day.
        let mut members = staff(10);
        members[0] = StaffMember::new(1, "Lead").as_leader();
        let problem = ShiftProblem::new(members, 5)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)))
            .with_role_requirement(RoleRequirement::new("Leader", 1));
        let config = PlannerConfig::default().with_objective(ObjectiveMode::None);

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        assert!(outcome.is_scheduled(), "verdict was {:?}", outcome.verdict);
        let roster = outcome.roster.unwrap();
        assert!(roster.get(1).unwrap().days.iter().all(|s| s.is_working()));
        assert_roster_invariants(&problem, &config, &roster);
    }

    #[test]
    fn test_scenario_d_leader_rule_is_never_dropped() {
        // Seven days with a five-day cap: the sole leader cannot work
        // them all, so the rule must surface as infeasibility.
        let mut members = staff(10);
        members[0] = StaffMember::new(1, "Lead").as_leader();
        let problem = ShiftProblem::new(members, 7)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)))
            .with_role_requirement(RoleRequirement::new("Leader", 1));
        let config = PlannerConfig::default().with_objective(ObjectiveMode::None);

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        assert_eq!(outcome.verdict, SolveVerdict::Infeasible);
        assert!(outcome.roster.is_none());
    }

    #[test]
    fn test_coverage_override_takes_precedence() {
        let problem = ShiftProblem::new(staff(3), 3).with_coverage(
            CoveragePlan::new(CoverageLevel::new(1, 1)).with_override(1, CoverageLevel::new(2, 1)),
        );
        let config = PlannerConfig::default().with_objective(ObjectiveMode::None);

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        let roster = outcome.roster.unwrap();
        assert!(roster.assigned_count(1, ShiftType::Early) >= 2);
        assert_roster_invariants(&problem, &config, &roster);
    }

    #[test]
    fn test_malformed_input_reports_all_errors() {
        let problem = ShiftProblem::new(
            vec![StaffMember::new(1, "A"), StaffMember::new(1, "B")],
            0,
        );
        let err = plan(&problem, &PlannerConfig::default(), &test_solver_config()).unwrap_err();
        match err {
            PlanError::Malformed(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_request_surfaces_as_diagnostic() {
        let problem = ShiftProblem::new(staff(2), 3)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)))
            .with_request(ShiftRequest::must_not_work(42, 0));
        let config = PlannerConfig::default().with_objective(ObjectiveMode::None);

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        assert!(outcome.is_scheduled());
        assert!(outcome.diagnostics.iter().any(|d| d.contains("42")));
    }

    #[test]
    fn test_budget_expiry_is_unknown_not_infeasible() {
        let problem = ShiftProblem::new(staff(3), 7)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)));
        let config = PlannerConfig::default().with_objective(ObjectiveMode::None);
        let starved = SolverConfig {
            decision_limit: 1,
            ..test_solver_config()
        };

        let outcome = plan(&problem, &config, &starved).unwrap();
        assert_eq!(outcome.verdict, SolveVerdict::Unknown);
        assert!(outcome.roster.is_none());
    }

    #[test]
    fn test_balanced_workload_spread_is_reported() {
        let problem = ShiftProblem::new(staff(4), 4)
            .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)));
        let config = PlannerConfig::default().with_objective(ObjectiveMode::BalanceWorkload);

        let outcome = plan(&problem, &config, &test_solver_config()).unwrap();
        assert!(outcome.is_scheduled());
        let roster = outcome.roster.unwrap();
        let spreads: Vec<usize> = roster.entries.iter().map(|e| e.working_days()).collect();
        let spread = spreads.iter().max().unwrap() - spreads.iter().min().unwrap();
        assert_eq!(outcome.objective_value, Some(spread as i64));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn verdict(staff_count: u32, days: usize, early: u32, late: u32) -> SolveVerdict {
            let problem = ShiftProblem::new(staff(staff_count), days)
                .with_coverage(CoveragePlan::new(CoverageLevel::new(early, late)));
            let config = PlannerConfig::default().with_objective(ObjectiveMode::None);
            plan(&problem, &config, &test_solver_config())
                .expect("structurally valid problem")
                .verdict
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// Tightening a coverage minimum never turns an infeasible
            /// input feasible; relaxing it never turns a feasible one
            /// infeasible.
            #[test]
            fn coverage_monotonicity(
                staff_count in 1u32..=3,
                days in 1usize..=4,
                early in 0u32..=2,
                late in 0u32..=2,
            ) {
                let base = verdict(staff_count, days, early, late);
                let tightened = verdict(staff_count, days, early + 1, late);
                let relaxed = verdict(staff_count, days, early.saturating_sub(1), late);

                if base == SolveVerdict::Infeasible {
                    prop_assert_ne!(tightened, SolveVerdict::Feasible);
                    prop_assert_ne!(tightened, SolveVerdict::Optimal);
                }
                if matches!(base, SolveVerdict::Feasible | SolveVerdict::Optimal) {
                    prop_assert_ne!(relaxed, SolveVerdict::Infeasible);
                }
            }
        }
    }
}
