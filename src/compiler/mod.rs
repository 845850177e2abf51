//! Roster constraint-model compiler.
//!
//! Translates a validated [`ShiftProblem`] into a [`CpModel`] and
//! projects solved values back onto a [`Roster`]. The translation is
//! deterministic: the same problem always yields the same variables,
//! the same rows in the same order, and the same names.
//!
//! # Reference
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//! - Van den Bergh et al. (2013), "Personnel scheduling: a literature review"

use tracing::debug;

use crate::cp::CpModel;
use crate::models::{PlannerConfig, Roster, ShiftProblem};

mod constraints;
mod objective;
mod project;
pub mod vars;

pub use project::{project_roster, ProjectionError};

/// A compiled model plus compile-time diagnostic notes.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    /// The constraint model, ready for any [`crate::cp::CpSolver`].
    pub model: CpModel,
    /// What the compiler could not honor (e.g. soft preferences with
    /// no active objective).
    pub notes: Vec<String>,
}

/// Builds a CP model from roster domain objects.
///
/// # Example
/// ```
/// use shift_planner::compiler::RosterCompiler;
/// use shift_planner::models::{PlannerConfig, ShiftProblem, StaffMember};
///
/// let problem = ShiftProblem::new(vec![StaffMember::new(1, "A")], 7);
/// let config = PlannerConfig::default();
/// let compiled = RosterCompiler::new(&problem, &config).build();
/// assert!(compiled.model.validate().is_ok());
/// ```
pub struct RosterCompiler<'a> {
    problem: &'a ShiftProblem,
    config: &'a PlannerConfig,
}

impl<'a> RosterCompiler<'a> {
    /// Creates a compiler over one problem instance.
    pub fn new(problem: &'a ShiftProblem, config: &'a PlannerConfig) -> Self {
        Self { problem, config }
    }

    /// Compiles the full model.
    ///
    /// Emission order is fixed: cell variables with their reified
    /// indicators, coverage rows, role rows, hard requests, sliding
    /// windows, then the objective (which may introduce counter and
    /// aggregate variables). Order affects solver diagnostics only,
    /// never the semantics.
    pub fn build(&self) -> CompiledModel {
        let mut model = CpModel::new("shift-roster");

        vars::allocate(&mut model, self.problem);
        constraints::compile_coverage(&mut model, self.problem);
        constraints::compile_role_coverage(&mut model, self.problem);
        constraints::compile_hard_requests(&mut model, self.problem);
        constraints::compile_consecutive_cap(
            &mut model,
            self.problem,
            self.config.max_consecutive_work_days,
        );
        let notes = objective::compile_objective(&mut model, self.problem, self.config.objective);

        debug!(
            int_vars = model.int_var_count(),
            bool_vars = model.bool_var_count(),
            constraints = model.constraint_count(),
            objective = ?self.config.objective,
            "compiled roster model"
        );

        CompiledModel { model, notes }
    }

    /// Projects a feasible solution back onto the domain.
    pub fn project(&self, solution: &crate::cp::CpSolution) -> Result<Roster, ProjectionError> {
        project_roster(self.problem, solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CoverageLevel, CoveragePlan, ObjectiveMode, RoleRequirement, ShiftRequest, StaffMember,
    };

    fn sample_problem() -> ShiftProblem {
        ShiftProblem::new(
            vec![
                StaffMember::new(1, "A").as_leader(),
                StaffMember::new(2, "B"),
                StaffMember::new(3, "C"),
            ],
            7,
        )
        .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)))
        .with_role_requirement(RoleRequirement::new("Leader", 1))
        .with_request(ShiftRequest::must_not_work(2, 3))
    }

    #[test]
    fn test_build_shape() {
        let problem = sample_problem();
        let config = PlannerConfig::default();
        let compiled = RosterCompiler::new(&problem, &config).build();
        let model = &compiled.model;

        // 21 cells + 3 workload counters + max/min aggregates.
        assert_eq!(model.int_var_count(), 3 * 7 + 3 + 2);
        // Two indicators per cell.
        assert_eq!(model.bool_var_count(), 3 * 7 * 2);
        // Reifications (42) + coverage (14) + role (7) + request (1)
        // + windows (2 starts x 3 staff) + counters (3) + aggregates (2).
        assert_eq!(model.constraint_count(), 42 + 14 + 7 + 1 + 6 + 3 + 2);
        assert!(model.validate().is_ok());
        assert!(compiled.notes.is_empty());
    }

    #[test]
    fn test_feasibility_mode_adds_no_aggregates() {
        let problem = sample_problem();
        let config = PlannerConfig::default().with_objective(ObjectiveMode::None);
        let compiled = RosterCompiler::new(&problem, &config).build();

        assert_eq!(compiled.model.int_var_count(), 3 * 7);
        assert!(compiled.model.objective.is_none());
    }

    #[test]
    fn test_build_is_deterministic() {
        let problem = sample_problem();
        let config = PlannerConfig::default();
        let a = RosterCompiler::new(&problem, &config).build();
        let b = RosterCompiler::new(&problem, &config).build();

        let names =
            |m: &CpModel| -> Vec<String> { m.int_vars().iter().map(|v| v.name.clone()).collect() };
        assert_eq!(names(&a.model), names(&b.model));
        assert_eq!(a.model.constraint_count(), b.model.constraint_count());
    }
}
