//! Roster problem and planner configuration.
//!
//! A `ShiftProblem` is the full, already-validated input for one solve:
//! staff, horizon, coverage plan, role requirements, and requests. It is
//! call-scoped — constructed per invocation, never shared across solves.

use serde::{Deserialize, Serialize};

use super::{CoveragePlan, RoleRequirement, ShiftRequest, StaffMember};

/// Which optimization goal the compiled model carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectiveMode {
    /// Feasibility only: any assignment satisfying the constraints.
    None,
    /// Maximize the total count of working assignments.
    MaximizeCoverage,
    /// Minimize the workload spread (max minus min total working days
    /// across staff).
    #[default]
    BalanceWorkload,
}

/// Named, documented planner defaults, injected into the compiler
/// instead of hard-coded constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Longest run of consecutive working days allowed per staff member.
    pub max_consecutive_work_days: usize,
    /// Active objective mode (exactly one per solve).
    pub objective: ObjectiveMode,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_consecutive_work_days: 5,
            objective: ObjectiveMode::BalanceWorkload,
        }
    }
}

impl PlannerConfig {
    /// Sets the consecutive-workday cap.
    pub fn with_max_consecutive(mut self, days: usize) -> Self {
        self.max_consecutive_work_days = days;
        self
    }

    /// Sets the objective mode.
    pub fn with_objective(mut self, objective: ObjectiveMode) -> Self {
        self.objective = objective;
        self
    }
}

/// One complete roster problem instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftProblem {
    /// Staff to schedule, in the order the output roster preserves.
    pub staff: Vec<StaffMember>,
    /// Number of days in the horizon; days are indexed `0..day_count`.
    pub day_count: usize,
    /// Minimum coverage per day and active shift type.
    pub coverage: CoveragePlan,
    /// Role minimums that must hold on every day.
    pub role_requirements: Vec<RoleRequirement>,
    /// Day-off requests.
    pub requests: Vec<ShiftRequest>,
}

impl ShiftProblem {
    /// Creates a problem with default coverage and no rules.
    pub fn new(staff: Vec<StaffMember>, day_count: usize) -> Self {
        Self {
            staff,
            day_count,
            coverage: CoveragePlan::default(),
            role_requirements: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Sets the coverage plan.
    pub fn with_coverage(mut self, coverage: CoveragePlan) -> Self {
        self.coverage = coverage;
        self
    }

    /// Adds a role requirement.
    pub fn with_role_requirement(mut self, requirement: RoleRequirement) -> Self {
        self.role_requirements.push(requirement);
        self
    }

    /// Adds a day-off request.
    pub fn with_request(mut self, request: ShiftRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Days in the horizon as an iterator.
    pub fn days(&self) -> std::ops::Range<usize> {
        0..self.day_count
    }

    /// Looks up a staff member by id.
    pub fn staff_by_id(&self, id: super::StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }
}
