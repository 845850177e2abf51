//! Host-process document boundary.
//!
//! Defines the JSON request and response exchanged with the host: the
//! request carries the full problem in one document, the response one
//! verdict with the schedule on success. Day references are plain
//! indices into the horizon; the host resolves any calendar dates
//! before building the request, and `start_date` travels through the
//! engine untouched.
//!
//! Malformed documents never panic the process: structural problems
//! come back as an `ERROR` response listing every detected issue.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::{PlanError, SolveOutcome, SolveVerdict};
use crate::models::{
    CoverageLevel, CoveragePlan, ObjectiveMode, PlannerConfig, RequestPriority, RoleRequirement,
    ShiftProblem, ShiftRequest, StaffId, StaffMember,
};

/// One staff member on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffDoc {
    /// Unique staff identifier.
    pub id: StaffId,
    /// Display name.
    pub name: String,
    /// Role names this member holds.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Leader capability flag.
    #[serde(default)]
    pub is_leader: bool,
}

/// A day-indexed coverage override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementDoc {
    /// Day index within the horizon.
    pub day: usize,
    /// Minimum early-shift headcount on that day.
    pub early_need: u32,
    /// Minimum late-shift headcount on that day.
    pub late_need: u32,
}

/// A per-day role minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConstraintDoc {
    /// Role name (or "Leader").
    pub role: String,
    /// Minimum qualifying working staff per day.
    pub count: u32,
}

/// A day-off request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDoc {
    /// Requesting staff member.
    pub staff_id: StaffId,
    /// Day index within the horizon.
    pub day: usize,
    /// `0` binds hard; any positive value is a soft preference with
    /// that weight.
    #[serde(default)]
    pub priority: u32,
}

/// Optional planner tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDoc {
    /// Consecutive-workday cap; engine default when absent.
    #[serde(default)]
    pub max_consecutive_work_days: Option<usize>,
    /// Objective mode; engine default when absent.
    #[serde(default)]
    pub objective: Option<ObjectiveMode>,
}

fn default_need() -> u32 {
    CoverageLevel::default().early
}

fn default_days() -> usize {
    30
}

/// One complete solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Staff to schedule, in output order.
    pub staff_list: Vec<StaffDoc>,
    /// Horizon length in days; one month when absent.
    #[serde(default = "default_days")]
    pub days: usize,
    /// Opaque host-side anchor date, echoed back unchanged.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Default early-shift minimum for days without an override.
    #[serde(default = "default_need")]
    pub early_need: u32,
    /// Default late-shift minimum for days without an override.
    #[serde(default = "default_need")]
    pub late_need: u32,
    /// Day-indexed coverage overrides.
    #[serde(default)]
    pub requirements: Vec<RequirementDoc>,
    /// Role minimums that must hold on every day.
    #[serde(default)]
    pub role_constraints: Vec<RoleConstraintDoc>,
    /// Day-off requests.
    #[serde(default)]
    pub requests: Vec<RequestDoc>,
    /// Planner tuning.
    #[serde(default)]
    pub config: ConfigDoc,
}

impl SolveRequest {
    /// Builds the domain problem from this document.
    pub fn to_problem(&self) -> ShiftProblem {
        let staff = self
            .staff_list
            .iter()
            .map(|doc| StaffMember {
                id: doc.id,
                name: doc.name.clone(),
                roles: doc.roles.clone(),
                is_leader: doc.is_leader,
            })
            .collect();

        let mut coverage = CoveragePlan::new(CoverageLevel::new(self.early_need, self.late_need));
        for req in &self.requirements {
            coverage = coverage.with_override(req.day, CoverageLevel::new(req.early_need, req.late_need));
        }

        let role_requirements = self
            .role_constraints
            .iter()
            .map(|doc| RoleRequirement::new(doc.role.clone(), doc.count))
            .collect();

        let requests = self
            .requests
            .iter()
            .map(|doc| ShiftRequest {
                staff_id: doc.staff_id,
                day: doc.day,
                priority: RequestPriority::from_raw(doc.priority),
            })
            .collect();

        ShiftProblem {
            staff,
            day_count: self.days,
            coverage,
            role_requirements,
            requests,
        }
    }

    /// Builds the planner configuration, engine defaults filling any
    /// absent field.
    pub fn planner_config(&self) -> PlannerConfig {
        let mut config = PlannerConfig::default();
        if let Some(cap) = self.config.max_consecutive_work_days {
            config = config.with_max_consecutive(cap);
        }
        if let Some(objective) = self.config.objective {
            config = config.with_objective(objective);
        }
        config
    }
}

/// One solve response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    /// `OPTIMAL`, `FEASIBLE`, `INFEASIBLE`, `UNKNOWN` or `ERROR`.
    pub status: String,
    /// Staff id → shift ordinal per day, present only with a schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BTreeMap<StaffId, Vec<i64>>>,
    /// Objective value, when one was active and a schedule was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_value: Option<i64>,
    /// The request's anchor date, echoed back unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Human-readable summary, present on `ERROR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Every structural problem found, present on `ERROR`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
    /// Non-fatal diagnostics (ignored requests, dropped preferences).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    /// Wall-clock solve time in milliseconds.
    #[serde(default)]
    pub solve_time_ms: i64,
}

impl SolveResponse {
    /// Builds the response for a completed solve.
    pub fn from_outcome(outcome: &SolveOutcome, start_date: Option<String>) -> Self {
        let status = match outcome.verdict {
            SolveVerdict::Optimal => "OPTIMAL",
            SolveVerdict::Feasible => "FEASIBLE",
            SolveVerdict::Infeasible => "INFEASIBLE",
            SolveVerdict::Unknown => "UNKNOWN",
        };

        let schedule = outcome.roster.as_ref().map(|roster| {
            roster
                .entries
                .iter()
                .map(|entry| {
                    (
                        entry.staff_id,
                        entry.days.iter().map(|shift| shift.ordinal()).collect(),
                    )
                })
                .collect()
        });

        Self {
            status: status.to_string(),
            schedule,
            objective_value: outcome.objective_value,
            start_date,
            message: None,
            problems: Vec::new(),
            diagnostics: outcome.diagnostics.clone(),
            solve_time_ms: outcome.solve_time_ms,
        }
    }

    /// Builds the `ERROR` response for a failed solve.
    pub fn from_error(error: &PlanError, start_date: Option<String>) -> Self {
        let problems = match error {
            PlanError::Malformed(errors) => errors.iter().map(|e| e.message.clone()).collect(),
            other => vec![other.to_string()],
        };

        Self {
            status: "ERROR".to_string(),
            schedule: None,
            objective_value: None,
            start_date,
            message: Some(error.to_string()),
            problems,
            diagnostics: Vec::new(),
            solve_time_ms: 0,
        }
    }

    /// Whether this response reports an error rather than a verdict.
    pub fn is_error(&self) -> bool {
        self.status == "ERROR"
    }
}
