//! Roster scheduling domain models.
//!
//! Core data types for one shift-planning solve: staff, horizon,
//! coverage and role requirements, day-off requests, configuration, and
//! the solved roster. Everything here is call-scoped — built once per
//! solve from validated input, read-only afterwards, shared with
//! nothing.

mod problem;
mod request;
mod requirement;
mod roster;
mod shift;
mod staff;

pub use problem::{ObjectiveMode, PlannerConfig, ShiftProblem};
pub use request::{RequestPriority, ShiftRequest};
pub use requirement::{CoverageLevel, CoveragePlan, RoleRequirement};
pub use roster::{Roster, StaffSchedule};
pub use shift::{ShiftType, ACTIVE_SHIFTS};
pub use staff::{StaffId, StaffMember, LEADER_ROLE};
