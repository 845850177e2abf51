//! Staff shift-roster planner.
//!
//! Compiles staff rostering problems — coverage minimums, role rules,
//! day-off requests, consecutive-workday caps — into a constraint
//! model, solves it, and projects the result back onto a day-by-day
//! roster.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `StaffMember`, `ShiftType`,
//!   `CoveragePlan`, `RoleRequirement`, `ShiftRequest`, `ShiftProblem`,
//!   `Roster`
//! - **`validation`**: Input integrity checks (duplicate ids, horizon
//!   bounds, dangling request references)
//! - **`cp`**: Constraint model, variables, and the backtracking solver
//! - **`compiler`**: Problem-to-model translation and result projection
//! - **`engine`**: Solving driver with the canonical verdict taxonomy
//! - **`protocol`**: JSON document boundary for host processes
//!
//! # Example
//!
//! ```
//! use shift_planner::cp::SolverConfig;
//! use shift_planner::engine::plan;
//! use shift_planner::models::{
//!     CoverageLevel, CoveragePlan, ObjectiveMode, PlannerConfig, ShiftProblem, StaffMember,
//! };
//!
//! let problem = ShiftProblem::new(
//!     vec![
//!         StaffMember::new(1, "Aoi"),
//!         StaffMember::new(2, "Ben"),
//!         StaffMember::new(3, "Cho"),
//!     ],
//!     7,
//! )
//! .with_coverage(CoveragePlan::new(CoverageLevel::new(1, 1)));
//!
//! let config = PlannerConfig::default().with_objective(ObjectiveMode::None);
//! let outcome = plan(&problem, &config, &SolverConfig::default())
//!     .expect("structurally valid problem");
//! assert!(outcome.is_scheduled());
//! ```
//!
//! # References
//!
//! - Van den Bergh et al. (2013), "Personnel scheduling: a literature review"
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

pub mod compiler;
pub mod cp;
pub mod engine;
pub mod models;
pub mod protocol;
pub mod validation;
