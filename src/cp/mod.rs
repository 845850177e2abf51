//! Constraint Programming (CP) layer.
//!
//! A finite-domain modeling vocabulary and the solving-capability
//! contract the roster compiler targets: bounded integer and boolean
//! variables, linear (in)equalities, equality reification, max/min
//! aggregates, and an optional integer linear objective.
//!
//! # Key Components
//!
//! - **Variables**: [`IntVar`], [`BoolVar`] — decision variables
//! - **Constraints**: [`Constraint`] — Linear, FixInt, ReifyEq, MaxOf, MinOf
//! - **Model**: [`CpModel`] — container for variables, constraints, objective
//! - **Solver**: [`CpSolver`] trait — interface for solver implementations
//!
//! # Design
//!
//! This module defines the modeling layer plus one self-contained
//! backend, [`BacktrackingSolver`]. The [`CpSolver`] trait allows
//! plugging in external solvers (OR-Tools CP-SAT, CPLEX) instead; any
//! backend honoring the status contract is acceptable. Budget expiry
//! surfaces as `Timeout`/`Unknown` and is never conflated with
//! `Infeasible`.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod solver;
mod variables;

pub use model::{CmpOp, Constraint, CpModel, Objective};
pub use solver::{BacktrackingSolver, CpSolution, CpSolver, SolverConfig, SolverStatus};
pub use variables::{BoolVar, IntVar};
