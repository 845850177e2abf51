//! Coverage and role requirements.
//!
//! A coverage plan gives the minimum headcount per active shift type:
//! one horizon-wide default plus day-indexed overrides. Role
//! requirements demand a minimum number of qualifying staff actively
//! working on every day.
//!
//! Day-indexed only: any date-keyed configuration is resolved to day
//! indices by the host before the plan is built. The engine never
//! parses calendar strings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ShiftType;

/// Minimum required headcount per active shift type on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageLevel {
    /// Minimum staff on the early shift.
    pub early: u32,
    /// Minimum staff on the late shift.
    pub late: u32,
}

impl CoverageLevel {
    /// Creates a coverage level.
    pub fn new(early: u32, late: u32) -> Self {
        Self { early, late }
    }

    /// The required minimum for one active shift type.
    pub fn required(&self, shift: ShiftType) -> u32 {
        match shift {
            ShiftType::Off => 0,
            ShiftType::Early => self.early,
            ShiftType::Late => self.late,
        }
    }
}

impl Default for CoverageLevel {
    /// The original system's baseline: two on each active shift.
    fn default() -> Self {
        Self { early: 2, late: 2 }
    }
}

/// Horizon-wide default coverage with day-indexed overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoveragePlan {
    /// Default level applied to any day without an override.
    pub default: CoverageLevel,
    /// Per-day overrides, keyed by day index.
    pub overrides: HashMap<usize, CoverageLevel>,
}

impl CoveragePlan {
    /// Creates a plan with the given default and no overrides.
    pub fn new(default: CoverageLevel) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Adds a day-indexed override.
    pub fn with_override(mut self, day: usize, level: CoverageLevel) -> Self {
        self.overrides.insert(day, level);
        self
    }

    /// Resolves the coverage level for a day: override if present,
    /// else the default.
    pub fn resolve(&self, day: usize) -> CoverageLevel {
        self.overrides.get(&day).copied().unwrap_or(self.default)
    }
}

/// Minimum count of staff holding a role who must be actively working
/// (any non-Off shift) on every day of the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirement {
    /// Role name (or "Leader" for the leader pseudo-role).
    pub role: String,
    /// Minimum qualifying working staff per day.
    pub count: u32,
}

impl RoleRequirement {
    /// Creates a role requirement.
    pub fn new(role: impl Into<String>, count: u32) -> Self {
        Self {
            role: role.into(),
            count,
        }
    }
}
