//! Staff member model.
//!
//! Staff are the resources a roster assigns: each has a stable id, a set
//! of role names, and a leader capability flag. Immutable for the
//! duration of one solve.

use serde::{Deserialize, Serialize};

/// Staff identifier, unique and stable across a solve.
pub type StaffId = u32;

/// The role name that the leader capability flag stands in for.
///
/// A role requirement naming this role is satisfied by any staff member
/// whose `is_leader` flag is set, whether or not the role string appears
/// in their role list.
pub const LEADER_ROLE: &str = "Leader";

/// A staff member who can be assigned shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique staff identifier.
    pub id: StaffId,
    /// Human-readable name.
    pub name: String,
    /// Role names this member holds (e.g. "Kitchen", "Hall").
    pub roles: Vec<String>,
    /// Leader capability flag, treated as the "Leader" pseudo-role.
    pub is_leader: bool,
}

impl StaffMember {
    /// Creates a new staff member with no roles.
    pub fn new(id: StaffId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roles: Vec::new(),
            is_leader: false,
        }
    }

    /// Adds a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Sets the leader flag.
    pub fn as_leader(mut self) -> Self {
        self.is_leader = true;
        self
    }

    /// Whether this member satisfies a role requirement for `role`.
    ///
    /// Membership in the role list, or the leader flag when the role
    /// denotes the leader pseudo-role.
    pub fn qualifies_for(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role) || (role == LEADER_ROLE && self.is_leader)
    }
}
