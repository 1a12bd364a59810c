//! Employee model and related types.
//!
//! This module defines the Employee struct along with the role and gender
//! enumerations. Employee records are owned by the provisioning collaborator
//! and are read-only to this engine.

use serde::{Deserialize, Serialize};

/// Represents the role an employee holds within the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// Organization administrator.
    Admin,
    /// Human-resources manager.
    HrManager,
    /// Line manager.
    Manager,
    /// Regular staff member with no approval authority.
    Staff,
}

impl EmployeeRole {
    /// Returns true if the role is authorized to approve requests.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_engine::models::EmployeeRole;
    ///
    /// assert!(EmployeeRole::HrManager.is_approver());
    /// assert!(!EmployeeRole::Staff.is_approver());
    /// ```
    pub fn is_approver(&self) -> bool {
        matches!(
            self,
            EmployeeRole::Admin | EmployeeRole::HrManager | EmployeeRole::Manager
        )
    }
}

/// Employee gender as recorded by the provisioning collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Any other or undisclosed gender.
    Other,
}

/// Represents an employee known to the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Opaque identifier issued by the provisioning collaborator.
    pub id: String,
    /// The organization the employee belongs to.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Human-facing employee code (e.g., "EMP-0042").
    pub code: String,
    /// The role the employee holds.
    pub role: EmployeeRole,
    /// Recorded gender.
    pub gender: Gender,
    /// Department the employee works in.
    pub department: String,
    /// Job designation.
    pub designation: String,
    /// Blocked employees cannot act and are skipped during approver resolution.
    #[serde(default)]
    pub blocked: bool,
}

impl Employee {
    /// Returns true if the employee currently holds an approver role and is
    /// not blocked.
    pub fn can_approve(&self) -> bool {
        self.role.is_approver() && !self.blocked
    }
}
