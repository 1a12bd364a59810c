//! Clearance checklist model.
//!
//! A clearance is opened when a resignation is approved: one pending item
//! per configured department. The overall status is always derived from the
//! item states, never stored as an independent choice.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a single department's sign-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceItemStatus {
    /// Awaiting the department's decision.
    Pending,
    /// Cleared by the department.
    Approved,
    /// The department raised an objection.
    Rejected,
}

/// Derived overall status of a clearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceStatus {
    /// At least one item is still pending and none is rejected.
    InProgress,
    /// At least one item was rejected.
    Blocked,
    /// Every item is approved.
    Completed,
}

/// One department's entry in the clearance checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearanceItem {
    /// The department that must sign off.
    pub department: String,
    /// The department's decision state.
    pub status: ClearanceItemStatus,
    /// Who recorded the decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_by: Option<String>,
    /// When the decision was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_date: Option<NaiveDate>,
    /// Free-text remarks recorded with the decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl ClearanceItem {
    /// Creates a pending item for a department.
    pub fn pending(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            status: ClearanceItemStatus::Pending,
            cleared_by: None,
            cleared_date: None,
            remarks: None,
        }
    }
}

/// The multi-department clearance checklist attached to a resignation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clearance {
    /// The resignation this clearance belongs to.
    pub resignation_id: Uuid,
    /// The departing employee.
    pub employee_id: String,
    /// Per-department checklist entries.
    pub items: Vec<ClearanceItem>,
}

impl Clearance {
    /// Opens a clearance with one pending item per department.
    pub fn open(
        resignation_id: Uuid,
        employee_id: impl Into<String>,
        departments: &[String],
    ) -> Self {
        Self {
            resignation_id,
            employee_id: employee_id.into(),
            items: departments.iter().map(ClearanceItem::pending).collect(),
        }
    }

    /// Derives the overall status from the item states.
    ///
    /// `completed` iff every item is approved; `blocked` if any item is
    /// rejected; otherwise `in_progress`.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_engine::models::{Clearance, ClearanceStatus};
    /// use uuid::Uuid;
    ///
    /// let departments = vec!["IT".to_string(), "Finance".to_string()];
    /// let clearance = Clearance::open(Uuid::new_v4(), "emp_001", &departments);
    /// assert_eq!(clearance.overall_status(), ClearanceStatus::InProgress);
    /// ```
    pub fn overall_status(&self) -> ClearanceStatus {
        if self
            .items
            .iter()
            .any(|i| i.status == ClearanceItemStatus::Rejected)
        {
            ClearanceStatus::Blocked
        } else if self
            .items
            .iter()
            .all(|i| i.status == ClearanceItemStatus::Approved)
        {
            ClearanceStatus::Completed
        } else {
            ClearanceStatus::InProgress
        }
    }

    /// Fraction of items approved, as a decimal in `[0, 1]`.
    pub fn progress(&self) -> Decimal {
        if self.items.is_empty() {
            return Decimal::ONE;
        }
        let approved = self
            .items
            .iter()
            .filter(|i| i.status == ClearanceItemStatus::Approved)
            .count();
        Decimal::from(approved) / Decimal::from(self.items.len())
    }
}
