//! Leave request and leave balance models.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::RequestStatus;

/// A reviewed request for a span of leave.
///
/// The working-day duration and the approver snapshot are fixed at creation
/// and never recomputed, so later holiday additions or role changes cannot
/// alter a request in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier of the request document.
    pub id: Uuid,
    /// The employee who submitted the request.
    pub employee_id: String,
    /// Leave-type code from the policy catalog (e.g., "PL", "SL").
    pub leave_type: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Working days covered by the range, computed once at submission.
    pub duration_days: u32,
    /// The employee's justification.
    pub reason: String,
    /// Current review status.
    pub status: RequestStatus,
    /// Snapshot of eligible approver ids captured at submission.
    pub approver_ids: Vec<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
}

/// Per-employee remaining leave balances.
///
/// Maps leave-type code to the remaining count in half-day granularity.
/// A missing document (or a missing type entry) means a zero balance for
/// every paid type.
///
/// # Example
///
/// ```
/// use hr_engine::models::LeaveBalance;
/// use rust_decimal::Decimal;
///
/// let mut balance = LeaveBalance::new("emp_001");
/// balance.balances.insert("PL".to_string(), Decimal::new(12, 0));
/// assert_eq!(balance.remaining("PL"), Decimal::new(12, 0));
/// assert_eq!(balance.remaining("SL"), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee this balance document belongs to.
    pub employee_id: String,
    /// Leave-type code to remaining count.
    pub balances: HashMap<String, Decimal>,
}

impl LeaveBalance {
    /// Creates an empty balance document for an employee.
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            balances: HashMap::new(),
        }
    }

    /// Returns the remaining balance for a leave type, zero if absent.
    pub fn remaining(&self, leave_type: &str) -> Decimal {
        self.balances.get(leave_type).copied().unwrap_or(Decimal::ZERO)
    }
}
