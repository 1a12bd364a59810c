//! Resignation model and status vocabulary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of separation being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResignationType {
    /// Employee-initiated resignation.
    Voluntary,
    /// Retirement at the end of service.
    Retirement,
    /// Employer-initiated termination.
    Termination,
}

/// Lifecycle states of a resignation.
///
/// The review states (`pending`, `approved`, `rejected`, `cancelled`) follow
/// the shared request workflow; `in_clearance` and `completed` are the
/// further progression driven by the exit pipeline once clearance starts and
/// the settlement is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResignationStatus {
    /// Awaiting an approver decision.
    Pending,
    /// Approved; clearance has been opened.
    Approved,
    /// Department clearance is underway.
    InClearance,
    /// Settlement recorded; the pipeline is finished.
    Completed,
    /// Rejected by an approver.
    Rejected,
    /// Withdrawn by the employee while still pending.
    Cancelled,
}

impl ResignationStatus {
    /// Returns true while the resignation blocks a new submission.
    ///
    /// At most one resignation per employee may be in an active state.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ResignationStatus::Pending
                | ResignationStatus::Approved
                | ResignationStatus::InClearance
        )
    }

    /// Lower-case label used in transition errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResignationStatus::Pending => "pending",
            ResignationStatus::Approved => "approved",
            ResignationStatus::InClearance => "in_clearance",
            ResignationStatus::Completed => "completed",
            ResignationStatus::Rejected => "rejected",
            ResignationStatus::Cancelled => "cancelled",
        }
    }
}

/// A resignation submission entering the exit pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resignation {
    /// Unique identifier of the resignation document.
    pub id: Uuid,
    /// The employee resigning.
    pub employee_id: String,
    /// The kind of separation.
    pub resignation_type: ResignationType,
    /// The date the resignation was submitted.
    pub submission_date: NaiveDate,
    /// The employee's intended last working date.
    pub last_working_date: NaiveDate,
    /// The notice period in calendar days.
    pub notice_period_days: u32,
    /// The employee's justification.
    pub reason: String,
    /// Optional reviewer remarks recorded with the decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Denormalized department at submission time.
    pub department: String,
    /// Denormalized designation at submission time.
    pub designation: String,
    /// Current pipeline status.
    pub status: ResignationStatus,
    /// Snapshot of eligible approver ids captured at submission.
    pub approver_ids: Vec<String>,
    /// When the resignation was submitted.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_approved_in_clearance_are_active() {
        assert!(ResignationStatus::Pending.is_active());
        assert!(ResignationStatus::Approved.is_active());
        assert!(ResignationStatus::InClearance.is_active());
    }

    #[test]
    fn test_terminal_states_are_not_active() {
        assert!(!ResignationStatus::Completed.is_active());
        assert!(!ResignationStatus::Rejected.is_active());
        assert!(!ResignationStatus::Cancelled.is_active());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ResignationStatus::InClearance).unwrap(),
            "\"in_clearance\""
        );
        assert_eq!(
            serde_json::to_string(&ResignationType::Voluntary).unwrap(),
            "\"voluntary\""
        );
    }

    #[test]
    fn test_resignation_round_trip() {
        let resignation = Resignation {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            resignation_type: ResignationType::Voluntary,
            submission_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            last_working_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            notice_period_days: 60,
            reason: "Relocation".to_string(),
            remarks: None,
            department: "Engineering".to_string(),
            designation: "Engineer".to_string(),
            status: ResignationStatus::Pending,
            approver_ids: vec!["hr_001".to_string()],
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&resignation).unwrap();
        let deserialized: Resignation = serde_json::from_str(&json).unwrap();
        assert_eq!(resignation, deserialized);
    }
}
