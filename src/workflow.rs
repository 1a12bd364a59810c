//! The shared multi-approver review workflow.
//!
//! Leave requests, attendance-edit requests and resignations all move
//! through the same review pattern: created `pending` with a fixed approver
//! snapshot, decided `approved`/`rejected` by any snapshot member, or
//! `cancelled` by the submitting employee while still pending. The pattern
//! is expressed once here over the [`Reviewable`] trait and reused by every
//! request kind, so the transition rules cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEditRequest, LeaveRequest, Resignation, ResignationStatus};

/// Review states shared by every request kind.
///
/// `approved`, `rejected` and `cancelled` are terminal; no further
/// transition is permitted once a request leaves `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting an approver decision.
    Pending,
    /// Granted by an approver.
    Approved,
    /// Declined by an approver.
    Rejected,
    /// Withdrawn by the submitting employee while pending.
    Cancelled,
}

impl RequestStatus {
    /// Lower-case label used in transition errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

/// An approver's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Grant the request.
    Approve,
    /// Decline the request.
    Reject,
}

impl Decision {
    fn verb(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    /// The status a pending request moves to under this decision.
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Decision::Approve => RequestStatus::Approved,
            Decision::Reject => RequestStatus::Rejected,
        }
    }
}

/// A request that participates in the shared review workflow.
pub trait Reviewable {
    /// Entity label used in error messages (e.g. "leave request").
    const ENTITY: &'static str;

    /// The current review status.
    fn status(&self) -> RequestStatus;

    /// Replaces the review status. Callers go through [`decide`]/[`cancel`],
    /// which enforce the transition rules.
    fn set_status(&mut self, status: RequestStatus);

    /// The submitting employee.
    fn employee_id(&self) -> &str;

    /// The approver snapshot captured at submission.
    fn approver_ids(&self) -> &[String];

    /// The state label reported in transition errors. Kinds with a richer
    /// status vocabulary override this to report their own state names.
    fn status_label(&self) -> String {
        self.status().as_str().to_string()
    }
}

/// Applies an approver decision to a pending request.
///
/// The actor must be a member of the request's approver snapshot; snapshot
/// membership is the only authorization re-checked at decision time. A
/// request that has already left `pending` fails with
/// [`EngineError::InvalidTransition`] and is left unchanged, which makes
/// repeated decisions safe no-op failures.
pub fn decide<R: Reviewable>(
    request: &mut R,
    approver_id: &str,
    decision: Decision,
) -> EngineResult<RequestStatus> {
    if !request.approver_ids().iter().any(|id| id == approver_id) {
        return Err(EngineError::NotAnApprover {
            user_id: approver_id.to_string(),
        });
    }
    if request.status() != RequestStatus::Pending {
        return Err(EngineError::InvalidTransition {
            entity: R::ENTITY.to_string(),
            from: request.status_label(),
            action: decision.verb().to_string(),
        });
    }
    let target = decision.target_status();
    request.set_status(target);
    Ok(target)
}

/// Withdraws a pending request on behalf of its submitting employee.
///
/// Cancellation is a terminal `cancelled` status rather than a deletion, so
/// the record stays auditable while no longer counting toward pending
/// approvals or balance holds.
pub fn cancel<R: Reviewable>(request: &mut R, caller_id: &str) -> EngineResult<()> {
    if request.employee_id() != caller_id {
        return Err(EngineError::NotRequestOwner {
            user_id: caller_id.to_string(),
        });
    }
    if request.status() != RequestStatus::Pending {
        return Err(EngineError::InvalidTransition {
            entity: R::ENTITY.to_string(),
            from: request.status_label(),
            action: "cancel".to_string(),
        });
    }
    request.set_status(RequestStatus::Cancelled);
    Ok(())
}

/// Validates the free-text justification every submission must carry.
pub fn validate_reason(reason: &str) -> EngineResult<()> {
    if reason.trim().is_empty() {
        return Err(EngineError::ValidationError {
            field: "reason".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

impl Reviewable for LeaveRequest {
    const ENTITY: &'static str = "leave request";

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn approver_ids(&self) -> &[String] {
        &self.approver_ids
    }
}

impl Reviewable for AttendanceEditRequest {
    const ENTITY: &'static str = "attendance edit request";

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn approver_ids(&self) -> &[String] {
        &self.approver_ids
    }
}

impl Reviewable for Resignation {
    const ENTITY: &'static str = "resignation";

    fn status(&self) -> RequestStatus {
        match self.status {
            ResignationStatus::Pending => RequestStatus::Pending,
            ResignationStatus::Approved
            | ResignationStatus::InClearance
            | ResignationStatus::Completed => RequestStatus::Approved,
            ResignationStatus::Rejected => RequestStatus::Rejected,
            ResignationStatus::Cancelled => RequestStatus::Cancelled,
        }
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = match status {
            RequestStatus::Pending => ResignationStatus::Pending,
            RequestStatus::Approved => ResignationStatus::Approved,
            RequestStatus::Rejected => ResignationStatus::Rejected,
            RequestStatus::Cancelled => ResignationStatus::Cancelled,
        };
    }

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn approver_ids(&self) -> &[String] {
        &self.approver_ids
    }

    fn status_label(&self) -> String {
        self.status.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn make_leave() -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            leave_type: "PL".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            duration_days: 5,
            reason: "Travel".to_string(),
            status: RequestStatus::Pending,
            approver_ids: vec!["mgr_001".to_string(), "hr_001".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_member_can_approve() {
        let mut leave = make_leave();
        let status = decide(&mut leave, "hr_001", Decision::Approve).unwrap();
        assert_eq!(status, RequestStatus::Approved);
        assert_eq!(leave.status, RequestStatus::Approved);
    }

    #[test]
    fn test_non_member_cannot_decide() {
        let mut leave = make_leave();
        let err = decide(&mut leave, "intruder", Decision::Approve).unwrap_err();
        assert!(matches!(err, EngineError::NotAnApprover { .. }));
        assert_eq!(leave.status, RequestStatus::Pending);
    }

    #[test]
    fn test_second_decision_is_invalid_transition() {
        let mut leave = make_leave();
        decide(&mut leave, "mgr_001", Decision::Approve).unwrap();
        let err = decide(&mut leave, "hr_001", Decision::Reject).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition { ref from, .. } if from == "approved"
        ));
        assert_eq!(leave.status, RequestStatus::Approved);
    }

    #[test]
    fn test_owner_can_cancel_while_pending() {
        let mut leave = make_leave();
        cancel(&mut leave, "emp_001").unwrap();
        assert_eq!(leave.status, RequestStatus::Cancelled);
    }

    #[test]
    fn test_cancel_after_cancel_is_invalid_transition() {
        let mut leave = make_leave();
        cancel(&mut leave, "emp_001").unwrap();
        let err = cancel(&mut leave, "emp_001").unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition { ref from, .. } if from == "cancelled"
        ));
    }

    #[test]
    fn test_non_owner_cannot_cancel() {
        let mut leave = make_leave();
        let err = cancel(&mut leave, "mgr_001").unwrap_err();
        assert!(matches!(err, EngineError::NotRequestOwner { .. }));
    }

    #[test]
    fn test_cancel_after_decision_is_invalid_transition() {
        let mut leave = make_leave();
        decide(&mut leave, "mgr_001", Decision::Reject).unwrap();
        assert!(cancel(&mut leave, "emp_001").is_err());
    }

    #[test]
    fn test_blank_reason_rejected() {
        assert!(validate_reason("  ").is_err());
        assert!(validate_reason("family event").is_ok());
    }

    #[test]
    fn test_resignation_reports_its_own_state_labels() {
        let mut resignation = Resignation {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            resignation_type: crate::models::ResignationType::Voluntary,
            submission_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            last_working_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            notice_period_days: 60,
            reason: "Relocation".to_string(),
            remarks: None,
            department: "Engineering".to_string(),
            designation: "Engineer".to_string(),
            status: ResignationStatus::InClearance,
            approver_ids: vec!["hr_001".to_string()],
            created_at: Utc::now(),
        };

        let err = decide(&mut resignation, "hr_001", Decision::Approve).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition { ref from, .. } if from == "in_clearance"
        ));
        assert_eq!(resignation.status, ResignationStatus::InClearance);
    }
}
