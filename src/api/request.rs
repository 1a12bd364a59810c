//! Request types for the Employee Lifecycle Engine API.
//!
//! This module defines the JSON request structures for the lifecycle
//! endpoints. Timestamps and coordinates for punches are supplied by the
//! caller; the engine never consults a clock of its own for them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;
use crate::workflow::Decision;

/// Request body for `POST /leaves`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLeaveRequest {
    /// The submitting employee.
    pub employee_id: String,
    /// Leave-type code from the policy catalog.
    pub leave_type: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// The employee's justification.
    pub reason: String,
}

/// Request body for the decision endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// The approver recording the decision.
    pub approver_id: String,
    /// The verdict.
    pub decision: Decision,
    /// Optional remarks recorded with the decision (resignations only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Request body for the cancellation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// The submitting employee withdrawing their request.
    pub employee_id: String,
}

/// Request body for `POST /holidays`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayRequest {
    /// The calendar date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for `POST /attendance/punch-in` and `punch-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The punching employee.
    pub employee_id: String,
    /// The record date.
    pub date: NaiveDate,
    /// The punch timestamp, supplied by the caller's clock.
    pub at: NaiveDateTime,
    /// Where the punch happened.
    pub location: GeoPoint,
}

/// Request body for `POST /attendance/edit-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAttendanceEditRequest {
    /// The submitting employee.
    pub employee_id: String,
    /// The date of the record being repaired.
    pub date: NaiveDate,
    /// The punch-out the employee asks to record.
    pub requested_punch_out: NaiveDateTime,
    /// The employee's justification.
    pub reason: String,
}

/// Request body for `POST /resignations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResignationRequest {
    /// The resigning employee.
    pub employee_id: String,
    /// The kind of separation.
    pub resignation_type: crate::models::ResignationType,
    /// The date the resignation is submitted.
    pub submission_date: NaiveDate,
    /// The intended last working date.
    pub last_working_date: NaiveDate,
    /// The employee's justification.
    pub reason: String,
}

/// Request body for clearance item decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearanceDecisionRequest {
    /// The approver recording the sign-off.
    pub actor_id: String,
    /// The verdict.
    pub decision: Decision,
    /// The date of the sign-off.
    pub cleared_date: NaiveDate,
    /// Optional remarks recorded with the sign-off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Request body for `POST /settlements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// The departing employee.
    pub employee_id: String,
    /// Base salary component.
    pub basic_salary: Decimal,
    /// Bonus component.
    #[serde(default)]
    pub bonus: Decimal,
    /// Any other payable amount.
    #[serde(default)]
    pub other_payable: Decimal,
    /// Recovery for unserved notice.
    #[serde(default)]
    pub notice_period_recovery: Decimal,
    /// Recovery of outstanding advances.
    #[serde(default)]
    pub advance_recovery: Decimal,
    /// Any other deduction.
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Free-text remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
