//! Attendance record and attendance-edit request models.
//!
//! One attendance record exists per employee per calendar date. A record is
//! opened by a punch-in and closed by a punch-out; a forgotten punch-out is
//! repaired through a reviewed [`AttendanceEditRequest`] rather than a direct
//! mutation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::RequestStatus;

/// A geographic coordinate captured with a punch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

/// One daily attendance record for an employee.
///
/// # Example
///
/// ```
/// use hr_engine::models::{AttendanceRecord, GeoPoint};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     employee_name: "Asha Verma".to_string(),
///     employee_code: "EMP-0001".to_string(),
///     punch_in: NaiveDateTime::parse_from_str("2024-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     punch_in_location: GeoPoint { lat: 12.97, lng: 77.59 },
///     punch_out: Some(NaiveDateTime::parse_from_str("2024-03-01 17:30:00", "%Y-%m-%d %H:%M:%S").unwrap()),
///     punch_out_location: Some(GeoPoint { lat: 12.97, lng: 77.59 }),
/// };
/// assert_eq!(record.hours_worked(), Some(Decimal::new(85, 1))); // 8.5 hours
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar date of the record; one record per (employee, date).
    pub date: NaiveDate,
    /// Denormalized display name.
    pub employee_name: String,
    /// Denormalized employee code.
    pub employee_code: String,
    /// The punch-in timestamp.
    pub punch_in: NaiveDateTime,
    /// Where the punch-in happened.
    pub punch_in_location: GeoPoint,
    /// The punch-out timestamp, absent until the employee punches out.
    pub punch_out: Option<NaiveDateTime>,
    /// Where the punch-out happened.
    pub punch_out_location: Option<GeoPoint>,
}

impl AttendanceRecord {
    /// Hours worked on this record, only defined once both punches exist.
    ///
    /// The value is the punch interval in minutes converted to decimal
    /// hours, matching the granularity punches are captured at.
    pub fn hours_worked(&self) -> Option<Decimal> {
        let punch_out = self.punch_out?;
        let minutes = (punch_out - self.punch_in).num_minutes();
        Some(Decimal::new(minutes, 0) / Decimal::new(60, 0))
    }
}

/// A reviewed request to apply a missing punch-out to an attendance record.
///
/// Raised only when the underlying record has a punch-in and no punch-out;
/// the requested punch-out is applied to the record by an approver decision,
/// never by the employee directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEditRequest {
    /// Unique identifier of the request document.
    pub id: Uuid,
    /// The employee who submitted the request.
    pub employee_id: String,
    /// The date of the attendance record being repaired.
    pub date: NaiveDate,
    /// The record's punch-in at submission time.
    pub current_punch_in: NaiveDateTime,
    /// The record's punch-out at submission time (always absent on a valid
    /// submission; kept for audit).
    pub current_punch_out: Option<NaiveDateTime>,
    /// The punch-out the employee asks to record.
    pub requested_punch_out: NaiveDateTime,
    /// The employee's justification.
    pub reason: String,
    /// Current review status.
    pub status: RequestStatus,
    /// Snapshot of eligible approver ids captured at submission.
    pub approver_ids: Vec<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
}
