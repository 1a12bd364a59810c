//! Attendance punches, derived hour statistics and the reviewed edit path.
//!
//! One record exists per employee per date. The punch operations enforce
//! the record invariants atomically; a forgotten punch-out is repaired only
//! through an approved [`AttendanceEditRequest`], applied to the record by
//! the deciding approver, never by the employee directly.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::directory::resolve_approvers;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEditRequest, AttendanceRecord, GeoPoint};
use crate::notify::fan_out;
use crate::workflow::{self, Decision, RequestStatus};

use super::Engine;

/// Hours attributed to one calendar day of a weekly view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    /// The calendar day.
    pub date: NaiveDate,
    /// Hours worked that day; zero when no completed record exists.
    pub hours: Decimal,
}

/// Aggregate view over the seven most recent calendar days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Oldest-first per-day buckets.
    pub days: Vec<DayHours>,
    /// Sum of the per-day hours.
    pub total_hours: Decimal,
}

impl Engine {
    /// Opens the attendance record for `(employee, date)`.
    ///
    /// Fails with [`EngineError::DuplicatePunchIn`] when a record already
    /// exists; the existence check and the insert run in one transaction.
    pub fn punch_in(
        &self,
        employee_id: &str,
        date: NaiveDate,
        at: NaiveDateTime,
        location: GeoPoint,
    ) -> EngineResult<AttendanceRecord> {
        let record = self.store().transact(|state| {
            let employee = state.employee(employee_id)?.clone();
            let key = (employee_id.to_string(), date);
            if state.attendance.contains_key(&key) {
                return Err(EngineError::DuplicatePunchIn {
                    employee_id: employee_id.to_string(),
                    date,
                });
            }
            if at.date() != date {
                return Err(EngineError::ValidationError {
                    field: "punch_in".to_string(),
                    message: "timestamp does not fall on the record date".to_string(),
                });
            }

            let record = AttendanceRecord {
                employee_id: employee_id.to_string(),
                date,
                employee_name: employee.name,
                employee_code: employee.code,
                punch_in: at,
                punch_in_location: location,
                punch_out: None,
                punch_out_location: None,
            };
            state.attendance.insert(key, record.clone());
            Ok(record)
        })?;

        info!(employee_id = %employee_id, date = %date, "Punched in");
        Ok(record)
    }

    /// Closes the attendance record for `(employee, date)`.
    pub fn punch_out(
        &self,
        employee_id: &str,
        date: NaiveDate,
        at: NaiveDateTime,
        location: GeoPoint,
    ) -> EngineResult<AttendanceRecord> {
        let record = self.store().transact(|state| {
            let key = (employee_id.to_string(), date);
            let record = state
                .attendance
                .get_mut(&key)
                .ok_or(EngineError::NoPunchInFound {
                    employee_id: employee_id.to_string(),
                    date,
                })?;
            if record.punch_out.is_some() {
                return Err(EngineError::AlreadyPunchedOut {
                    employee_id: employee_id.to_string(),
                    date,
                });
            }
            if at < record.punch_in {
                return Err(EngineError::ValidationError {
                    field: "punch_out".to_string(),
                    message: "precedes the punch-in".to_string(),
                });
            }
            record.punch_out = Some(at);
            record.punch_out_location = Some(location);
            Ok(record.clone())
        })?;

        info!(employee_id = %employee_id, date = %date, "Punched out");
        Ok(record)
    }

    /// Looks up the attendance record for `(employee, date)`.
    pub fn attendance(&self, employee_id: &str, date: NaiveDate) -> EngineResult<AttendanceRecord> {
        self.store()
            .read(|state| state.attendance.get(&(employee_id.to_string(), date)).cloned())
            .ok_or_else(|| EngineError::NotFound {
                entity: "attendance record".to_string(),
                id: format!("{employee_id}/{date}"),
            })
    }

    /// Buckets the seven most recent calendar days ending at `today`.
    ///
    /// Days without a completed record contribute zero hours. The caller
    /// supplies the clock.
    pub fn weekly_summary(&self, employee_id: &str, today: NaiveDate) -> WeeklySummary {
        self.store().read(|state| {
            let mut days = Vec::with_capacity(7);
            let mut total = Decimal::ZERO;
            for offset in (0u64..7).rev() {
                let date = today
                    .checked_sub_days(Days::new(offset))
                    .unwrap_or(today);
                let hours = state
                    .attendance
                    .get(&(employee_id.to_string(), date))
                    .and_then(AttendanceRecord::hours_worked)
                    .unwrap_or(Decimal::ZERO);
                total += hours;
                days.push(DayHours { date, hours });
            }
            WeeklySummary {
                days,
                total_hours: total,
            }
        })
    }

    /// Raises a reviewed request to apply a missing punch-out.
    ///
    /// Valid only while the record has a punch-in and no punch-out, and
    /// only one pending edit request may exist per record.
    pub fn submit_attendance_edit(
        &self,
        employee_id: &str,
        date: NaiveDate,
        requested_punch_out: NaiveDateTime,
        reason: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<AttendanceEditRequest> {
        workflow::validate_reason(reason)?;
        let employee = self.employee(employee_id)?;
        let approver_ids = resolve_approvers(self.directory(), &employee.organization_id)?;

        let request = self.store().transact(|state| {
            let key = (employee_id.to_string(), date);
            let record = state
                .attendance
                .get(&key)
                .ok_or(EngineError::NoPunchInFound {
                    employee_id: employee_id.to_string(),
                    date,
                })?;
            if record.punch_out.is_some() {
                return Err(EngineError::AlreadyPunchedOut {
                    employee_id: employee_id.to_string(),
                    date,
                });
            }
            if requested_punch_out < record.punch_in {
                return Err(EngineError::ValidationError {
                    field: "requested_punch_out".to_string(),
                    message: "precedes the punch-in".to_string(),
                });
            }
            let duplicate_pending = state.edit_requests.values().any(|r| {
                r.employee_id == employee_id
                    && r.date == date
                    && r.status == RequestStatus::Pending
            });
            if duplicate_pending {
                return Err(EngineError::ValidationError {
                    field: "attendance".to_string(),
                    message: "a pending edit request already exists for this record".to_string(),
                });
            }

            let request = AttendanceEditRequest {
                id: Uuid::new_v4(),
                employee_id: employee_id.to_string(),
                date,
                current_punch_in: record.punch_in,
                current_punch_out: record.punch_out,
                requested_punch_out,
                reason: reason.to_string(),
                status: RequestStatus::Pending,
                approver_ids: approver_ids.clone(),
                created_at: now,
            };
            state.edit_requests.insert(request.id, request.clone());
            Ok(request)
        })?;

        info!(
            request_id = %request.id,
            employee_id = %employee_id,
            date = %date,
            "Attendance edit request submitted"
        );
        fan_out(
            self.notifier(),
            &request.approver_ids,
            &format!("Attendance edit request from {employee_id} awaits review"),
        );
        Ok(request)
    }

    /// Applies an approver decision to a pending edit request.
    ///
    /// An approval writes the requested punch-out onto the underlying
    /// record in the same transaction; if the record was closed in the
    /// meantime the decision fails and the request stays pending.
    pub fn decide_attendance_edit(
        &self,
        id: Uuid,
        approver_id: &str,
        decision: Decision,
    ) -> EngineResult<AttendanceEditRequest> {
        let request = self.store().transact(|state| {
            let mut request = state.edit_request_mut(id)?.clone();
            let status = workflow::decide(&mut request, approver_id, decision)?;

            if status == RequestStatus::Approved {
                let key = (request.employee_id.clone(), request.date);
                let record = state
                    .attendance
                    .get_mut(&key)
                    .ok_or(EngineError::NoPunchInFound {
                        employee_id: request.employee_id.clone(),
                        date: request.date,
                    })?;
                if record.punch_out.is_some() {
                    return Err(EngineError::AlreadyPunchedOut {
                        employee_id: request.employee_id.clone(),
                        date: request.date,
                    });
                }
                record.punch_out = Some(request.requested_punch_out);
            }

            state.edit_requests.insert(id, request.clone());
            Ok(request)
        })?;

        info!(
            request_id = %request.id,
            approver_id = %approver_id,
            status = request.status.as_str(),
            "Attendance edit request decided"
        );
        fan_out(
            self.notifier(),
            &[request.employee_id.clone()],
            &format!("Your attendance edit request was {}", request.status.as_str()),
        );
        Ok(request)
    }

    /// Withdraws a pending edit request on behalf of its owner.
    pub fn cancel_attendance_edit(
        &self,
        id: Uuid,
        caller_id: &str,
    ) -> EngineResult<AttendanceEditRequest> {
        self.store().transact(|state| {
            let mut request = state.edit_request_mut(id)?.clone();
            workflow::cancel(&mut request, caller_id)?;
            state.edit_requests.insert(id, request.clone());
            Ok(request)
        })
    }

    /// Looks up an attendance-edit request.
    pub fn attendance_edit(&self, id: Uuid) -> EngineResult<AttendanceEditRequest> {
        self.store()
            .read(|state| state.edit_requests.get(&id).cloned())
            .ok_or_else(|| EngineError::NotFound {
                entity: "attendance edit request".to_string(),
                id: id.to_string(),
            })
    }
}
