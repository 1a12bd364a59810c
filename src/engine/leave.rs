//! Leave submission, review and balance accounting.
//!
//! A leave request is admitted only when the balance for its type can cover
//! the working-day duration; the ledger itself is debited when an approver
//! grants the request, inside the same transaction that flips the status,
//! so a repeated approval can never double-debit and a paid balance can
//! never go negative.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::calendar;
use crate::directory::resolve_approvers;
use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveBalance, LeaveRequest};
use crate::notify::fan_out;
use crate::store::StoreState;
use crate::workflow::{self, Decision, RequestStatus};

use super::Engine;

impl Engine {
    /// Submits a leave request.
    ///
    /// The working-day duration is computed from the holiday snapshot in
    /// effect right now and fixed on the request; the approver snapshot is
    /// resolved once and fixed likewise. For paid types the remaining
    /// balance must cover the duration or the submission is rejected with
    /// [`EngineError::InsufficientBalance`] and no record is created.
    pub fn submit_leave(
        &self,
        employee_id: &str,
        leave_type: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<LeaveRequest> {
        workflow::validate_reason(reason)?;
        let type_config = self.policy().leave_type(leave_type)?.clone();
        let employee = self.employee(employee_id)?;
        let approver_ids = resolve_approvers(self.directory(), &employee.organization_id)?;

        let request = self.store().transact(|state| {
            state.employee(employee_id)?;
            let holidays = state.holiday_set();
            let summary = calendar::working_days(
                start_date,
                end_date,
                self.policy().weekly_off(),
                &holidays,
            )?;
            if summary.working_days == 0 {
                return Err(EngineError::ValidationError {
                    field: "date_range".to_string(),
                    message: "range contains no working days".to_string(),
                });
            }

            if type_config.category.is_paid() {
                let requested = Decimal::from(summary.working_days);
                let available = state
                    .leave_balances
                    .get(employee_id)
                    .map(|b| b.remaining(leave_type))
                    .unwrap_or(Decimal::ZERO);
                if requested > available {
                    return Err(EngineError::InsufficientBalance {
                        leave_type: leave_type.to_string(),
                        requested,
                        available,
                    });
                }
            }

            let request = LeaveRequest {
                id: Uuid::new_v4(),
                employee_id: employee_id.to_string(),
                leave_type: leave_type.to_string(),
                start_date,
                end_date,
                duration_days: summary.working_days,
                reason: reason.to_string(),
                status: RequestStatus::Pending,
                approver_ids: approver_ids.clone(),
                created_at: now,
            };
            state.leaves.insert(request.id, request.clone());
            Ok(request)
        })?;

        info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            leave_type = %request.leave_type,
            duration_days = request.duration_days,
            "Leave request submitted"
        );
        fan_out(
            self.notifier(),
            &request.approver_ids,
            &format!("Leave request from {} awaits review", request.employee_id),
        );
        Ok(request)
    }

    /// Applies an approver decision to a pending leave request.
    ///
    /// An approval of a paid type debits the ledger in the same
    /// transaction. Sufficiency is re-verified at this point: when several
    /// pending requests were admitted against the same balance, the ones
    /// the balance can no longer cover fail here with
    /// [`EngineError::InsufficientBalance`] and stay pending.
    pub fn decide_leave(
        &self,
        id: Uuid,
        approver_id: &str,
        decision: Decision,
    ) -> EngineResult<LeaveRequest> {
        let request = self.store().transact(|state| {
            let mut request = state.leave_mut(id)?.clone();
            let status = workflow::decide(&mut request, approver_id, decision)?;

            if status == RequestStatus::Approved
                && self
                    .policy()
                    .leave_type(&request.leave_type)?
                    .category
                    .is_paid()
            {
                debit_balance(
                    state,
                    &request.employee_id,
                    &request.leave_type,
                    Decimal::from(request.duration_days),
                )?;
            }

            state.leaves.insert(id, request.clone());
            Ok(request)
        })?;

        info!(
            request_id = %request.id,
            approver_id = %approver_id,
            status = request.status.as_str(),
            "Leave request decided"
        );
        fan_out(
            self.notifier(),
            &[request.employee_id.clone()],
            &format!("Your leave request was {}", request.status.as_str()),
        );
        Ok(request)
    }

    /// Withdraws a pending leave request on behalf of its owner.
    ///
    /// The request moves to the terminal `cancelled` status and no longer
    /// counts toward pending approvals; the ledger is untouched because
    /// only approval debits it.
    pub fn cancel_leave(&self, id: Uuid, caller_id: &str) -> EngineResult<LeaveRequest> {
        let request = self.store().transact(|state| {
            let mut request = state.leave_mut(id)?.clone();
            workflow::cancel(&mut request, caller_id)?;
            state.leaves.insert(id, request.clone());
            Ok(request)
        })?;

        info!(request_id = %request.id, "Leave request cancelled");
        Ok(request)
    }

    /// Looks up a leave request.
    pub fn leave(&self, id: Uuid) -> EngineResult<LeaveRequest> {
        self.store().transact(|state| state.leave_mut(id).map(|r| r.clone()))
    }

    /// All leave requests of an employee, most recent first.
    pub fn employee_leaves(&self, employee_id: &str) -> Vec<LeaveRequest> {
        self.store().read(|state| {
            let mut leaves: Vec<LeaveRequest> = state
                .leaves
                .values()
                .filter(|r| r.employee_id == employee_id)
                .cloned()
                .collect();
            leaves.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            leaves
        })
    }

    /// Pending leave requests whose snapshot contains the approver.
    pub fn pending_leave_approvals(&self, approver_id: &str) -> Vec<LeaveRequest> {
        self.store().read(|state| {
            let mut leaves: Vec<LeaveRequest> = state
                .leaves
                .values()
                .filter(|r| {
                    r.status == RequestStatus::Pending
                        && r.approver_ids.iter().any(|id| id == approver_id)
                })
                .cloned()
                .collect();
            leaves.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            leaves
        })
    }

    /// Credits days back to a paid-type balance.
    ///
    /// This is the ledger's restore operation, used by administrative
    /// corrections when an already-approved request is reversed.
    pub fn credit_leave_balance(
        &self,
        employee_id: &str,
        leave_type: &str,
        days: Decimal,
    ) -> EngineResult<LeaveBalance> {
        let type_config = self.policy().leave_type(leave_type)?.clone();
        if !type_config.category.is_paid() {
            return Err(EngineError::ValidationError {
                field: "leave_type".to_string(),
                message: format!("'{leave_type}' does not carry a balance"),
            });
        }
        self.store().transact(|state| {
            let balance = state
                .leave_balances
                .entry(employee_id.to_string())
                .or_insert_with(|| LeaveBalance::new(employee_id));
            let current = balance.remaining(leave_type);
            balance
                .balances
                .insert(leave_type.to_string(), current + days);
            Ok(balance.clone())
        })
    }
}

/// Debits a paid-type balance, re-verifying sufficiency first.
fn debit_balance(
    state: &mut StoreState,
    employee_id: &str,
    leave_type: &str,
    days: Decimal,
) -> EngineResult<()> {
    let available = state
        .leave_balances
        .get(employee_id)
        .map(|b| b.remaining(leave_type))
        .unwrap_or(Decimal::ZERO);
    if days > available {
        return Err(EngineError::InsufficientBalance {
            leave_type: leave_type.to_string(),
            requested: days,
            available,
        });
    }
    let balance = state
        .leave_balances
        .entry(employee_id.to_string())
        .or_insert_with(|| LeaveBalance::new(employee_id));
    balance
        .balances
        .insert(leave_type.to_string(), available - days);
    Ok(())
}
