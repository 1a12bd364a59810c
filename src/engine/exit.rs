//! The exit pipeline: resignation, clearance, settlement.
//!
//! The three stages are sequential and each is gated on the prior stage:
//! an approved resignation opens the clearance checklist, a fully approved
//! clearance unlocks the settlement, and recording the settlement finishes
//! the resignation. Every gate check runs inside the transaction that
//! performs the transition.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::directory::resolve_approvers;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Clearance, ClearanceItemStatus, ClearanceStatus, Resignation, ResignationStatus,
    ResignationType, Settlement, SettlementStatus,
};
use crate::notify::fan_out;
use crate::workflow::{self, Decision, RequestStatus};

use super::Engine;

/// Operator-supplied monetary components of a settlement.
///
/// The engine derives the leave encashment, the totals and the net from
/// these together with the ledger and policy.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementInputs {
    /// Base salary component.
    pub basic_salary: Decimal,
    /// Bonus component.
    pub bonus: Decimal,
    /// Any other payable amount.
    pub other_payable: Decimal,
    /// Recovery for unserved notice.
    pub notice_period_recovery: Decimal,
    /// Recovery of outstanding advances.
    pub advance_recovery: Decimal,
    /// Any other deduction.
    pub other_deductions: Decimal,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

impl Engine {
    /// Submits a resignation, entering the exit pipeline at stage one.
    ///
    /// At most one resignation per employee may be pending, approved or in
    /// clearance; the check and the insert run in one transaction. A
    /// voluntary resignation must serve at least the policy notice period.
    pub fn submit_resignation(
        &self,
        employee_id: &str,
        resignation_type: ResignationType,
        submission_date: NaiveDate,
        last_working_date: NaiveDate,
        reason: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Resignation> {
        workflow::validate_reason(reason)?;
        if last_working_date < submission_date {
            return Err(EngineError::InvalidRange {
                start: submission_date,
                end: last_working_date,
            });
        }
        let notice_period_days = (last_working_date - submission_date).num_days() as u32;
        if resignation_type == ResignationType::Voluntary
            && notice_period_days < self.policy().minimum_notice_days()
        {
            return Err(EngineError::ValidationError {
                field: "last_working_date".to_string(),
                message: format!(
                    "voluntary resignation requires {} days of notice",
                    self.policy().minimum_notice_days()
                ),
            });
        }

        let employee = self.employee(employee_id)?;
        let approver_ids = resolve_approvers(self.directory(), &employee.organization_id)?;

        let resignation = self.store().transact(|state| {
            state.employee(employee_id)?;
            if state.has_active_resignation(employee_id) {
                return Err(EngineError::ActiveResignationExists {
                    employee_id: employee_id.to_string(),
                });
            }

            let resignation = Resignation {
                id: Uuid::new_v4(),
                employee_id: employee_id.to_string(),
                resignation_type,
                submission_date,
                last_working_date,
                notice_period_days,
                reason: reason.to_string(),
                remarks: None,
                department: employee.department.clone(),
                designation: employee.designation.clone(),
                status: ResignationStatus::Pending,
                approver_ids: approver_ids.clone(),
                created_at: now,
            };
            state.resignations.insert(resignation.id, resignation.clone());
            Ok(resignation)
        })?;

        info!(
            resignation_id = %resignation.id,
            employee_id = %employee_id,
            notice_period_days,
            "Resignation submitted"
        );
        fan_out(
            self.notifier(),
            &resignation.approver_ids,
            &format!("Resignation from {employee_id} awaits review"),
        );
        Ok(resignation)
    }

    /// Applies an approver decision to a pending resignation.
    ///
    /// Approval opens the clearance checklist, one pending item per
    /// configured department, in the same transaction.
    pub fn decide_resignation(
        &self,
        id: Uuid,
        approver_id: &str,
        decision: Decision,
        remarks: Option<String>,
    ) -> EngineResult<Resignation> {
        let resignation = self.store().transact(|state| {
            let mut resignation = state.resignation_mut(id)?.clone();
            let status = workflow::decide(&mut resignation, approver_id, decision)?;
            resignation.remarks = remarks.clone();

            if status == RequestStatus::Approved {
                let clearance = Clearance::open(
                    resignation.id,
                    resignation.employee_id.clone(),
                    self.policy().clearance_departments(),
                );
                state.clearances.insert(resignation.id, clearance);
            }

            state.resignations.insert(id, resignation.clone());
            Ok(resignation)
        })?;

        info!(
            resignation_id = %resignation.id,
            approver_id = %approver_id,
            status = resignation.status.as_str(),
            "Resignation decided"
        );
        fan_out(
            self.notifier(),
            &[resignation.employee_id.clone()],
            &format!("Your resignation was {}", resignation.status.as_str()),
        );
        Ok(resignation)
    }

    /// Withdraws a pending resignation on behalf of its owner.
    pub fn cancel_resignation(&self, id: Uuid, caller_id: &str) -> EngineResult<Resignation> {
        self.store().transact(|state| {
            let mut resignation = state.resignation_mut(id)?.clone();
            workflow::cancel(&mut resignation, caller_id)?;
            state.resignations.insert(id, resignation.clone());
            Ok(resignation)
        })
    }

    /// Looks up a resignation.
    pub fn resignation(&self, id: Uuid) -> EngineResult<Resignation> {
        self.store()
            .read(|state| state.resignations.get(&id).cloned())
            .ok_or_else(|| EngineError::NotFound {
                entity: "resignation".to_string(),
                id: id.to_string(),
            })
    }

    /// Looks up the clearance attached to a resignation.
    pub fn clearance(&self, resignation_id: Uuid) -> EngineResult<Clearance> {
        self.store()
            .read(|state| state.clearances.get(&resignation_id).cloned())
            .ok_or_else(|| EngineError::NotFound {
                entity: "clearance".to_string(),
                id: resignation_id.to_string(),
            })
    }

    /// Records one department's clearance decision.
    ///
    /// Each item transitions independently and exactly once. The first
    /// decision moves the resignation from `approved` to `in_clearance`.
    pub fn decide_clearance_item(
        &self,
        resignation_id: Uuid,
        department: &str,
        actor_id: &str,
        decision: Decision,
        cleared_date: NaiveDate,
        remarks: Option<String>,
    ) -> EngineResult<Clearance> {
        let clearance = self.store().transact(|state| {
            let resignation = state.resignation_mut(resignation_id)?.clone();
            if !resignation.approver_ids.iter().any(|id| id == actor_id) {
                return Err(EngineError::NotAnApprover {
                    user_id: actor_id.to_string(),
                });
            }

            let clearance = state.clearance_mut(resignation_id)?;
            let item = clearance
                .items
                .iter_mut()
                .find(|i| i.department == department)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "clearance item".to_string(),
                    id: department.to_string(),
                })?;
            if item.status != ClearanceItemStatus::Pending {
                return Err(EngineError::InvalidTransition {
                    entity: "clearance item".to_string(),
                    from: match item.status {
                        ClearanceItemStatus::Pending => "pending",
                        ClearanceItemStatus::Approved => "approved",
                        ClearanceItemStatus::Rejected => "rejected",
                    }
                    .to_string(),
                    action: "decide".to_string(),
                });
            }

            item.status = match decision {
                Decision::Approve => ClearanceItemStatus::Approved,
                Decision::Reject => ClearanceItemStatus::Rejected,
            };
            item.cleared_by = Some(actor_id.to_string());
            item.cleared_date = Some(cleared_date);
            item.remarks = remarks.clone();
            let clearance = clearance.clone();

            let resignation = state.resignation_mut(resignation_id)?;
            if resignation.status == ResignationStatus::Approved {
                resignation.status = ResignationStatus::InClearance;
            }
            Ok(clearance)
        })?;

        info!(
            resignation_id = %resignation_id,
            department = %department,
            status = ?clearance.overall_status(),
            "Clearance item decided"
        );
        Ok(clearance)
    }

    /// Records the one-time settlement once clearance has completed.
    ///
    /// The pending-leave encashment is priced from the remaining paid-type
    /// balance and the policy divisor; the resignation finishes as
    /// `completed` in the same transaction.
    pub fn create_settlement(
        &self,
        employee_id: &str,
        inputs: SettlementInputs,
    ) -> EngineResult<Settlement> {
        for (field, amount) in [
            ("basic_salary", inputs.basic_salary),
            ("bonus", inputs.bonus),
            ("other_payable", inputs.other_payable),
            ("notice_period_recovery", inputs.notice_period_recovery),
            ("advance_recovery", inputs.advance_recovery),
            ("other_deductions", inputs.other_deductions),
        ] {
            if amount < Decimal::ZERO {
                return Err(EngineError::ValidationError {
                    field: field.to_string(),
                    message: "must not be negative".to_string(),
                });
            }
        }

        let settlement = self.store().transact(|state| {
            let resignation = state
                .resignations
                .values()
                .find(|r| r.employee_id == employee_id && r.status.is_active())
                .cloned()
                .ok_or_else(|| EngineError::NotFound {
                    entity: "active resignation".to_string(),
                    id: employee_id.to_string(),
                })?;

            let clearance =
                state
                    .clearances
                    .get(&resignation.id)
                    .ok_or_else(|| EngineError::NotFound {
                        entity: "clearance".to_string(),
                        id: resignation.id.to_string(),
                    })?;
            if clearance.overall_status() != ClearanceStatus::Completed {
                return Err(EngineError::ClearanceIncomplete {
                    resignation_id: resignation.id.to_string(),
                });
            }
            if state.settlements.contains_key(employee_id) {
                return Err(EngineError::SettlementExists {
                    employee_id: employee_id.to_string(),
                });
            }

            let pending_leave_days: Decimal = state
                .leave_balances
                .get(employee_id)
                .map(|balance| {
                    balance
                        .balances
                        .iter()
                        .filter(|(code, _)| {
                            self.policy()
                                .leave_type(code)
                                .map(|t| t.category.is_paid())
                                .unwrap_or(false)
                        })
                        .map(|(_, days)| *days)
                        .sum()
                })
                .unwrap_or(Decimal::ZERO);

            let per_day = inputs.basic_salary / Decimal::from(self.policy().encashment_divisor());
            let pending_leave_encashment = (pending_leave_days * per_day).round_dp(2);

            let total_payable = inputs.basic_salary
                + pending_leave_encashment
                + inputs.bonus
                + inputs.other_payable;
            let total_deductions =
                inputs.notice_period_recovery + inputs.advance_recovery + inputs.other_deductions;

            let settlement = Settlement {
                employee_id: employee_id.to_string(),
                basic_salary: inputs.basic_salary,
                pending_leave_encashment,
                bonus: inputs.bonus,
                other_payable: inputs.other_payable,
                total_payable,
                notice_period_recovery: inputs.notice_period_recovery,
                advance_recovery: inputs.advance_recovery,
                other_deductions: inputs.other_deductions,
                total_deductions,
                net_settlement: total_payable - total_deductions,
                status: SettlementStatus::Pending,
                remarks: inputs.remarks.clone(),
            };
            state
                .settlements
                .insert(employee_id.to_string(), settlement.clone());

            let resignation = state.resignation_mut(resignation.id)?;
            resignation.status = ResignationStatus::Completed;
            Ok(settlement)
        })?;

        info!(
            employee_id = %employee_id,
            net_settlement = %settlement.net_settlement,
            "Settlement recorded"
        );
        Ok(settlement)
    }

    /// Looks up an employee's settlement.
    pub fn settlement(&self, employee_id: &str) -> EngineResult<Settlement> {
        self.store()
            .read(|state| state.settlements.get(employee_id).cloned())
            .ok_or_else(|| EngineError::NotFound {
                entity: "settlement".to_string(),
                id: employee_id.to_string(),
            })
    }

    /// Moves a settlement into payment processing.
    pub fn settlement_mark_processing(&self, employee_id: &str) -> EngineResult<Settlement> {
        self.update_settlement(employee_id, Settlement::mark_processing)
    }

    /// Records a settlement as disbursed.
    pub fn settlement_mark_paid(&self, employee_id: &str) -> EngineResult<Settlement> {
        self.update_settlement(employee_id, Settlement::mark_paid)
    }

    fn update_settlement(
        &self,
        employee_id: &str,
        apply: impl FnOnce(&mut Settlement) -> EngineResult<()>,
    ) -> EngineResult<Settlement> {
        self.store().transact(|state| {
            let settlement =
                state
                    .settlements
                    .get_mut(employee_id)
                    .ok_or_else(|| EngineError::NotFound {
                        entity: "settlement".to_string(),
                        id: employee_id.to_string(),
                    })?;
            apply(settlement)?;
            Ok(settlement.clone())
        })
    }
}
