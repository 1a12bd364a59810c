//! Final settlement model.
//!
//! The settlement is a one-time ledger entry recorded once clearance
//! completes. Its status tracks disbursement, not approval, and is
//! independent of the clearance vocabulary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Disbursement lifecycle of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Recorded, payment not yet started.
    Pending,
    /// Payment is being processed.
    Processing,
    /// Payment disbursed.
    Completed,
}

impl SettlementStatus {
    /// Lower-case label used in transition errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Processing => "processing",
            SettlementStatus::Completed => "completed",
        }
    }
}

/// The payable/deduction ledger recorded for a departing employee.
///
/// All amounts are exact decimals. The totals and the net are derived from
/// the components at creation and stored with the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// The departing employee.
    pub employee_id: String,
    /// Base salary component.
    pub basic_salary: Decimal,
    /// Encashment of the remaining paid leave balance.
    pub pending_leave_encashment: Decimal,
    /// Bonus component.
    pub bonus: Decimal,
    /// Any other payable amount.
    pub other_payable: Decimal,
    /// Sum of the payable components.
    pub total_payable: Decimal,
    /// Recovery for unserved notice.
    pub notice_period_recovery: Decimal,
    /// Recovery of outstanding advances.
    pub advance_recovery: Decimal,
    /// Any other deduction.
    pub other_deductions: Decimal,
    /// Sum of the deduction components.
    pub total_deductions: Decimal,
    /// `total_payable - total_deductions`; may be negative when recoveries
    /// exceed payables.
    pub net_settlement: Decimal,
    /// Disbursement status.
    pub status: SettlementStatus,
    /// Free-text remarks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Settlement {
    /// Moves the settlement into payment processing.
    pub fn mark_processing(&mut self) -> EngineResult<()> {
        if self.status != SettlementStatus::Pending {
            return Err(EngineError::InvalidTransition {
                entity: "settlement".to_string(),
                from: self.status.as_str().to_string(),
                action: "mark_processing".to_string(),
            });
        }
        self.status = SettlementStatus::Processing;
        Ok(())
    }

    /// Records the disbursement as complete.
    pub fn mark_paid(&mut self) -> EngineResult<()> {
        if self.status != SettlementStatus::Processing {
            return Err(EngineError::InvalidTransition {
                entity: "settlement".to_string(),
                from: self.status.as_str().to_string(),
                action: "mark_paid".to_string(),
            });
        }
        self.status = SettlementStatus::Completed;
        Ok(())
    }
}
