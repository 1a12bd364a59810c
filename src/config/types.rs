//! Configuration types for lifecycle policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::Deserialize;

/// How a leave type interacts with the balance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCategory {
    /// Counted against the employee's balance.
    Paid,
    /// Never balance-checked; taken without pay.
    Unpaid,
    /// Tracked for record only; never balance-checked.
    Unaccounted,
}

impl LeaveCategory {
    /// True when requests of this category consume the balance ledger.
    pub fn is_paid(&self) -> bool {
        matches!(self, LeaveCategory::Paid)
    }
}

/// One entry of the leave-type catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypeConfig {
    /// Short code used on requests and balances (e.g. "PL").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Ledger behavior of the type.
    pub category: LeaveCategory,
    /// Days granted per year; seeds new balance documents.
    pub annual_entitlement: Decimal,
}

/// Leave-types configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypesConfig {
    /// The catalog, in display order.
    pub leave_types: Vec<LeaveTypeConfig>,
}

/// Settlement parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementPolicy {
    /// Divisor applied to basic salary to price one encashed leave day.
    pub encashment_divisor: u32,
}

/// Top-level policy file structure (`policy.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyFile {
    /// The fixed weekly off day.
    pub weekly_off: Weekday,
    /// Minimum calendar days of notice for a voluntary resignation.
    pub minimum_notice_days: u32,
    /// Settlement parameters.
    pub settlement: SettlementPolicy,
}

/// Clearance departments file structure (`departments.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentsConfig {
    /// Departments that must each sign off a clearance.
    pub clearance_departments: Vec<String>,
}
