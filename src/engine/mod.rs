//! The lifecycle engine facade.
//!
//! [`Engine`] ties the document store, the policy, the approver directory
//! and the notifier together and exposes every lifecycle operation as a
//! method. The leave, attendance and exit operations live in their own
//! files as separate `impl` blocks.

mod attendance;
mod exit;
mod leave;

pub use attendance::{DayHours, WeeklySummary};
pub use exit::SettlementInputs;

use std::sync::Arc;

use crate::config::PolicyLoader;
use crate::directory::ApproverDirectory;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Holiday, LeaveBalance};
use crate::notify::Notifier;
use crate::store::DocumentStore;

/// The employee-lifecycle workflow and accounting engine.
///
/// All operations are short-lived request/response calls; each one runs its
/// state reads and writes inside a single store transaction, so the
/// check-then-write sequences the workflows depend on are atomic.
pub struct Engine {
    store: Arc<DocumentStore>,
    policy: Arc<PolicyLoader>,
    directory: Arc<dyn ApproverDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl Engine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        store: Arc<DocumentStore>,
        policy: Arc<PolicyLoader>,
        directory: Arc<dyn ApproverDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            policy,
            directory,
            notifier,
        }
    }

    /// The document store the engine operates on.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// The loaded policy.
    pub fn policy(&self) -> &PolicyLoader {
        &self.policy
    }

    pub(crate) fn directory(&self) -> &dyn ApproverDirectory {
        self.directory.as_ref()
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Registers or replaces an employee record from the provisioning
    /// collaborator, seeding a balance document from the policy
    /// entitlements on first sight.
    pub fn register_employee(&self, employee: Employee) -> EngineResult<Employee> {
        self.store.transact(|state| {
            if !state.leave_balances.contains_key(&employee.id) {
                state.leave_balances.insert(
                    employee.id.clone(),
                    LeaveBalance {
                        employee_id: employee.id.clone(),
                        balances: self.policy.default_balances(),
                    },
                );
            }
            state.employees.insert(employee.id.clone(), employee.clone());
            Ok(employee)
        })
    }

    /// Looks up an employee record.
    pub fn employee(&self, id: &str) -> EngineResult<Employee> {
        self.store.read(|state| state.employee(id).cloned())
    }

    /// Appends a holiday to the calendar.
    ///
    /// The set is append-only; a second holiday on the same date is a
    /// validation failure. Durations already computed from an earlier
    /// snapshot are unaffected.
    pub fn add_holiday(&self, holiday: Holiday) -> EngineResult<Holiday> {
        self.store.transact(|state| {
            if state.holidays.contains_key(&holiday.date) {
                return Err(EngineError::ValidationError {
                    field: "date".to_string(),
                    message: format!("holiday already exists on {}", holiday.date),
                });
            }
            state.holidays.insert(holiday.date, holiday.clone());
            Ok(holiday)
        })
    }

    /// Lists all holidays in date order.
    pub fn holidays(&self) -> Vec<Holiday> {
        self.store.read(|state| state.holidays.values().cloned().collect())
    }

    /// Reads an employee's balance document; absent means zero everywhere.
    pub fn leave_balance(&self, employee_id: &str) -> LeaveBalance {
        self.store.read(|state| {
            state
                .leave_balances
                .get(employee_id)
                .cloned()
                .unwrap_or_else(|| LeaveBalance::new(employee_id))
        })
    }
}
