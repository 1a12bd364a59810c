//! In-process document store.
//!
//! All collections live behind one lock and every compound operation runs
//! inside [`DocumentStore::transact`], which is the engine's unit of
//! atomicity: a check-then-write sequence (balance sufficiency before a
//! debit, duplicate-punch detection before an insert, active-resignation
//! detection before a submission) executes inside a single closure and can
//! never interleave with another operation. A closure that returns an error
//! must leave the state as it found it; the engine upholds this by
//! validating before mutating inside each transaction.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceEditRequest, AttendanceRecord, Clearance, Employee, Holiday, LeaveBalance,
    LeaveRequest, Resignation, Settlement,
};

/// The logical collections of the document store.
///
/// Collections are keyed the way the hosted store keys them: request-like
/// documents by generated id, attendance effectively by `(employee, date)`,
/// balances and settlements by employee id.
#[derive(Debug, Default)]
pub struct StoreState {
    /// Employees, keyed by id. Owned by the provisioning collaborator.
    pub employees: HashMap<String, Employee>,
    /// Holidays, keyed by date. Append-only.
    pub holidays: BTreeMap<NaiveDate, Holiday>,
    /// Leave balances, keyed by employee id.
    pub leave_balances: HashMap<String, LeaveBalance>,
    /// Leave requests, keyed by document id.
    pub leaves: HashMap<Uuid, LeaveRequest>,
    /// Attendance records, keyed by `(employee id, date)`.
    pub attendance: BTreeMap<(String, NaiveDate), AttendanceRecord>,
    /// Attendance-edit requests, keyed by document id.
    pub edit_requests: HashMap<Uuid, AttendanceEditRequest>,
    /// Resignations, keyed by document id.
    pub resignations: HashMap<Uuid, Resignation>,
    /// Clearances, keyed by the owning resignation id.
    pub clearances: HashMap<Uuid, Clearance>,
    /// Settlements, keyed by employee id.
    pub settlements: HashMap<String, Settlement>,
}

impl StoreState {
    /// The holiday dates as a snapshot set for calendar arithmetic.
    pub fn holiday_set(&self) -> BTreeSet<NaiveDate> {
        self.holidays.keys().copied().collect()
    }

    /// Looks up an employee, failing with `NotFound` when absent.
    pub fn employee(&self, id: &str) -> EngineResult<&Employee> {
        self.employees.get(id).ok_or_else(|| EngineError::NotFound {
            entity: "employee".to_string(),
            id: id.to_string(),
        })
    }

    /// Mutable leave request lookup, failing with `NotFound` when absent.
    pub fn leave_mut(&mut self, id: Uuid) -> EngineResult<&mut LeaveRequest> {
        self.leaves.get_mut(&id).ok_or_else(|| EngineError::NotFound {
            entity: "leave request".to_string(),
            id: id.to_string(),
        })
    }

    /// Mutable edit-request lookup, failing with `NotFound` when absent.
    pub fn edit_request_mut(&mut self, id: Uuid) -> EngineResult<&mut AttendanceEditRequest> {
        self.edit_requests
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "attendance edit request".to_string(),
                id: id.to_string(),
            })
    }

    /// Mutable resignation lookup, failing with `NotFound` when absent.
    pub fn resignation_mut(&mut self, id: Uuid) -> EngineResult<&mut Resignation> {
        self.resignations
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "resignation".to_string(),
                id: id.to_string(),
            })
    }

    /// Mutable clearance lookup by resignation id.
    pub fn clearance_mut(&mut self, resignation_id: Uuid) -> EngineResult<&mut Clearance> {
        self.clearances
            .get_mut(&resignation_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "clearance".to_string(),
                id: resignation_id.to_string(),
            })
    }

    /// True when any resignation for the employee is pending, approved or
    /// in clearance.
    pub fn has_active_resignation(&self, employee_id: &str) -> bool {
        self.resignations
            .values()
            .any(|r| r.employee_id == employee_id && r.status.is_active())
    }
}

/// The in-process document store.
///
/// Cheap to share: handlers clone an `Arc<DocumentStore>` and every
/// operation takes the single internal lock for the duration of its
/// transaction closure.
#[derive(Debug, Default)]
pub struct DocumentStore {
    state: Mutex<StoreState>,
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a compound operation atomically against the collections.
    ///
    /// The closure either completes and commits its mutations or returns an
    /// error having made none; no other operation observes an intermediate
    /// state.
    pub fn transact<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Runs a read-only closure against the collections.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}
