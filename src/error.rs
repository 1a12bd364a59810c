//! Error types for the Employee Lifecycle Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during lifecycle processing.
//! Every variant reflects a stable precondition failure and must never be
//! retried automatically; only store connectivity faults (not modeled here)
//! warrant caller-side retry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Employee Lifecycle Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hr_engine::error::EngineError;
///
/// let error = EngineError::NoApproversAvailable {
///     organization_id: "org_001".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No approvers available in organization 'org_001'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required field was missing or malformed; rejected before any state change.
    #[error("Invalid field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The end date of a range precedes its start date.
    #[error("Invalid date range: end {end} precedes start {start}")]
    InvalidRange {
        /// The start of the rejected range.
        start: NaiveDate,
        /// The end of the rejected range.
        end: NaiveDate,
    },

    /// A paid leave request exceeds the remaining balance for its type.
    #[error("Insufficient '{leave_type}' balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// The leave-type code.
        leave_type: String,
        /// The number of working days requested.
        requested: Decimal,
        /// The balance remaining for the type.
        available: Decimal,
    },

    /// An attendance record already exists for the employee and date.
    #[error("Employee '{employee_id}' already punched in on {date}")]
    DuplicatePunchIn {
        /// The employee attempting the punch.
        employee_id: String,
        /// The date of the attempted punch.
        date: NaiveDate,
    },

    /// No attendance record exists to punch out of.
    #[error("No punch-in found for employee '{employee_id}' on {date}")]
    NoPunchInFound {
        /// The employee attempting the punch.
        employee_id: String,
        /// The date of the attempted punch.
        date: NaiveDate,
    },

    /// The attendance record already has a punch-out.
    #[error("Employee '{employee_id}' already punched out on {date}")]
    AlreadyPunchedOut {
        /// The employee attempting the punch.
        employee_id: String,
        /// The date of the attempted punch.
        date: NaiveDate,
    },

    /// No user currently holds an approver role; submission is blocked.
    #[error("No approvers available in organization '{organization_id}'")]
    NoApproversAvailable {
        /// The organization scope that was resolved.
        organization_id: String,
    },

    /// The employee already has a resignation in flight.
    #[error("Employee '{employee_id}' already has an active resignation")]
    ActiveResignationExists {
        /// The employee attempting the submission.
        employee_id: String,
    },

    /// A transition was attempted from a state that does not permit it.
    #[error("Invalid transition for {entity} in state '{from}': {action}")]
    InvalidTransition {
        /// The entity kind (e.g. "leave request", "clearance item").
        entity: String,
        /// The state the entity was in.
        from: String,
        /// The attempted action.
        action: String,
    },

    /// The acting user is not in the request's approver snapshot.
    #[error("User '{user_id}' is not an approver for this request")]
    NotAnApprover {
        /// The user who attempted the decision.
        user_id: String,
    },

    /// The acting user did not submit the request being cancelled.
    #[error("User '{user_id}' does not own this request")]
    NotRequestOwner {
        /// The user who attempted the cancellation.
        user_id: String,
    },

    /// A referenced document was not found in the store.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind.
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The leave-type code is not present in the policy catalog.
    #[error("Unknown leave type: {code}")]
    LeaveTypeUnknown {
        /// The unrecognized leave-type code.
        code: String,
    },

    /// Settlement was requested before every clearance item was approved.
    #[error("Clearance for resignation '{resignation_id}' is not complete")]
    ClearanceIncomplete {
        /// The resignation whose clearance is still open.
        resignation_id: String,
    },

    /// A settlement has already been recorded for the employee.
    #[error("Settlement already exists for employee '{employee_id}'")]
    SettlementExists {
        /// The employee with an existing settlement.
        employee_id: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
