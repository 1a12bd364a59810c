//! HTTP API module for the Employee Lifecycle Engine.
//!
//! This module provides the REST endpoints for submitting and reviewing
//! lifecycle requests and for reading the ledgers they maintain.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CancelRequest, ClearanceDecisionRequest, DecisionRequest, HolidayRequest, PunchRequest,
    SettlementRequest, SubmitAttendanceEditRequest, SubmitLeaveRequest, SubmitResignationRequest,
};
pub use response::ApiError;
pub use state::AppState;
