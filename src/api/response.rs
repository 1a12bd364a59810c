//! Response types for the Employee Lifecycle Engine API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP status codes. Every error kind maps to a stable
//! machine code; none of them is retryable.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, code: &str, error: &EngineError) -> Self {
        Self {
            status,
            error: ApiError::new(code, error.to_string()),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::ValidationError { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", &error)
            }
            EngineError::InvalidRange { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_RANGE", &error)
            }
            EngineError::LeaveTypeUnknown { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "LEAVE_TYPE_UNKNOWN", &error)
            }
            EngineError::InsufficientBalance { .. } => {
                Self::new(StatusCode::CONFLICT, "INSUFFICIENT_BALANCE", &error)
            }
            EngineError::DuplicatePunchIn { .. } => {
                Self::new(StatusCode::CONFLICT, "DUPLICATE_PUNCH_IN", &error)
            }
            EngineError::NoPunchInFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "NO_PUNCH_IN_FOUND", &error)
            }
            EngineError::AlreadyPunchedOut { .. } => {
                Self::new(StatusCode::CONFLICT, "ALREADY_PUNCHED_OUT", &error)
            }
            EngineError::NoApproversAvailable { .. } => {
                Self::new(StatusCode::CONFLICT, "NO_APPROVERS_AVAILABLE", &error)
            }
            EngineError::ActiveResignationExists { .. } => {
                Self::new(StatusCode::CONFLICT, "ACTIVE_RESIGNATION_EXISTS", &error)
            }
            EngineError::InvalidTransition { .. } => {
                Self::new(StatusCode::CONFLICT, "INVALID_TRANSITION", &error)
            }
            EngineError::NotAnApprover { .. } => {
                Self::new(StatusCode::FORBIDDEN, "NOT_AN_APPROVER", &error)
            }
            EngineError::NotRequestOwner { .. } => {
                Self::new(StatusCode::FORBIDDEN, "NOT_REQUEST_OWNER", &error)
            }
            EngineError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", &error),
            EngineError::ClearanceIncomplete { .. } => {
                Self::new(StatusCode::CONFLICT, "CLEARANCE_INCOMPLETE", &error)
            }
            EngineError::SettlementExists { .. } => {
                Self::new(StatusCode::CONFLICT, "SETTLEMENT_EXISTS", &error)
            }
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    error.to_string(),
                ),
            },
        }
    }
}
