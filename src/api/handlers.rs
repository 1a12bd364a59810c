//! HTTP request handlers for the Employee Lifecycle Engine API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler parses its payload, delegates to the engine and maps the result
//! onto the JSON envelope; no lifecycle rule lives here.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::SettlementInputs;
use crate::error::EngineResult;
use crate::models::{Employee, Holiday};

use super::request::{
    CancelRequest, ClearanceDecisionRequest, DecisionRequest, HolidayRequest, PunchRequest,
    SettlementRequest, SubmitAttendanceEditRequest, SubmitLeaveRequest, SubmitResignationRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", post(register_employee_handler))
        .route("/employees/:id/leaves", get(employee_leaves_handler))
        .route("/employees/:id/leave-balance", get(leave_balance_handler))
        .route("/holidays", post(add_holiday_handler).get(list_holidays_handler))
        .route("/leaves", post(submit_leave_handler))
        .route("/leaves/:id", get(get_leave_handler))
        .route("/leaves/:id/decision", post(decide_leave_handler))
        .route("/leaves/:id/cancel", post(cancel_leave_handler))
        .route("/approvers/:id/pending-leaves", get(pending_leaves_handler))
        .route("/attendance/punch-in", post(punch_in_handler))
        .route("/attendance/punch-out", post(punch_out_handler))
        .route("/attendance/:employee_id/weekly", get(weekly_summary_handler))
        .route("/attendance/:employee_id/:date", get(get_attendance_handler))
        .route("/attendance/edit-requests", post(submit_edit_handler))
        .route("/attendance/edit-requests/:id/decision", post(decide_edit_handler))
        .route("/attendance/edit-requests/:id/cancel", post(cancel_edit_handler))
        .route("/resignations", post(submit_resignation_handler))
        .route("/resignations/:id", get(get_resignation_handler))
        .route("/resignations/:id/decision", post(decide_resignation_handler))
        .route("/resignations/:id/cancel", post(cancel_resignation_handler))
        .route("/resignations/:id/clearance", get(get_clearance_handler))
        .route(
            "/resignations/:id/clearance/:department/decision",
            post(decide_clearance_item_handler),
        )
        .route("/settlements", post(create_settlement_handler))
        .route("/settlements/:employee_id", get(get_settlement_handler))
        .route(
            "/settlements/:employee_id/processing",
            post(settlement_processing_handler),
        )
        .route("/settlements/:employee_id/paid", post(settlement_paid_handler))
        .with_state(state)
}

/// Unwraps a JSON payload, mapping extractor rejections onto the error
/// envelope.
fn parse<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> Result<T, Response> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((StatusCode::BAD_REQUEST, Json(error)).into_response())
        }
    }
}

/// Maps an engine result onto the HTTP response envelope.
fn respond<T: Serialize>(result: EngineResult<T>, correlation_id: Uuid) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(error) => {
            warn!(correlation_id = %correlation_id, error = %error, "Request failed");
            ApiErrorResponse::from(error).into_response()
        }
    }
}

async fn register_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let employee = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Registering employee");
    respond(state.engine().register_employee(employee), correlation_id)
}

async fn add_holiday_handler(
    State(state): State<AppState>,
    payload: Result<Json<HolidayRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state.engine().add_holiday(Holiday {
            date: request.date,
            name: request.name,
            description: request.description,
        }),
        correlation_id,
    )
}

async fn list_holidays_handler(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(state.engine().holidays())).into_response()
}

async fn submit_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        leave_type = %request.leave_type,
        "Processing leave submission"
    );
    respond(
        state.engine().submit_leave(
            &request.employee_id,
            &request.leave_type,
            request.start_date,
            request.end_date,
            &request.reason,
            Utc::now(),
        ),
        correlation_id,
    )
}

async fn get_leave_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    respond(state.engine().leave(id), Uuid::new_v4())
}

async fn decide_leave_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state
            .engine()
            .decide_leave(id, &request.approver_id, request.decision),
        correlation_id,
    )
}

async fn cancel_leave_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state.engine().cancel_leave(id, &request.employee_id),
        correlation_id,
    )
}

async fn employee_leaves_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    (StatusCode::OK, Json(state.engine().employee_leaves(&id))).into_response()
}

async fn pending_leaves_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    (StatusCode::OK, Json(state.engine().pending_leave_approvals(&id))).into_response()
}

async fn leave_balance_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    (StatusCode::OK, Json(state.engine().leave_balance(&id))).into_response()
}

async fn punch_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state
            .engine()
            .punch_in(&request.employee_id, request.date, request.at, request.location),
        correlation_id,
    )
}

async fn punch_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state
            .engine()
            .punch_out(&request.employee_id, request.date, request.at, request.location),
        correlation_id,
    )
}

#[derive(Debug, Deserialize)]
struct WeeklyQuery {
    today: NaiveDate,
}

async fn weekly_summary_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Query(query): Query<WeeklyQuery>,
) -> Response {
    (
        StatusCode::OK,
        Json(state.engine().weekly_summary(&employee_id, query.today)),
    )
        .into_response()
}

async fn get_attendance_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> Response {
    respond(state.engine().attendance(&employee_id, date), Uuid::new_v4())
}

async fn submit_edit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitAttendanceEditRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state.engine().submit_attendance_edit(
            &request.employee_id,
            request.date,
            request.requested_punch_out,
            &request.reason,
            Utc::now(),
        ),
        correlation_id,
    )
}

async fn decide_edit_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state
            .engine()
            .decide_attendance_edit(id, &request.approver_id, request.decision),
        correlation_id,
    )
}

async fn cancel_edit_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state.engine().cancel_attendance_edit(id, &request.employee_id),
        correlation_id,
    )
}

async fn submit_resignation_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitResignationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        "Processing resignation submission"
    );
    respond(
        state.engine().submit_resignation(
            &request.employee_id,
            request.resignation_type,
            request.submission_date,
            request.last_working_date,
            &request.reason,
            Utc::now(),
        ),
        correlation_id,
    )
}

async fn get_resignation_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    respond(state.engine().resignation(id), Uuid::new_v4())
}

async fn decide_resignation_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state.engine().decide_resignation(
            id,
            &request.approver_id,
            request.decision,
            request.remarks,
        ),
        correlation_id,
    )
}

async fn cancel_resignation_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state.engine().cancel_resignation(id, &request.employee_id),
        correlation_id,
    )
}

async fn get_clearance_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    respond(state.engine().clearance(id), Uuid::new_v4())
}

async fn decide_clearance_item_handler(
    State(state): State<AppState>,
    Path((id, department)): Path<(Uuid, String)>,
    payload: Result<Json<ClearanceDecisionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    respond(
        state.engine().decide_clearance_item(
            id,
            &department,
            &request.actor_id,
            request.decision,
            request.cleared_date,
            request.remarks,
        ),
        correlation_id,
    )
}

async fn create_settlement_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettlementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse(payload, correlation_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let inputs = SettlementInputs {
        basic_salary: request.basic_salary,
        bonus: request.bonus,
        other_payable: request.other_payable,
        notice_period_recovery: request.notice_period_recovery,
        advance_recovery: request.advance_recovery,
        other_deductions: request.other_deductions,
        remarks: request.remarks,
    };
    respond(
        state.engine().create_settlement(&request.employee_id, inputs),
        correlation_id,
    )
}

async fn get_settlement_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    respond(state.engine().settlement(&employee_id), Uuid::new_v4())
}

async fn settlement_processing_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    respond(
        state.engine().settlement_mark_processing(&employee_id),
        Uuid::new_v4(),
    )
}

async fn settlement_paid_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    respond(state.engine().settlement_mark_paid(&employee_id), Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StoreDirectory;
    use crate::engine::Engine;
    use crate::engine::testutil::{employee, test_policy};
    use crate::models::EmployeeRole;
    use crate::notify::LogNotifier;
    use crate::store::DocumentStore;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let store = Arc::new(DocumentStore::new());
        let engine = Engine::new(
            store.clone(),
            Arc::new(test_policy()),
            Arc::new(StoreDirectory::new(store)),
            Arc::new(LogNotifier),
        );
        engine
            .register_employee(employee("emp_001", EmployeeRole::Staff))
            .unwrap();
        engine
            .register_employee(employee("mgr_001", EmployeeRole::Manager))
            .unwrap();
        AppState::new(engine)
    }

    #[tokio::test]
    async fn test_valid_leave_submission_returns_200() {
        let router = create_router(create_test_state());

        let body = r#"{
            "employee_id": "emp_001",
            "leave_type": "PL",
            "start_date": "2024-01-01",
            "end_date": "2024-01-07",
            "reason": "Family travel"
        }"#;

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/leaves")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let leave: crate::models::LeaveRequest = serde_json::from_slice(&body).unwrap();
        assert_eq!(leave.duration_days, 6);
        assert_eq!(leave.approver_ids, vec!["mgr_001".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/leaves")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());

        let body = r#"{
            "employee_id": "emp_001",
            "start_date": "2024-01-01",
            "end_date": "2024-01-07",
            "reason": "Family travel"
        }"#;

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/leaves")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert!(
            error.message.contains("missing field"),
            "Expected a missing-field message, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_unknown_leave_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/leaves/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
