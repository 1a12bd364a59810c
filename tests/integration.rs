//! End-to-end tests for the Employee Lifecycle Engine API.
//!
//! This suite drives the full workflows over the HTTP surface:
//! - leave submission, balance enforcement, decision and cancellation
//! - attendance punches, the weekly view and the reviewed edit path
//! - the exit pipeline from resignation through clearance to settlement
//! - error-code mapping for every precondition failure

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use hr_engine::api::{AppState, create_router};
use hr_engine::config::PolicyLoader;
use hr_engine::directory::StoreDirectory;
use hr_engine::engine::Engine;
use hr_engine::notify::LogNotifier;
use hr_engine::store::DocumentStore;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_router() -> Router {
    let store = Arc::new(DocumentStore::new());
    let policy = PolicyLoader::load("./config/hr").expect("Failed to load policy");
    let engine = Engine::new(
        store.clone(),
        Arc::new(policy),
        Arc::new(StoreDirectory::new(store)),
        Arc::new(LogNotifier),
    );
    create_router(AppState::new(engine))
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

fn employee(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "organization_id": "org_001",
        "name": format!("Employee {id}"),
        "code": id.to_uppercase(),
        "role": role,
        "gender": "other",
        "department": "Engineering",
        "designation": "Engineer",
        "blocked": false
    })
}

async fn register_staff_and_manager(router: &Router) {
    let (status, _) = post(router, "/employees", employee("emp_001", "staff")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(router, "/employees", employee("mgr_001", "manager")).await;
    assert_eq!(status, StatusCode::OK);
}

fn decimal_field(value: &Value, field: &str) -> Decimal {
    Decimal::from_str(value[field].as_str().unwrap()).unwrap()
}

fn leave_body(start: &str, end: &str) -> Value {
    json!({
        "employee_id": "emp_001",
        "leave_type": "PL",
        "start_date": start,
        "end_date": end,
        "reason": "Family travel"
    })
}

fn punch_body(date: &str, time: &str) -> Value {
    json!({
        "employee_id": "emp_001",
        "date": date,
        "at": format!("{date}T{time}"),
        "location": {"lat": 12.9716, "lng": 77.5946}
    })
}

// =============================================================================
// Leave workflow
// =============================================================================

#[tokio::test]
async fn test_leave_lifecycle_approval_decrements_balance_once() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    // Monday 2024-01-01 through Sunday 2024-01-07: six working days.
    let (status, leave) = post(&router, "/leaves", leave_body("2024-01-01", "2024-01-07")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(leave["duration_days"], 6);
    assert_eq!(leave["status"], "pending");
    assert_eq!(leave["approver_ids"], json!(["mgr_001"]));

    let id = leave["id"].as_str().unwrap();
    let (status, decided) = post(
        &router,
        &format!("/leaves/{id}/decision"),
        json!({"approver_id": "mgr_001", "decision": "approve"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["status"], "approved");

    let (_, balance) = get(&router, "/employees/emp_001/leave-balance").await;
    assert_eq!(decimal_field(&balance["balances"], "PL"), Decimal::new(12, 0));

    // A repeated approval is rejected and never double-debits.
    let (status, error) = post(
        &router,
        &format!("/leaves/{id}/decision"),
        json!({"approver_id": "mgr_001", "decision": "approve"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "INVALID_TRANSITION");

    let (_, balance) = get(&router, "/employees/emp_001/leave-balance").await;
    assert_eq!(decimal_field(&balance["balances"], "PL"), Decimal::new(12, 0));
}

#[tokio::test]
async fn test_insufficient_balance_creates_no_request() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    // Four weeks of working days far exceed the 18-day entitlement.
    let (status, error) = post(&router, "/leaves", leave_body("2024-01-01", "2024-01-31")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "INSUFFICIENT_BALANCE");

    let (_, leaves) = get(&router, "/employees/emp_001/leaves").await;
    assert_eq!(leaves, json!([]));
}

#[tokio::test]
async fn test_cancelled_leave_drops_out_of_pending_approvals() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (_, leave) = post(&router, "/leaves", leave_body("2024-01-01", "2024-01-02")).await;
    let id = leave["id"].as_str().unwrap();

    let (_, pending) = get(&router, "/approvers/mgr_001/pending-leaves").await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, cancelled) = post(
        &router,
        &format!("/leaves/{id}/cancel"),
        json!({"employee_id": "emp_001"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (_, pending) = get(&router, "/approvers/mgr_001/pending-leaves").await;
    assert_eq!(pending, json!([]));

    // Re-attempting the cancellation is a no-op failure.
    let (status, error) = post(
        &router,
        &format!("/leaves/{id}/cancel"),
        json!({"employee_id": "emp_001"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_no_approvers_blocks_submission() {
    let router = create_test_router();
    let (status, _) = post(&router, "/employees", employee("emp_001", "staff")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = post(&router, "/leaves", leave_body("2024-01-01", "2024-01-02")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "NO_APPROVERS_AVAILABLE");
}

#[tokio::test]
async fn test_end_before_start_rejected() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (status, error) = post(&router, "/leaves", leave_body("2024-01-10", "2024-01-05")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_RANGE");
}

#[tokio::test]
async fn test_holiday_shortens_future_durations_only() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (_, first) = post(&router, "/leaves", leave_body("2024-01-01", "2024-01-06")).await;
    assert_eq!(first["duration_days"], 6);

    let (status, _) = post(
        &router,
        "/holidays",
        json!({"date": "2024-01-03", "name": "Founders Day"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The stored duration is immutable; a fresh submission sees the new
    // snapshot.
    let first_id = first["id"].as_str().unwrap();
    let (_, reread) = get(&router, &format!("/leaves/{first_id}")).await;
    assert_eq!(reread["duration_days"], 6);

    let (_, second) = post(
        &router,
        "/leaves",
        json!({
            "employee_id": "emp_001",
            "leave_type": "SL",
            "start_date": "2024-01-01",
            "end_date": "2024-01-06",
            "reason": "Medical"
        }),
    )
    .await;
    assert_eq!(second["duration_days"], 5);
}

// =============================================================================
// Attendance workflow
// =============================================================================

#[tokio::test]
async fn test_punch_sequence_and_weekly_view() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (status, _) = post(&router, "/attendance/punch-in", punch_body("2024-03-01", "09:00:00")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = post(&router, "/attendance/punch-in", punch_body("2024-03-01", "09:10:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_PUNCH_IN");

    let (status, record) = post(&router, "/attendance/punch-out", punch_body("2024-03-01", "17:30:00")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["punch_out"], "2024-03-01T17:30:00");

    let (status, error) = post(&router, "/attendance/punch-out", punch_body("2024-03-01", "18:00:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "ALREADY_PUNCHED_OUT");

    let (status, summary) = get(&router, "/attendance/emp_001/weekly?today=2024-03-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["days"].as_array().unwrap().len(), 7);
    assert_eq!(decimal_field(&summary, "total_hours"), Decimal::new(85, 1));
}

#[tokio::test]
async fn test_punch_out_without_record_is_not_found() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (status, error) = post(&router, "/attendance/punch-out", punch_body("2024-03-01", "17:00:00")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NO_PUNCH_IN_FOUND");
}

#[tokio::test]
async fn test_edit_request_applies_punch_out_on_approval() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    post(&router, "/attendance/punch-in", punch_body("2024-03-01", "09:00:00")).await;

    let (status, request) = post(
        &router,
        "/attendance/edit-requests",
        json!({
            "employee_id": "emp_001",
            "date": "2024-03-01",
            "requested_punch_out": "2024-03-01T17:00:00",
            "reason": "Forgot to punch out"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(request["status"], "pending");

    // The underlying record is untouched while the request is pending.
    let (_, record) = get(&router, "/attendance/emp_001/2024-03-01").await;
    assert_eq!(record["punch_out"], Value::Null);

    let id = request["id"].as_str().unwrap();
    let (status, decided) = post(
        &router,
        &format!("/attendance/edit-requests/{id}/decision"),
        json!({"approver_id": "mgr_001", "decision": "approve"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["status"], "approved");

    let (_, record) = get(&router, "/attendance/emp_001/2024-03-01").await;
    assert_eq!(record["punch_out"], "2024-03-01T17:00:00");
}

#[tokio::test]
async fn test_edit_request_requires_open_record() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    post(&router, "/attendance/punch-in", punch_body("2024-03-01", "09:00:00")).await;
    post(&router, "/attendance/punch-out", punch_body("2024-03-01", "17:00:00")).await;

    let (status, error) = post(
        &router,
        "/attendance/edit-requests",
        json!({
            "employee_id": "emp_001",
            "date": "2024-03-01",
            "requested_punch_out": "2024-03-01T18:00:00",
            "reason": "Late correction"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "ALREADY_PUNCHED_OUT");
}

// =============================================================================
// Exit pipeline
// =============================================================================

fn resignation_body() -> Value {
    json!({
        "employee_id": "emp_001",
        "resignation_type": "voluntary",
        "submission_date": "2024-05-01",
        "last_working_date": "2024-06-30",
        "reason": "Relocation"
    })
}

#[tokio::test]
async fn test_exit_pipeline_end_to_end() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (status, resignation) = post(&router, "/resignations", resignation_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resignation["status"], "pending");
    assert_eq!(resignation["notice_period_days"], 60);
    let id = resignation["id"].as_str().unwrap();

    // A second submission while the first is pending is rejected.
    let (status, error) = post(&router, "/resignations", resignation_body()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "ACTIVE_RESIGNATION_EXISTS");

    // Settlement before approval/clearance is impossible.
    let (status, _) = post(
        &router,
        "/settlements",
        json!({"employee_id": "emp_001", "basic_salary": "60000"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, approved) = post(
        &router,
        &format!("/resignations/{id}/decision"),
        json!({"approver_id": "mgr_001", "decision": "approve"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    let (status, clearance) = get(&router, &format!("/resignations/{id}/clearance")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(clearance["items"].as_array().unwrap().len(), 4);

    // Clear every department; the first decision starts the clearance stage.
    for department in ["IT", "Finance", "Human%20Resources", "Administration"] {
        let (status, _) = post(
            &router,
            &format!("/resignations/{id}/clearance/{department}/decision"),
            json!({
                "actor_id": "mgr_001",
                "decision": "approve",
                "cleared_date": "2024-06-25",
                "remarks": "no dues"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, resignation) = get(&router, &format!("/resignations/{id}")).await;
    assert_eq!(resignation["status"], "in_clearance");

    let (status, settlement) = post(
        &router,
        "/settlements",
        json!({
            "employee_id": "emp_001",
            "basic_salary": "60000",
            "bonus": "5000",
            "advance_recovery": "2000"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 40 remaining paid days (PL 18 + SL 12 + CL 10) priced at 60000/30.
    assert_eq!(
        decimal_field(&settlement, "pending_leave_encashment"),
        Decimal::new(80_000, 0)
    );
    assert_eq!(decimal_field(&settlement, "total_payable"), Decimal::new(145_000, 0));
    assert_eq!(decimal_field(&settlement, "total_deductions"), Decimal::new(2_000, 0));
    assert_eq!(decimal_field(&settlement, "net_settlement"), Decimal::new(143_000, 0));
    assert_eq!(settlement["status"], "pending");

    let (_, resignation) = get(&router, &format!("/resignations/{id}")).await;
    assert_eq!(resignation["status"], "completed");

    // A second settlement is impossible; the pipeline is finished.
    let (status, _) = post(
        &router,
        "/settlements",
        json!({"employee_id": "emp_001", "basic_salary": "60000"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Disbursement lifecycle.
    let (status, processing) = post(&router, "/settlements/emp_001/processing", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(processing["status"], "processing");

    let (status, paid) = post(&router, "/settlements/emp_001/paid", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "completed");

    let (status, error) = post(&router, "/settlements/emp_001/paid", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_blocked_clearance_prevents_settlement() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (_, resignation) = post(&router, "/resignations", resignation_body()).await;
    let id = resignation["id"].as_str().unwrap();
    post(
        &router,
        &format!("/resignations/{id}/decision"),
        json!({"approver_id": "mgr_001", "decision": "approve"}),
    )
    .await;

    let (status, _) = post(
        &router,
        &format!("/resignations/{id}/clearance/Finance/decision"),
        json!({
            "actor_id": "mgr_001",
            "decision": "reject",
            "cleared_date": "2024-06-25",
            "remarks": "advance outstanding"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = post(
        &router,
        "/settlements",
        json!({"employee_id": "emp_001", "basic_salary": "60000"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CLEARANCE_INCOMPLETE");
}

#[tokio::test]
async fn test_cancelled_resignation_frees_the_pipeline() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (_, resignation) = post(&router, "/resignations", resignation_body()).await;
    let id = resignation["id"].as_str().unwrap();

    let (status, cancelled) = post(
        &router,
        &format!("/resignations/{id}/cancel"),
        json!({"employee_id": "emp_001"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = post(&router, "/resignations", resignation_body()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_short_notice_voluntary_resignation_rejected() {
    let router = create_test_router();
    register_staff_and_manager(&router).await;

    let (status, error) = post(
        &router,
        "/resignations",
        json!({
            "employee_id": "emp_001",
            "resignation_type": "voluntary",
            "submission_date": "2024-05-01",
            "last_working_date": "2024-05-10",
            "reason": "Short notice"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}
