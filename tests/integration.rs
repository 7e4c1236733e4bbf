//! End-to-end tests for the payroll API.
//!
//! This suite drives the full period lifecycle over HTTP against the bundled
//! roster in `./config`:
//! - Salary structure issue, supersession, and lookup
//! - Generation with skipped employees
//! - Entry edits while DRAFT
//! - Submit, approve, reject, and delete
//! - Payslip issuance and queries
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{ACTOR_HEADER, AppState, create_router};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    create_router(AppState::from_config(&config))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(ACTOR_HEADER, "hr_1");
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

/// Issues the two structures used throughout: emp_001 on a plain salary
/// with the default PF, emp_002 on the reference package. emp_003 has none.
async fn seed_structures(router: &Router) {
    let (status, _) = send(
        router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "employee_id": "emp_001",
            "basic_salary": "30000",
            "tax_percentage": "5",
            "effective_from": "2025-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "employee_id": "emp_002",
            "basic_salary": "50000",
            "allowances": { "HRA": "10000", "DA": "5000" },
            "tax_percentage": "10",
            "pf_percentage": "12",
            "effective_from": "2025-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn create_period(router: &Router, month: u32, year: i32) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/payroll",
        Some(json!({ "month": month, "year": year, "notes": "monthly run" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

/// Creates, generates, and submits January 2026.
async fn pending_january(router: &Router) -> String {
    seed_structures(router).await;
    let id = create_period(router, 1, 2026).await;
    let (status, _) = send(router, "POST", &format!("/payroll/{}/generate", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(router, "POST", &format!("/payroll/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::OK);
    id
}

fn entry_for<'a>(entries: &'a Value, employee_id: &str) -> &'a Value {
    entries
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["employee_id"] == employee_id)
        .unwrap_or_else(|| panic!("no entry for {}", employee_id))
}

// =============================================================================
// Periods
// =============================================================================

#[tokio::test]
async fn test_create_period_starts_in_draft() {
    let router = create_router_for_test();
    let (status, body) = send(
        &router,
        "POST",
        "/payroll",
        Some(json!({ "month": 3, "year": 2026, "notes": "Q1 close" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["created_by"], "hr_1");
    assert_eq!(body["hr_notes"], "Q1 close");
    assert_eq!(body["total_employees"], 0);
    assert_eq!(body["total_amount"], "0.00");
}

#[tokio::test]
async fn test_duplicate_period_returns_409() {
    let router = create_router_for_test();
    create_period(&router, 1, 2026).await;

    let (status, body) = send(&router, "POST", "/payroll", Some(json!({ "month": 1, "year": 2026 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_PERIOD");
}

#[tokio::test]
async fn test_invalid_month_returns_400() {
    let router = create_router_for_test();
    let (status, body) = send(&router, "POST", "/payroll", Some(json!({ "month": 13, "year": 2026 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_list_periods_newest_first() {
    let router = create_router_for_test();
    create_period(&router, 12, 2025).await;
    create_period(&router, 2, 2026).await;
    create_period(&router, 1, 2026).await;

    let (status, body) = send(&router, "GET", "/payroll", None).await;
    assert_eq!(status, StatusCode::OK);
    let months: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["month"].as_u64().unwrap())
        .collect();
    assert_eq!(months, vec![2, 1, 12]);
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_generate_computes_entries_and_skips_missing_structure() {
    let router = create_router_for_test();
    seed_structures(&router).await;
    let id = create_period(&router, 1, 2026).await;

    let (status, body) = send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;
    assert_eq!(status, StatusCode::OK);

    // Reference package with two unpaid days from the January roster.
    let daniel = entry_for(&body["entries"], "emp_002");
    assert_eq!(daniel["employee_name"], "Daniel Okafor");
    assert_eq!(daniel["gross_salary"], "65000.00");
    assert_eq!(daniel["deductions"]["Tax"], "6500.00");
    assert_eq!(daniel["deductions"]["PF"], "6000.00");
    assert_eq!(daniel["deductions"]["UnpaidLeave"], "4545.45");
    assert_eq!(daniel["net_salary"], "47954.55");
    assert_eq!(daniel["overtime_hours"], "6.5");
    assert_eq!(daniel["status"], "GENERATED");

    // Default PF of 12% applied to a structure that omitted it.
    let asha = entry_for(&body["entries"], "emp_001");
    assert_eq!(asha["pf_percentage"], "12");
    assert_eq!(asha["deductions"]["PF"], "3600.00");
    assert_eq!(asha["net_salary"], "24900.00");
    assert_eq!(asha["present_days"], 20);
    assert!(asha["deductions"].get("UnpaidLeave").is_none());

    let skipped = body["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["employee_id"], "emp_003");
    assert_eq!(skipped[0]["code"], "MISSING_SALARY_STRUCTURE");

    assert_eq!(body["period"]["total_employees"], 2);
    assert_eq!(body["period"]["total_amount"], "72854.55");
    assert_eq!(body["period"]["status"], "DRAFT");
}

#[tokio::test]
async fn test_regenerate_does_not_duplicate_entries() {
    let router = create_router_for_test();
    seed_structures(&router).await;
    let id = create_period(&router, 1, 2026).await;

    send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;
    send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;

    let (status, entries) = send(&router, "GET", &format!("/payroll/{}/entries", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries.as_array().unwrap().len(), 2);

    let (_, period) = send(&router, "GET", &format!("/payroll/{}", id), None).await;
    assert_eq!(period["total_amount"], "72854.55");
}

#[tokio::test]
async fn test_every_entry_balances() {
    let router = create_router_for_test();
    seed_structures(&router).await;
    let id = create_period(&router, 1, 2026).await;
    send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;

    let (_, entries) = send(&router, "GET", &format!("/payroll/{}/entries", id), None).await;
    for entry in entries.as_array().unwrap() {
        let basic = decimal(entry["basic_salary"].as_str().unwrap());
        let allowances: Decimal = entry["allowances"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| decimal(v.as_str().unwrap()))
            .sum();
        let gross = decimal(entry["gross_salary"].as_str().unwrap());
        assert_eq!(gross, basic + allowances);

        let deductions = decimal(entry["total_deductions"].as_str().unwrap());
        let net = decimal(entry["net_salary"].as_str().unwrap());
        // Rounded independently, so allow one cent of presentation drift.
        assert!((gross - deductions - net).abs() <= decimal("0.01"));
    }
}

// =============================================================================
// Entry edits
// =============================================================================

#[tokio::test]
async fn test_update_entry_recalculates_and_refreshes_totals() {
    let router = create_router_for_test();
    seed_structures(&router).await;
    let id = create_period(&router, 1, 2026).await;
    let (_, report) = send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;
    let entry_id = entry_for(&report["entries"], "emp_001")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, entry) = send(
        &router,
        "PUT",
        &format!("/payroll/entry/{}", entry_id),
        Some(json!({ "penalties": "400", "notes": "missed handover" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["deductions"]["Penalties"], "400.00");
    assert_eq!(entry["net_salary"], "24500.00");
    assert_eq!(entry["notes"], "missed handover");
    assert_eq!(entry["basic_salary"], "30000.00");

    let (_, period) = send(&router, "GET", &format!("/payroll/{}", id), None).await;
    assert_eq!(period["total_amount"], "72454.55");
}

#[tokio::test]
async fn test_update_entry_with_zero_working_days_returns_400() {
    let router = create_router_for_test();
    seed_structures(&router).await;
    let id = create_period(&router, 1, 2026).await;
    let (_, report) = send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;
    let entry_id = entry_for(&report["entries"], "emp_002")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/payroll/entry/{}", entry_id),
        Some(json!({ "working_days": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ATTENDANCE_DATA");

    let (_, entry) = send(&router, "GET", &format!("/payroll/entry/{}", entry_id), None).await;
    assert_eq!(entry["working_days"], 22);
    assert_eq!(entry["net_salary"], "47954.55");
}

#[tokio::test]
async fn test_update_entry_after_submit_returns_409() {
    let router = create_router_for_test();
    let id = pending_january(&router).await;
    let (_, entries) = send(&router, "GET", &format!("/payroll/{}/entries", id), None).await;
    let entry_id = entry_for(&entries, "emp_001")["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/payroll/entry/{}", entry_id),
        Some(json!({ "penalties": "100" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

// =============================================================================
// Approval
// =============================================================================

#[tokio::test]
async fn test_approve_issues_payslips() {
    let router = create_router_for_test();
    let id = pending_january(&router).await;

    let (status, period) = send(
        &router,
        "POST",
        &format!("/payroll/{}/approve", id),
        Some(json!({ "notes": "looks right" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(period["status"], "APPROVED");
    assert_eq!(period["admin_notes"], "looks right");
    assert!(period["approved_at"].is_string());

    let (_, entries) = send(&router, "GET", &format!("/payroll/{}/entries", id), None).await;
    assert!(entries
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["status"] == "APPROVED"));

    let (status, payslip) = send(&router, "GET", "/payroll/payslips/emp_002/1/2026", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payslip["net_salary"], "47954.55");
    assert_eq!(payslip["payroll_id"], id.as_str());
    assert_eq!(payslip["employee_name"], "Daniel Okafor");

    let (status, body) = send(&router, "GET", "/payroll/payslips/emp_003/1/2026", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_approve_without_body_is_accepted() {
    let router = create_router_for_test();
    let id = pending_january(&router).await;

    let (status, period) = send(&router, "POST", &format!("/payroll/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(period["admin_notes"].is_null());
}

#[tokio::test]
async fn test_approve_twice_returns_409() {
    let router = create_router_for_test();
    let id = pending_january(&router).await;
    send(&router, "POST", &format!("/payroll/{}/approve", id), None).await;

    let (status, body) = send(&router, "POST", &format!("/payroll/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_approve_draft_returns_409() {
    let router = create_router_for_test();
    let id = create_period(&router, 1, 2026).await;

    let (status, body) = send(&router, "POST", &format!("/payroll/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    let (_, period) = send(&router, "GET", &format!("/payroll/{}", id), None).await;
    assert_eq!(period["status"], "DRAFT");
}

#[tokio::test]
async fn test_reject_keeps_entries_and_issues_nothing() {
    let router = create_router_for_test();
    let id = pending_january(&router).await;

    let (status, period) = send(
        &router,
        "POST",
        &format!("/payroll/{}/reject", id),
        Some(json!({ "reason": "overtime not signed off" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(period["status"], "REJECTED");
    assert_eq!(period["rejection_reason"], "overtime not signed off");

    let (_, entries) = send(&router, "GET", &format!("/payroll/{}/entries", id), None).await;
    assert!(entries
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["status"] == "GENERATED"));

    let (_, payslips) = send(&router, "GET", "/payroll/payslips/emp_002", None).await;
    assert!(payslips.as_array().unwrap().is_empty());

    let (status, _) = send(&router, "POST", &format!("/payroll/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_delete_removes_entries_and_payslips() {
    let router = create_router_for_test();
    let id = pending_january(&router).await;
    send(&router, "POST", &format!("/payroll/{}/approve", id), None).await;

    let (status, _) = send(&router, "DELETE", &format!("/payroll/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", &format!("/payroll/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, "GET", &format!("/payroll/{}/entries", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, "GET", "/payroll/payslips/emp_001/1/2026", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, payslips) = send(&router, "GET", "/payroll/payslips/emp_002", None).await;
    assert!(payslips.as_array().unwrap().is_empty());

    // The month can be run again.
    create_period(&router, 1, 2026).await;
}

#[tokio::test]
async fn test_delete_unknown_period_returns_404() {
    let router = create_router_for_test();
    let (status, body) = send(&router, "DELETE", "/payroll/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Salary structures
// =============================================================================

#[tokio::test]
async fn test_new_structure_supersedes_open_ended_one() {
    let router = create_router_for_test();
    seed_structures(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "employee_id": "emp_001",
            "basic_salary": "33000",
            "tax_percentage": "5",
            "effective_from": "2026-07-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, before) = send(
        &router,
        "GET",
        "/payroll/salary-structure/emp_001?as_of=2026-06-30",
        None,
    )
    .await;
    assert_eq!(before["basic_salary"], "30000.00");
    assert_eq!(before["effective_to"], "2026-06-30");

    let (_, after) = send(
        &router,
        "GET",
        "/payroll/salary-structure/emp_001?as_of=2026-07-01",
        None,
    )
    .await;
    assert_eq!(after["basic_salary"], "33000.00");
    assert_eq!(after["created_by"], "hr_1");

    let (_, all) = send(&router, "GET", "/payroll/salary-structures", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_overlapping_structure_returns_409() {
    let router = create_router_for_test();
    seed_structures(&router).await;

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "employee_id": "emp_002",
            "basic_salary": "40000",
            "effective_from": "2024-06-01",
            "effective_to": "2025-03-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "OVERLAPPING_SALARY_STRUCTURE");
}

#[tokio::test]
async fn test_negative_salary_returns_400() {
    let router = create_router_for_test();
    let (status, body) = send(
        &router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "employee_id": "emp_001",
            "basic_salary": "-1",
            "effective_from": "2026-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SALARY_INPUT");
}

#[tokio::test]
async fn test_structure_id_cannot_move_to_another_employee() {
    let router = create_router_for_test();
    let (status, original) = send(
        &router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "employee_id": "emp_001",
            "basic_salary": "30000",
            "effective_from": "2026-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "id": original["id"],
            "employee_id": "emp_002",
            "basic_salary": "45000",
            "effective_from": "2026-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SALARY_STRUCTURE");

    let (status, resolved) = send(
        &router,
        "GET",
        "/payroll/salary-structure/emp_001?as_of=2026-03-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["id"], original["id"]);
    let (_, all) = send(&router, "GET", "/payroll/salary-structures", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_structure_is_skipped_during_generation() {
    let router = create_router_for_test();
    seed_structures(&router).await;
    let (status, _) = send(
        &router,
        "POST",
        "/payroll/salary-structure",
        Some(json!({
            "employee_id": "emp_003",
            "basic_salary": "10000000000000000000000000000",
            "tax_percentage": "10",
            "effective_from": "2025-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let id = create_period(&router, 1, 2026).await;
    let (status, body) = send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let skipped = body["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["employee_id"], "emp_003");
    assert_eq!(skipped[0]["code"], "INVALID_SALARY_INPUT");
    assert_eq!(body["period"]["total_employees"], 2);
    assert_eq!(body["period"]["total_amount"], "72854.55");
}

#[tokio::test]
async fn test_unresolvable_structure_returns_404() {
    let router = create_router_for_test();
    let (status, body) = send(
        &router,
        "GET",
        "/payroll/salary-structure/emp_003?as_of=2026-01-31",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Payslips
// =============================================================================

#[tokio::test]
async fn test_list_payslips_newest_first() {
    let router = create_router_for_test();
    seed_structures(&router).await;

    for month in [1, 2] {
        let id = create_period(&router, month, 2026).await;
        send(&router, "POST", &format!("/payroll/{}/generate", id), None).await;
        send(&router, "POST", &format!("/payroll/{}/submit", id), None).await;
        let (status, _) = send(&router, "POST", &format!("/payroll/{}/approve", id), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, payslips) = send(&router, "GET", "/payroll/payslips/emp_002", None).await;
    assert_eq!(status, StatusCode::OK);
    let payslips = payslips.as_array().unwrap();
    assert_eq!(payslips.len(), 2);
    assert_eq!(payslips[0]["month"], 2);
    assert_eq!(payslips[1]["month"], 1);
    // February has no pinned attendance for emp_002, so no unpaid leave.
    assert_eq!(payslips[0]["net_salary"], "52500.00");
}
