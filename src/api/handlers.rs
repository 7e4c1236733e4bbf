//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::EntryPatch;

use super::request::{
    ApproveRequest, AsOfQuery, CreatePayrollRequest, RejectRequest, SalaryStructureRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, EntryResponse, GenerationResponse, PayslipResponse,
    PeriodResponse, StructureResponse,
};
use super::state::AppState;

/// Header carrying the authenticated user's id.
pub const ACTOR_HEADER: &str = "x-actor-id";

type ApiResult<T> = Result<(StatusCode, Json<T>), ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll", post(create_payroll).get(list_periods))
        .route("/payroll/:id", get(get_period).delete(delete_period))
        .route("/payroll/:id/entries", get(list_entries))
        .route("/payroll/:id/generate", post(generate_entries))
        .route("/payroll/:id/submit", post(submit_period))
        .route("/payroll/:id/approve", post(approve_period))
        .route("/payroll/:id/reject", post(reject_period))
        .route("/payroll/entry/:id", get(get_entry).put(update_entry))
        .route("/payroll/payslips/:employee_id", get(list_payslips))
        .route(
            "/payroll/payslips/:employee_id/:month/:year",
            get(get_payslip),
        )
        .route("/payroll/salary-structure", post(put_structure))
        .route(
            "/payroll/salary-structure/:employee_id",
            get(resolve_structure),
        )
        .route("/payroll/salary-structures", get(list_structures))
        .with_state(state)
}

/// Reads the acting user from [`ACTOR_HEADER`].
fn actor(headers: &HeaderMap) -> Result<String, ApiErrorResponse> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(ApiErrorResponse::unauthorized)
}

/// Maps a JSON body rejection onto an API error.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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
    ApiErrorResponse::bad_request(error)
}

fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| json_rejection(correlation_id, rejection))
}

/// Like [`json_body`], but a request without a JSON body yields the default.
fn optional_json_body<T: Default>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        other => json_body(correlation_id, other),
    }
}

fn failed(correlation_id: Uuid, operation: &str, err: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Request failed"
    );
    err.into()
}

fn ok<T>(body: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(body)))
}

// -- Periods ------------------------------------------------------------------

/// Handler for POST /payroll.
async fn create_payroll(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePayrollRequest>, JsonRejection>,
) -> ApiResult<PeriodResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    let request = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        month = request.month,
        year = request.year,
        "Creating payroll period"
    );

    let period = state
        .workflow()
        .create(request.month, request.year, &actor, request.notes)
        .map_err(|e| failed(correlation_id, "create", e))?;
    Ok((StatusCode::CREATED, Json(period.into())))
}

/// Handler for GET /payroll.
async fn list_periods(State(state): State<AppState>) -> ApiResult<Vec<PeriodResponse>> {
    ok(state
        .workflow()
        .list_periods()
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Handler for GET /payroll/:id.
async fn get_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PeriodResponse> {
    let period = state.workflow().get_period(&id)?;
    ok(period.into())
}

/// Handler for GET /payroll/:id/entries.
async fn list_entries(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<EntryResponse>> {
    let entries = state.workflow().list_entries(&id)?;
    ok(entries.into_iter().map(Into::into).collect())
}

/// Handler for POST /payroll/:id/generate.
///
/// Employees that could not be paid are listed under `skipped`; the request
/// still succeeds.
async fn generate_entries(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<GenerationResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        period_id = %id,
        "Generating payroll entries"
    );

    let report = state
        .workflow()
        .generate_entries(&id)
        .map_err(|e| failed(correlation_id, "generate", e))?;
    info!(
        correlation_id = %correlation_id,
        period_id = %id,
        generated = report.entries.len(),
        skipped = report.skipped.len(),
        total_amount = %report.period.total_amount,
        "Generation completed"
    );
    ok(report.into())
}

/// Handler for POST /payroll/:id/submit.
async fn submit_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<PeriodResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        period_id = %id,
        "Submitting payroll period"
    );

    let period = state
        .workflow()
        .submit(&id)
        .map_err(|e| failed(correlation_id, "submit", e))?;
    ok(period.into())
}

/// Handler for POST /payroll/:id/approve.
async fn approve_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> ApiResult<PeriodResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    let request = optional_json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        period_id = %id,
        "Approving payroll period"
    );

    let period = state
        .workflow()
        .approve(&id, &actor, request.notes)
        .map_err(|e| failed(correlation_id, "approve", e))?;
    ok(period.into())
}

/// Handler for POST /payroll/:id/reject.
async fn reject_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<RejectRequest>, JsonRejection>,
) -> ApiResult<PeriodResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    let request = optional_json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        period_id = %id,
        "Rejecting payroll period"
    );

    let period = state
        .workflow()
        .reject(&id, &actor, request.reason)
        .map_err(|e| failed(correlation_id, "reject", e))?;
    ok(period.into())
}

/// Handler for DELETE /payroll/:id.
async fn delete_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        period_id = %id,
        "Deleting payroll period"
    );

    state
        .workflow()
        .delete(&id)
        .map_err(|e| failed(correlation_id, "delete", e))?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Entries ------------------------------------------------------------------

/// Handler for GET /payroll/entry/:id.
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EntryResponse> {
    let entry = state.workflow().get_entry(&id)?;
    ok(entry.into())
}

/// Handler for PUT /payroll/entry/:id.
async fn update_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<EntryPatch>, JsonRejection>,
) -> ApiResult<EntryResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    let patch = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        entry_id = %id,
        "Updating payroll entry"
    );

    let entry = state
        .workflow()
        .update_entry(&id, patch)
        .map_err(|e| failed(correlation_id, "update entry", e))?;
    ok(entry.into())
}

// -- Payslips -----------------------------------------------------------------

/// Handler for GET /payroll/payslips/:employee_id.
async fn list_payslips(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<Vec<PayslipResponse>> {
    ok(state
        .workflow()
        .list_payslips(&employee_id)
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Handler for GET /payroll/payslips/:employee_id/:month/:year.
async fn get_payslip(
    State(state): State<AppState>,
    Path((employee_id, month, year)): Path<(String, u32, i32)>,
) -> ApiResult<PayslipResponse> {
    let payslip = state.workflow().get_payslip(&employee_id, month, year)?;
    ok(payslip.into())
}

// -- Salary structures --------------------------------------------------------

/// Handler for POST /payroll/salary-structure.
async fn put_structure(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SalaryStructureRequest>, JsonRejection>,
) -> ApiResult<StructureResponse> {
    let correlation_id = Uuid::new_v4();
    let actor = actor(&headers)?;
    let request = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        actor = %actor,
        employee_id = %request.employee_id,
        "Storing salary structure"
    );

    let workflow = state.workflow();
    let structure = request
        .into_structure(&actor, workflow.default_pf_percentage())
        .and_then(|s| workflow.put_structure(s))
        .map_err(|e| failed(correlation_id, "put salary structure", e))?;
    ok(structure.into())
}

/// Handler for GET /payroll/salary-structure/:employee_id.
async fn resolve_structure(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<StructureResponse> {
    let structure = state
        .workflow()
        .resolve_structure(&employee_id, query.date())?;
    ok(structure.into())
}

/// Handler for GET /payroll/salary-structures.
async fn list_structures(State(state): State<AppState>) -> ApiResult<Vec<StructureResponse>> {
    ok(state
        .workflow()
        .list_structures()
        .into_iter()
        .map(Into::into)
        .collect())
}
