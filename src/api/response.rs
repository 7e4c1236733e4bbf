//! Response types for the payroll API.
//!
//! This module defines the JSON response bodies and the error response
//! structure. Money is rounded to two decimal places here and nowhere else.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{round_money, round_money_map};
use crate::error::EngineError;
use crate::models::{
    EntryStatus, PayrollEntry, PayrollPeriod, PayrollStatus, Payslip, SalaryStructure,
};
use crate::workflow::{GenerationReport, SkippedEmployee};

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

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 401 response for a request without an acting identity.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::with_details(
                "UNAUTHORIZED",
                "Missing actor identity",
                "Mutating requests must carry the x-actor-id header",
            ),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration parse error", message),
            ),
            EngineError::NotFound { entity, .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "NOT_FOUND",
                    message,
                    format!("No {} exists with the requested identifier", entity),
                ),
            ),
            EngineError::DuplicatePeriod { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE_PERIOD",
                    message,
                    "Delete the existing period before creating it again",
                ),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            EngineError::InvalidState { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "INVALID_STATE",
                    message,
                    "The operation is not permitted in the period's current status",
                ),
            ),
            EngineError::MissingSalaryStructure { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("MISSING_SALARY_STRUCTURE", message),
            ),
            EngineError::InvalidAttendanceData { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ATTENDANCE_DATA", message),
            ),
            EngineError::InvalidSalaryInput { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_SALARY_INPUT", message),
            ),
            EngineError::InvalidSalaryStructure { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_SALARY_STRUCTURE", message),
            ),
            EngineError::OverlappingSalaryStructure { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "OVERLAPPING_SALARY_STRUCTURE",
                    message,
                    "Close the existing structure's window or set effective_to on the new one",
                ),
            ),
            EngineError::SourceError { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("SOURCE_ERROR", message),
            ),
        };
        Self { status, error }
    }
}

/// A payroll period as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodResponse {
    /// Unique identifier.
    pub id: String,
    /// The calendar month (1-12).
    pub month: u32,
    /// The calendar year.
    pub year: i32,
    /// Current status.
    pub status: PayrollStatus,
    /// The user who created the record.
    pub created_by: String,
    /// The admin who approved or rejected the period.
    pub approved_by: Option<String>,
    /// Number of entries in the period.
    pub total_employees: u32,
    /// Sum of net salary across entries.
    pub total_amount: Decimal,
    /// Notes supplied by HR.
    pub hr_notes: Option<String>,
    /// Notes supplied by the approving admin.
    pub admin_notes: Option<String>,
    /// Reason supplied by the rejecting admin.
    pub rejection_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When entries or the payslip were generated.
    pub generated_at: Option<DateTime<Utc>>,
    /// When the period was submitted.
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the period was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the period was rejected.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Mutation counter.
    pub version: u64,
}

impl From<PayrollPeriod> for PeriodResponse {
    fn from(p: PayrollPeriod) -> Self {
        Self {
            total_amount: round_money(p.total_amount),
            id: p.id,
            month: p.month,
            year: p.year,
            status: p.status,
            created_by: p.created_by,
            approved_by: p.approved_by,
            total_employees: p.total_employees,
            hr_notes: p.hr_notes,
            admin_notes: p.admin_notes,
            rejection_reason: p.rejection_reason,
            created_at: p.created_at,
            generated_at: p.generated_at,
            submitted_at: p.submitted_at,
            approved_at: p.approved_at,
            rejected_at: p.rejected_at,
            version: p.version,
        }
    }
}

/// A payroll entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    /// Unique identifier.
    pub id: String,
    /// The owning payroll period.
    pub payroll_id: String,
    /// The employee.
    pub employee_id: String,
    /// Employee display name.
    pub employee_name: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components.
    pub allowances: BTreeMap<String, Decimal>,
    /// Tax percentage.
    pub tax_percentage: Decimal,
    /// Provident fund percentage.
    pub pf_percentage: Decimal,
    /// Deductions keyed by name.
    pub deductions: BTreeMap<String, Decimal>,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Basic salary plus allowances.
    pub gross_salary: Decimal,
    /// Gross salary minus deductions.
    pub net_salary: Decimal,
    /// Working days in the period.
    pub working_days: u32,
    /// Days present.
    pub present_days: u32,
    /// Paid leave days.
    pub paid_leaves: u32,
    /// Unpaid leave days.
    pub unpaid_leaves: u32,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// Manual penalty amount.
    pub penalties: Decimal,
    /// Free-form HR notes.
    pub notes: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<PayrollEntry> for EntryResponse {
    fn from(e: PayrollEntry) -> Self {
        Self {
            basic_salary: round_money(e.basic_salary),
            allowances: round_money_map(&e.allowances),
            deductions: round_money_map(&e.deductions),
            total_deductions: round_money(e.total_deductions()),
            gross_salary: round_money(e.gross_salary),
            net_salary: round_money(e.net_salary),
            penalties: round_money(e.penalties),
            id: e.id,
            payroll_id: e.payroll_id,
            employee_id: e.employee_id,
            employee_name: e.employee_name,
            tax_percentage: e.tax_percentage,
            pf_percentage: e.pf_percentage,
            working_days: e.working_days,
            present_days: e.present_days,
            paid_leaves: e.paid_leaves,
            unpaid_leaves: e.unpaid_leaves,
            overtime_hours: e.overtime_hours,
            notes: e.notes,
            status: e.status,
            updated_at: e.updated_at,
        }
    }
}

/// A payslip as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipResponse {
    /// Unique identifier.
    pub id: String,
    /// The entry the payslip was issued from.
    pub payroll_entry_id: String,
    /// The owning payroll period.
    pub payroll_id: String,
    /// The employee.
    pub employee_id: String,
    /// Employee display name.
    pub employee_name: String,
    /// The calendar month (1-12).
    pub month: u32,
    /// The calendar year.
    pub year: i32,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components.
    pub allowances: BTreeMap<String, Decimal>,
    /// Deductions keyed by name.
    pub deductions: BTreeMap<String, Decimal>,
    /// Basic salary plus allowances.
    pub gross_salary: Decimal,
    /// Gross salary minus deductions.
    pub net_salary: Decimal,
    /// Working days in the period.
    pub working_days: u32,
    /// Days present.
    pub present_days: u32,
    /// Paid leave days.
    pub paid_leaves: u32,
    /// Unpaid leave days.
    pub unpaid_leaves: u32,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// When entries or the payslip were generated.
    pub generated_at: DateTime<Utc>,
}

impl From<Payslip> for PayslipResponse {
    fn from(p: Payslip) -> Self {
        Self {
            basic_salary: round_money(p.basic_salary),
            allowances: round_money_map(&p.allowances),
            deductions: round_money_map(&p.deductions),
            gross_salary: round_money(p.gross_salary),
            net_salary: round_money(p.net_salary),
            id: p.id,
            payroll_entry_id: p.payroll_entry_id,
            payroll_id: p.payroll_id,
            employee_id: p.employee_id,
            employee_name: p.employee_name,
            month: p.month,
            year: p.year,
            working_days: p.working_days,
            present_days: p.present_days,
            paid_leaves: p.paid_leaves,
            unpaid_leaves: p.unpaid_leaves,
            overtime_hours: p.overtime_hours,
            generated_at: p.generated_at,
        }
    }
}

/// A salary structure as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureResponse {
    /// Unique identifier.
    pub id: String,
    /// The employee.
    pub employee_id: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components.
    pub allowances: BTreeMap<String, Decimal>,
    /// Tax percentage.
    pub tax_percentage: Decimal,
    /// Provident fund percentage.
    pub pf_percentage: Decimal,
    /// First day the structure applies.
    pub effective_from: NaiveDate,
    /// Last day the structure applies, if bounded.
    pub effective_to: Option<NaiveDate>,
    /// The user who created the record.
    pub created_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<SalaryStructure> for StructureResponse {
    fn from(s: SalaryStructure) -> Self {
        Self {
            basic_salary: round_money(s.basic_salary),
            allowances: round_money_map(&s.allowances),
            id: s.id,
            employee_id: s.employee_id,
            tax_percentage: s.tax_percentage,
            pf_percentage: s.pf_percentage,
            effective_from: s.effective_from,
            effective_to: s.effective_to,
            created_by: s.created_by,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// An employee generation skipped, with the error code it would have failed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedResponse {
    /// The employee.
    pub employee_id: String,
    /// Error code the employee failed with.
    pub code: String,
    /// Human-readable reason.
    pub message: String,
}

impl From<SkippedEmployee> for SkippedResponse {
    fn from(s: SkippedEmployee) -> Self {
        let error = ApiErrorResponse::from(s.error).error;
        Self {
            employee_id: s.employee_id,
            code: error.code,
            message: error.message,
        }
    }
}

/// Response body for `POST /payroll/:id/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The period with refreshed totals.
    pub period: PeriodResponse,
    /// Entries now stored for the period.
    pub entries: Vec<EntryResponse>,
    /// Employees left without an entry.
    pub skipped: Vec<SkippedResponse>,
}

impl From<GenerationReport> for GenerationResponse {
    fn from(report: GenerationReport) -> Self {
        Self {
            period: report.period.into(),
            entries: report.entries.into_iter().map(Into::into).collect(),
            skipped: report.skipped.into_iter().map(Into::into).collect(),
        }
    }
}
