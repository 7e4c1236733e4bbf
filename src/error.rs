//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the workflow, calculator, and stores can report. Each
//! variant is distinct so HR/Admin tooling can branch on it.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PayrollStatus;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::DuplicatePeriod { month: 3, year: 2026 };
/// assert_eq!(error.to_string(), "Payroll already exists for 3/2026");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// A period, entry, structure, or payslip does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier (or composite key) that was looked up.
        id: String,
    },

    /// A payroll period already exists for the month and year.
    #[error("Payroll already exists for {month}/{year}")]
    DuplicatePeriod {
        /// The calendar month (1-12).
        month: u32,
        /// The calendar year.
        year: i32,
    },

    /// The month/year pair does not name a valid payroll period.
    #[error("Invalid payroll period {month}/{year}")]
    InvalidPeriod {
        /// The requested month.
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// An operation was attempted from the wrong workflow state.
    #[error("Cannot {operation} payroll '{period_id}' in status {status}")]
    InvalidState {
        /// The period the operation targeted.
        period_id: String,
        /// The period's current status.
        status: PayrollStatus,
        /// The operation that was refused.
        operation: &'static str,
    },

    /// No salary structure is effective for the employee on the date.
    #[error("No salary structure for employee '{employee_id}' on {date}")]
    MissingSalaryStructure {
        /// The employee without a structure.
        employee_id: String,
        /// The date resolution was attempted for.
        date: NaiveDate,
    },

    /// Attendance counters cannot be used for a salary calculation.
    #[error("Invalid attendance data for employee '{employee_id}': {message}")]
    InvalidAttendanceData {
        /// The employee the facts belong to.
        employee_id: String,
        /// What made the data invalid.
        message: String,
    },

    /// A monetary or percentage input is out of range.
    #[error("Invalid salary input '{field}': {message}")]
    InvalidSalaryInput {
        /// The offending field.
        field: String,
        /// What made the value invalid.
        message: String,
    },

    /// A salary structure is missing required data.
    #[error("Invalid salary structure field '{field}': {message}")]
    InvalidSalaryStructure {
        /// The offending field.
        field: String,
        /// What made the field invalid.
        message: String,
    },

    /// A salary structure's effective window overlaps an existing one.
    #[error(
        "Salary structure for employee '{employee_id}' overlaps existing structure '{existing_id}'"
    )]
    OverlappingSalaryStructure {
        /// The employee both structures belong to.
        employee_id: String,
        /// The structure already on record.
        existing_id: String,
    },

    /// An external collaborator (directory, attendance source) failed.
    #[error("Data source error: {message}")]
    SourceError {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
