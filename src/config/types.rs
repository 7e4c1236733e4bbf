//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::weekdays_in_month;
use crate::models::{AttendanceFacts, Employee, PeriodKey};

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API binds to (e.g. "127.0.0.1:3000").
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// How many working days a period has when the attendance source does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WorkingDaysPolicy {
    /// The same number of working days every month.
    Fixed {
        /// Working days per month.
        days: u32,
    },
    /// Monday-to-Friday days in the calendar month.
    Weekdays,
}

impl WorkingDaysPolicy {
    /// Working days for the given period under this policy.
    pub fn working_days(&self, key: PeriodKey) -> u32 {
        match self {
            WorkingDaysPolicy::Fixed { days } => *days,
            WorkingDaysPolicy::Weekdays => weekdays_in_month(key),
        }
    }
}

impl Default for WorkingDaysPolicy {
    fn default() -> Self {
        WorkingDaysPolicy::Fixed { days: 22 }
    }
}

/// Payroll processing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Reject salary structures whose windows overlap an existing one.
    #[serde(default = "default_true")]
    pub reject_overlapping_structures: bool,
    /// Working-day policy for the bundled attendance source.
    #[serde(default)]
    pub working_days: WorkingDaysPolicy,
    /// PF percentage used when a new salary structure omits one.
    #[serde(default = "default_pf_percentage")]
    pub default_pf_percentage: Decimal,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            reject_overlapping_structures: true,
            working_days: WorkingDaysPolicy::default(),
            default_pf_percentage: default_pf_percentage(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_pf_percentage() -> Decimal {
    Decimal::new(12, 0)
}

/// Contents of `payroll.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Payroll processing settings.
    #[serde(default)]
    pub payroll: PayrollConfig,
}

/// Attendance facts for one employee, optionally pinned to a single period.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the facts belong to.
    pub employee_id: String,
    /// Restricts the record to this month; all months when absent.
    #[serde(default)]
    pub month: Option<u32>,
    /// Restricts the record to this year; all years when absent.
    #[serde(default)]
    pub year: Option<i32>,
    /// The attendance counters.
    pub facts: AttendanceFacts,
}

/// Contents of `roster.yaml`: the employee list and attendance facts served
/// by the bundled in-memory collaborators.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterConfig {
    /// Employees the workflow generates entries for.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Recorded attendance facts.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}
