//! Attendance facts consumed by the salary calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of an employee's attendance for one period.
///
/// Supplied by the attendance collaborator; the engine never records
/// attendance itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFacts {
    /// Number of working days in the period.
    pub working_days: u32,
    /// Days the employee was present.
    #[serde(default)]
    pub present_days: u32,
    /// Leave days that are paid.
    #[serde(default)]
    pub paid_leaves: u32,
    /// Leave days that are deducted from basic salary.
    #[serde(default)]
    pub unpaid_leaves: u32,
    /// Overtime worked in the period, in hours.
    #[serde(default)]
    pub overtime_hours: Decimal,
}

impl AttendanceFacts {
    /// Full attendance for a period with the given number of working days.
    pub fn full(working_days: u32) -> Self {
        Self {
            working_days,
            present_days: working_days,
            paid_leaves: 0,
            unpaid_leaves: 0,
            overtime_hours: Decimal::ZERO,
        }
    }
}
