//! External data sources the payroll workflow reads from.
//!
//! The engine does not own employees or attendance. It reads them through
//! the [`EmployeeDirectory`] and [`AttendanceSource`] traits, so the
//! workflow and calculator stay testable without a live HR system. In-memory
//! implementations backed by the YAML roster are provided.

mod attendance;
mod directory;

pub use attendance::InMemoryAttendance;
pub use directory::InMemoryDirectory;

use crate::error::EngineResult;
use crate::models::{AttendanceFacts, Employee, PeriodKey};

/// Supplies the roster of employees payroll is generated for.
pub trait EmployeeDirectory: Send + Sync {
    /// All employees eligible for payroll.
    fn employees(&self) -> EngineResult<Vec<Employee>>;
}

/// Supplies point-in-time attendance facts for an employee and period.
pub trait AttendanceSource: Send + Sync {
    /// Attendance counters for `employee_id` during `period`.
    fn facts(&self, employee_id: &str, period: PeriodKey) -> EngineResult<AttendanceFacts>;
}
