//! Employee reference model.
//!
//! The payroll engine does not own employee records. It only needs an
//! identifier to key entries and payslips, and a display name that is
//! snapshotted onto them at generation time.

use serde::{Deserialize, Serialize};

/// An employee as supplied by the employee directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    #[serde(default)]
    pub name: String,
}

impl Employee {
    /// Creates an employee reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    ///
    /// let employee = Employee::new("emp_001", "Asha Rao");
    /// assert_eq!(employee.id, "emp_001");
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
