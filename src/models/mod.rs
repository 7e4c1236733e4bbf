//! Core data models for the payroll engine.
//!
//! This module contains all the domain records the workflow reads and writes.

mod attendance;
mod employee;
mod payroll_entry;
mod payroll_period;
mod payslip;
mod salary_structure;

pub use attendance::AttendanceFacts;
pub use employee::Employee;
pub use payroll_entry::{EntryPatch, EntryStatus, PayrollEntry};
pub use payroll_period::{PayrollPeriod, PayrollStatus, PeriodKey};
pub use payslip::Payslip;
pub use salary_structure::SalaryStructure;
