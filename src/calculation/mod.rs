//! Calculation logic for the payroll engine.
//!
//! This module contains the pure salary calculator, monetary rounding for
//! presentation, and working-day counting used by the attendance defaults.

mod rounding;
mod salary;
mod working_days;

pub use rounding::{MONEY_SCALE, round_money, round_money_map};
pub use salary::{
    DEDUCTION_PENALTIES, DEDUCTION_PF, DEDUCTION_TAX, DEDUCTION_UNPAID_LEAVE, SalaryBreakdown,
    SalaryInputs, calculate_salary,
};
pub use working_days::weekdays_in_month;

pub(crate) use salary::{non_negative, percentage};
