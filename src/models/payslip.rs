//! Payslip model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PayrollEntry, PayrollPeriod, PeriodKey};

/// An immutable, employee-facing record of an approved payroll entry.
///
/// At most one payslip exists per (employee, month, year); see
/// [`Payslip::key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier for the payslip.
    pub id: String,
    /// The entry this payslip was issued from.
    pub payroll_entry_id: String,
    /// The period this payslip was issued for.
    pub payroll_id: String,
    /// The employee the payslip belongs to.
    pub employee_id: String,
    /// Employee display name at issuance.
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
    /// When the payslip was issued.
    pub generated_at: DateTime<Utc>,
}

impl Payslip {
    /// Snapshots an entry of `period` into a new payslip.
    pub fn from_entry(entry: &PayrollEntry, period: &PayrollPeriod) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            payroll_entry_id: entry.id.clone(),
            payroll_id: period.id.clone(),
            employee_id: entry.employee_id.clone(),
            employee_name: entry.employee_name.clone(),
            month: period.month,
            year: period.year,
            basic_salary: entry.basic_salary,
            allowances: entry.allowances.clone(),
            deductions: entry.deductions.clone(),
            gross_salary: entry.gross_salary,
            net_salary: entry.net_salary,
            working_days: entry.working_days,
            present_days: entry.present_days,
            paid_leaves: entry.paid_leaves,
            unpaid_leaves: entry.unpaid_leaves,
            overtime_hours: entry.overtime_hours,
            generated_at: Utc::now(),
        }
    }

    /// The uniqueness key of the payslip.
    pub fn key(&self) -> (String, PeriodKey) {
        (
            self.employee_id.clone(),
            PeriodKey {
                month: self.month,
                year: self.year,
            },
        )
    }
}
