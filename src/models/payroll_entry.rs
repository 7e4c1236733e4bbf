//! Payroll entry model.
//!
//! A [`PayrollEntry`] is one employee's computed line item within a payroll
//! period. It snapshots the salary inputs used so the calculation can be
//! re-run after an edit without looking the salary structure up again.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AttendanceFacts;

/// The status of a payroll entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Produced by generation; editable while the period is DRAFT.
    Generated,
    /// Locked by period approval.
    Approved,
}

/// One employee's line item within a payroll period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The owning payroll period.
    pub payroll_id: String,
    /// The employee this entry pays.
    pub employee_id: String,
    /// Employee display name at generation time.
    pub employee_name: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components.
    pub allowances: BTreeMap<String, Decimal>,
    /// Tax percentage used for the `Tax` deduction.
    pub tax_percentage: Decimal,
    /// Provident fund percentage used for the `PF` deduction.
    pub pf_percentage: Decimal,
    /// Computed deductions keyed by name.
    pub deductions: BTreeMap<String, Decimal>,
    /// Basic salary plus all allowances.
    pub gross_salary: Decimal,
    /// Gross salary minus all deductions.
    pub net_salary: Decimal,
    /// Number of working days in the period.
    pub working_days: u32,
    /// Days the employee was present.
    pub present_days: u32,
    /// Paid leave days.
    pub paid_leaves: u32,
    /// Unpaid leave days.
    pub unpaid_leaves: u32,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
    /// Manual penalty amount deducted from net salary.
    pub penalties: Decimal,
    /// Free-form HR notes.
    pub notes: Option<String>,
    /// Entry status.
    pub status: EntryStatus,
    /// When the entry was last calculated.
    pub updated_at: DateTime<Utc>,
}

impl PayrollEntry {
    /// The attendance counters currently recorded on the entry.
    pub fn attendance(&self) -> AttendanceFacts {
        AttendanceFacts {
            working_days: self.working_days,
            present_days: self.present_days,
            paid_leaves: self.paid_leaves,
            unpaid_leaves: self.unpaid_leaves,
            overtime_hours: self.overtime_hours,
        }
    }

    /// Sum of all deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.values().copied().sum()
    }
}

/// Editable fields of a payroll entry. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    /// New basic salary.
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    /// Replacement allowance map.
    #[serde(default)]
    pub allowances: Option<BTreeMap<String, Decimal>>,
    /// New tax percentage.
    #[serde(default)]
    pub tax_percentage: Option<Decimal>,
    /// New provident fund percentage.
    #[serde(default)]
    pub pf_percentage: Option<Decimal>,
    /// New working days count.
    #[serde(default)]
    pub working_days: Option<u32>,
    /// New present days count.
    #[serde(default)]
    pub present_days: Option<u32>,
    /// New paid leave count.
    #[serde(default)]
    pub paid_leaves: Option<u32>,
    /// New unpaid leave count.
    #[serde(default)]
    pub unpaid_leaves: Option<u32>,
    /// New overtime hours.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// New penalty amount.
    #[serde(default)]
    pub penalties: Option<Decimal>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl EntryPatch {
    /// Overwrites the entry's editable fields with the patch's present values.
    ///
    /// Derived fields (`deductions`, `gross_salary`, `net_salary`) are left
    /// stale; the caller recalculates them.
    pub fn apply_to(self, entry: &mut PayrollEntry) {
        if let Some(v) = self.basic_salary {
            entry.basic_salary = v;
        }
        if let Some(v) = self.allowances {
            entry.allowances = v;
        }
        if let Some(v) = self.tax_percentage {
            entry.tax_percentage = v;
        }
        if let Some(v) = self.pf_percentage {
            entry.pf_percentage = v;
        }
        if let Some(v) = self.working_days {
            entry.working_days = v;
        }
        if let Some(v) = self.present_days {
            entry.present_days = v;
        }
        if let Some(v) = self.paid_leaves {
            entry.paid_leaves = v;
        }
        if let Some(v) = self.unpaid_leaves {
            entry.unpaid_leaves = v;
        }
        if let Some(v) = self.overtime_hours {
            entry.overtime_hours = v;
        }
        if let Some(v) = self.penalties {
            entry.penalties = v;
        }
        if self.notes.is_some() {
            entry.notes = self.notes;
        }
    }
}
