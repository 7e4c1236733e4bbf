//! Salary structure model.
//!
//! A [`SalaryStructure`] is an effective-dated compensation template for one
//! employee: basic pay, named allowance components, and the percentages used
//! for tax and provident fund deductions.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An effective-dated compensation template for an employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::SalaryStructure;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut structure = SalaryStructure::new(
///     "emp_001",
///     Decimal::new(50000, 0),
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
/// );
/// structure.allowances.insert("HRA".to_string(), Decimal::new(10000, 0));
///
/// assert!(structure.is_effective_on(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()));
/// assert_eq!(structure.allowances["HRA"], Decimal::new(10000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Unique identifier for the structure.
    pub id: String,
    /// The employee this structure applies to.
    pub employee_id: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components (e.g. "HRA", "DA").
    #[serde(default)]
    pub allowances: BTreeMap<String, Decimal>,
    /// Flat tax percentage applied to gross salary.
    pub tax_percentage: Decimal,
    /// Provident fund percentage applied to basic salary.
    pub pf_percentage: Decimal,
    /// First day the structure applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last day the structure applies (inclusive); `None` is open-ended.
    pub effective_to: Option<NaiveDate>,
    /// The HR user who issued the structure.
    pub created_by: Option<String>,
    /// When the structure was first stored.
    pub created_at: DateTime<Utc>,
    /// When the structure was last changed (e.g. superseded).
    pub updated_at: DateTime<Utc>,
}

impl SalaryStructure {
    /// Creates an open-ended structure with no allowances and zero percentages.
    pub fn new(employee_id: impl Into<String>, basic_salary: Decimal, effective_from: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id: employee_id.into(),
            basic_salary,
            allowances: BTreeMap::new(),
            tax_percentage: Decimal::ZERO,
            pf_percentage: Decimal::ZERO,
            effective_from,
            effective_to: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the structure's window contains `date` (both ends inclusive).
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }

    /// Returns true if this structure's window shares at least one day with `other`'s.
    pub fn overlaps(&self, other: &SalaryStructure) -> bool {
        let starts_before_other_ends = other
            .effective_to
            .is_none_or(|to| self.effective_from <= to);
        let ends_after_other_starts = self
            .effective_to
            .is_none_or(|to| to >= other.effective_from);
        starts_before_other_ends && ends_after_other_starts
    }
}
