//! Payroll period and workflow status models.
//!
//! A [`PayrollPeriod`] is the unit of work for one calendar month across all
//! employees. Its [`PayrollStatus`] drives which workflow operations are
//! permitted.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Earliest and latest years a payroll period may be created for.
const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 9999;

/// The workflow status of a payroll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    /// Entries may be generated and edited.
    Draft,
    /// Submitted by HR and frozen until an admin decides.
    PendingApproval,
    /// Approved; payslips have been issued.
    Approved,
    /// Rejected by an admin. Terminal.
    Rejected,
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayrollStatus::Draft => "DRAFT",
            PayrollStatus::PendingApproval => "PENDING_APPROVAL",
            PayrollStatus::Approved => "APPROVED",
            PayrollStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// A calendar (month, year) pair identifying a payroll period.
///
/// Keys order chronologically: by year, then month.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PeriodKey;
/// use chrono::NaiveDate;
///
/// let key = PeriodKey::new(2, 2028).unwrap();
/// assert_eq!(key.first_day(), NaiveDate::from_ymd_opt(2028, 2, 1).unwrap());
/// assert_eq!(key.last_day(), NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
/// assert!(PeriodKey::new(13, 2028).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    /// The calendar month (1-12).
    pub month: u32,
    /// The calendar year.
    pub year: i32,
}

impl PeriodKey {
    /// Validates and creates a period key.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(EngineError::InvalidPeriod { month, year });
        }
        Ok(Self { month, year })
    }

    /// The first calendar day of the period.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// The last calendar day of the period.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// A payroll period with its workflow state and running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Unique identifier for the period.
    pub id: String,
    /// The calendar month (1-12).
    pub month: u32,
    /// The calendar year.
    pub year: i32,
    /// Current workflow status.
    pub status: PayrollStatus,
    /// The HR user who created the period.
    pub created_by: String,
    /// The admin who approved or rejected the period.
    pub approved_by: Option<String>,
    /// Number of entries generated for the period.
    pub total_employees: u32,
    /// Sum of net salary across entries, at full precision.
    pub total_amount: Decimal,
    /// Notes supplied by HR at creation.
    pub hr_notes: Option<String>,
    /// Notes supplied by the approving admin.
    pub admin_notes: Option<String>,
    /// Reason supplied by the rejecting admin.
    pub rejection_reason: Option<String>,
    /// When the period was created.
    pub created_at: DateTime<Utc>,
    /// When entries were last generated.
    pub generated_at: Option<DateTime<Utc>>,
    /// When the period was submitted for approval.
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the period was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the period was rejected.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Optimistic version counter, bumped on every mutation.
    pub version: u64,
}

impl PayrollPeriod {
    /// Creates a new DRAFT period with zero totals.
    pub fn new(key: PeriodKey, created_by: impl Into<String>, hr_notes: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            month: key.month,
            year: key.year,
            status: PayrollStatus::Draft,
            created_by: created_by.into(),
            approved_by: None,
            total_employees: 0,
            total_amount: Decimal::ZERO,
            hr_notes,
            admin_notes: None,
            rejection_reason: None,
            created_at: Utc::now(),
            generated_at: None,
            submitted_at: None,
            approved_at: None,
            rejected_at: None,
            version: 0,
        }
    }

    /// The (month, year) key of this period.
    pub fn key(&self) -> PeriodKey {
        PeriodKey {
            month: self.month,
            year: self.year,
        }
    }

    /// Fails with [`EngineError::InvalidState`] unless the period is in `expected`.
    pub fn ensure_status(&self, expected: PayrollStatus, operation: &'static str) -> EngineResult<()> {
        if self.status != expected {
            return Err(EngineError::InvalidState {
                period_id: self.id.clone(),
                status: self.status,
                operation,
            });
        }
        Ok(())
    }

    /// Records a mutation.
    pub fn touch(&mut self) {
        self.version += 1;
    }
}
