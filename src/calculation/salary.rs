//! Salary calculation.
//!
//! This module provides [`calculate_salary`], a pure function turning salary
//! inputs and attendance counters into gross pay, a named deduction map, and
//! net pay. Everything is computed at full decimal precision; rounding is the
//! presentation layer's concern (see [`super::round_money`]).

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Deduction key for flat-percentage income tax.
pub const DEDUCTION_TAX: &str = "Tax";

/// Deduction key for the provident fund contribution.
pub const DEDUCTION_PF: &str = "PF";

/// Deduction key for pay withheld for unpaid leave.
pub const DEDUCTION_UNPAID_LEAVE: &str = "UnpaidLeave";

/// Deduction key for manual penalties.
pub const DEDUCTION_PENALTIES: &str = "Penalties";

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The inputs to a salary calculation.
#[derive(Debug, Clone, Copy)]
pub struct SalaryInputs<'a> {
    /// The employee being paid, used in error messages.
    pub employee_id: &'a str,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components.
    pub allowances: &'a BTreeMap<String, Decimal>,
    /// Tax percentage applied to gross salary.
    pub tax_percentage: Decimal,
    /// Provident fund percentage applied to basic salary.
    pub pf_percentage: Decimal,
    /// Working days in the period.
    pub working_days: u32,
    /// Unpaid leave days in the period.
    pub unpaid_leaves: u32,
    /// Manual penalty amount.
    pub penalties: Decimal,
}

/// The result of a salary calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryBreakdown {
    /// Basic salary plus all allowances.
    pub gross_salary: Decimal,
    /// Deductions keyed by [`DEDUCTION_TAX`], [`DEDUCTION_PF`] and, when
    /// applicable, [`DEDUCTION_UNPAID_LEAVE`] and [`DEDUCTION_PENALTIES`].
    pub deductions: BTreeMap<String, Decimal>,
    /// Gross salary minus the sum of deductions.
    pub net_salary: Decimal,
}

impl SalaryBreakdown {
    /// Sum of all deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.values().copied().sum()
    }

    /// Returns a single deduction, or zero when it was not applied.
    pub fn deduction(&self, name: &str) -> Decimal {
        self.deductions.get(name).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Calculates gross pay, deductions, and net pay.
///
/// - `gross = basic + Σ allowances`
/// - `Tax = gross × tax% / 100`
/// - `PF = basic × pf% / 100`
/// - `UnpaidLeave = basic / working_days × unpaid_leaves`, only when `unpaid_leaves > 0`
/// - `Penalties = penalties`, only when `penalties > 0`
/// - `net = gross − Σ deductions`
///
/// # Errors
///
/// - [`EngineError::InvalidAttendanceData`] if `working_days` is zero or
///   smaller than `unpaid_leaves`
/// - [`EngineError::InvalidSalaryInput`] for negative money, a percentage
///   outside 0..=100, or amounts whose totals exceed the decimal range
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use payroll_engine::calculation::{calculate_salary, round_money, SalaryInputs};
/// use rust_decimal::Decimal;
///
/// let mut allowances = BTreeMap::new();
/// allowances.insert("HRA".to_string(), Decimal::new(10000, 0));
/// allowances.insert("DA".to_string(), Decimal::new(5000, 0));
///
/// let breakdown = calculate_salary(&SalaryInputs {
///     employee_id: "emp_001",
///     basic_salary: Decimal::new(50000, 0),
///     allowances: &allowances,
///     tax_percentage: Decimal::new(10, 0),
///     pf_percentage: Decimal::new(12, 0),
///     working_days: 22,
///     unpaid_leaves: 2,
///     penalties: Decimal::ZERO,
/// })
/// .unwrap();
///
/// assert_eq!(breakdown.gross_salary, Decimal::new(65000, 0));
/// assert_eq!(round_money(breakdown.net_salary).to_string(), "47954.55");
/// ```
pub fn calculate_salary(inputs: &SalaryInputs<'_>) -> EngineResult<SalaryBreakdown> {
    validate(inputs)?;

    let gross_salary = inputs
        .allowances
        .values()
        .try_fold(inputs.basic_salary, |acc, amount| acc.checked_add(*amount))
        .ok_or_else(|| overflow("gross_salary"))?;

    let mut deductions = BTreeMap::new();
    deductions.insert(
        DEDUCTION_TAX.to_string(),
        percent_of(gross_salary, inputs.tax_percentage).ok_or_else(|| overflow("tax"))?,
    );
    deductions.insert(
        DEDUCTION_PF.to_string(),
        percent_of(inputs.basic_salary, inputs.pf_percentage).ok_or_else(|| overflow("pf"))?,
    );

    if inputs.unpaid_leaves > 0 {
        let unpaid = inputs
            .basic_salary
            .checked_div(Decimal::from(inputs.working_days))
            .and_then(|per_day| per_day.checked_mul(Decimal::from(inputs.unpaid_leaves)))
            .ok_or_else(|| overflow("unpaid_leave"))?;
        deductions.insert(DEDUCTION_UNPAID_LEAVE.to_string(), unpaid);
    }

    if inputs.penalties > Decimal::ZERO {
        deductions.insert(DEDUCTION_PENALTIES.to_string(), inputs.penalties);
    }

    let net_salary = deductions
        .values()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
        .and_then(|total| gross_salary.checked_sub(total))
        .ok_or_else(|| overflow("net_salary"))?;

    Ok(SalaryBreakdown {
        gross_salary,
        net_salary,
        deductions,
    })
}

fn percent_of(amount: Decimal, percentage: Decimal) -> Option<Decimal> {
    amount.checked_mul(percentage)?.checked_div(HUNDRED)
}

fn overflow(field: &str) -> EngineError {
    EngineError::InvalidSalaryInput {
        field: field.to_string(),
        message: "amount is too large to calculate".to_string(),
    }
}

fn validate(inputs: &SalaryInputs<'_>) -> EngineResult<()> {
    if inputs.working_days == 0 {
        return Err(EngineError::InvalidAttendanceData {
            employee_id: inputs.employee_id.to_string(),
            message: "working days must be greater than zero".to_string(),
        });
    }
    if inputs.unpaid_leaves > inputs.working_days {
        return Err(EngineError::InvalidAttendanceData {
            employee_id: inputs.employee_id.to_string(),
            message: format!(
                "unpaid leaves ({}) exceed working days ({})",
                inputs.unpaid_leaves, inputs.working_days
            ),
        });
    }

    non_negative("basic_salary", inputs.basic_salary)?;
    non_negative("penalties", inputs.penalties)?;
    for (name, amount) in inputs.allowances {
        non_negative(&format!("allowances.{}", name), *amount)?;
    }
    percentage("tax_percentage", inputs.tax_percentage)?;
    percentage("pf_percentage", inputs.pf_percentage)?;
    Ok(())
}

/// Fails with [`EngineError::InvalidSalaryInput`] if `value` is negative.
pub(crate) fn non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::InvalidSalaryInput {
            field: field.to_string(),
            message: format!("must not be negative, got {}", value),
        });
    }
    Ok(())
}

/// Fails with [`EngineError::InvalidSalaryInput`] unless `value` is within 0..=100.
pub(crate) fn percentage(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(EngineError::InvalidSalaryInput {
            field: field.to_string(),
            message: format!("must be between 0 and 100, got {}", value),
        });
    }
    Ok(())
}
