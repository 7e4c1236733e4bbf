//! Salary structure storage and effective-date resolution.
//!
//! Structures are kept per employee. Resolution tolerates overlapping or
//! duplicate windows by a documented tie-break; writes can optionally refuse
//! overlaps so the tie-break never has to fire.

use std::cmp::Ordering;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::calculation::{non_negative, percentage};
use crate::error::{EngineError, EngineResult};
use crate::models::SalaryStructure;

use super::memory::Table;

/// Stores salary structures and resolves the one in effect on a date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::SalaryStructure;
/// use payroll_engine::store::SalaryStructureStore;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let store = SalaryStructureStore::new(true);
/// let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let jul = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
///
/// store.put(SalaryStructure::new("emp_001", Decimal::new(40000, 0), jan)).unwrap();
/// store.put(SalaryStructure::new("emp_001", Decimal::new(45000, 0), jul)).unwrap();
///
/// let march = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
/// assert_eq!(store.resolve("emp_001", march).unwrap().basic_salary, Decimal::new(40000, 0));
/// assert_eq!(store.resolve("emp_001", jul).unwrap().basic_salary, Decimal::new(45000, 0));
/// ```
#[derive(Debug, Clone)]
pub struct SalaryStructureStore {
    by_employee: Table<String, Vec<SalaryStructure>>,
    reject_overlaps: bool,
}

/// Orders structures so the preferred one compares greatest: latest
/// `effective_from`, then latest `created_at`, then greatest id.
fn precedence(a: &SalaryStructure, b: &SalaryStructure) -> Ordering {
    a.effective_from
        .cmp(&b.effective_from)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn validate(structure: &SalaryStructure) -> EngineResult<()> {
    if structure.employee_id.trim().is_empty() {
        return Err(EngineError::InvalidSalaryStructure {
            field: "employee_id".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if let Some(to) = structure.effective_to {
        if to < structure.effective_from {
            return Err(EngineError::InvalidSalaryStructure {
                field: "effective_to".to_string(),
                message: format!(
                    "{} is before effective_from {}",
                    to, structure.effective_from
                ),
            });
        }
    }
    non_negative("basic_salary", structure.basic_salary)?;
    for (name, amount) in &structure.allowances {
        non_negative(&format!("allowances.{}", name), *amount)?;
    }
    percentage("tax_percentage", structure.tax_percentage)?;
    percentage("pf_percentage", structure.pf_percentage)?;
    Ok(())
}

impl SalaryStructureStore {
    /// Creates an empty store.
    ///
    /// With `reject_overlaps` set, [`put`](Self::put) refuses a structure
    /// whose window still overlaps another after supersession.
    pub fn new(reject_overlaps: bool) -> Self {
        Self {
            by_employee: Table::new(),
            reject_overlaps,
        }
    }

    /// Stores a structure, replacing any existing one with the same id.
    ///
    /// A replacement keeps the stored record's `created_at` and `created_by`
    /// and belongs to the same employee. An open-ended structure for the same
    /// employee that starts strictly before the new one is superseded: its
    /// `effective_to` is set to the day before the new `effective_from`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidSalaryStructure`] for an empty employee id, an
    ///   inverted window, or an id already used by another employee
    /// - [`EngineError::InvalidSalaryInput`] for negative money or an
    ///   out-of-range percentage
    /// - [`EngineError::OverlappingSalaryStructure`] when overlaps are
    ///   rejected and one remains
    pub fn put(&self, mut structure: SalaryStructure) -> EngineResult<SalaryStructure> {
        validate(&structure)?;
        structure.updated_at = Utc::now();

        let employee_id = structure.employee_id.clone();
        let reject_overlaps = self.reject_overlaps;

        let stored = self
            .by_employee
            .modify_or_default(employee_id.clone(), move |existing, others| {
                if let Some(owner) = others
                    .values()
                    .flatten()
                    .find(|s| s.id == structure.id)
                {
                    return Err(EngineError::InvalidSalaryStructure {
                        field: "employee_id".to_string(),
                        message: format!(
                            "structure {} belongs to employee {}",
                            owner.id, owner.employee_id
                        ),
                    });
                }

                if let Some(position) = existing.iter().position(|s| s.id == structure.id) {
                    let previous = existing.remove(position);
                    structure.created_at = previous.created_at;
                    structure.created_by = previous.created_by.or(structure.created_by.take());
                }

                let close_on = structure.effective_from.pred_opt();
                for prior in existing.iter_mut() {
                    if prior.effective_to.is_none()
                        && prior.effective_from < structure.effective_from
                    {
                        prior.effective_to = close_on;
                        prior.updated_at = structure.updated_at;
                        debug!(
                            structure_id = %prior.id,
                            employee_id = %employee_id,
                            effective_to = ?prior.effective_to,
                            "Superseded salary structure"
                        );
                    }
                }

                if reject_overlaps {
                    if let Some(clash) = existing.iter().find(|s| s.overlaps(&structure)) {
                        return Err(EngineError::OverlappingSalaryStructure {
                            employee_id,
                            existing_id: clash.id.clone(),
                        });
                    }
                }

                existing.push(structure.clone());
                existing.sort_by(precedence);
                Ok(structure)
            })?;

        info!(
            structure_id = %stored.id,
            employee_id = %stored.employee_id,
            effective_from = %stored.effective_from,
            "Stored salary structure"
        );
        Ok(stored)
    }

    /// Resolves the structure in effect for an employee on `as_of`.
    ///
    /// Among structures whose window contains `as_of`, the one with the
    /// latest `effective_from` wins; equal starts fall back to the latest
    /// `created_at`, then the greatest id.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if no structure is in effect.
    pub fn resolve(&self, employee_id: &str, as_of: NaiveDate) -> EngineResult<SalaryStructure> {
        self.by_employee
            .get(&employee_id.to_string())
            .unwrap_or_default()
            .into_iter()
            .filter(|s| s.is_effective_on(as_of))
            .max_by(precedence)
            .ok_or_else(|| {
                EngineError::not_found("SalaryStructure", format!("{} on {}", employee_id, as_of))
            })
    }

    /// Every structure on record for one employee, oldest first.
    pub fn for_employee(&self, employee_id: &str) -> Vec<SalaryStructure> {
        self.by_employee
            .get(&employee_id.to_string())
            .unwrap_or_default()
    }

    /// Every structure on record, ordered by employee then `effective_from`.
    pub fn list(&self) -> Vec<SalaryStructure> {
        let mut all: Vec<SalaryStructure> =
            self.by_employee.list().into_iter().flatten().collect();
        all.sort_by(|a, b| {
            a.employee_id
                .cmp(&b.employee_id)
                .then_with(|| precedence(a, b))
        });
        all
    }
}
