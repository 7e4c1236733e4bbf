//! The payroll period state machine.
//!
//! ```text
//! DRAFT --submit--> PENDING_APPROVAL --approve--> APPROVED
//!                                    \--reject--> REJECTED
//! ```
//!
//! Entries are generated and edited only while DRAFT. Approval freezes the
//! entries and issues payslips. REJECTED is terminal; the period is deleted
//! and recreated to start over.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{SalaryInputs, calculate_salary};
use crate::config::{ConfigLoader, PayrollConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, EntryPatch, EntryStatus, PayrollEntry, PayrollPeriod, PayrollStatus, Payslip,
    PeriodKey, SalaryStructure,
};
use crate::sources::{AttendanceSource, EmployeeDirectory, InMemoryAttendance, InMemoryDirectory};
use crate::store::{PayrollRepository, PeriodLocks, SalaryStructureStore};

use super::PayslipIssuer;

/// An employee generation could not produce an entry for.
#[derive(Debug)]
pub struct SkippedEmployee {
    /// The employee that was skipped.
    pub employee_id: String,
    /// Why no entry was produced.
    pub error: EngineError,
}

/// The outcome of generating entries for a period.
#[derive(Debug)]
pub struct GenerationReport {
    /// The period with refreshed totals.
    pub period: PayrollPeriod,
    /// Entries now stored for the period, ordered by employee id.
    pub entries: Vec<PayrollEntry>,
    /// Employees left without an entry.
    pub skipped: Vec<SkippedEmployee>,
}

/// Drives payroll periods through their lifecycle.
///
/// Mutating operations on one period are serialized by a per-period lock;
/// operations on different periods run independently. Every period mutation
/// bumps [`PayrollPeriod::version`].
pub struct PayrollWorkflow {
    directory: Arc<dyn EmployeeDirectory>,
    attendance: Arc<dyn AttendanceSource>,
    structures: SalaryStructureStore,
    repository: PayrollRepository,
    issuer: PayslipIssuer,
    locks: PeriodLocks,
    default_pf_percentage: Decimal,
}

impl PayrollWorkflow {
    /// Creates a workflow reading employees and attendance from the given
    /// collaborators.
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        attendance: Arc<dyn AttendanceSource>,
        config: &PayrollConfig,
    ) -> Self {
        let repository = PayrollRepository::new();
        Self {
            directory,
            attendance,
            structures: SalaryStructureStore::new(config.reject_overlapping_structures),
            issuer: PayslipIssuer::new(repository.clone()),
            repository,
            locks: PeriodLocks::new(),
            default_pf_percentage: config.default_pf_percentage,
        }
    }

    /// Creates a workflow backed by the in-memory roster from `config`.
    pub fn from_config(config: &ConfigLoader) -> Self {
        let payroll = &config.config().payroll;
        let roster = config.roster();
        Self::new(
            Arc::new(InMemoryDirectory::new(roster.employees.clone())),
            Arc::new(InMemoryAttendance::new(
                payroll.working_days,
                roster.attendance.clone(),
            )),
            payroll,
        )
    }

    /// PF percentage applied to new structures that do not specify one.
    pub fn default_pf_percentage(&self) -> Decimal {
        self.default_pf_percentage
    }

    // -- Salary structures -----------------------------------------------------

    /// Stores a salary structure. See [`SalaryStructureStore::put`].
    pub fn put_structure(&self, structure: SalaryStructure) -> EngineResult<SalaryStructure> {
        self.structures.put(structure)
    }

    /// The structure in effect for an employee on `as_of`.
    pub fn resolve_structure(
        &self,
        employee_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<SalaryStructure> {
        self.structures.resolve(employee_id, as_of)
    }

    /// Every salary structure on record.
    pub fn list_structures(&self) -> Vec<SalaryStructure> {
        self.structures.list()
    }

    // -- Transitions -----------------------------------------------------------

    /// Creates a DRAFT period for `month`/`year`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidPeriod`] for an out-of-range month or year
    /// - [`EngineError::DuplicatePeriod`] if the period already exists
    pub fn create(
        &self,
        month: u32,
        year: i32,
        created_by: &str,
        hr_notes: Option<String>,
    ) -> EngineResult<PayrollPeriod> {
        let key = PeriodKey::new(month, year)?;
        let period = PayrollPeriod::new(key, created_by, hr_notes);
        self.repository.insert_period(period.clone())?;

        info!(
            period_id = %period.id,
            month = period.month,
            year = period.year,
            created_by = %period.created_by,
            "Created payroll period"
        );
        Ok(period)
    }

    /// Generates one entry per employee with a resolvable salary structure.
    ///
    /// Structures are resolved as of the period's last calendar day.
    /// Employees that fail (no structure, bad attendance, source error) are
    /// reported in [`GenerationReport::skipped`] and do not abort the batch.
    /// Existing entries of the period are replaced.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the period does not exist
    /// - [`EngineError::InvalidState`] unless the period is DRAFT
    /// - [`EngineError::SourceError`] if the employee roster cannot be read
    pub fn generate_entries(&self, period_id: &str) -> EngineResult<GenerationReport> {
        self.locks.with_lock(period_id, || {
            let mut period = self.repository.get_period(period_id)?;
            period.ensure_status(PayrollStatus::Draft, "generate entries for")?;

            let employees = self.directory.employees()?;
            let as_of = period.key().last_day();

            let mut built = Vec::with_capacity(employees.len());
            let mut skipped = Vec::new();
            let mut total_amount = Decimal::ZERO;
            for employee in &employees {
                let outcome = self.build_entry(&period, employee, as_of).and_then(|entry| {
                    let total = total_amount
                        .checked_add(entry.net_salary)
                        .ok_or_else(|| total_overflow(&entry.employee_id))?;
                    Ok((entry, total))
                });
                match outcome {
                    Ok((entry, total)) => {
                        total_amount = total;
                        built.push(entry);
                    }
                    Err(error) => {
                        warn!(
                            period_id = %period.id,
                            employee_id = %employee.id,
                            error = %error,
                            "Skipped employee during payroll generation"
                        );
                        skipped.push(SkippedEmployee {
                            employee_id: employee.id.clone(),
                            error,
                        });
                    }
                }
            }

            let replaced = self.repository.remove_entries_for(&period.id).len();
            period.total_employees = u32::try_from(built.len()).unwrap_or(u32::MAX);
            period.total_amount = total_amount;
            for entry in built {
                self.repository.save_entry(entry);
            }

            period.generated_at = Some(Utc::now());
            period.touch();
            self.repository.save_period(period.clone());

            info!(
                period_id = %period.id,
                month = period.month,
                year = period.year,
                generated = period.total_employees,
                skipped = skipped.len(),
                replaced,
                "Generated payroll entries"
            );

            Ok(GenerationReport {
                entries: self.repository.entries_for(&period.id),
                period,
                skipped,
            })
        })
    }

    /// Applies `patch` to an entry and recalculates it.
    ///
    /// The owning period's totals are recomputed. A patch that makes the
    /// calculation or the period total fail leaves the entry unchanged.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the entry does not exist
    /// - [`EngineError::InvalidState`] unless the owning period is DRAFT
    /// - [`EngineError::InvalidAttendanceData`] or
    ///   [`EngineError::InvalidSalaryInput`] if the patched values are invalid
    pub fn update_entry(&self, entry_id: &str, patch: EntryPatch) -> EngineResult<PayrollEntry> {
        let payroll_id = self.repository.get_entry(entry_id)?.payroll_id;

        self.locks.with_lock(&payroll_id, || {
            let mut entry = self.repository.get_entry(entry_id)?;
            let mut period = self.repository.get_period(&payroll_id)?;
            period.ensure_status(PayrollStatus::Draft, "update entries of")?;

            patch.apply_to(&mut entry);
            recalculate(&mut entry)?;
            let total_amount = self.total_with(&period.id, &entry)?;
            self.repository.save_entry(entry.clone());

            period.total_amount = total_amount;
            period.touch();
            self.repository.save_period(period);

            info!(
                entry_id = %entry.id,
                period_id = %payroll_id,
                employee_id = %entry.employee_id,
                "Updated payroll entry"
            );
            Ok(entry)
        })
    }

    /// Moves a DRAFT period to PENDING_APPROVAL.
    pub fn submit(&self, period_id: &str) -> EngineResult<PayrollPeriod> {
        self.locks.with_lock(period_id, || {
            let mut period = self.repository.get_period(period_id)?;
            period.ensure_status(PayrollStatus::Draft, "submit")?;

            period.status = PayrollStatus::PendingApproval;
            period.submitted_at = Some(Utc::now());
            period.touch();
            self.repository.save_period(period.clone());

            log_transition(&period);
            Ok(period)
        })
    }

    /// Approves a PENDING_APPROVAL period.
    ///
    /// Every entry becomes APPROVED and receives a payslip.
    pub fn approve(
        &self,
        period_id: &str,
        admin_id: &str,
        admin_notes: Option<String>,
    ) -> EngineResult<PayrollPeriod> {
        self.locks.with_lock(period_id, || {
            let mut period = self.repository.get_period(period_id)?;
            period.ensure_status(PayrollStatus::PendingApproval, "approve")?;

            let now = Utc::now();
            period.status = PayrollStatus::Approved;
            period.approved_by = Some(admin_id.to_string());
            period.admin_notes = admin_notes;
            period.approved_at = Some(now);
            period.touch();

            let entries = self.repository.entries_for(&period.id);
            for mut entry in entries.iter().cloned() {
                entry.status = EntryStatus::Approved;
                entry.updated_at = now;
                self.issuer.issue(&entry, &period);
                self.repository.save_entry(entry);
            }
            self.repository.save_period(period.clone());

            log_transition(&period);
            info!(
                period_id = %period.id,
                payslips = entries.len(),
                "Issued payslips"
            );
            Ok(period)
        })
    }

    /// Rejects a PENDING_APPROVAL period. Entries keep their status and no
    /// payslips are issued.
    pub fn reject(
        &self,
        period_id: &str,
        admin_id: &str,
        reason: Option<String>,
    ) -> EngineResult<PayrollPeriod> {
        self.locks.with_lock(period_id, || {
            let mut period = self.repository.get_period(period_id)?;
            period.ensure_status(PayrollStatus::PendingApproval, "reject")?;

            period.status = PayrollStatus::Rejected;
            period.approved_by = Some(admin_id.to_string());
            period.rejection_reason = reason;
            period.rejected_at = Some(Utc::now());
            period.touch();
            self.repository.save_period(period.clone());

            log_transition(&period);
            Ok(period)
        })
    }

    /// Deletes a period in any state, together with its entries and the
    /// payslips issued from them.
    pub fn delete(&self, period_id: &str) -> EngineResult<()> {
        self.locks.with_lock(period_id, || {
            let period = self.repository.get_period(period_id)?;
            let key = period.key();

            let entries = self.repository.remove_entries_for(&period.id);
            let payslips = entries
                .iter()
                .filter_map(|e| self.repository.remove_payslip(&e.employee_id, key))
                .count();
            self.repository.remove_period(&period.id);

            info!(
                period_id = %period.id,
                month = period.month,
                year = period.year,
                status = %period.status,
                entries = entries.len(),
                payslips,
                "Deleted payroll period"
            );
            Ok(())
        })?;
        self.locks.forget(period_id);
        Ok(())
    }

    // -- Queries ---------------------------------------------------------------

    /// A period by id.
    pub fn get_period(&self, period_id: &str) -> EngineResult<PayrollPeriod> {
        self.repository.get_period(period_id)
    }

    /// All periods, newest first.
    pub fn list_periods(&self) -> Vec<PayrollPeriod> {
        self.repository.list_periods()
    }

    /// The entries of a period, ordered by employee id.
    pub fn list_entries(&self, period_id: &str) -> EngineResult<Vec<PayrollEntry>> {
        self.repository.get_period(period_id)?;
        Ok(self.repository.entries_for(period_id))
    }

    /// An entry by id.
    pub fn get_entry(&self, entry_id: &str) -> EngineResult<PayrollEntry> {
        self.repository.get_entry(entry_id)
    }

    /// The payslip of an employee for `month`/`year`.
    pub fn get_payslip(&self, employee_id: &str, month: u32, year: i32) -> EngineResult<Payslip> {
        self.issuer.get(employee_id, PeriodKey::new(month, year)?)
    }

    /// An employee's payslips, newest first.
    pub fn list_payslips(&self, employee_id: &str) -> Vec<Payslip> {
        self.issuer.list(employee_id)
    }

    // -- Internals -------------------------------------------------------------

    fn build_entry(
        &self,
        period: &PayrollPeriod,
        employee: &Employee,
        as_of: NaiveDate,
    ) -> EngineResult<PayrollEntry> {
        let structure = self
            .structures
            .resolve(&employee.id, as_of)
            .map_err(|error| match error {
                EngineError::NotFound { .. } => EngineError::MissingSalaryStructure {
                    employee_id: employee.id.clone(),
                    date: as_of,
                },
                other => other,
            })?;
        let facts = self.attendance.facts(&employee.id, period.key())?;

        let mut entry = PayrollEntry {
            id: uuid::Uuid::new_v4().to_string(),
            payroll_id: period.id.clone(),
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            basic_salary: structure.basic_salary,
            allowances: structure.allowances,
            tax_percentage: structure.tax_percentage,
            pf_percentage: structure.pf_percentage,
            deductions: BTreeMap::new(),
            gross_salary: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            working_days: facts.working_days,
            present_days: facts.present_days,
            paid_leaves: facts.paid_leaves,
            unpaid_leaves: facts.unpaid_leaves,
            overtime_hours: facts.overtime_hours,
            penalties: Decimal::ZERO,
            notes: None,
            status: EntryStatus::Generated,
            updated_at: Utc::now(),
        };
        recalculate(&mut entry)?;

        debug!(
            period_id = %period.id,
            employee_id = %entry.employee_id,
            structure_id = %structure.id,
            net_salary = %entry.net_salary,
            "Calculated payroll entry"
        );
        Ok(entry)
    }

    /// Sum of net salaries for the period with `entry` in place of its stored version.
    fn total_with(&self, period_id: &str, entry: &PayrollEntry) -> EngineResult<Decimal> {
        self.repository
            .entries_for(period_id)
            .iter()
            .map(|e| if e.id == entry.id { entry.net_salary } else { e.net_salary })
            .try_fold(Decimal::ZERO, |acc, net| acc.checked_add(net))
            .ok_or_else(|| total_overflow(&entry.employee_id))
    }
}

fn total_overflow(employee_id: &str) -> EngineError {
    EngineError::InvalidSalaryInput {
        field: "total_amount".to_string(),
        message: format!(
            "period total would exceed the decimal range with {}'s net salary",
            employee_id
        ),
    }
}

/// Re-runs the salary calculation over the entry's current inputs.
fn recalculate(entry: &mut PayrollEntry) -> EngineResult<()> {
    let breakdown = calculate_salary(&SalaryInputs {
        employee_id: &entry.employee_id,
        basic_salary: entry.basic_salary,
        allowances: &entry.allowances,
        tax_percentage: entry.tax_percentage,
        pf_percentage: entry.pf_percentage,
        working_days: entry.working_days,
        unpaid_leaves: entry.unpaid_leaves,
        penalties: entry.penalties,
    })?;

    entry.gross_salary = breakdown.gross_salary;
    entry.net_salary = breakdown.net_salary;
    entry.deductions = breakdown.deductions;
    entry.updated_at = Utc::now();
    Ok(())
}

fn log_transition(period: &PayrollPeriod) {
    info!(
        period_id = %period.id,
        month = period.month,
        year = period.year,
        status = %period.status,
        version = period.version,
        "Payroll status changed"
    );
}
