//! Persistence for payroll periods, entries, and payslips.
//!
//! Uniqueness rules are enforced at write time:
//! - one period per (month, year)
//! - one entry per (period, employee)
//! - one payslip per (employee, month, year)

use std::cmp::Reverse;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollEntry, PayrollPeriod, Payslip, PeriodKey};

use super::memory::Table;

type PayslipKey = (String, PeriodKey);

/// In-memory repository for the payroll workflow's records.
#[derive(Debug, Clone, Default)]
pub struct PayrollRepository {
    periods: Table<String, PayrollPeriod>,
    entries: Table<String, PayrollEntry>,
    payslips: Table<PayslipKey, Payslip>,
}

impl PayrollRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Periods ---------------------------------------------------------------

    /// Inserts a new period.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicatePeriod`] if a period already exists for the
    /// same (month, year). The check and insert are atomic.
    pub fn insert_period(&self, period: PayrollPeriod) -> EngineResult<()> {
        let key = period.key();
        self.periods
            .insert_unique(period.id.clone(), period, |p| p.key() == key)
            .map_err(|existing| EngineError::DuplicatePeriod {
                month: existing.month,
                year: existing.year,
            })
    }

    /// Fetches a period by id.
    pub fn get_period(&self, id: &str) -> EngineResult<PayrollPeriod> {
        self.periods
            .get(&id.to_string())
            .ok_or_else(|| EngineError::not_found("Payroll", id))
    }

    /// Overwrites a stored period.
    pub fn save_period(&self, period: PayrollPeriod) {
        self.periods.insert(period.id.clone(), period);
    }

    /// All periods, newest (year, month) first.
    pub fn list_periods(&self) -> Vec<PayrollPeriod> {
        let mut periods = self.periods.list();
        periods.sort_by_key(|p| Reverse(p.key()));
        periods
    }

    /// Removes a period, returning it if it existed.
    pub fn remove_period(&self, id: &str) -> Option<PayrollPeriod> {
        self.periods.remove(&id.to_string())
    }

    // -- Entries ---------------------------------------------------------------

    /// Stores an entry, replacing any other entry for the same (period, employee).
    pub fn save_entry(&self, entry: PayrollEntry) {
        let payroll_id = entry.payroll_id.clone();
        let employee_id = entry.employee_id.clone();
        self.entries.upsert_by(entry.id.clone(), entry, |e| {
            e.payroll_id == payroll_id && e.employee_id == employee_id
        });
    }

    /// Fetches an entry by id.
    pub fn get_entry(&self, id: &str) -> EngineResult<PayrollEntry> {
        self.entries
            .get(&id.to_string())
            .ok_or_else(|| EngineError::not_found("PayrollEntry", id))
    }

    /// All entries of a period, ordered by employee id.
    pub fn entries_for(&self, payroll_id: &str) -> Vec<PayrollEntry> {
        let mut entries = self.entries.filter(|e| e.payroll_id == payroll_id);
        entries.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        entries
    }

    /// Removes every entry of a period, returning them.
    pub fn remove_entries_for(&self, payroll_id: &str) -> Vec<PayrollEntry> {
        self.entries.remove_where(|e| e.payroll_id == payroll_id)
    }

    // -- Payslips --------------------------------------------------------------

    /// Stores a payslip keyed by (employee, month, year).
    ///
    /// If a payslip already exists for the key, its id is kept and its
    /// snapshot replaced, so repeated issuance never creates duplicates.
    pub fn upsert_payslip(&self, mut payslip: Payslip) -> Payslip {
        let key = payslip.key();
        if let Some(existing) = self.payslips.get(&key) {
            payslip.id = existing.id;
        }
        self.payslips.insert(key, payslip.clone());
        payslip
    }

    /// Fetches the payslip for an employee and period.
    pub fn get_payslip(&self, employee_id: &str, period: PeriodKey) -> EngineResult<Payslip> {
        self.payslips
            .get(&(employee_id.to_string(), period))
            .ok_or_else(|| EngineError::not_found("Payslip", format!("{} for {}", employee_id, period)))
    }

    /// All payslips of an employee, newest first.
    pub fn payslips_for_employee(&self, employee_id: &str) -> Vec<Payslip> {
        let mut payslips = self.payslips.filter(|p| p.employee_id == employee_id);
        payslips.sort_by_key(|p| Reverse(PeriodKey { month: p.month, year: p.year }));
        payslips
    }

    /// Removes the payslip for an employee and period, if any.
    pub fn remove_payslip(&self, employee_id: &str, period: PeriodKey) -> Option<Payslip> {
        self.payslips.remove(&(employee_id.to_string(), period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryStatus, PayrollStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn period(month: u32, year: i32) -> PayrollPeriod {
        PayrollPeriod::new(PeriodKey::new(month, year).unwrap(), "hr_1", None)
    }

    fn entry(id: &str, payroll_id: &str, employee_id: &str) -> PayrollEntry {
        PayrollEntry {
            id: id.to_string(),
            payroll_id: payroll_id.to_string(),
            employee_id: employee_id.to_string(),
            employee_name: String::new(),
            basic_salary: Decimal::new(1000, 0),
            allowances: BTreeMap::new(),
            tax_percentage: Decimal::ZERO,
            pf_percentage: Decimal::ZERO,
            deductions: BTreeMap::new(),
            gross_salary: Decimal::new(1000, 0),
            net_salary: Decimal::new(1000, 0),
            working_days: 22,
            present_days: 22,
            paid_leaves: 0,
            unpaid_leaves: 0,
            overtime_hours: Decimal::ZERO,
            penalties: Decimal::ZERO,
            notes: None,
            status: EntryStatus::Generated,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_duplicate_period_is_rejected() {
        let repo = PayrollRepository::new();
        repo.insert_period(period(1, 2026)).unwrap();
        assert!(matches!(
            repo.insert_period(period(1, 2026)),
            Err(EngineError::DuplicatePeriod { month: 1, year: 2026 })
        ));
        repo.insert_period(period(2, 2026)).unwrap();
        assert_eq!(repo.list_periods().len(), 2);
    }

    #[test]
    fn test_list_periods_newest_first() {
        let repo = PayrollRepository::new();
        repo.insert_period(period(11, 2025)).unwrap();
        repo.insert_period(period(2, 2026)).unwrap();
        repo.insert_period(period(1, 2026)).unwrap();

        let keys: Vec<(u32, i32)> = repo
            .list_periods()
            .iter()
            .map(|p| (p.month, p.year))
            .collect();
        assert_eq!(keys, vec![(2, 2026), (1, 2026), (11, 2025)]);
    }

    #[test]
    fn test_get_missing_period_is_not_found() {
        let repo = PayrollRepository::new();
        assert!(matches!(
            repo.get_period("nope"),
            Err(EngineError::NotFound { entity: "Payroll", .. })
        ));
    }

    #[test]
    fn test_save_entry_keeps_one_per_employee() {
        let repo = PayrollRepository::new();
        repo.save_entry(entry("e1", "p1", "emp_001"));
        repo.save_entry(entry("e2", "p1", "emp_001"));
        repo.save_entry(entry("e3", "p2", "emp_001"));

        let p1 = repo.entries_for("p1");
        assert_eq!(p1.len(), 1);
        assert_eq!(p1[0].id, "e2");
        assert_eq!(repo.entries_for("p2").len(), 1);
    }

    #[test]
    fn test_upsert_payslip_keeps_first_id() {
        let repo = PayrollRepository::new();
        let mut p = period(1, 2026);
        p.status = PayrollStatus::Approved;
        let e = entry("e1", &p.id, "emp_001");

        let first = repo.upsert_payslip(Payslip::from_entry(&e, &p));
        let second = repo.upsert_payslip(Payslip::from_entry(&e, &p));

        assert_eq!(first.id, second.id);
        assert_eq!(repo.payslips_for_employee("emp_001").len(), 1);
    }

    #[test]
    fn test_payslips_for_employee_newest_first() {
        let repo = PayrollRepository::new();
        for (m, y) in [(12, 2025), (2, 2026), (1, 2026)] {
            let p = period(m, y);
            repo.upsert_payslip(Payslip::from_entry(&entry("e", &p.id, "emp_001"), &p));
        }
        let months: Vec<u32> = repo
            .payslips_for_employee("emp_001")
            .iter()
            .map(|p| p.month)
            .collect();
        assert_eq!(months, vec![2, 1, 12]);
    }
}
