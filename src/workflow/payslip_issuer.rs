use tracing::debug;

use crate::error::EngineResult;
use crate::models::{PayrollEntry, PayrollPeriod, Payslip, PeriodKey};
use crate::store::PayrollRepository;

/// Issues payslips from approved entries.
///
/// Issuance upserts by (employee, month, year), so approving the same
/// entries twice leaves one payslip per employee with a stable id.
#[derive(Debug, Clone)]
pub struct PayslipIssuer {
    repository: PayrollRepository,
}

impl PayslipIssuer {
    /// Creates an issuer writing to `repository`.
    pub fn new(repository: PayrollRepository) -> Self {
        Self { repository }
    }

    /// Snapshots `entry` into the payslip for its employee and period.
    pub fn issue(&self, entry: &PayrollEntry, period: &PayrollPeriod) -> Payslip {
        let payslip = self.repository.upsert_payslip(Payslip::from_entry(entry, period));
        debug!(
            payslip_id = %payslip.id,
            employee_id = %payslip.employee_id,
            period = %period.key(),
            "Issued payslip"
        );
        payslip
    }

    /// The payslip for an employee and period.
    pub fn get(&self, employee_id: &str, period: PeriodKey) -> EngineResult<Payslip> {
        self.repository.get_payslip(employee_id, period)
    }

    /// An employee's payslips, newest first.
    pub fn list(&self, employee_id: &str) -> Vec<Payslip> {
        self.repository.payslips_for_employee(employee_id)
    }
}
