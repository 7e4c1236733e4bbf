//! Payroll workflow orchestration.
//!
//! [`PayrollWorkflow`] owns the period lifecycle and ties together the
//! salary structure store, the calculator, the repository, and the
//! [`PayslipIssuer`].

mod payroll;
mod payslip_issuer;

pub use payroll::{GenerationReport, PayrollWorkflow, SkippedEmployee};
pub use payslip_issuer::PayslipIssuer;
