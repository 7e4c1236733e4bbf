//! Request types for the payroll API.
//!
//! This module defines the JSON request bodies and query strings accepted by
//! the `/payroll` endpoints.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::SalaryStructure;

/// Request body for `POST /payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayrollRequest {
    /// The calendar month (1-12).
    pub month: u32,
    /// The calendar year.
    pub year: i32,
    /// Optional HR notes for the period.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for `POST /payroll/:id/approve`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApproveRequest {
    /// Optional admin notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for `POST /payroll/:id/reject`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectRequest {
    /// Why the period was rejected.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request body for `POST /payroll/salary-structure`.
///
/// Omitted percentages fall back to zero tax and the configured default PF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryStructureRequest {
    /// Replaces the structure with this id when present.
    #[serde(default)]
    pub id: Option<String>,
    /// The employee the structure applies to.
    pub employee_id: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components.
    #[serde(default)]
    pub allowances: BTreeMap<String, Decimal>,
    /// Flat tax percentage.
    #[serde(default)]
    pub tax_percentage: Option<Decimal>,
    /// Provident fund percentage.
    #[serde(default)]
    pub pf_percentage: Option<Decimal>,
    /// First day the structure applies.
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    /// Last day the structure applies; open-ended when absent.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl SalaryStructureRequest {
    /// Builds the domain structure, stamped with the acting user.
    pub fn into_structure(
        self,
        created_by: &str,
        default_pf_percentage: Decimal,
    ) -> EngineResult<SalaryStructure> {
        let effective_from =
            self.effective_from
                .ok_or_else(|| EngineError::InvalidSalaryStructure {
                    field: "effective_from".to_string(),
                    message: "is required".to_string(),
                })?;

        let mut structure = SalaryStructure::new(self.employee_id, self.basic_salary, effective_from);
        if let Some(id) = self.id {
            structure.id = id;
        }
        structure.allowances = self.allowances;
        structure.tax_percentage = self.tax_percentage.unwrap_or(Decimal::ZERO);
        structure.pf_percentage = self.pf_percentage.unwrap_or(default_pf_percentage);
        structure.effective_to = self.effective_to;
        structure.created_by = Some(created_by.to_string());
        Ok(structure)
    }
}

/// Query string for `GET /payroll/salary-structure/:employee_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AsOfQuery {
    /// Resolution date; today when absent.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl AsOfQuery {
    /// The requested date, or today's UTC date.
    pub fn date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}
