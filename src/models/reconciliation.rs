//! Projected-versus-paid reconciliation models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::SkippedRecord;
use super::tranche::loose_string;

/// An amount actually paid through payroll, grouped by employee and
/// financing dimensions.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PaidPayrollLine;
///
/// let json = r#"{
///     "cedula": "1020304050",
///     "nombre": "Ana Pérez",
///     "cod_proyecto": "P-001",
///     "real_pagado": "4681300"
/// }"#;
/// let line: PaidPayrollLine = serde_json::from_str(json).unwrap();
/// assert_eq!(line.project_code.as_deref(), Some("P-001"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaidPayrollLine {
    /// Employee identity document.
    #[serde(alias = "cedula", alias = "cod_emp", deserialize_with = "loose_text")]
    pub employee_id: String,
    /// Employee display name.
    #[serde(alias = "nombre", deserialize_with = "loose_string")]
    pub employee_name: Option<String>,
    /// Project code.
    #[serde(alias = "cod_proyecto", alias = "id_proyecto", deserialize_with = "loose_string")]
    pub project_code: Option<String>,
    /// Funding source code.
    #[serde(alias = "cod_fuente", alias = "id_fuente", deserialize_with = "loose_string")]
    pub funding_source: Option<String>,
    /// Component code.
    #[serde(alias = "cod_componente", alias = "id_componente", deserialize_with = "loose_string")]
    pub component: Option<String>,
    /// Subcomponent code.
    #[serde(
        alias = "cod_subcomponente",
        alias = "id_subcomponente",
        deserialize_with = "loose_string"
    )]
    pub subcomponent: Option<String>,
    /// Category code.
    #[serde(alias = "cod_categoria", alias = "id_categoria", deserialize_with = "loose_string")]
    pub category: Option<String>,
    /// Responsible code.
    #[serde(alias = "cod_responsable", alias = "id_responsable", deserialize_with = "loose_string")]
    pub responsible: Option<String>,
    /// Amount paid.
    #[serde(alias = "real_pagado")]
    pub amount: Decimal,
}

fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_string(deserializer)?.unwrap_or_default())
}

/// Budgeted and paid amounts for one employee and dimension combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationLine {
    /// Employee identity document.
    pub employee_id: String,
    /// Best known display name.
    pub employee_name: String,
    /// Project code.
    pub project_code: String,
    /// Funding source code.
    pub funding_source: String,
    /// Component code.
    pub component: String,
    /// Subcomponent code.
    pub subcomponent: String,
    /// Category code.
    pub category: String,
    /// Responsible code.
    pub responsible: String,
    /// Projected cost for the month.
    pub budgeted: Decimal,
    /// Amount actually paid.
    pub paid: Decimal,
    /// `paid - budgeted`.
    pub gap: Decimal,
    /// `paid / budgeted * 100`, two decimals; zero when nothing was budgeted.
    pub compliance: Decimal,
}

/// Reconciliation of one month together with the diagnostics of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// First day of the reconciled month.
    pub period: NaiveDate,
    /// One line per employee and dimension combination, first-seen order.
    pub lines: Vec<ReconciliationLine>,
    /// Records skipped by the preprocessor or the engine.
    pub skipped: Vec<SkippedRecord>,
    /// Years accrued without statutory parameters.
    pub missing_statutory_years: Vec<i32>,
}

impl ReconciliationOutcome {
    /// Returns the total budgeted across all lines.
    pub fn total_budgeted(&self) -> Decimal {
        self.lines.iter().map(|l| l.budgeted).sum()
    }

    /// Returns the total paid across all lines.
    pub fn total_paid(&self) -> Decimal {
        self.lines.iter().map(|l| l.paid).sum()
    }
}
