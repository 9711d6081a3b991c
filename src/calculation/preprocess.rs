//! Tranche preprocessing.
//!
//! Converts loosely typed [`TrancheRecord`] rows into [`FinancingTranche`]s:
//! dates are parsed from date or timestamp strings, salaries are coerced to
//! decimals (falling back to the snapshot's monthly value), and tranches of
//! inactive contracts are clamped to the real termination date. Rows that
//! cannot be used are reported as [`SkippedRecord`]s instead of aborting the
//! batch.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ContractInfo, FinancingTranche, Placement, SkipStage, SkippedRecord, TrancheDimensions,
    TrancheRecord, parse_date_prefix,
};

const UNKNOWN_ID: &str = "<unknown>";

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTranches {
    /// Usable tranches, in input order.
    pub tranches: Vec<FinancingTranche>,
    /// Rows that were rejected, in input order.
    pub skipped: Vec<SkippedRecord>,
}

/// Normalizes a batch of raw tranche rows.
///
/// Each row is converted with [`normalize_record`]. Failures are collected as
/// skip diagnostics and never abort the batch.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::normalize;
/// use payroll_engine::models::TrancheRecord;
///
/// let rows: Vec<TrancheRecord> = serde_json::from_str(r#"[
///     {"id": "F-1", "employee_id": "100", "start_date": "2025-01-01",
///      "end_date": "2025-03-31", "base_salary": 3000000},
///     {"id": "F-2", "employee_id": "200", "start_date": "not a date",
///      "end_date": "2025-03-31", "base_salary": 3000000}
/// ]"#).unwrap();
///
/// let result = normalize(&rows);
/// assert_eq!(result.tranches.len(), 1);
/// assert_eq!(result.skipped.len(), 1);
/// assert_eq!(result.skipped[0].tranche_id.as_deref(), Some("F-2"));
/// ```
pub fn normalize(records: &[TrancheRecord]) -> NormalizedTranches {
    let mut result = NormalizedTranches::default();

    for record in records {
        match normalize_record(record) {
            Ok(tranche) => result.tranches.push(tranche),
            Err(err) => {
                debug!(
                    tranche_id = record.id.as_deref().unwrap_or(UNKNOWN_ID),
                    error = %err,
                    "Skipping tranche record"
                );
                result.skipped.push(SkippedRecord {
                    tranche_id: record.id.clone(),
                    employee_id: record.employee_id.clone(),
                    stage: SkipStage::Preprocess,
                    reason: err.to_string(),
                });
            }
        }
    }

    result
}

/// Converts one raw row into a typed tranche.
///
/// # Returns
///
/// Returns the tranche, or `InvalidTranche` when:
/// - The start or end date is missing or unparseable
/// - The salary is not numeric, or is negative
/// - The start date falls after the (possibly clamped) end date
///
/// A missing or zero salary is replaced by the row's monthly value when one
/// is present. A salary that is present but not numeric rejects the row
/// even when the monthly value is usable. A missing or non-numeric risk rate counts as zero. When the
/// contract is not active and has a real termination date before the end
/// date, the end date is moved back to the termination date.
pub fn normalize_record(record: &TrancheRecord) -> EngineResult<FinancingTranche> {
    let tranche_id = record.id.clone().unwrap_or_else(|| UNKNOWN_ID.to_string());
    let invalid = |message: String| EngineError::InvalidTranche {
        tranche_id: tranche_id.clone(),
        message,
    };

    let start_date = required_date(record.start_date.as_deref(), "start date").map_err(invalid)?;
    let end_date = required_date(record.end_date.as_deref(), "end date").map_err(invalid)?;

    let salary = parse_amount(record.base_salary.as_ref())
        .map_err(|raw| invalid(format!("non-numeric base salary {}", raw)))?;
    let salary = match salary {
        Some(value) if !value.is_zero() => value,
        _ => parse_amount(record.monthly_value.as_ref())
            .ok()
            .flatten()
            .or(salary)
            .unwrap_or(Decimal::ZERO),
    };
    if salary < Decimal::ZERO {
        return Err(invalid(format!("negative base salary {}", salary)));
    }

    let risk_rate = parse_amount(record.risk_rate.as_ref())
        .ok()
        .flatten()
        .unwrap_or(Decimal::ZERO);

    let contract = ContractInfo {
        contract_id: record.contract_id.clone(),
        contract_status: record.contract_status.clone(),
        actual_termination_date: record
            .actual_termination_date
            .as_deref()
            .and_then(parse_date_prefix),
        hire_date: record.hire_date.as_deref().and_then(parse_date_prefix),
    };

    let end_date = match contract.actual_termination_date {
        Some(termination) if !contract.is_active() && termination < end_date => termination,
        _ => end_date,
    };

    if start_date > end_date {
        return Err(invalid(format!(
            "start date {} is after end date {}",
            start_date, end_date
        )));
    }

    Ok(FinancingTranche {
        id: tranche_id.clone(),
        employee_id: record.employee_id.clone().unwrap_or_default(),
        employee_name: record.employee_name.clone(),
        start_date,
        end_date,
        base_salary: salary,
        position: record.position.clone(),
        job_title: record.job_title.clone(),
        band: record.band.clone(),
        family: record.family.clone(),
        risk_rate,
        dimensions: TrancheDimensions {
            project_code: record.project_code.clone(),
            project_name: record.project_name.clone(),
            funding_source: record.funding_source.clone(),
            component: record.component.clone(),
            subcomponent: record.subcomponent.clone(),
            category: record.category.clone(),
            responsible: record.responsible.clone(),
            budget_line: record.budget_line.clone(),
            ..TrancheDimensions::default()
        },
        placement: Placement {
            direction: record.direction.clone(),
            management: record.management.clone(),
            plant: record.plant.clone(),
            funding_base: record.funding_base.clone(),
            plant_type: record.plant_type.clone(),
        },
        contract,
    })
}

fn required_date(value: Option<&str>, field: &str) -> Result<NaiveDate, String> {
    match value {
        None => Err(format!("missing {}", field)),
        Some(raw) => parse_date_prefix(raw).ok_or_else(|| format!("invalid {} '{}'", field, raw)),
    }
}

/// Coerces a JSON number or numeric string into a decimal.
///
/// Returns `Ok(None)` for absent, null or blank values and `Err` with the raw
/// text for anything that is present but not numeric.
fn parse_amount(value: Option<&Value>) -> Result<Option<Decimal>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => parse_decimal(&n.to_string())
            .map(Some)
            .ok_or_else(|| n.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_decimal(s.trim())
            .map(Some)
            .ok_or_else(|| format!("'{}'", s)),
        Some(other) => Err(other.to_string()),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
