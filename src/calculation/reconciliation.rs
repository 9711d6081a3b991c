//! Projected-versus-paid reconciliation.
//!
//! Compares one month of projected accruals against the payroll actually
//! paid, per employee and financing dimensions.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::EngineResult;
use crate::models::{
    MonthlyDetail, PaidPayrollLine, ReconciliationLine, ReconciliationOutcome, StatutoryTable,
    TrancheRecord, parse_period,
};

use super::pipeline::accrue_records;

/// Name shown when neither side knows the employee's name.
pub const UNNAMED_EMPLOYEE: &str = "Sin nombre";

type ReconciliationKey = [String; 7];

/// Reconciles projected details against paid payroll lines.
///
/// Lines are keyed by employee and the six financing dimensions, all
/// trimmed. Projected amounts sum into `budgeted` and paid amounts into
/// `paid`; a paid line with no projected counterpart gets a zero budget.
/// Output keeps first-seen order, projected lines first.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::reconcile;
/// use payroll_engine::models::PaidPayrollLine;
/// use rust_decimal::Decimal;
///
/// let paid = vec![PaidPayrollLine {
///     employee_id: "100".to_string(),
///     amount: Decimal::from(500_000),
///     ..PaidPayrollLine::default()
/// }];
///
/// let lines = reconcile(&[], &paid);
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].budgeted, Decimal::ZERO);
/// assert_eq!(lines[0].gap, Decimal::from(500_000));
/// assert_eq!(lines[0].compliance, Decimal::ZERO);
/// ```
pub fn reconcile(projected: &[MonthlyDetail], paid: &[PaidPayrollLine]) -> Vec<ReconciliationLine> {
    let mut lines: Vec<ReconciliationLine> = Vec::new();
    let mut index: HashMap<ReconciliationKey, usize> = HashMap::new();

    for detail in projected {
        let d = &detail.dimensions;
        let key = make_key(
            &detail.employee_id,
            [
                d.project_code.as_deref(),
                d.funding_source.as_deref(),
                d.component.as_deref(),
                d.subcomponent.as_deref(),
                d.category.as_deref(),
                d.responsible.as_deref(),
            ],
        );
        let name = display_name(detail.employee_name.as_deref(), &key[0]);

        let position = *index.entry(key.clone()).or_insert_with(|| {
            lines.push(empty_line(key, name));
            lines.len() - 1
        });
        lines[position].budgeted += detail.total_value;
    }

    for line in paid {
        let key = make_key(
            &line.employee_id,
            [
                line.project_code.as_deref(),
                line.funding_source.as_deref(),
                line.component.as_deref(),
                line.subcomponent.as_deref(),
                line.category.as_deref(),
                line.responsible.as_deref(),
            ],
        );
        let name = display_name(line.employee_name.as_deref(), &key[0]);

        let position = match index.get(&key) {
            Some(&position) => position,
            None => {
                index.insert(key.clone(), lines.len());
                lines.push(empty_line(key, name.clone()));
                lines.len() - 1
            }
        };

        let entry = &mut lines[position];
        entry.paid += line.amount;
        if is_placeholder(&entry.employee_name, &entry.employee_id)
            && !is_placeholder(&name, &entry.employee_id)
        {
            entry.employee_name = name;
        }
    }

    for line in &mut lines {
        line.gap = line.paid - line.budgeted;
        line.compliance = compliance(line.budgeted, line.paid);
    }

    lines
}

/// Runs the pipeline for `period` (`YYYY-MM`) and reconciles that month.
///
/// # Returns
///
/// Returns the reconciliation, or `InvalidPeriod` when `period` is not a
/// valid `YYYY-MM` month.
pub fn reconcile_period(
    records: &[TrancheRecord],
    table: &StatutoryTable,
    period: &str,
    paid: &[PaidPayrollLine],
) -> EngineResult<ReconciliationOutcome> {
    let month = parse_period(period)?;
    let accrual = accrue_records(records, table);

    let projected = accrual
        .month(month)
        .map(|m| m.details.as_slice())
        .unwrap_or_default();

    Ok(ReconciliationOutcome {
        period: month,
        lines: reconcile(projected, paid),
        skipped: accrual.skipped,
        missing_statutory_years: accrual.missing_statutory_years,
    })
}

fn make_key(employee_id: &str, dimensions: [Option<&str>; 6]) -> ReconciliationKey {
    let [project, source, component, subcomponent, category, responsible] =
        dimensions.map(|value| value.unwrap_or_default().trim().to_string());
    [
        employee_id.trim().to_string(),
        project,
        source,
        component,
        subcomponent,
        category,
        responsible,
    ]
}

fn empty_line(key: ReconciliationKey, employee_name: String) -> ReconciliationLine {
    let [employee_id, project_code, funding_source, component, subcomponent, category, responsible] =
        key;
    ReconciliationLine {
        employee_id,
        employee_name,
        project_code,
        funding_source,
        component,
        subcomponent,
        category,
        responsible,
        budgeted: Decimal::ZERO,
        paid: Decimal::ZERO,
        gap: Decimal::ZERO,
        compliance: Decimal::ZERO,
    }
}

fn display_name(name: Option<&str>, employee_id: &str) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .or(Some(employee_id).filter(|id| !id.is_empty()))
        .unwrap_or(UNNAMED_EMPLOYEE)
        .to_string()
}

fn is_placeholder(name: &str, employee_id: &str) -> bool {
    name.is_empty() || name == UNNAMED_EMPLOYEE || name == employee_id
}

fn compliance(budgeted: Decimal, paid: Decimal) -> Decimal {
    if budgeted > Decimal::ZERO {
        (paid / budgeted * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    }
}
