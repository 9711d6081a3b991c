//! Yearly projection models.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MonthlyAggregate, SkippedRecord};

/// One row of the project matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    /// Project code, or `SIN_PROYECTO` for unassigned tranches.
    pub project_code: String,
    /// Project display name (falls back to the code).
    pub project_name: String,
    /// `"<code> - <name>"`.
    pub label: String,
    /// Cost accrued to the project in the year.
    pub total: Decimal,
    /// Cost per month, January first.
    pub monthly: [Decimal; 12],
    /// Distinct employees financed by the project in the year.
    pub headcount: usize,
}

/// Cost and headcount of one year, grouped along several dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// The projected year.
    pub year: i32,
    /// Total cost accrued in the year.
    pub total: Decimal,
    /// Distinct employees financed in the year.
    pub headcount: usize,
    /// Cost per organizational direction.
    pub cost_by_direction: BTreeMap<String, Decimal>,
    /// Distinct employees per funding base.
    pub headcount_by_funding_base: BTreeMap<String, usize>,
    /// Distinct employees per organizational direction.
    pub headcount_by_direction: BTreeMap<String, usize>,
    /// Per-project totals in first-seen order.
    pub project_matrix: Vec<ProjectRow>,
    /// The underlying monthly aggregates, every year included.
    pub months: Vec<MonthlyAggregate>,
}

impl YearlyProjection {
    /// Sorts the project matrix by total, largest first.
    ///
    /// Ties keep their first-seen order.
    pub fn sort_projects_by_total(&mut self) {
        self.project_matrix.sort_by(|a, b| b.total.cmp(&a.total));
    }
}

/// A yearly projection together with the diagnostics of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOutcome {
    /// The aggregated projection.
    pub projection: YearlyProjection,
    /// Records skipped by the preprocessor or the engine.
    pub skipped: Vec<SkippedRecord>,
    /// Years accrued without statutory parameters.
    pub missing_statutory_years: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, total: i64) -> ProjectRow {
        ProjectRow {
            project_code: code.to_string(),
            project_name: code.to_string(),
            label: format!("{} - {}", code, code),
            total: Decimal::from(total),
            monthly: [Decimal::ZERO; 12],
            headcount: 1,
        }
    }

    fn projection(rows: Vec<ProjectRow>) -> YearlyProjection {
        YearlyProjection {
            year: 2025,
            total: rows.iter().map(|r| r.total).sum(),
            headcount: rows.len(),
            cost_by_direction: BTreeMap::new(),
            headcount_by_funding_base: BTreeMap::new(),
            headcount_by_direction: BTreeMap::new(),
            project_matrix: rows,
            months: vec![],
        }
    }

    #[test]
    fn test_sort_projects_by_total_descending() {
        let mut p = projection(vec![row("A", 10), row("B", 30), row("C", 20)]);
        p.sort_projects_by_total();
        let codes: Vec<_> = p.project_matrix.iter().map(|r| r.project_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut p = projection(vec![row("A", 10), row("B", 10), row("C", 50)]);
        p.sort_projects_by_total();
        let codes: Vec<_> = p.project_matrix.iter().map(|r| r.project_code.as_str()).collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_project_row_serializes_twelve_months() {
        let json = serde_json::to_value(row("A", 10)).unwrap();
        assert_eq!(json["monthly"].as_array().unwrap().len(), 12);
    }
}
