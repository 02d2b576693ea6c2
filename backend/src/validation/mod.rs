//! Structural checks on loaded tables and computed summaries.
//!
//! # Checks
//!
//! ## Input
//! - The identity column must exist after header normalization.
//!
//! ## Summary
//! - Every employee row holds every status column.
//! - Counts are conserved: for each employee, the sum over status columns
//!   equals `date_columns × source rows` for that name.
//! - Percentages lie in `[0, 100]` and are absent exactly when
//!   `total_days` is 0.
//!
//! Summary checks return every violation found instead of stopping at the
//! first one, so they can be reported together.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::models::SummaryTable;
use crate::parser::Table;

/// Index of `column` in the table headers.
pub fn require_column(table: &Table, column: &str) -> Result<usize, ValidationError> {
    table
        .column_index(column)
        .ok_or_else(|| ValidationError::MissingIdentityColumn {
            column: column.to_string(),
            available: table.headers.clone(),
        })
}

/// Validate a summary against the per-name source row counts.
///
/// # Returns
/// * `Ok(())` if every check passes
/// * `Err(Vec<String>)` with one message per violation
pub fn validate_summary(
    summary: &SummaryTable,
    occurrences: &BTreeMap<String, usize>,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if summary.rows.len() != occurrences.len() {
        errors.push(format!(
            "expected {} employees, summary has {}",
            occurrences.len(),
            summary.rows.len()
        ));
    }

    for row in &summary.rows {
        let name = &row.employee_name;

        if let Some(missing) = summary
            .status_columns
            .iter()
            .find(|c| !row.status_count.contains_key(*c))
        {
            errors.push(format!("{}: missing status column '{}'", name, missing));
        }

        let expected = occurrences.get(name).copied().unwrap_or(0) * summary.date_columns;
        let actual = row.cell_total() as usize;
        if actual != expected {
            errors.push(format!(
                "{}: {} counted cells, expected {}",
                name, actual, expected
            ));
        }

        match row.attendance_percent {
            Some(p) if !(0.0..=100.0).contains(&p) => {
                errors.push(format!("{}: percentage {} out of range", name, p));
            }
            Some(_) if row.total_days == 0 => {
                errors.push(format!("{}: percentage without total days", name));
            }
            None if row.total_days > 0 => {
                errors.push(format!("{}: missing percentage", name));
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check; true when [`validate_summary`] finds nothing.
pub fn is_valid_summary(summary: &SummaryTable, occurrences: &BTreeMap<String, usize>) -> bool {
    validate_summary(summary, occurrences).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DenominatorPolicy, EmployeeSummary};

    fn summary(rows: Vec<EmployeeSummary>, date_columns: usize) -> SummaryTable {
        SummaryTable {
            identity_column: "NOME".into(),
            status_columns: vec!["FALTA".into(), "PRESENTE".into()],
            rows,
            date_columns,
            policy: DenominatorPolicy::Worked,
        }
    }

    fn row(name: &str, present: u32, absent: u32, percent: Option<f64>) -> EmployeeSummary {
        EmployeeSummary {
            employee_name: name.into(),
            status_count: [("FALTA".to_string(), absent), ("PRESENTE".to_string(), present)]
                .into_iter()
                .collect(),
            total_days: present + absent,
            attendance_percent: percent,
        }
    }

    fn occurrences(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_require_column() {
        let table = Table::new(vec!["NOME".into(), "01/01".into()], vec![]);
        assert_eq!(require_column(&table, "NOME").unwrap(), 0);

        let err = require_column(&table, "MATRICULA").unwrap_err();
        assert!(err.to_string().contains("MATRICULA"));
        assert!(err.to_string().contains("NOME, 01/01"));
    }

    #[test]
    fn test_valid_summary() {
        let s = summary(vec![row("Ana", 1, 1, Some(50.0))], 2);
        assert!(is_valid_summary(&s, &occurrences(&[("Ana", 1)])));
    }

    #[test]
    fn test_conservation_violation() {
        let s = summary(vec![row("Ana", 1, 0, Some(100.0))], 2);
        let errors = validate_summary(&s, &occurrences(&[("Ana", 1)])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("expected 2"));
    }

    #[test]
    fn test_percentage_rules() {
        let s = summary(
            vec![row("Ana", 1, 1, None), row("Bruno", 0, 0, Some(0.0))],
            2,
        );
        let errors =
            validate_summary(&s, &occurrences(&[("Ana", 1), ("Bruno", 0)])).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Ana: missing percentage")));
        assert!(errors.iter().any(|e| e.contains("Bruno: percentage without total days")));
    }
}
