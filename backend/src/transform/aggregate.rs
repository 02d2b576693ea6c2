//! Group long-format records into per-employee status counts.
//!
//! # Architecture
//!
//! ```text
//! Long records                       Counts (wide)
//! ┌───────────────────────┐          ┌──────┬──────────┬───────┬─────┬ ─ ─
//! │ Ana   01/01 PRESENTE  │          │ NOME │ PRESENTE │ FALTA │ DSR │ ...
//! │ Ana   02/01 FALTA     │    →     ├──────┼──────────┼───────┼─────┼ ─ ─
//! │ Bruno 01/01 PRESENTE  │          │ Ana  │ 1        │ 1     │ 0   │
//! │ Bruno 02/01 PRESENTE  │          │ Bruno│ 2        │ 0     │ 0   │
//! └───────────────────────┘          └──────┴──────────┴───────┴─────┴ ─ ─
//! ```
//!
//! Columns are every distinct status observed (sorted) followed by the fixed
//! vocabulary statuses that were not observed. Every employee holds every
//! column, so missing combinations read as 0.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{AttendanceRecord, Status};

/// Status counts per employee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Column order of the summary.
    pub status_columns: Vec<String>,
    /// employee → (status → count); each inner map holds every column.
    pub counts: BTreeMap<String, BTreeMap<String, u32>>,
}

/// Builder accumulating one employee's counts.
#[derive(Default)]
struct CountBuilder {
    counts: BTreeMap<String, u32>,
}

impl CountBuilder {
    fn add(&mut self, status: &str) {
        *self.counts.entry(status.to_string()).or_insert(0) += 1;
    }

    fn build(mut self, columns: &[String]) -> BTreeMap<String, u32> {
        for column in columns {
            self.counts.entry(column.clone()).or_insert(0);
        }
        self.counts
    }
}

/// Count records per (employee, status).
///
/// `employees` seeds a row for every employee even when the sheet has no
/// date columns.
pub fn count_statuses<'a, I>(employees: I, records: &[AttendanceRecord]) -> Aggregation
where
    I: IntoIterator<Item = &'a String>,
{
    let mut builders: BTreeMap<String, CountBuilder> = employees
        .into_iter()
        .map(|name| (name.clone(), CountBuilder::default()))
        .collect();
    let mut observed: BTreeSet<String> = BTreeSet::new();

    for record in records {
        observed.insert(record.status.clone());
        builders
            .entry(record.employee_name.clone())
            .or_default()
            .add(&record.status);
    }

    let status_columns = status_columns(observed);
    let counts = builders
        .into_iter()
        .map(|(name, builder)| (name, builder.build(&status_columns)))
        .collect();

    Aggregation {
        status_columns,
        counts,
    }
}

/// Observed statuses in sorted order, then the missing vocabulary statuses.
fn status_columns(observed: BTreeSet<String>) -> Vec<String> {
    let missing: Vec<String> = Status::ALL
        .iter()
        .map(|s| s.label())
        .filter(|label| !observed.contains(*label))
        .map(str::to_string)
        .collect();

    observed.into_iter().chain(missing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, date: &str, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_name: name.into(),
            date_column: date.into(),
            status: status.into(),
        }
    }

    #[test]
    fn test_counts_per_employee_and_status() {
        let records = vec![
            record("Ana", "01/01", "PRESENTE"),
            record("Ana", "02/01", "FALTA"),
            record("Bruno", "01/01", "PRESENTE"),
            record("Bruno", "02/01", "PRESENTE"),
        ];
        let employees = vec!["Ana".to_string(), "Bruno".to_string()];

        let agg = count_statuses(&employees, &records);

        assert_eq!(agg.counts["Ana"]["PRESENTE"], 1);
        assert_eq!(agg.counts["Ana"]["FALTA"], 1);
        assert_eq!(agg.counts["Bruno"]["PRESENTE"], 2);
        assert_eq!(agg.counts["Bruno"]["FALTA"], 0);
    }

    #[test]
    fn test_vocabulary_always_present() {
        let records = vec![record("Ana", "01/01", "PRESENTE")];
        let employees = vec!["Ana".to_string()];

        let agg = count_statuses(&employees, &records);

        for status in Status::ALL {
            assert!(agg.status_columns.contains(&status.label().to_string()));
            assert!(agg.counts["Ana"].contains_key(status.label()));
        }
        assert_eq!(agg.counts["Ana"]["BANCO DE HORAS"], 0);
    }

    #[test]
    fn test_column_order() {
        let records = vec![
            record("Ana", "01/01", "PRESENTE"),
            record("Ana", "02/01", "FALTA"),
            record("Ana", "03/01", "FOLGA EXTRA"),
        ];
        let employees = vec!["Ana".to_string()];

        let agg = count_statuses(&employees, &records);

        assert_eq!(
            agg.status_columns,
            vec![
                "FALTA",
                "FOLGA EXTRA",
                "PRESENTE",
                "DSR",
                "FÉRIAS",
                "AFASTAMENTO MÉDICO",
                "SUSPENSO",
                "ATESTADO MÉDICO",
                "BANCO DE HORAS",
            ]
        );
    }

    #[test]
    fn test_unknown_labels_become_columns() {
        let records = vec![record("Ana", "01/01", "HOME OFFICE")];
        let employees = vec!["Ana".to_string()];

        let agg = count_statuses(&employees, &records);
        assert_eq!(agg.counts["Ana"]["HOME OFFICE"], 1);
    }

    #[test]
    fn test_employee_without_records_still_has_row() {
        let employees = vec!["Ana".to_string()];
        let agg = count_statuses(&employees, &[]);

        assert_eq!(agg.counts.len(), 1);
        assert_eq!(agg.counts["Ana"].values().sum::<u32>(), 0);
        assert_eq!(agg.status_columns.len(), 8);
    }
}
