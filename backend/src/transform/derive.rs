//! Derived metrics and display ordering.
//!
//! `total_days` sums the statuses selected by the [`DenominatorPolicy`];
//! `attendance_percent` is `PRESENTE / total_days × 100` rounded to two
//! decimals (half away from zero), or `None` when `total_days` is 0.

use std::cmp::Ordering;

use super::aggregate::Aggregation;
use crate::models::{DenominatorPolicy, EmployeeSummary, Status, SummaryTable};

/// Sum of the policy's statuses.
pub fn total_days(summary: &EmployeeSummary, policy: DenominatorPolicy) -> u32 {
    policy.statuses().iter().map(|s| summary.status(*s)).sum()
}

/// Attendance percentage, `None` when `total` is 0.
pub fn attendance_percent(present: u32, total: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(round2(f64::from(present) / f64::from(total) * 100.0))
}

/// Round to two decimals, ties away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fill `total_days` and `attendance_percent` in place.
pub fn derive_metrics(summary: &mut EmployeeSummary, policy: DenominatorPolicy) {
    summary.total_days = total_days(summary, policy);
    summary.attendance_percent = attendance_percent(summary.status(Status::Present), summary.total_days);
}

/// Build the summary table from aggregated counts. Rows keep the
/// aggregation's name order.
pub fn build_summary(
    aggregation: Aggregation,
    identity_column: &str,
    date_columns: usize,
    policy: DenominatorPolicy,
) -> SummaryTable {
    let rows = aggregation
        .counts
        .into_iter()
        .map(|(employee_name, status_count)| {
            let mut row = EmployeeSummary {
                employee_name,
                status_count,
                total_days: 0,
                attendance_percent: None,
            };
            derive_metrics(&mut row, policy);
            row
        })
        .collect();

    SummaryTable {
        identity_column: identity_column.to_string(),
        status_columns: aggregation.status_columns,
        rows,
        date_columns,
        policy,
    }
}

/// Case-insensitive substring match; an empty filter matches everything.
/// Whitespace is part of the needle.
pub fn matches_filter(name: &str, filter: &str) -> bool {
    filter.is_empty() || name.to_lowercase().contains(&filter.to_lowercase())
}

/// Descending percentage, absent percentages last.
fn by_attendance_desc(a: &EmployeeSummary, b: &EmployeeSummary) -> Ordering {
    match (a.attendance_percent, b.attendance_percent) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rows to display: filtered by name, then stably sorted by descending
/// percentage. Ties keep the table order.
pub fn display_rows<'a>(table: &'a SummaryTable, filter: Option<&str>) -> Vec<&'a EmployeeSummary> {
    let mut rows: Vec<&EmployeeSummary> = table
        .rows
        .iter()
        .filter(|r| filter.map_or(true, |f| matches_filter(&r.employee_name, f)))
        .collect();
    rows.sort_by(|a, b| by_attendance_desc(a, b));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        let mut map: BTreeMap<String, u32> =
            Status::ALL.iter().map(|s| (s.label().to_string(), 0)).collect();
        for (label, count) in pairs {
            map.insert(label.to_string(), *count);
        }
        map
    }

    fn table(rows: &[(&str, &[(&str, u32)])], policy: DenominatorPolicy) -> SummaryTable {
        let aggregation = Aggregation {
            status_columns: Status::ALL.iter().map(|s| s.label().to_string()).collect(),
            counts: rows.iter().map(|(n, c)| (n.to_string(), counts(c))).collect(),
        };
        build_summary(aggregation, "NOME", 10, policy)
    }

    #[test]
    fn test_worked_policy() {
        let t = table(
            &[("Ana", &[("PRESENTE", 3), ("FALTA", 1), ("DSR", 4)])],
            DenominatorPolicy::Worked,
        );
        assert_eq!(t.rows[0].total_days, 4);
        assert_eq!(t.rows[0].attendance_percent, Some(75.0));
    }

    #[test]
    fn test_all_categories_policy() {
        let t = table(
            &[("Ana", &[("PRESENTE", 3), ("FALTA", 1), ("DSR", 4)])],
            DenominatorPolicy::AllCategories,
        );
        assert_eq!(t.rows[0].total_days, 8);
        assert_eq!(t.rows[0].attendance_percent, Some(37.5));
    }

    #[test]
    fn test_unknown_labels_not_in_denominator() {
        let mut c = counts(&[("PRESENTE", 1)]);
        c.insert("HOME OFFICE".into(), 5);
        let aggregation = Aggregation {
            status_columns: c.keys().cloned().collect(),
            counts: [("Ana".to_string(), c)].into_iter().collect(),
        };
        let t = build_summary(aggregation, "NOME", 6, DenominatorPolicy::AllCategories);
        assert_eq!(t.rows[0].total_days, 1);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(attendance_percent(2, 3), Some(66.67));
        assert_eq!(attendance_percent(1, 3), Some(33.33));
        assert_eq!(attendance_percent(0, 5), Some(0.0));
        assert_eq!(attendance_percent(0, 0), None);
        assert_eq!(round2(12.345_000_1), 12.35);
    }

    #[test]
    fn test_zero_denominator() {
        let t = table(&[("Ana", &[("FÉRIAS", 10)])], DenominatorPolicy::Worked);
        assert_eq!(t.rows[0].total_days, 0);
        assert_eq!(t.rows[0].attendance_percent, None);
    }

    #[test]
    fn test_display_order() {
        let t = table(
            &[
                ("Ana", &[("PRESENTE", 1), ("FALTA", 1)]),
                ("Bruno", &[("FÉRIAS", 2)]),
                ("Carla", &[("PRESENTE", 2)]),
                ("Davi", &[("PRESENTE", 1), ("FALTA", 1)]),
            ],
            DenominatorPolicy::Worked,
        );

        let names: Vec<&str> = display_rows(&t, None)
            .iter()
            .map(|r| r.employee_name.as_str())
            .collect();
        assert_eq!(names, vec!["Carla", "Ana", "Davi", "Bruno"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        assert!(matches_filter("Ana Silva", "ana"));
        assert!(matches_filter("MARIANA", "ana"));
        assert!(matches_filter("João", "JOÃO"));
        assert!(!matches_filter("Bruno", "ana"));
        assert!(matches_filter("Bruno", ""));
    }

    #[test]
    fn test_filter_whitespace_is_literal() {
        assert!(!matches_filter("Ana", " ana"));
        assert!(matches_filter("Ana Silva", "a s"));
        assert!(!matches_filter("Bruno", "  "));
    }

    #[test]
    fn test_filter_applies_before_sort() {
        let t = table(
            &[
                ("Ana Silva", &[("PRESENTE", 1), ("FALTA", 1)]),
                ("Bruno", &[("PRESENTE", 2)]),
                ("MARIANA", &[("PRESENTE", 2)]),
            ],
            DenominatorPolicy::Worked,
        );

        let names: Vec<&str> = display_rows(&t, Some("ana"))
            .iter()
            .map(|r| r.employee_name.as_str())
            .collect();
        assert_eq!(names, vec!["MARIANA", "Ana Silva"]);
    }
}
