//! Header normalization and administrative column redaction.

use std::ops::RangeInclusive;

use super::Table;

/// Uppercase and trim a header.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn normalize_headers(table: &mut Table) {
    for header in &mut table.headers {
        *header = normalize_header(header);
    }
}

/// Column span from `start` through `end`, inclusive.
///
/// `None` unless both anchors are present; an `end` before `start` is an empty
/// span and also yields `None`.
pub fn redaction_range(headers: &[String], start: &str, end: &str) -> Option<RangeInclusive<usize>> {
    let first = headers.iter().position(|h| h == start)?;
    let last = headers.iter().position(|h| h == end)?;
    (first <= last).then_some(first..=last)
}

/// Drop the anchor columns and everything between them, whatever they hold.
/// Returns the removed header names.
pub fn redact_columns(table: &mut Table, start: &str, end: &str) -> Vec<String> {
    let Some(range) = redaction_range(&table.headers, start, end) else {
        return Vec::new();
    };

    for row in &mut table.rows {
        row.drain(range.clone());
    }
    table.headers.drain(range).collect()
}
