//! Display-side view models: pagination, attendance bands and card rows.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::{EmployeeSummary, Status};

/// Attendance band shown as the card badge colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Yellow,
    Red,
}

impl Band {
    /// ≥ 85 green, ≥ 70 yellow, otherwise red. No percentage is red.
    pub fn from_percent(percent: Option<f64>) -> Self {
        match percent {
            Some(p) if p >= 85.0 => Self::Green,
            Some(p) if p >= 70.0 => Self::Yellow,
            _ => Self::Red,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// Percentage as displayed: two decimals and a percent sign, `—` when absent.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{:.2}%", p),
        None => "—".to_string(),
    }
}

/// One page of display rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based, after clamping
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice `items` into 1-based pages of `page_size`.
///
/// Page 0 reads as page 1; pages past the end clamp to the last page. An
/// empty input yields a single empty page.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let number = page.clamp(1, total_pages);
    let start = (number - 1) * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start.min(items.len())..end],
        number,
        total_pages,
        total_items: items.len(),
    }
}

/// Card grid column count clamped to the supported range.
pub fn clamp_columns(columns: usize) -> usize {
    columns.clamp(config::MIN_CARD_COLUMNS, config::MAX_CARD_COLUMNS)
}

/// Typed row behind one employee card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub name: String,
    pub present: u32,
    pub absent: u32,
    pub medical_certificate: u32,
    pub time_bank: u32,
    pub percent: Option<f64>,
    pub band: Band,
}

impl From<&EmployeeSummary> for CardView {
    fn from(row: &EmployeeSummary) -> Self {
        Self {
            name: row.employee_name.clone(),
            present: row.status(Status::Present),
            absent: row.status(Status::Absent),
            medical_certificate: row.status(Status::MedicalCertificate),
            time_bank: row.status(Status::TimeBank),
            percent: row.attendance_percent,
            band: Band::from_percent(row.attendance_percent),
        }
    }
}
