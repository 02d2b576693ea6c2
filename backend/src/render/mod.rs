//! Presenter: everything that turns a [`SummaryTable`](crate::models::SummaryTable)
//! into something a person reads.
//!
//! - [`view`] - pagination, attendance bands, card rows
//! - [`cards`] - HTML card grid
//! - [`chart`] - SVG bar charts
//! - [`excel`] - XLSX export
//! - [`pdf`] - PDF export

pub mod cards;
pub mod chart;
pub mod excel;
pub mod pdf;
pub mod view;

pub use cards::{html_escape, CardRenderer};
pub use chart::ChartRenderer;
pub use excel::to_xlsx_bytes;
pub use pdf::to_pdf_bytes;
pub use view::{clamp_columns, format_percent, paginate, Band, CardView, Page};
