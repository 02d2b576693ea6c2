//! Transformation module.
//!
//! This module turns a loaded table into the attendance summary:
//! - Reshape: wide sheet to one record per employee × date
//! - Aggregate: status counts per employee
//! - Derive: total days, percentage and display order
//! - Pipeline: main entry points

pub mod aggregate;
pub mod derive;
pub mod pipeline;
pub mod reshape;

pub use aggregate::{count_statuses, Aggregation};
pub use derive::{attendance_percent, build_summary, display_rows, matches_filter, total_days};
pub use pipeline::*;
pub use reshape::{melt, Reshaped};
