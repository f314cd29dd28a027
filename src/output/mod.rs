//! Output module for exporting collected availability dates
//!
//! This module handles:
//! - Writing the date sequence to CSV
//! - Bucketing dates per day and rendering a count-over-time plot
//! - Printing summary statistics for a run

mod csv_export;
mod plot;
pub mod stats;

pub use csv_export::{format_date, write_csv, write_csv_to, CSV_DATE_FORMAT};
pub use plot::{aggregate_by_day, print_plot, render_plot, DailyCounts, MAX_COLUMNS, MAX_ROWS};
pub use stats::{print_statistics, AvailabilityStatistics};

use thiserror::Error;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
