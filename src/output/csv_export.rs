//! CSV export of the date sequence
//!
//! One record per date, no header, in the order the dates were collected.

use crate::output::ExportResult;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

/// Day/month/year with zero padding: `29/07/2020`
pub const CSV_DATE_FORMAT: &str = "%d/%m/%Y";

/// Formats a date the way it appears in the CSV
pub fn format_date(date: &NaiveDate) -> String {
    date.format(CSV_DATE_FORMAT).to_string()
}

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Writes the dates to `output_path`, replacing any existing file
///
/// # Arguments
///
/// * `dates` - Dates in collection order; no sorting or deduplication
/// * `output_path` - Where the CSV file is written
pub fn write_csv(dates: &[NaiveDate], output_path: &Path) -> ExportResult<()> {
    let mut writer = writer_builder().from_path(output_path)?;
    write_records(&mut writer, dates)?;
    tracing::info!("Wrote {} dates to {}", dates.len(), output_path.display());
    Ok(())
}

/// Writes the dates as CSV to any writer
pub fn write_csv_to<W: Write>(dates: &[NaiveDate], output: W) -> ExportResult<()> {
    let mut writer = writer_builder().from_writer(output);
    write_records(&mut writer, dates)
}

fn write_records<W: Write>(writer: &mut csv::Writer<W>, dates: &[NaiveDate]) -> ExportResult<()> {
    for date in dates {
        writer.write_record([format_date(date)])?;
    }
    writer.flush()?;
    Ok(())
}
