//! Count-over-time plot of availability dates
//!
//! Dates are bucketed per calendar day and drawn as a text scatter plot:
//! one column per day between the earliest and latest date, one row per
//! listing count. Long date ranges share columns between several days and
//! tall counts share rows, so the plot stays terminal sized.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Number of listings per availability day, ordered by date
pub type DailyCounts = BTreeMap<NaiveDate, usize>;

const POINT: char = '●';

/// Widest time axis, in columns
pub const MAX_COLUMNS: usize = 80;

/// Tallest count axis, in rows
pub const MAX_ROWS: usize = 20;

/// Counts how many listings share each exact calendar date
pub fn aggregate_by_day(dates: &[NaiveDate]) -> DailyCounts {
    let mut counts = DailyCounts::new();
    for date in dates {
        *counts.entry(*date).or_insert(0) += 1;
    }
    counts
}

/// Renders the counts as a scatter plot of count (y) against date (x)
///
/// The x axis is a real time axis: days without listings leave a gap.
/// When the range spans more than [`MAX_COLUMNS`] days, each column sums
/// a fixed number of consecutive days and the title says how many. Counts
/// above [`MAX_ROWS`] are scaled onto that many rows.
pub fn render_plot(counts: &DailyCounts) -> String {
    let (Some((&first, _)), Some((&last, _))) =
        (counts.first_key_value(), counts.last_key_value())
    else {
        return "No availability dates to plot\n".to_string();
    };

    let days = (last - first).num_days() as usize + 1;
    let days_per_column = days.div_ceil(MAX_COLUMNS);
    let width = days.div_ceil(days_per_column);

    let mut columns = vec![0usize; width];
    for (date, count) in counts {
        columns[(*date - first).num_days() as usize / days_per_column] += count;
    }

    let max_count = columns.iter().copied().max().unwrap_or(0);
    let rows = max_count.min(MAX_ROWS);
    let label_width = max_count.to_string().len();

    let mut out = String::from("Listings per availability date");
    if days_per_column > 1 {
        out.push_str(&format!(" ({} days per column)", days_per_column));
    }
    out.push('\n');

    for y in (1..=rows).rev() {
        let row: String = columns
            .iter()
            .map(|&count| {
                if count > 0 && row_of(count, max_count, rows) == y {
                    POINT
                } else {
                    ' '
                }
            })
            .collect();
        let label = (y * max_count).div_ceil(rows);
        let line = format!("{:>w$} |{}", label, row, w = label_width);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("{:>w$} +{}\n", "", "-".repeat(width), w = label_width));

    let first_label = first.format("%Y-%m-%d").to_string();
    let last_label = last.format("%Y-%m-%d").to_string();
    let indent = " ".repeat(label_width + 2);
    if first == last {
        out.push_str(&format!("{}{}\n", indent, first_label));
    } else if width > first_label.len() + last_label.len() {
        let gap = width - first_label.len() - last_label.len();
        out.push_str(&format!(
            "{}{}{}{}\n",
            indent,
            first_label,
            " ".repeat(gap),
            last_label
        ));
    } else {
        out.push_str(&format!("{}{} .. {}\n", indent, first_label, last_label));
    }

    out
}

/// Row (1-based, bottom up) a column total is drawn on
fn row_of(count: usize, max_count: usize, rows: usize) -> usize {
    (count * rows).div_ceil(max_count)
}

/// Prints the plot to stdout
pub fn print_plot(counts: &DailyCounts) {
    print!("{}", render_plot(counts));
}
