//! Statistics over a run's availability dates
//!
//! This module provides a short console summary printed after each crawl.

use crate::output::plot::aggregate_by_day;
use chrono::NaiveDate;

/// Availability statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityStatistics {
    /// Number of dates collected (one per listing)
    pub total_dates: usize,

    /// Number of distinct calendar days
    pub distinct_days: usize,

    /// Earliest availability date
    pub earliest: Option<NaiveDate>,

    /// Latest availability date
    pub latest: Option<NaiveDate>,

    /// Day with the most listings; the earliest such day on ties
    pub busiest_day: Option<(NaiveDate, usize)>,
}

impl AvailabilityStatistics {
    /// Computes statistics from the collected dates
    pub fn from_dates(dates: &[NaiveDate]) -> Self {
        let counts = aggregate_by_day(dates);

        let busiest_day = counts
            .iter()
            .fold(None, |best: Option<(NaiveDate, usize)>, (date, count)| {
                match best {
                    Some((_, best_count)) if best_count >= *count => best,
                    _ => Some((*date, *count)),
                }
            });

        Self {
            total_dates: dates.len(),
            distinct_days: counts.len(),
            earliest: counts.keys().next().copied(),
            latest: counts.keys().next_back().copied(),
            busiest_day,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &AvailabilityStatistics) {
    println!("=== Availability Statistics ===\n");

    println!("Overview:");
    println!("  Listings: {}", stats.total_dates);
    println!("  Distinct days: {}", stats.distinct_days);

    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        println!("  Earliest: {}", earliest.format("%d/%m/%Y"));
        println!("  Latest: {}", latest.format("%d/%m/%Y"));
        println!("  Span: {} days", (latest - earliest).num_days() + 1);
    }

    if let Some((day, count)) = stats.busiest_day {
        let percentage = (count as f64 / stats.total_dates as f64) * 100.0;
        println!(
            "  Busiest day: {} ({} listings, {:.1}%)",
            day.format("%d/%m/%Y"),
            count,
            percentage
        );
    }
    println!();
}
