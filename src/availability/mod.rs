//! Availability date handling
//!
//! Listing cards carry free text such as `"Available from 29th Jul 2020"` or
//! `"Available immediately"`. This module isolates the date part of that
//! text and turns it into a calendar date.

mod clock;
mod extract;
mod parse;

pub use clock::{Clock, FixedClock, SystemClock};
pub use extract::{extract_date_candidate, AVAILABLE_MARKER};
pub use parse::{parse_available_date, strip_ordinal_suffix, DATE_FORMAT, IMMEDIATELY};

use crate::AvailabilityError;
use chrono::NaiveDate;

/// Extracts and parses the availability date from a listing's text
///
/// # Example
///
/// ```
/// use availability_crawler::availability::{availability_from_text, FixedClock};
/// use chrono::NaiveDate;
///
/// let clock = FixedClock(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap());
/// let date = availability_from_text("Available from 29th Jul 2020", &clock).unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2020, 7, 29).unwrap());
/// ```
pub fn availability_from_text(
    raw_text: &str,
    clock: &dyn Clock,
) -> Result<NaiveDate, AvailabilityError> {
    let candidate = extract_date_candidate(raw_text)?;
    parse_available_date(&candidate, clock)
}
