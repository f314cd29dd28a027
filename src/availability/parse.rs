use crate::availability::Clock;
use crate::AvailabilityError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Sentinel meaning the property can be moved into today
pub const IMMEDIATELY: &str = "immediately";

/// Day, abbreviated month, four-digit year: `29 Jul 2020`
pub const DATE_FORMAT: &str = "%d %b %Y";

fn ordinal_suffix() -> &'static Regex {
    static ORDINAL: OnceLock<Regex> = OnceLock::new();
    ORDINAL.get_or_init(|| {
        Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)\b").expect("ordinal suffix pattern is valid")
    })
}

/// Removes an ordinal suffix from the leading day number
///
/// Only the suffix directly attached to the day is touched, so month names
/// and years pass through unchanged.
pub fn strip_ordinal_suffix(candidate: &str) -> String {
    ordinal_suffix().replace(candidate, "$1").into_owned()
}

/// Parses a date candidate into a calendar date
///
/// `"immediately"` (exact match) resolves to `clock.today()`. Anything else
/// must read `"<day>[st|nd|rd|th] <Mon> <year>"`.
///
/// # Errors
///
/// Returns [`AvailabilityError::InvalidDate`] when the candidate does not
/// match the expected format.
pub fn parse_available_date(
    candidate: &str,
    clock: &dyn Clock,
) -> Result<NaiveDate, AvailabilityError> {
    if candidate == IMMEDIATELY {
        return Ok(clock.today());
    }

    let normalized = candidate.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = strip_ordinal_suffix(&normalized);

    NaiveDate::parse_from_str(&stripped, DATE_FORMAT).map_err(|source| {
        AvailabilityError::InvalidDate {
            candidate: candidate.to_string(),
            source,
        }
    })
}
