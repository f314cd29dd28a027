use crate::AvailabilityError;

/// Word that precedes the date in a listing's availability text
pub const AVAILABLE_MARKER: &str = "Available";

/// Isolates the date part of an availability text fragment
///
/// Takes everything after the first `"Available"`, drops every `"from"`
/// and trims surrounding whitespace. The result is either a date string
/// like `"29th Jul 2020"` or the `"immediately"` sentinel.
///
/// # Errors
///
/// Returns [`AvailabilityError::MissingMarker`] when the text has no
/// `"Available"` marker at all.
pub fn extract_date_candidate(raw_text: &str) -> Result<String, AvailabilityError> {
    let (_, after_marker) =
        raw_text
            .split_once(AVAILABLE_MARKER)
            .ok_or_else(|| AvailabilityError::MissingMarker {
                text: raw_text.trim().to_string(),
            })?;

    // Only the segment up to a second marker counts
    let segment = after_marker
        .split(AVAILABLE_MARKER)
        .next()
        .unwrap_or_default();

    Ok(segment.replace("from", "").trim().to_string())
}
