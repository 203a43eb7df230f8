//! Sample date normalization.

use chrono::NaiveDate;

const SAMPLE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Convert a `DD/MM/YYYY` sample date to ISO 8601 `YYYY-MM-DD`.
///
/// Returns `None` for anything that is not a real calendar date.
pub fn normalize_sample_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), SAMPLE_DATE_FORMAT)
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}
