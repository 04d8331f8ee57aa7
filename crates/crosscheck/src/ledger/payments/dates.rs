use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to read '{0}' as a calendar date")]
pub struct DateError(pub String);

/// Extracts the date-only portion of an ISO-8601-like timestamp.
///
/// Splits on the literal `T` and keeps the first segment, so both bare
/// dates and full timestamps are accepted. No timezone conversion happens
/// here; the calendar day the client sent is the one stored.
pub fn extract_date(raw: &str) -> Result<NaiveDate, DateError> {
    let day_portion = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day_portion, "%Y-%m-%d").map_err(|_| DateError(raw.to_string()))
}
