//! Calendar date helpers for checkout and webhook custom data.
//!
//! Dates travel through the payment provider as one comma-separated
//! string of ISO dates (`"2025-03-01,2025-03-02"`).

use chrono::NaiveDate;

use crate::error::ApiError;

/// Expands an inclusive `from..=to` range into individual dates.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] if `to` is before `from` or the
/// range spans more than `max_days` dates.
pub fn expand_range(
    from: NaiveDate,
    to: NaiveDate,
    max_days: usize,
) -> Result<Vec<NaiveDate>, ApiError> {
    if to < from {
        return Err(ApiError::InvalidRequest(format!(
            "date range ends ({to}) before it starts ({from})"
        )));
    }
    let dates: Vec<NaiveDate> = from
        .iter_days()
        .take_while(|d| *d <= to)
        .take(max_days.saturating_add(1))
        .collect();
    if dates.len() > max_days {
        return Err(ApiError::InvalidRequest(format!(
            "date range longer than {max_days} days"
        )));
    }
    Ok(dates)
}

/// Sorts and de-duplicates a list of dates.
#[must_use]
pub fn normalize(mut dates: Vec<NaiveDate>) -> Vec<NaiveDate> {
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Joins dates into the comma-separated form carried as custom metadata.
#[must_use]
pub fn join_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the comma-separated date list from webhook custom data.
///
/// Blank entries are ignored; the result is sorted and de-duplicated.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] if any entry is not an ISO date
/// or the list is empty.
pub fn parse_date_list(raw: &str) -> Result<Vec<NaiveDate>, ApiError> {
    let mut dates = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let date = NaiveDate::parse_from_str(part, "%Y-%m-%d")
            .map_err(|e| ApiError::InvalidRequest(format!("invalid date '{part}': {e}")))?;
        dates.push(date);
    }
    if dates.is_empty() {
        return Err(ApiError::InvalidRequest("date list is empty".to_string()));
    }
    Ok(normalize(dates))
}
