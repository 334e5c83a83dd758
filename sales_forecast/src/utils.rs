//! Calendar and identifier helpers shared by the loader and the forecaster

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Date formats tried, in order, when parsing a date cell. Day-first layouts
/// come before ISO so that `05-02-2010` reads as 5 February, and two-digit
/// years (`05-02-10`) read as 2010.
pub const DEFAULT_DATE_FORMATS: [&str; 7] = [
    "%d-%m-%y", "%d/%m/%y", "%d.%m.%y", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d",
];

/// Years below this come from a short year read by `%Y` and are rejected
const MIN_PLAUSIBLE_YEAR: i32 = 1000;

/// The date exactly one calendar week after `date`
pub fn next_week(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::weeks(1)).ok_or_else(|| {
        ForecastError::ValidationError(format!("Date {} cannot be advanced by one week", date))
    })
}

/// Create the weekly dates following `last_date`
pub fn future_weeks(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_date;

    for _ in 0..horizon {
        current = next_week(current)?;
        dates.push(current);
    }

    Ok(dates)
}

/// Calendar fields of a date: (ISO week of year, month, year)
pub fn calendar_fields(date: NaiveDate) -> (u32, u32, i32) {
    (date.iso_week().week(), date.month(), date.year())
}

/// Parse a date cell using the first matching format.
///
/// A match whose year is below 1000 is skipped, so `05-02-10` never becomes
/// year 10 under a `%Y` layout. Cells carrying a time component (`2010-02-05 00:00:00`, `2010-02-05T00:00`)
/// are retried on their date part alone.
pub fn parse_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Result<NaiveDate> {
    let raw = raw.trim();

    let attempt = |text: &str| {
        formats
            .iter()
            .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt.as_ref()).ok())
            .find(|date| date.year() >= MIN_PLAUSIBLE_YEAR)
    };

    if let Some(date) = attempt(raw) {
        return Ok(date);
    }

    if let Some(date_part) = raw.split(|c| c == ' ' || c == 'T').next() {
        if date_part != raw {
            if let Some(date) = attempt(date_part) {
                return Ok(date);
            }
        }
    }

    Err(ForecastError::DateParseError(format!(
        "'{}' does not match any of the formats [{}]",
        raw,
        formats
            .iter()
            .map(|f| f.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

/// Sort entity identifiers into forecasting order.
///
/// Identifiers are ordered numerically when every one of them is a number
/// (`1.5` before `2.5` before `10.5`), lexically otherwise.
pub fn sort_entity_ids(ids: &mut [String]) {
    let numeric: Option<Vec<f64>> = ids.iter().map(|id| id.parse::<f64>().ok()).collect();

    match numeric {
        Some(keys) => {
            let mut keyed: Vec<(f64, String)> = keys
                .into_iter()
                .zip(ids.iter().cloned())
                .collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            for (slot, (_, id)) in ids.iter_mut().zip(keyed) {
                *slot = id;
            }
        }
        None => ids.sort(),
    }
}
