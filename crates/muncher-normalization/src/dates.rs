//! Date parsing for text and spreadsheet-native cells.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Formats tried after a field's own formats, day-first.
///
/// Two-digit years come before four-digit ones: `%Y` would otherwise read
/// `17/10/17` as the year 17.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y/%m/%d",
    "%Y%m%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Largest serial Excel can display (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Parse date text with `extra` formats first, then [`DEFAULT_DATE_FORMATS`].
///
/// Formats carrying a time of day yield the date part.
pub fn parse_date(text: &str, extra: &[String]) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    extra
        .iter()
        .map(String::as_str)
        .chain(DEFAULT_DATE_FORMATS.iter().copied())
        .find_map(|format| parse_with(text, format))
}

fn parse_with(text: &str, format: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, format) {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .map(|datetime| datetime.date())
}

/// Convert an Excel serial day number to a date (1900 date system).
///
/// Uses 1899-12-30 as day zero, which absorbs Excel's phantom 1900-02-29 for
/// every serial after February 1900. Fractions (time of day) are dropped.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}
