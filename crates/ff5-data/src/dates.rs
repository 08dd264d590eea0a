//! Date label parsing for chart axes.
//!
//! Labels are compared as text everywhere else; parsing only decides how a
//! label is drawn.

use chrono::{NaiveDate, NaiveDateTime};

/// Parse a date label.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYYMMDD`, `YYYYMM` and
/// `YYYY-MM`. Month-only labels resolve to the first day of the month.
pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let label = label.trim();

    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(label, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }

    let digits = label.chars().all(|c| c.is_ascii_digit());
    match label.len() {
        8 if digits => NaiveDate::parse_from_str(label, "%Y%m%d").ok(),
        6 if digits => first_of_month(&label[..4], &label[4..]),
        7 if label.as_bytes()[4] == b'-' => first_of_month(&label[..4], &label[5..]),
        _ => None,
    }
}

fn first_of_month(year: &str, month: &str) -> Option<NaiveDate> {
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}
