//! Display formatting for dashboard values.
//!
//! Everything here is a pure function so the view can be rebuilt from the
//! same state and produce identical output.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Shown in place of a status field the service did not report.
pub const PLACEHOLDER: &str = "—";

/// Shown for a trade timestamp that does not parse.
pub const INVALID_DATE: &str = "Invalid Date";

const TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

// ── Numbers ──

/// `$1,234.50`, `-$50.00`. Always two fraction digits; cent ties round away
/// from zero.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let cents = (value.abs() * 100.0).round() / 100.0;
    let fixed = format!("{cents:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

pub fn format_currency_or_placeholder(value: Option<f64>) -> String {
    value.map(format_currency).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Shortest round-trip form: `42000`, `0.01`.
pub fn format_number(value: f64) -> String {
    value.to_string()
}

pub fn format_number_or_placeholder(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_volatility(value: f64) -> String {
    format!("{value:.4}")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Timestamps ──

/// Parse a trade timestamp. Strings with an explicit offset (RFC 3339 or
/// RFC 2822) are absolute. A date-only string is midnight UTC. A date-time
/// without an offset is read as wall-clock time in `tz`.
pub fn parse_trade_time<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(tz));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(tz));
    }
    None
}

/// `1/1/2024, 12:00:00 AM` in the given zone.
pub fn format_trade_time_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match parse_trade_time(raw, tz) {
        Some(dt) => dt.format(TIME_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

pub fn format_local_time(raw: &str) -> String {
    format_trade_time_in(raw, &Local)
}
