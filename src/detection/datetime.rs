use crate::error::{CsvCleanerError, Result};
use crate::types::{DATE_PATTERNS, TEXT_DATE_FORMATS, TIME_PATTERNS};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt::Write;

/// Date separator characters
const DATE_SEPS: &[char] = &['/', '-', '.'];

/// Time separator characters
const TIME_SEPS: &[char] = &[':'];

/// Shape of a numeric date: four-digit year first or last
static NUMERIC_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}[-/.]\d{1,2}[-/.]\d{1,2}|\d{1,2}[-/.]\d{1,2}[-/.]\d{4})$").unwrap()
});

/// `yyyy-mm-dd` style tokens accepted in user supplied formats
static FORMAT_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)yyyy|mm|dd|hh|nn|ss").unwrap());

/// Check if a string could potentially be a numeric datetime value
pub fn could_be_datetime(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }

    // Must contain date/time separator characters and digits
    let has_date_sep = value.chars().any(|c| DATE_SEPS.contains(&c));
    let has_time_sep = value.chars().any(|c| TIME_SEPS.contains(&c));
    let has_digits = value.chars().any(|c| c.is_ascii_digit());

    has_digits && (has_date_sep || has_time_sep)
}

/// Parse a single value as a date or timestamp.
/// Values without a time component resolve to midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    parse_rfc3339(value)
        .or_else(|| parse_numeric_date(value))
        .or_else(|| parse_text_date(value))
}

/// Render a parsed value; `None` when the format cannot be rendered
pub fn format_datetime(value: &NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(format)).ok()?;
    Some(out)
}

/// Translate `yyyy-mm-dd` style tokens to chrono; chrono patterns pass through
pub fn normalize_date_format(format: &str) -> String {
    if format.contains('%') {
        return format.to_string();
    }

    FORMAT_TOKEN_REGEX
        .replace_all(format, |caps: &Captures| {
            let spec = match caps[0].to_ascii_lowercase().as_str() {
                "yyyy" => "%Y",
                "mm" => "%m",
                "dd" => "%d",
                "hh" => "%H",
                "nn" => "%M",
                _ => "%S",
            };
            spec.to_string()
        })
        .into_owned()
}

/// Reject output formats chrono cannot render
pub fn validate_date_format(format: &str) -> Result<()> {
    if format.trim().is_empty() {
        return Err(CsvCleanerError::ConfigError(
            "Date format must not be empty".to_string(),
        ));
    }

    let invalid = || {
        CsvCleanerError::ConfigError(format!("Invalid date format \"{}\"", format))
    };

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    // Offset specifiers parse fine but a naive value cannot render them
    let sample = NaiveDate::from_ymd_opt(2000, 1, 31).map(|d| d.and_time(NaiveTime::MIN));
    if sample.and_then(|dt| format_datetime(&dt, format)).is_none() {
        return Err(invalid());
    }

    Ok(())
}

/// RFC3339 timestamps (e.g. 2020-01-15T10:30:00Z), offset dropped
fn parse_rfc3339(value: &str) -> Option<NaiveDateTime> {
    if value.len() < 11 {
        return None;
    }

    let c = value.chars().nth(10);
    if c != Some('T') && c != Some('t') {
        return None;
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Numeric dates from DATE_PATTERNS with an optional trailing time
fn parse_numeric_date(value: &str) -> Option<NaiveDateTime> {
    if !could_be_datetime(value) {
        return None;
    }

    let split = value.split_once(|c: char| c.is_whitespace() || c == 'T');
    let (date_part, time_part) = match split {
        Some((date, time)) => (date, Some(time.trim())),
        None => (value, None),
    };

    if !NUMERIC_DATE_REGEX.is_match(date_part) {
        return None;
    }

    let date_sep = date_part.chars().find(|c| DATE_SEPS.contains(c))?;

    let date = DATE_PATTERNS
        .iter()
        .filter(|dp| dp.separator == date_sep)
        .find_map(|dp| {
            NaiveDate::parse_from_str(date_part, &pattern_to_chrono(dp.pattern)).ok()
        })?;

    let time = match time_part {
        Some(part) => parse_time(part)?,
        None => NaiveTime::MIN,
    };

    Some(date.and_time(time))
}

/// Try each time pattern in order
fn parse_time(value: &str) -> Option<NaiveTime> {
    TIME_PATTERNS
        .iter()
        .filter(|tp| value.contains(tp.separator))
        .find_map(|tp| {
            NaiveTime::parse_from_str(value, &time_pattern_to_chrono(tp.pattern)).ok()
        })
}

/// Dates with a spelled out month, e.g. "Jan 5, 2024"
fn parse_text_date(value: &str) -> Option<NaiveDateTime> {
    if !value.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Convert a date pattern to chrono format
fn pattern_to_chrono(pattern: &str) -> String {
    pattern
        .replace("yyyy", "%Y")
        .replace("mm", "%m")
        .replace("dd", "%d")
}

/// Convert a time pattern to chrono format
fn time_pattern_to_chrono(pattern: &str) -> String {
    let p = pattern
        .replace("hh", "%H")
        .replace("nn", "%M")
        .replace("ss", "%S");

    // Handle am/pm
    if pattern.contains("am/pm") {
        p.replace(" am/pm", " %p").replace("%H", "%I")
    } else {
        p
    }
}
