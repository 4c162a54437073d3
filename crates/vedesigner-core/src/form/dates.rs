//! Conversion between wire datetimes and date-only form values.

use jiff::civil::Date;

/// Wire datetime → form date: everything before the `T` separator.
///
/// ```rust
/// use vedesigner_core::form::dates::to_form_date;
///
/// assert_eq!(to_form_date(Some("2024-05-01T00:00:00Z")), "2024-05-01");
/// assert_eq!(to_form_date(Some("2024-05-01")), "2024-05-01");
/// assert_eq!(to_form_date(None), "");
/// ```
pub fn to_form_date(value: Option<&str>) -> String {
    match value {
        Some(value) => value
            .split_once('T')
            .map_or(value, |(date, _)| date)
            .trim()
            .to_string(),
        None => String::new(),
    }
}

/// Form date → wire datetime at midnight.
///
/// Blank input means "not set". Input that is not a calendar date is
/// passed through unchanged; validation rejects it before submit.
pub fn to_wire_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match parse_form_date(value) {
        Some(date) => Some(format!("{date}T00:00:00")),
        None => Some(value.to_string()),
    }
}

/// Parses a `YYYY-MM-DD` form value.
pub fn parse_form_date(value: &str) -> Option<Date> {
    value.trim().parse::<Date>().ok()
}
