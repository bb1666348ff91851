//! Date format detection, parsing and boundary validation
//!
//! Two date representations flow through the application and must never be
//! confused: backend date-only fields use the strict `YYYY-MM-DD` form (any
//! time component is rejected even when parseable), while generic timestamp
//! fields accept anything parseable. Plain `YYYY-MM-DD` strings are parsed
//! into `NaiveDate` by component; handing them to a timezone-aware parser is
//! the classic off-by-one-day bug in negative UTC offsets, and that path must
//! stay closed.

use chrono::{Local, Months, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::error::{ErrorCode, ValidationBuilder, ValidationError, ValidationResult};

lazy_static! {
    /// Strict date-only form
    static ref DATE_ONLY_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    /// ISO-8601 date with a time component, optional seconds/fraction/offset
    static ref ISO_WITH_TIME_REGEX: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2})?(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$"
    )
    .unwrap();
}

/// The date representation a field expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Strict `YYYY-MM-DD`, no time component allowed
    DateOnly,
    /// ISO-8601 date and time
    Iso8601,
    /// Anything parseable
    Any,
}

/// How far from "now" a date may legally be. Defaults to ±1 year.
#[derive(Debug, Clone)]
pub struct DateBoundaryOptions {
    pub past_years: Option<u32>,
    pub future_years: Option<u32>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl Default for DateBoundaryOptions {
    fn default() -> Self {
        Self {
            past_years: Some(1),
            future_years: Some(1),
            min_date: None,
            max_date: None,
        }
    }
}

/// Today's date on the local calendar.
///
/// Boundary math runs on local dates for the same reason parsing does:
/// a user entering today's date must never be told it is tomorrow.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` string by its components
pub fn parse_local_date(value: &str) -> Option<NaiveDate> {
    if !DATE_ONLY_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse any supported date representation, keeping only the date part
pub fn parse_any_date(value: &str) -> Option<NaiveDate> {
    if let Some(date) = parse_local_date(value) {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    for format in ["%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// Classify a date string, if it matches any supported representation
pub fn detect_date_format(value: &str) -> Option<DateFormat> {
    let trimmed = value.trim();
    if DATE_ONLY_REGEX.is_match(trimmed) {
        return Some(DateFormat::DateOnly);
    }
    if ISO_WITH_TIME_REGEX.is_match(trimmed) {
        return Some(DateFormat::Iso8601);
    }
    if parse_any_date(trimmed).is_some() {
        return Some(DateFormat::Any);
    }
    None
}

/// Heuristic repair hint for a malformed date string
pub fn date_format_hint(value: &str) -> &'static str {
    if value.contains('T') || value.contains(':') {
        return "remove the time component";
    }
    if value.contains('/') {
        return "use hyphens (-) instead of slashes";
    }
    "format should be YYYY-MM-DD"
}

/// Render a date back to its canonical `YYYY-MM-DD` string.
///
/// Lossless inverse of [`parse_local_date`].
pub fn normalize_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate a raw JSON value as a date in the expected representation.
///
/// Returns the parsed date on success. Every failure message echoes the
/// literal input so the user can see exactly what was rejected.
pub fn validate_date_format(
    value: &Value,
    field: &str,
    expected: DateFormat,
) -> ValidationResult<NaiveDate> {
    let raw = match value {
        Value::Null => {
            return Err(vec![ValidationError::new(
                field,
                "date is required",
                ErrorCode::DateRequired,
            )])
        }
        Value::String(s) => s,
        other => {
            return Err(vec![ValidationError::new(
                field,
                format!(
                    "must be a date string, got a {} value",
                    json_type_name(other)
                ),
                ErrorCode::DateWrongType,
            )])
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(vec![ValidationError::new(
            field,
            "date must not be empty",
            ErrorCode::DateEmpty,
        )]);
    }

    match expected {
        DateFormat::DateOnly => {
            if !DATE_ONLY_REGEX.is_match(trimmed) {
                return Err(vec![ValidationError::new(
                    field,
                    format!(
                        "must be a date in YYYY-MM-DD format without a time component, got: \"{}\" ({})",
                        trimmed,
                        date_format_hint(trimmed)
                    ),
                    ErrorCode::DateFormatInvalid,
                )]);
            }
            match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                Ok(date) => Ok(date),
                Err(_) => Err(vec![ValidationError::new(
                    field,
                    format!("is not a real calendar date, got: \"{}\"", trimmed),
                    ErrorCode::DateFormatInvalid,
                )]),
            }
        }
        DateFormat::Iso8601 => {
            if !ISO_WITH_TIME_REGEX.is_match(trimmed) {
                return Err(vec![ValidationError::new(
                    field,
                    format!(
                        "must be an ISO-8601 date and time (e.g., 2025-01-15T10:30:00Z), got: \"{}\"",
                        trimmed
                    ),
                    ErrorCode::DateFormatInvalid,
                )]);
            }
            match parse_any_date(trimmed) {
                Some(date) => Ok(date),
                None => Err(vec![ValidationError::new(
                    field,
                    format!("is not a real calendar date, got: \"{}\"", trimmed),
                    ErrorCode::DateFormatInvalid,
                )]),
            }
        }
        DateFormat::Any => match parse_any_date(trimmed) {
            Some(date) => Ok(date),
            None => Err(vec![ValidationError::new(
                field,
                format!(
                    "must be a parseable date, got: \"{}\" ({})",
                    trimmed,
                    date_format_hint(trimmed)
                ),
                ErrorCode::DateFormatInvalid,
            )]),
        },
    }
}

/// Check a parsed date against relative and absolute boundaries.
///
/// Each bound is independently checkable and reports its own code with the
/// computed boundary date in the message. `NaiveDate` comparison is already
/// start-of-day on both sides.
pub fn validate_date_boundaries(
    date: NaiveDate,
    field: &str,
    options: &DateBoundaryOptions,
) -> ValidationResult<()> {
    let today = today_local();
    let mut builder = ValidationBuilder::new();

    if let Some(years) = options.past_years {
        if let Some(boundary) = today.checked_sub_months(Months::new(years.saturating_mul(12))) {
            builder.check_condition(
                date < boundary,
                field,
                &format!(
                    "is more than {} year(s) in the past (before {}), got: {}",
                    years, boundary, date
                ),
                ErrorCode::DateTooOld,
            );
        }
    }
    if let Some(years) = options.future_years {
        if let Some(boundary) = today.checked_add_months(Months::new(years.saturating_mul(12))) {
            builder.check_condition(
                date > boundary,
                field,
                &format!(
                    "is more than {} year(s) in the future (after {}), got: {}",
                    years, boundary, date
                ),
                ErrorCode::DateTooFuture,
            );
        }
    }
    if let Some(min_date) = options.min_date {
        builder.check_condition(
            date < min_date,
            field,
            &format!(
                "is before the minimum allowed date of {}, got: {}",
                min_date, date
            ),
            ErrorCode::DateBeforeMin,
        );
    }
    if let Some(max_date) = options.max_date {
        builder.check_condition(
            date > max_date,
            field,
            &format!(
                "is after the maximum allowed date of {}, got: {}",
                max_date, date
            ),
            ErrorCode::DateAfterMax,
        );
    }

    builder.build()
}

/// Validate a start/end pair of strict date strings.
///
/// Both ends are validated independently so a caller sees every problem at
/// once; the ordering check only runs when both ends parsed.
pub fn validate_date_range(
    start: &Value,
    end: &Value,
    start_field: &str,
    end_field: &str,
) -> ValidationResult<(NaiveDate, NaiveDate)> {
    let start_result = validate_date_format(start, start_field, DateFormat::DateOnly);
    let end_result = validate_date_format(end, end_field, DateFormat::DateOnly);

    match (start_result, end_result) {
        (Ok(start_date), Ok(end_date)) => {
            if start_date > end_date {
                Err(vec![ValidationError::new(
                    "dateRange",
                    format!(
                        "start date {} must be on or before end date {}",
                        start_date, end_date
                    ),
                    ErrorCode::DateRangeInvalid,
                )])
            } else {
                Ok((start_date, end_date))
            }
        }
        (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(errors),
        (Err(mut start_errors), Err(end_errors)) => {
            start_errors.extend(end_errors);
            Err(start_errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_date_format() {
        assert_eq!(detect_date_format("2025-01-15"), Some(DateFormat::DateOnly));
        assert_eq!(
            detect_date_format("2025-01-15T10:30:00Z"),
            Some(DateFormat::Iso8601)
        );
        assert_eq!(
            detect_date_format("2025-01-15 10:30"),
            Some(DateFormat::Iso8601)
        );
        assert_eq!(detect_date_format("01/15/2025"), Some(DateFormat::Any));
        assert_eq!(detect_date_format("not a date"), None);
    }

    #[test]
    fn test_strict_format_rejects_time_component() {
        let err =
            validate_date_format(&json!("2025-01-15T10:30:00"), "transactionDate", DateFormat::DateOnly)
                .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].code, ErrorCode::DateFormatInvalid);
        assert!(err[0].message.contains("2025-01-15T10:30:00"));
        assert!(err[0].message.contains("YYYY-MM-DD"));
        assert!(err[0].message.contains("remove the time component"));
    }

    #[test]
    fn test_strict_format_accepts_plain_date() {
        let date = validate_date_format(&json!("2025-01-15"), "transactionDate", DateFormat::DateOnly)
            .unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_slash_dates_get_hyphen_hint() {
        let err = validate_date_format(&json!("01/15/2025"), "startDate", DateFormat::DateOnly)
            .unwrap_err();
        assert!(err[0].message.contains("use hyphens"));
    }

    #[test]
    fn test_wrong_segment_count_hint() {
        assert_eq!(date_format_hint("2025-01"), "format should be YYYY-MM-DD");
        assert_eq!(date_format_hint("2025-01-15T10:30"), "remove the time component");
        assert_eq!(date_format_hint("01/15/2025"), "use hyphens (-) instead of slashes");
    }

    #[test]
    fn test_null_empty_and_wrong_type() {
        let required = validate_date_format(&Value::Null, "d", DateFormat::DateOnly).unwrap_err();
        assert_eq!(required[0].code, ErrorCode::DateRequired);

        let empty = validate_date_format(&json!("   "), "d", DateFormat::DateOnly).unwrap_err();
        assert_eq!(empty[0].code, ErrorCode::DateEmpty);

        let wrong = validate_date_format(&json!(20250115), "d", DateFormat::DateOnly).unwrap_err();
        assert_eq!(wrong[0].code, ErrorCode::DateWrongType);
        assert!(wrong[0].message.contains("number"));
    }

    #[test]
    fn test_impossible_calendar_date() {
        let err = validate_date_format(&json!("2025-02-30"), "d", DateFormat::DateOnly).unwrap_err();
        assert_eq!(err[0].code, ErrorCode::DateFormatInvalid);
        assert!(err[0].message.contains("2025-02-30"));
    }

    #[test]
    fn test_permissive_format_accepts_timestamps() {
        let date =
            validate_date_format(&json!("2025-01-15T23:59:00Z"), "d", DateFormat::Any).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());

        let slashes = validate_date_format(&json!("01/15/2025"), "d", DateFormat::Any).unwrap();
        assert_eq!(slashes, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_boundaries_default_window() {
        let today = today_local();
        let options = DateBoundaryOptions::default();

        assert!(validate_date_boundaries(today, "d", &options).is_ok());

        let far_past = today.checked_sub_months(Months::new(25)).unwrap();
        let errs = validate_date_boundaries(far_past, "d", &options).unwrap_err();
        assert_eq!(errs[0].code, ErrorCode::DateTooOld);

        let far_future = today.checked_add_months(Months::new(25)).unwrap();
        let errs = validate_date_boundaries(far_future, "d", &options).unwrap_err();
        assert_eq!(errs[0].code, ErrorCode::DateTooFuture);
    }

    #[test]
    fn test_boundary_messages_embed_computed_boundary() {
        let today = today_local();
        let boundary = today.checked_sub_months(Months::new(12)).unwrap();
        let too_old = boundary.pred_opt().unwrap();

        let errs =
            validate_date_boundaries(too_old, "d", &DateBoundaryOptions::default()).unwrap_err();
        assert!(errs[0].message.contains(&boundary.to_string()));
        assert!(errs[0].message.contains(&too_old.to_string()));
    }

    #[test]
    fn test_huge_year_offsets_skip_relative_bounds() {
        let options = DateBoundaryOptions {
            past_years: Some(u32::MAX),
            future_years: Some(u32::MAX),
            min_date: None,
            max_date: None,
        };

        let ancient = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        assert!(validate_date_boundaries(ancient, "d", &options).is_ok());
    }

    #[test]
    fn test_absolute_min_max_bounds() {
        let options = DateBoundaryOptions {
            past_years: None,
            future_years: None,
            min_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            max_date: NaiveDate::from_ymd_opt(2020, 12, 31),
        };

        let before = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        let errs = validate_date_boundaries(before, "d", &options).unwrap_err();
        assert_eq!(errs[0].code, ErrorCode::DateBeforeMin);
        assert!(errs[0].message.contains("2020-01-01"));

        let after = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let errs = validate_date_boundaries(after, "d", &options).unwrap_err();
        assert_eq!(errs[0].code, ErrorCode::DateAfterMax);
    }

    #[test]
    fn test_range_collects_both_end_errors() {
        let errs = validate_date_range(&json!("bad"), &json!("also-bad"), "startDate", "endDate")
            .unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].field, "startDate");
        assert_eq!(errs[1].field, "endDate");
    }

    #[test]
    fn test_range_ordering() {
        let errs = validate_date_range(
            &json!("2025-06-01"),
            &json!("2025-01-01"),
            "startDate",
            "endDate",
        )
        .unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::DateRangeInvalid);

        let (start, end) = validate_date_range(
            &json!("2025-01-01"),
            &json!("2025-06-01"),
            "startDate",
            "endDate",
        )
        .unwrap();
        assert!(start < end);
    }

    #[test]
    fn test_normalize_round_trip() {
        for raw in ["2019-06-30", "2024-02-29", "2025-12-01"] {
            let parsed = parse_local_date(raw).unwrap();
            assert_eq!(normalize_date(parsed), raw);
        }
    }
}
