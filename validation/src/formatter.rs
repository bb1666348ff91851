//! Human-readable rendering of validation errors
//!
//! Errors carry camelCase field names on the wire; everything a person reads
//! goes through here first so "accountNameOwner" becomes "Account Name".
//! Grouping and summaries keep first-seen field order, never alphabetical,
//! so the rendered text follows the order checks actually ran in.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{ErrorCode, ValidationError};

/// Errors shown before a summary truncates
pub const SUMMARY_ERROR_LIMIT: usize = 3;

/// Display labels for fields whose camelCase split reads poorly
static FIELD_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("accountNameOwner", "Account Name"),
        ("accountType", "Account Type"),
        ("transactionDate", "Transaction Date"),
        ("transactionState", "Transaction State"),
        ("transactionType", "Transaction Type"),
        ("reoccurringType", "Recurrence"),
        ("sourceAccount", "Source Account"),
        ("destinationAccount", "Destination Account"),
        ("guid", "GUID"),
        ("guidSource", "Source GUID"),
        ("guidDestination", "Destination GUID"),
        ("activeStatus", "Active Status"),
        ("categoryName", "Category Name"),
        ("descriptionName", "Description Name"),
        ("firstName", "First Name"),
        ("lastName", "Last Name"),
        ("dateRange", "Date Range"),
        ("rateLimit", "Rate Limit"),
        ("validation", "Validation"),
    ])
});

/// Turn a wire field name into a display label
pub fn format_field_name(field: &str) -> String {
    if let Some(label) = FIELD_LABELS.get(field) {
        return (*label).to_string();
    }

    // Fallback: split camelCase on uppercase letters and capitalize
    let mut label = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

/// Group errors by field, preserving first-seen field order
pub fn group_errors_by_field(
    errors: &[ValidationError],
) -> Vec<(String, Vec<&ValidationError>)> {
    let mut groups: Vec<(String, Vec<&ValidationError>)> = Vec::new();
    for error in errors {
        match groups.iter_mut().find(|(field, _)| field == &error.field) {
            Some((_, bucket)) => bucket.push(error),
            None => groups.push((error.field.clone(), vec![error])),
        }
    }
    groups
}

/// Render errors as display text.
///
/// No errors renders as an empty string, a single error as `Label: message`,
/// and several errors as a bulleted list grouped by field.
pub fn format_validation_errors(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    if errors.len() == 1 {
        return format!(
            "{}: {}",
            format_field_name(&errors[0].field),
            errors[0].message
        );
    }

    let mut lines = vec![format!("Validation failed with {} errors:", errors.len())];
    for (field, group) in group_errors_by_field(errors) {
        let label = format_field_name(&field);
        if group.len() == 1 {
            lines.push(format!("• {}: {}", label, group[0].message));
        } else {
            lines.push(format!("• {}:", label));
            for error in group {
                lines.push(format!("  - {}", error.message));
            }
        }
    }
    lines.join("\n")
}

/// One-line summary capped at `max_errors` entries
pub fn error_summary(errors: &[ValidationError], max_errors: usize) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let shown: Vec<String> = errors
        .iter()
        .take(max_errors)
        .map(|e| format!("{}: {}", format_field_name(&e.field), e.message))
        .collect();

    let mut summary = shown.join("; ");
    if errors.len() > max_errors {
        summary.push_str(&format!(
            " ...and {} more error(s)",
            errors.len() - max_errors
        ));
    }
    summary
}

// ─────────────────────────────────────────────────────────────────────────────
// Severity
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Advisory codes render as warnings and never block a mutation
pub fn error_severity(code: ErrorCode) -> Severity {
    match code {
        ErrorCode::SuspiciousAmount | ErrorCode::UnusualDate | ErrorCode::PotentialDuplicate => {
            Severity::Warning
        }
        ErrorCode::Notice => Severity::Info,
        _ => Severity::Error,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Structured report
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable report handed to API layers and log pipelines
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub summary: String,
    pub field_count: usize,
    pub error_count: usize,
    pub fields: Vec<String>,
    pub errors: Vec<ValidationError>,
}

pub fn create_error_report(errors: &[ValidationError]) -> ErrorReport {
    let groups = group_errors_by_field(errors);
    ErrorReport {
        summary: error_summary(errors, SUMMARY_ERROR_LIMIT),
        field_count: groups.len(),
        error_count: errors.len(),
        fields: groups.into_iter().map(|(field, _)| field).collect(),
        errors: errors.to_vec(),
    }
}

/// Trace the shape of a failed pass, one event per field group. Field names
/// and codes only; messages echo user input and stay out of logs.
pub fn log_validation_errors(operation: &str, errors: &[ValidationError]) {
    if errors.is_empty() {
        return;
    }
    for (field, group) in group_errors_by_field(errors) {
        let codes: Vec<&str> = group.iter().map(|e| e.code.as_str()).collect();
        tracing::debug!(
            operation,
            field = field.as_str(),
            error_count = group.len(),
            codes = ?codes,
            "validation errors rendered"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(field: &str, message: &str, code: ErrorCode) -> ValidationError {
        ValidationError::new(field, message, code)
    }

    #[test]
    fn test_format_field_name() {
        assert_eq!(format_field_name("accountNameOwner"), "Account Name");
        assert_eq!(format_field_name("guid"), "GUID");
        assert_eq!(format_field_name("amount"), "Amount");
        assert_eq!(format_field_name("paymentId"), "Payment Id");
        assert_eq!(format_field_name("someUnknownField"), "Some Unknown Field");
    }

    #[test]
    fn test_format_no_errors() {
        assert_eq!(format_validation_errors(&[]), "");
    }

    #[test]
    fn test_format_single_error() {
        let errors = vec![error(
            "amount",
            "must have at most 2 decimal places, got: \"1.005\"",
            ErrorCode::AmountPrecisionExceeded,
        )];
        assert_eq!(
            format_validation_errors(&errors),
            "Amount: must have at most 2 decimal places, got: \"1.005\""
        );
    }

    #[test]
    fn test_format_groups_by_field_in_first_seen_order() {
        let errors = vec![
            error("amount", "first amount problem", ErrorCode::InvalidAmount),
            error("transactionDate", "date problem", ErrorCode::DateFormatInvalid),
            error("amount", "second amount problem", ErrorCode::AmountTooLarge),
        ];

        let text = format_validation_errors(&errors);
        assert!(text.starts_with("Validation failed with 3 errors:"));
        assert!(text.contains("• Amount:\n  - first amount problem\n  - second amount problem"));
        assert!(text.contains("• Transaction Date: date problem"));

        let amount_at = text.find("• Amount").unwrap();
        let date_at = text.find("• Transaction Date").unwrap();
        assert!(amount_at < date_at);
    }

    #[test]
    fn test_error_summary_truncates() {
        let errors: Vec<ValidationError> = (0..5)
            .map(|i| error(&format!("field{}", i), "bad", ErrorCode::ValidationError))
            .collect();

        let summary = error_summary(&errors, 3);
        assert!(summary.contains("Field0: bad"));
        assert!(summary.contains("Field2: bad"));
        assert!(!summary.contains("Field3"));
        assert!(summary.ends_with("...and 2 more error(s)"));
    }

    #[test]
    fn test_error_summary_short_list_is_not_truncated() {
        let errors = vec![error("amount", "bad", ErrorCode::InvalidAmount)];
        assert_eq!(error_summary(&errors, 3), "Amount: bad");
    }

    #[test]
    fn test_severity_classification() {
        assert_eq!(error_severity(ErrorCode::SuspiciousAmount), Severity::Warning);
        assert_eq!(error_severity(ErrorCode::UnusualDate), Severity::Warning);
        assert_eq!(error_severity(ErrorCode::PotentialDuplicate), Severity::Warning);
        assert_eq!(error_severity(ErrorCode::Notice), Severity::Info);
        assert_eq!(error_severity(ErrorCode::RequiredField), Severity::Error);
        assert_eq!(error_severity(ErrorCode::Other), Severity::Error);
    }

    #[test]
    fn test_create_error_report() {
        let errors = vec![
            error("amount", "one", ErrorCode::InvalidAmount),
            error("amount", "two", ErrorCode::AmountTooLarge),
            error("guid", "three", ErrorCode::InvalidGuid),
        ];

        let report = create_error_report(&errors);
        assert_eq!(report.error_count, 3);
        assert_eq!(report.field_count, 2);
        assert_eq!(report.fields, vec!["amount", "guid"]);
        assert!(report.summary.contains("Amount: one"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errorCount"], 3);
        assert_eq!(json["fieldCount"], 2);
    }

    #[test]
    fn test_log_validation_errors_accepts_grouped_input() {
        log_validation_errors("insertTransaction", &[]);
        log_validation_errors(
            "insertTransaction",
            &[
                error("amount", "one", ErrorCode::InvalidAmount),
                error("amount", "two", ErrorCode::AmountPrecisionExceeded),
                error("transactionDate", "three", ErrorCode::DateFormatInvalid),
            ],
        );
    }
}
