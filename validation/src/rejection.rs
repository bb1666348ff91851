//! Structured rejection raised by mutation entry points
//!
//! Read paths return `ValidationResult` and let callers decide; writes go
//! through [`ValidationRejection`], which carries the full error list plus
//! the HTTP shape (`400 Bad Request`) the frontend hooks expect. The wire
//! form is stable: `message`, `validationErrors`, `status`, `statusText`.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::error::ValidationError;
use crate::formatter::{error_summary, format_validation_errors, SUMMARY_ERROR_LIMIT};

/// How much detail a user-facing message carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Full grouped rendering, one bullet per field
    Full,
    /// One line, capped at a few errors
    Summary,
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ValidationRejection {
    pub message: String,
    pub validation_errors: Vec<ValidationError>,
    pub status: u16,
    pub status_text: String,
}

impl ValidationRejection {
    pub fn new(message: impl Into<String>, validation_errors: Vec<ValidationError>) -> Self {
        Self {
            message: message.into(),
            validation_errors,
            status: 400,
            status_text: "Bad Request".to_string(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.validation_errors.len()
    }

    /// Distinct fields in first-seen order
    pub fn error_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for error in &self.validation_errors {
            if !fields.iter().any(|f| f == &error.field) {
                fields.push(error.field.clone());
            }
        }
        fields
    }

    /// All errors grouped per field
    pub fn field_errors(&self) -> HashMap<String, Vec<ValidationError>> {
        let mut map: HashMap<String, Vec<ValidationError>> = HashMap::new();
        for error in &self.validation_errors {
            map.entry(error.field.clone()).or_default().push(error.clone());
        }
        map
    }

    /// First message per field, the shape form components bind to
    pub fn first_error_per_field(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for error in &self.validation_errors {
            map.entry(error.field.clone())
                .or_insert_with(|| error.message.clone());
        }
        map
    }

    pub fn field_validation_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.validation_errors
            .iter()
            .filter(|e| e.field == field)
            .collect()
    }

    pub fn field_error_message(&self, field: &str) -> Option<&str> {
        self.validation_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has_field_error(&self, field: &str) -> bool {
        self.validation_errors.iter().any(|e| e.field == field)
    }

    /// Render for display. Falls back to the top-level message when the
    /// rejection carries no field errors.
    pub fn user_message(&self, style: MessageStyle) -> String {
        if self.validation_errors.is_empty() {
            return self.message.clone();
        }
        match style {
            MessageStyle::Full => format_validation_errors(&self.validation_errors),
            MessageStyle::Summary => error_summary(&self.validation_errors, SUMMARY_ERROR_LIMIT),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({
                "message": self.message,
                "status": self.status,
                "statusText": self.status_text,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sample() -> ValidationRejection {
        ValidationRejection::new(
            "insertTransaction validation failed: bad amount, bad date",
            vec![
                ValidationError::new("amount", "first amount problem", ErrorCode::InvalidAmount),
                ValidationError::new(
                    "amount",
                    "second amount problem",
                    ErrorCode::AmountTooLarge,
                ),
                ValidationError::new(
                    "transactionDate",
                    "date problem",
                    ErrorCode::DateFormatInvalid,
                ),
            ],
        )
    }

    #[test]
    fn test_display_uses_message() {
        let rejection = sample();
        assert_eq!(
            rejection.to_string(),
            "insertTransaction validation failed: bad amount, bad date"
        );
        assert_eq!(rejection.status, 400);
        assert_eq!(rejection.status_text, "Bad Request");
    }

    #[test]
    fn test_first_error_per_field_keeps_first() {
        let map = sample().first_error_per_field();
        assert_eq!(map.len(), 2);
        assert_eq!(map["amount"], "first amount problem");
        assert_eq!(map["transactionDate"], "date problem");
    }

    #[test]
    fn test_field_accessors() {
        let rejection = sample();

        assert_eq!(rejection.error_count(), 3);
        assert_eq!(rejection.error_fields(), vec!["amount", "transactionDate"]);
        assert!(rejection.has_field_error("amount"));
        assert!(!rejection.has_field_error("guid"));
        assert_eq!(
            rejection.field_error_message("transactionDate"),
            Some("date problem")
        );
        assert_eq!(rejection.field_validation_errors("amount").len(), 2);
        assert_eq!(rejection.field_errors()["amount"].len(), 2);
    }

    #[test]
    fn test_user_message_styles() {
        let rejection = sample();

        let full = rejection.user_message(MessageStyle::Full);
        assert!(full.starts_with("Validation failed with 3 errors:"));
        assert!(full.contains("• Amount:"));

        let summary = rejection.user_message(MessageStyle::Summary);
        assert!(summary.contains("Amount: first amount problem"));
        assert!(!summary.contains('\n'));
    }

    #[test]
    fn test_user_message_falls_back_to_top_level() {
        let rejection = ValidationRejection::new("deleteAccount: Invalid accountId provided", vec![]);
        assert_eq!(
            rejection.user_message(MessageStyle::Full),
            "deleteAccount: Invalid accountId provided"
        );
    }

    #[test]
    fn test_wire_shape() {
        let json = sample().to_json();
        assert_eq!(json["status"], 400);
        assert_eq!(json["statusText"], "Bad Request");
        assert_eq!(json["validationErrors"].as_array().unwrap().len(), 3);
        assert_eq!(json["validationErrors"][0]["code"], "INVALID_AMOUNT");
        assert_eq!(json["validationErrors"][0]["field"], "amount");
    }
}
