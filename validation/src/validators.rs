//! Field validators
//!
//! Reusable checks for the field types that appear across the finance
//! entities. Each returns `Result<(), Violation>`; the caller binds the
//! violation to a field name through the `ValidationBuilder`.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{ErrorCode, Violation};
use shared::FINANCIAL_LIMITS;

lazy_static! {
    /// Account names: letters, digits, underscores and hyphens
    pub static ref ACCOUNT_NAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();

    /// Usernames additionally allow dots
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap();

    /// Category names allow single spaces between words
    static ref CATEGORY_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_\- ]+$").unwrap();

    /// Account monikers are exactly four digits
    static ref MONIKER_REGEX: Regex = Regex::new(r"^\d{4}$").unwrap();
}

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field_name: &str) -> Result<(), Violation> {
    if value.trim().is_empty() {
        return Err(Violation::new(
            format!("{} is required", field_name),
            ErrorCode::RequiredField,
        ));
    }
    Ok(())
}

/// Validate string length within bounds
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), Violation> {
    let len = value.chars().count();
    if len < min {
        return Err(Violation::new(
            format!("must be at least {} characters", min),
            ErrorCode::MinLengthRequired,
        ));
    }
    if len > max {
        return Err(Violation::new(
            format!("must be at most {} characters", max),
            ErrorCode::MaxLengthExceeded,
        ));
    }
    Ok(())
}

/// Validate an account name: required, length bounds, restricted charset
pub fn validate_account_name(value: &str) -> Result<(), Violation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Violation::new(
            "account name is required",
            ErrorCode::RequiredField,
        ));
    }
    let len = trimmed.chars().count();
    if len < FINANCIAL_LIMITS.min_account_name_length
        || len > FINANCIAL_LIMITS.max_account_name_length
    {
        return Err(Violation::new(
            format!(
                "must be {}-{} characters, got: \"{}\"",
                FINANCIAL_LIMITS.min_account_name_length,
                FINANCIAL_LIMITS.max_account_name_length,
                trimmed
            ),
            ErrorCode::InvalidAccountName,
        ));
    }
    if !ACCOUNT_NAME_REGEX.is_match(trimmed) {
        return Err(Violation::new(
            format!(
                "may only contain letters, digits, underscores and hyphens, got: \"{}\"",
                trimmed
            ),
            ErrorCode::InvalidAccountName,
        ));
    }
    Ok(())
}

/// Validate a username: length bounds plus a dotted charset
pub fn validate_username(value: &str) -> Result<(), Violation> {
    validate_required(value, "username")?;
    validate_length(
        value,
        FINANCIAL_LIMITS.min_username_length,
        FINANCIAL_LIMITS.max_username_length,
    )?;
    if !USERNAME_REGEX.is_match(value) {
        return Err(Violation::new(
            format!(
                "may only contain letters, digits, dots, underscores and hyphens, got: \"{}\"",
                value
            ),
            ErrorCode::InvalidCharacters,
        ));
    }
    Ok(())
}

/// Validate a category name: restricted charset with spaces allowed
pub fn validate_category_name(value: &str) -> Result<(), Violation> {
    if !CATEGORY_REGEX.is_match(value) {
        return Err(Violation::new(
            format!(
                "may only contain letters, digits, spaces, underscores and hyphens, got: \"{}\"",
                value
            ),
            ErrorCode::InvalidCharacters,
        ));
    }
    Ok(())
}

/// Validate an account moniker: exactly four digits
pub fn validate_moniker(value: &str) -> Result<(), Violation> {
    if !MONIKER_REGEX.is_match(value) {
        return Err(Violation::new(
            format!("must be a 4-digit moniker, got: \"{}\"", value),
            ErrorCode::InvalidCharacters,
        ));
    }
    Ok(())
}

/// Validate GUID shape
pub fn validate_guid(value: &str) -> Result<(), Violation> {
    if uuid::Uuid::parse_str(value.trim()).is_err() {
        return Err(Violation::new(
            format!(
                "must be a valid GUID (e.g., 123e4567-e89b-12d3-a456-426614174000), got: \"{}\"",
                value
            ),
            ErrorCode::InvalidGuid,
        ));
    }
    Ok(())
}

/// Validate that a JSON value is a non-negative integer ID
pub fn validate_numeric_id(value: &Value) -> Result<(), Violation> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(id) if id >= 0 => Ok(()),
            Some(id) => Err(Violation::new(
                format!("must be a non-negative ID, got: {}", id),
                ErrorCode::InvalidNumericId,
            )),
            None => Err(Violation::new(
                format!("must be an integer ID, got: {}", n),
                ErrorCode::InvalidNumericId,
            )),
        },
        other => Err(Violation::new(
            format!("must be a numeric ID, got: {}", other),
            ErrorCode::InvalidNumericId,
        )),
    }
}

/// Validate an amount against the process-wide range limits
pub fn validate_amount_range(amount: Decimal) -> Result<(), Violation> {
    if amount > FINANCIAL_LIMITS.max_amount {
        return Err(Violation::new(
            format!(
                "exceeds the maximum allowed amount of {}, got: {}",
                FINANCIAL_LIMITS.max_amount, amount
            ),
            ErrorCode::AmountTooLarge,
        ));
    }
    if amount < FINANCIAL_LIMITS.min_amount {
        return Err(Violation::new(
            format!(
                "is below the minimum allowed amount of {}, got: {}",
                FINANCIAL_LIMITS.min_amount, amount
            ),
            ErrorCode::InvalidAmount,
        ));
    }
    Ok(())
}

/// Validate that an amount is strictly positive (payments and transfers)
pub fn validate_amount_positive(amount: Decimal) -> Result<(), Violation> {
    if amount <= Decimal::ZERO {
        return Err(Violation::new(
            format!("must be greater than zero, got: {}", amount),
            ErrorCode::InvalidAmount,
        ));
    }
    Ok(())
}

/// Validate decimal precision by decomposing the textual amount.
///
/// Runs on the literal characters the client sent, so trailing zeros count:
/// `"1.000"` has three places even though its value is whole.
pub fn validate_amount_precision(raw: &str) -> Result<(), Violation> {
    let digits = raw.trim().trim_start_matches(['-', '+']);
    if let Some((_, fraction)) = digits.split_once('.') {
        let places = fraction.chars().take_while(|c| c.is_ascii_digit()).count();
        if places > FINANCIAL_LIMITS.max_decimal_places as usize {
            return Err(Violation::new(
                format!(
                    "must have at most {} decimal places, got: \"{}\"",
                    FINANCIAL_LIMITS.max_decimal_places, raw
                ),
                ErrorCode::AmountPrecisionExceeded,
            ));
        }
    }
    Ok(())
}

/// Validate enum membership; the message names the allowed set
pub fn validate_enum(value: &str, allowed: &'static [&'static str]) -> Result<(), Violation> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Violation::new(
            format!("must be one of: {}, got: \"{}\"", allowed.join(", "), value),
            ErrorCode::InvalidEnumValue,
        ))
    }
}

/// Validate that a JSON value is a non-empty array
pub fn validate_non_empty_array(value: &Value) -> Result<(), Violation> {
    match value {
        Value::Array(items) if !items.is_empty() => Ok(()),
        Value::Array(_) => Err(Violation::new(
            "must be a non-empty array",
            ErrorCode::EmptyArray,
        )),
        _ => Err(Violation::new(
            "must be an array",
            ErrorCode::InvalidType,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("value", "field").is_ok());
        let err = validate_required("   ", "description").unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "description is required");
    }

    #[test]
    fn test_validate_length() {
        assert!(validate_length("hello", 1, 10).is_ok());
        assert_eq!(
            validate_length("", 1, 10).unwrap_err().code,
            ErrorCode::MinLengthRequired
        );
        assert_eq!(
            validate_length("hello world!", 1, 5).unwrap_err().code,
            ErrorCode::MaxLengthExceeded
        );
    }

    #[test]
    fn test_validate_account_name() {
        assert!(validate_account_name("checking_primary").is_ok());
        assert!(validate_account_name("savings-2024").is_ok());

        let charset = validate_account_name("has spaces").unwrap_err();
        assert_eq!(charset.code, ErrorCode::InvalidAccountName);
        assert!(charset.message.contains("has spaces"));

        assert_eq!(
            validate_account_name("ab").unwrap_err().code,
            ErrorCode::InvalidAccountName
        );
        assert_eq!(
            validate_account_name("").unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn test_validate_guid() {
        assert!(validate_guid("123e4567-e89b-12d3-a456-426614174000").is_ok());
        let err = validate_guid("not-a-guid").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidGuid);
        assert!(err.message.contains("not-a-guid"));
    }

    #[test]
    fn test_validate_numeric_id() {
        assert!(validate_numeric_id(&json!(42)).is_ok());
        assert!(validate_numeric_id(&json!(0)).is_ok());
        assert_eq!(
            validate_numeric_id(&json!(-1)).unwrap_err().code,
            ErrorCode::InvalidNumericId
        );
        assert_eq!(
            validate_numeric_id(&json!("42")).unwrap_err().code,
            ErrorCode::InvalidNumericId
        );
        assert_eq!(
            validate_numeric_id(&json!(1.5)).unwrap_err().code,
            ErrorCode::InvalidNumericId
        );
    }

    #[test]
    fn test_validate_amount_range() {
        assert!(validate_amount_range(dec!(999_999_999.99)).is_ok());
        assert!(validate_amount_range(dec!(-999_999_999.99)).is_ok());

        let too_large = validate_amount_range(dec!(1_000_000_000)).unwrap_err();
        assert_eq!(too_large.code, ErrorCode::AmountTooLarge);
        assert!(too_large.message.contains("999999999.99"));

        assert_eq!(
            validate_amount_range(dec!(-1_000_000_000)).unwrap_err().code,
            ErrorCode::InvalidAmount
        );
    }

    #[test]
    fn test_validate_amount_precision() {
        assert!(validate_amount_precision("123.45").is_ok());
        assert!(validate_amount_precision("123").is_ok());
        assert!(validate_amount_precision("-0.5").is_ok());

        let err = validate_amount_precision("123.456").unwrap_err();
        assert_eq!(err.code, ErrorCode::AmountPrecisionExceeded);
        assert!(err.message.contains("123.456"));
    }

    #[test]
    fn test_validate_enum() {
        let allowed: &'static [&'static str] = &["cleared", "outstanding", "future"];
        assert!(validate_enum("cleared", allowed).is_ok());

        let err = validate_enum("pending", allowed).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEnumValue);
        assert!(err.message.contains("cleared, outstanding, future"));
        assert!(err.message.contains("pending"));
    }

    #[test]
    fn test_validate_non_empty_array() {
        assert!(validate_non_empty_array(&json!([1])).is_ok());
        assert_eq!(
            validate_non_empty_array(&json!([])).unwrap_err().code,
            ErrorCode::EmptyArray
        );
        assert_eq!(
            validate_non_empty_array(&json!("nope")).unwrap_err().code,
            ErrorCode::InvalidType
        );
    }

    #[test]
    fn test_validate_moniker() {
        assert!(validate_moniker("0000").is_ok());
        assert!(validate_moniker("1234").is_ok());
        assert!(validate_moniker("12a4").is_err());
        assert!(validate_moniker("12345").is_err());
    }
}
