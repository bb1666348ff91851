//! Schema validation for the finance entities
//!
//! Each `validate_*` function takes raw JSON, checks every field rule and
//! collects every failure before answering, then decodes the value into its
//! typed entity. Field checks never stop at the first problem; a client
//! submitting three bad fields hears about all three at once.
//!
//! Decoding only runs after a clean pass, so a decode failure here means the
//! field checks and the entity definition have drifted apart. That case is
//! reported as a single generic error rather than a panic.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use shared::{
    Account, AccountType, Category, Description, Payment, ReoccurringType, Transaction,
    TransactionState, TransactionType, Transfer, User, FINANCIAL_LIMITS,
};

use crate::dates::{
    json_type_name, normalize_date, validate_date_format, DateFormat,
};
use crate::error::{ErrorCode, ValidationBuilder, ValidationError, ValidationResult};
use crate::validators::{
    validate_account_name, validate_amount_positive, validate_amount_precision,
    validate_amount_range, validate_category_name, validate_enum, validate_guid, validate_length,
    validate_moniker, validate_numeric_id, validate_username,
};

// ─────────────────────────────────────────────────────────────────────────────
// Field extraction helpers
// ─────────────────────────────────────────────────────────────────────────────

fn as_object(raw: &Value) -> Result<&Map<String, Value>, Vec<ValidationError>> {
    match raw {
        Value::Object(map) => Ok(map),
        other => Err(vec![ValidationError::new(
            "value",
            format!(
                "must be a JSON object, got a {} value",
                json_type_name(other)
            ),
            ErrorCode::InvalidType,
        )]),
    }
}

/// Pull a required string field. Missing, null, blank and wrong-typed values
/// each record an error and yield `None` so later checks are skipped for this
/// field while the rest of the object is still validated.
fn required_string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    builder: &mut ValidationBuilder,
) -> Option<&'a str> {
    match obj.get(key) {
        None | Some(Value::Null) => {
            builder.add_error(key, &format!("{} is required", key), ErrorCode::RequiredField);
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            builder.add_error(key, &format!("{} is required", key), ErrorCode::RequiredField);
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            builder.add_error(
                key,
                &format!("must be a string, got a {} value", json_type_name(other)),
                ErrorCode::InvalidType,
            );
            None
        }
    }
}

/// Pull an optional string field. Absent, null and blank values are treated
/// as "not provided" rather than errors.
fn optional_string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    builder: &mut ValidationBuilder,
) -> Option<&'a str> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            builder.add_error(
                key,
                &format!("must be a string, got a {} value", json_type_name(other)),
                ErrorCode::InvalidType,
            );
            None
        }
    }
}

fn optional_bool(obj: &Map<String, Value>, key: &str, builder: &mut ValidationBuilder) {
    match obj.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(_)) => {}
        Some(other) => {
            builder.add_error(
                key,
                &format!("must be a boolean, got a {} value", json_type_name(other)),
                ErrorCode::InvalidType,
            );
        }
    }
}

fn optional_id(obj: &Map<String, Value>, key: &str, builder: &mut ValidationBuilder) {
    if let Some(id_value) = obj.get(key).filter(|v| !v.is_null()) {
        builder.check(key, || validate_numeric_id(id_value));
    }
}

fn optional_guid(obj: &Map<String, Value>, key: &str, builder: &mut ValidationBuilder) {
    if let Some(guid) = optional_string(obj, key, builder) {
        builder.check(key, || validate_guid(guid));
    }
}

/// Parse an amount field into a `Decimal`, running the textual precision
/// check on the exact characters the client sent.
fn parse_amount(
    value: &Value,
    key: &str,
    builder: &mut ValidationBuilder,
) -> Option<rust_decimal::Decimal> {
    let raw_text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            builder.add_error(
                key,
                &format!(
                    "must be a number or numeric string, got a {} value",
                    json_type_name(other)
                ),
                ErrorCode::InvalidType,
            );
            return None;
        }
    };

    let amount = match raw_text.parse::<rust_decimal::Decimal>() {
        Ok(amount) => amount,
        Err(_) => {
            builder.add_error(
                key,
                &format!("must be a valid decimal amount, got: \"{}\"", raw_text),
                ErrorCode::InvalidAmount,
            );
            return None;
        }
    };

    builder.check(key, || validate_amount_precision(&raw_text));
    Some(amount)
}

fn required_amount(
    obj: &Map<String, Value>,
    key: &str,
    builder: &mut ValidationBuilder,
) -> Option<rust_decimal::Decimal> {
    match obj.get(key) {
        None | Some(Value::Null) => {
            builder.add_error(key, &format!("{} is required", key), ErrorCode::RequiredField);
            None
        }
        Some(value) => parse_amount(value, key, builder),
    }
}

fn optional_amount(
    obj: &Map<String, Value>,
    key: &str,
    builder: &mut ValidationBuilder,
) -> Option<rust_decimal::Decimal> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => parse_amount(value, key, builder),
    }
}

/// Decode a validated value into its typed entity. Runs only after a clean
/// field pass; a failure here is an internal inconsistency, not user error.
///
/// Explicit nulls are dropped first. The field checks treat null as "not
/// provided", and serde defaults only apply to absent keys.
fn finalize<T: DeserializeOwned>(builder: ValidationBuilder, prepared: Value) -> ValidationResult<T> {
    builder.build()?;
    let prepared = match prepared {
        Value::Object(mut obj) => {
            obj.retain(|_, v| !v.is_null());
            Value::Object(obj)
        }
        other => other,
    };
    match serde_json::from_value(prepared) {
        Ok(entity) => Ok(entity),
        Err(err) => {
            tracing::error!(error = %err, "typed decode failed after field checks passed");
            Err(vec![ValidationError::internal()])
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

pub fn validate_user(raw: &Value) -> ValidationResult<User> {
    let obj = as_object(raw)?;
    let mut builder = ValidationBuilder::new();

    optional_id(obj, "userId", &mut builder);

    // username: required, 3-50 characters, dotted charset
    if let Some(username) = required_string(obj, "username", &mut builder) {
        builder.check("username", || validate_username(username));
    }

    // password: required, 8-255 characters. Length messages never echo the
    // value, so the password cannot leak through an error response.
    if let Some(password) = required_string(obj, "password", &mut builder) {
        builder.check("password", || {
            validate_length(
                password,
                FINANCIAL_LIMITS.min_password_length,
                FINANCIAL_LIMITS.max_password_length,
            )
        });
    }

    // firstName / lastName: optional, bounded length
    if let Some(first_name) = optional_string(obj, "firstName", &mut builder) {
        builder.check("firstName", || {
            validate_length(first_name, 1, FINANCIAL_LIMITS.max_person_name_length)
        });
    }
    if let Some(last_name) = optional_string(obj, "lastName", &mut builder) {
        builder.check("lastName", || {
            validate_length(last_name, 1, FINANCIAL_LIMITS.max_person_name_length)
        });
    }

    finalize(builder, raw.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Account
// ─────────────────────────────────────────────────────────────────────────────

pub fn validate_account(raw: &Value) -> ValidationResult<Account> {
    let obj = as_object(raw)?;
    let mut builder = ValidationBuilder::new();

    optional_id(obj, "accountId", &mut builder);

    // accountNameOwner: required, 3-40 characters, restricted charset
    if let Some(name) = required_string(obj, "accountNameOwner", &mut builder) {
        builder.check("accountNameOwner", || validate_account_name(name));
    }

    // accountType: required, one of the known kinds
    if let Some(account_type) = required_string(obj, "accountType", &mut builder) {
        builder.check("accountType", || {
            validate_enum(account_type, AccountType::allowed_values())
        });
    }

    optional_bool(obj, "activeStatus", &mut builder);

    // moniker: optional, exactly four digits when present
    if let Some(moniker) = optional_string(obj, "moniker", &mut builder) {
        builder.check("moniker", || validate_moniker(moniker));
    }

    // running totals: optional, bounded like any other amount
    for key in ["cleared", "outstanding", "future"] {
        if let Some(amount) = optional_amount(obj, key, &mut builder) {
            builder.check(key, || validate_amount_range(amount));
        }
    }

    finalize(builder, raw.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction
// ─────────────────────────────────────────────────────────────────────────────

pub fn validate_transaction(raw: &Value) -> ValidationResult<Transaction> {
    let obj = as_object(raw)?;
    let mut builder = ValidationBuilder::new();

    optional_id(obj, "transactionId", &mut builder);
    optional_guid(obj, "guid", &mut builder);

    if let Some(name) = required_string(obj, "accountNameOwner", &mut builder) {
        builder.check("accountNameOwner", || validate_account_name(name));
    }

    // transactionDate: permissive, any parseable representation; the parsed
    // date is written back in canonical form before decoding
    let date_value = obj.get("transactionDate").cloned().unwrap_or(Value::Null);
    let transaction_date =
        match validate_date_format(&date_value, "transactionDate", DateFormat::Any) {
            Ok(date) => Some(date),
            Err(errors) => {
                for error in errors {
                    builder.add_error(&error.field, &error.message, error.code);
                }
                None
            }
        };

    // description: required, 1-75 characters
    if let Some(description) = required_string(obj, "description", &mut builder) {
        builder.check("description", || {
            validate_length(description, 1, FINANCIAL_LIMITS.max_description_length)
        });
    }

    // category: optional, bounded length, restricted charset
    if let Some(category) = optional_string(obj, "category", &mut builder) {
        builder
            .check("category", || {
                validate_length(category, 1, FINANCIAL_LIMITS.max_category_length)
            })
            .check("category", || validate_category_name(category));
    }

    // amount: required, two decimal places, inside the global range
    if let Some(amount) = required_amount(obj, "amount", &mut builder) {
        builder.check("amount", || validate_amount_range(amount));
    }

    // transactionState: required enum; type and recurrence are optional
    if let Some(state) = required_string(obj, "transactionState", &mut builder) {
        builder.check("transactionState", || {
            validate_enum(state, TransactionState::allowed_values())
        });
    }
    if let Some(kind) = optional_string(obj, "transactionType", &mut builder) {
        builder.check("transactionType", || {
            validate_enum(kind, TransactionType::allowed_values())
        });
    }
    if let Some(reoccurring) = optional_string(obj, "reoccurringType", &mut builder) {
        builder.check("reoccurringType", || {
            validate_enum(reoccurring, ReoccurringType::allowed_values())
        });
    }

    // notes: optional, bounded length
    if let Some(notes) = optional_string(obj, "notes", &mut builder) {
        builder.check("notes", || {
            validate_length(notes, 1, FINANCIAL_LIMITS.max_notes_length)
        });
    }

    optional_bool(obj, "activeStatus", &mut builder);

    let mut prepared = obj.clone();
    if let Some(date) = transaction_date {
        prepared.insert(
            "transactionDate".to_string(),
            Value::String(normalize_date(date)),
        );
    }
    finalize(builder, Value::Object(prepared))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment and Transfer
// ─────────────────────────────────────────────────────────────────────────────

/// Payments and transfers share one shape: two account names, a strict
/// date-only transaction date, a strictly positive amount and optional GUIDs.
fn validate_account_pair(
    obj: &Map<String, Value>,
    id_key: &str,
    builder: &mut ValidationBuilder,
) {
    optional_id(obj, id_key, builder);

    if let Some(source) = required_string(obj, "sourceAccount", builder) {
        builder.check("sourceAccount", || validate_account_name(source));
    }
    if let Some(destination) = required_string(obj, "destinationAccount", builder) {
        builder.check("destinationAccount", || validate_account_name(destination));
    }

    // transactionDate: strict date-only, time components rejected
    let date_value = obj.get("transactionDate").cloned().unwrap_or(Value::Null);
    if let Err(errors) = validate_date_format(&date_value, "transactionDate", DateFormat::DateOnly)
    {
        for error in errors {
            builder.add_error(&error.field, &error.message, error.code);
        }
    }

    // amount: required, strictly positive, inside the global range
    if let Some(amount) = required_amount(obj, "amount", builder) {
        builder
            .check("amount", || validate_amount_positive(amount))
            .check("amount", || validate_amount_range(amount));
    }

    optional_guid(obj, "guidSource", builder);
    optional_guid(obj, "guidDestination", builder);
    optional_bool(obj, "activeStatus", builder);
}

pub fn validate_payment(raw: &Value) -> ValidationResult<Payment> {
    let obj = as_object(raw)?;
    let mut builder = ValidationBuilder::new();
    validate_account_pair(obj, "paymentId", &mut builder);
    finalize(builder, raw.clone())
}

pub fn validate_transfer(raw: &Value) -> ValidationResult<Transfer> {
    let obj = as_object(raw)?;
    let mut builder = ValidationBuilder::new();
    validate_account_pair(obj, "transferId", &mut builder);
    finalize(builder, raw.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Category and Description
// ─────────────────────────────────────────────────────────────────────────────

pub fn validate_category(raw: &Value) -> ValidationResult<Category> {
    let obj = as_object(raw)?;
    let mut builder = ValidationBuilder::new();

    optional_id(obj, "categoryId", &mut builder);

    if let Some(name) = required_string(obj, "categoryName", &mut builder) {
        builder
            .check("categoryName", || {
                validate_length(name, 1, FINANCIAL_LIMITS.max_category_length)
            })
            .check("categoryName", || validate_category_name(name));
    }

    optional_bool(obj, "activeStatus", &mut builder);
    finalize(builder, raw.clone())
}

pub fn validate_description(raw: &Value) -> ValidationResult<Description> {
    let obj = as_object(raw)?;
    let mut builder = ValidationBuilder::new();

    optional_id(obj, "descriptionId", &mut builder);

    if let Some(name) = required_string(obj, "descriptionName", &mut builder) {
        builder.check("descriptionName", || {
            validate_length(name, 1, FINANCIAL_LIMITS.max_description_length)
        });
    }

    optional_bool(obj, "activeStatus", &mut builder);
    finalize(builder, raw.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn valid_transaction_json() -> Value {
        json!({
            "accountNameOwner": "checking_primary",
            "transactionDate": "2025-01-15",
            "description": "grocery store",
            "category": "groceries",
            "amount": "42.50",
            "transactionState": "cleared",
            "transactionType": "expense",
            "reoccurringType": "onetime",
            "notes": ""
        })
    }

    #[test]
    fn test_validate_transaction_happy_path() {
        let transaction = validate_transaction(&valid_transaction_json()).unwrap();
        assert_eq!(transaction.account_name_owner, "checking_primary");
        assert_eq!(
            transaction.transaction_date,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        assert_eq!(transaction.amount, dec!(42.50));
        assert_eq!(transaction.transaction_state, shared::TransactionState::Cleared);
        assert!(transaction.active_status);
        assert_eq!(transaction.notes, "");
    }

    #[test]
    fn test_validate_transaction_collects_all_errors() {
        let raw = json!({
            "accountNameOwner": "a!",
            "transactionDate": "not-a-date",
            "description": "",
            "amount": "12.345",
            "transactionState": "pending"
        });

        let errors = validate_transaction(&raw).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"accountNameOwner"));
        assert!(fields.contains(&"transactionDate"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"amount"));
        assert!(fields.contains(&"transactionState"));
        assert!(errors.len() >= 5);
    }

    #[test]
    fn test_validate_transaction_normalizes_permissive_date() {
        let mut raw = valid_transaction_json();
        raw["transactionDate"] = json!("2025-01-15T10:30:00Z");

        let transaction = validate_transaction(&raw).unwrap();
        assert_eq!(
            transaction.transaction_date,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_explicit_nulls_fall_back_to_defaults() {
        let raw = json!({
            "transactionId": null,
            "accountNameOwner": "checking_primary",
            "transactionDate": "2025-01-15",
            "description": "groceries",
            "category": null,
            "amount": "12.34",
            "transactionState": "cleared",
            "transactionType": null,
            "notes": null,
            "activeStatus": null
        });

        let transaction = validate_transaction(&raw).unwrap();
        assert_eq!(transaction.transaction_id, None);
        assert_eq!(transaction.category, "");
        assert_eq!(transaction.transaction_type, shared::TransactionType::Undefined);
        assert!(transaction.active_status);
    }

    #[test]
    fn test_validate_transaction_number_amount() {
        let mut raw = valid_transaction_json();
        raw["amount"] = json!(-17.25);

        let transaction = validate_transaction(&raw).unwrap();
        assert_eq!(transaction.amount, dec!(-17.25));
    }

    #[test]
    fn test_validate_transaction_rejects_bad_guid() {
        let mut raw = valid_transaction_json();
        raw["guid"] = json!("not-a-guid");

        let errors = validate_transaction(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "guid");
        assert_eq!(errors[0].code, ErrorCode::InvalidGuid);
    }

    fn valid_payment_json() -> Value {
        json!({
            "sourceAccount": "checking_primary",
            "destinationAccount": "visa_card",
            "transactionDate": "2025-01-15",
            "amount": "100.00"
        })
    }

    #[test]
    fn test_validate_payment_happy_path() {
        let payment = validate_payment(&valid_payment_json()).unwrap();
        assert_eq!(payment.source_account, "checking_primary");
        assert_eq!(payment.amount, dec!(100.00));
        assert!(payment.active_status);
        assert_eq!(payment.guid_source, None);
    }

    #[test]
    fn test_validate_payment_rejects_datetime() {
        let mut raw = valid_payment_json();
        raw["transactionDate"] = json!("2025-10-01 10:30");

        let errors = validate_payment(&raw).unwrap_err();
        let date_error = errors
            .iter()
            .find(|e| e.field == "transactionDate")
            .unwrap();
        assert_eq!(date_error.code, ErrorCode::DateFormatInvalid);
        assert!(date_error.message.contains("YYYY-MM-DD"));
        assert!(date_error.message.contains("2025-10-01 10:30"));
    }

    #[test]
    fn test_validate_payment_requires_positive_amount() {
        let mut raw = valid_payment_json();
        raw["amount"] = json!("0.00");

        let errors = validate_payment(&raw).unwrap_err();
        assert_eq!(errors[0].field, "amount");
        assert_eq!(errors[0].code, ErrorCode::InvalidAmount);

        raw["amount"] = json!("-50.00");
        let errors = validate_payment(&raw).unwrap_err();
        assert_eq!(errors[0].code, ErrorCode::InvalidAmount);
    }

    #[test]
    fn test_validate_account_defaults() {
        let raw = json!({
            "accountNameOwner": "savings_house",
            "accountType": "debit"
        });

        let account = validate_account(&raw).unwrap();
        assert!(account.active_status);
        assert_eq!(account.moniker, "0000");
        assert_eq!(account.cleared, rust_decimal::Decimal::ZERO);
    }

    #[test]
    fn test_validate_account_rejects_unknown_type() {
        let raw = json!({
            "accountNameOwner": "savings_house",
            "accountType": "crypto"
        });

        let errors = validate_account(&raw).unwrap_err();
        assert_eq!(errors[0].field, "accountType");
        assert_eq!(errors[0].code, ErrorCode::InvalidEnumValue);
        assert!(errors[0].message.contains("credit, debit"));
    }

    #[test]
    fn test_validate_user_never_echoes_password() {
        let raw = json!({
            "username": "valid_user",
            "password": "hunter"
        });

        let errors = validate_user(&raw).unwrap_err();
        assert_eq!(errors[0].field, "password");
        assert_eq!(errors[0].code, ErrorCode::MinLengthRequired);
        assert!(!errors[0].message.contains("hunter"));
    }

    #[test]
    fn test_validate_category_charset() {
        let raw = json!({ "categoryName": "food!" });

        let errors = validate_category(&raw).unwrap_err();
        assert_eq!(errors[0].field, "categoryName");
        assert_eq!(errors[0].code, ErrorCode::InvalidCharacters);
        assert!(errors[0].message.contains("food!"));
    }

    #[test]
    fn test_validate_description_happy_path() {
        let raw = json!({ "descriptionName": "amazon marketplace" });
        let description = validate_description(&raw).unwrap();
        assert_eq!(description.description_name, "amazon marketplace");
        assert!(description.active_status);
    }

    #[test]
    fn test_non_object_input() {
        let errors = validate_transaction(&json!("just a string")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::InvalidType);
        assert!(errors[0].message.contains("string"));
    }

    #[test]
    fn test_wrong_typed_fields_are_reported() {
        let raw = json!({
            "accountNameOwner": 42,
            "transactionDate": "2025-01-15",
            "description": "ok",
            "amount": true,
            "transactionState": "cleared",
            "activeStatus": "yes"
        });

        let errors = validate_transaction(&raw).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"accountNameOwner"));
        assert!(fields.contains(&"amount"));
        assert!(fields.contains(&"activeStatus"));
        assert!(errors.iter().all(|e| e.code == ErrorCode::InvalidType));
    }
}
