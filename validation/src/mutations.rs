//! Mutation entry points
//!
//! Insert, update and delete flows raise a [`ValidationRejection`] instead of
//! returning an error list: a mutation either proceeds with a fully typed
//! value or stops with a 400-shaped rejection. The setup helpers normalize a
//! payload before insert validation so server-controlled fields can never be
//! smuggled in by the client.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::dates::validate_date_range;
use crate::error::{ErrorCode, ValidationError, ValidationResult, Violation};
use crate::rejection::ValidationRejection;
use crate::sanitizers;
use crate::validators;

/// Build the standard mutation rejection: the message names the operation
/// and joins every error message.
fn rejection_for(operation: &str, errors: Vec<ValidationError>) -> ValidationRejection {
    let detail = if errors.is_empty() {
        "Validation failed".to_string()
    } else {
        errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    ValidationRejection::new(format!("{} validation failed: {}", operation, detail), errors)
}

fn bind_violation(field: &str, violation: Violation) -> ValidationError {
    ValidationError::new(field, violation.message, violation.code)
}

// ─────────────────────────────────────────────────────────────────────────────
// Insert / update / delete
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a payload for insert, raising on any failure.
pub fn validate_insert<T, F>(
    raw: &Value,
    validate: F,
    operation: &str,
) -> Result<T, ValidationRejection>
where
    F: Fn(&Value) -> ValidationResult<T>,
{
    validate(raw).map_err(|errors| rejection_for(operation, errors))
}

/// Validate the replacement payload for an update. The previous row is
/// accepted for interface parity with the data layer but plays no part in
/// validation; only the new payload must stand on its own.
pub fn validate_update<T, F>(
    new_raw: &Value,
    _previous: Option<&Value>,
    validate: F,
    operation: &str,
) -> Result<T, ValidationRejection>
where
    F: Fn(&Value) -> ValidationResult<T>,
{
    validate(new_raw).map_err(|errors| rejection_for(operation, errors))
}

/// Deletes only need a usable identifier: a non-blank string or a
/// non-negative integer under `identifier_key`.
pub fn validate_delete(
    raw: &Value,
    identifier_key: &str,
    operation: &str,
) -> Result<Value, ValidationRejection> {
    let usable = match raw.get(identifier_key) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(n)) => {
            n.as_u64().is_some() || n.as_i64().map(|id| id >= 0).unwrap_or(false)
        }
        _ => false,
    };

    if usable {
        Ok(raw.clone())
    } else {
        let errors = vec![ValidationError::new(
            identifier_key,
            format!("{} is required", identifier_key),
            ErrorCode::RequiredField,
        )];
        Err(ValidationRejection::new(
            format!("{}: Invalid {} provided", operation, identifier_key),
            errors,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Standalone guards
// ─────────────────────────────────────────────────────────────────────────────

/// Require a usable GUID, returning it normalized (lowercase, braces gone).
pub fn require_guid(value: &str, operation: &str) -> Result<String, ValidationRejection> {
    let normalized = sanitizers::sanitize_guid(value);
    match validators::validate_guid(&normalized) {
        Ok(()) => Ok(normalized),
        Err(violation) => Err(rejection_for(
            operation,
            vec![bind_violation("guid", violation)],
        )),
    }
}

/// Require a usable account name, returning it sanitized.
pub fn require_account_name(value: &str, operation: &str) -> Result<String, ValidationRejection> {
    let sanitized = sanitizers::sanitize_account_name(value);
    match validators::validate_account_name(&sanitized) {
        Ok(()) => Ok(sanitized),
        Err(violation) => Err(rejection_for(
            operation,
            vec![bind_violation("accountNameOwner", violation)],
        )),
    }
}

/// Require a non-negative integer identifier.
pub fn require_numeric_id(
    value: &Value,
    field: &str,
    operation: &str,
) -> Result<i64, ValidationRejection> {
    match validators::validate_numeric_id(value) {
        Ok(()) => Ok(value.as_i64().unwrap_or_default()),
        Err(violation) => Err(rejection_for(
            operation,
            vec![bind_violation(field, violation)],
        )),
    }
}

/// Require a non-empty JSON array, returning its elements.
pub fn require_non_empty_array<'a>(
    value: &'a Value,
    field: &str,
    operation: &str,
) -> Result<&'a [Value], ValidationRejection> {
    match validators::validate_non_empty_array(value) {
        Ok(()) => Ok(value.as_array().map(Vec::as_slice).unwrap_or(&[])),
        Err(violation) => Err(rejection_for(
            operation,
            vec![bind_violation(field, violation)],
        )),
    }
}

/// Require an ordered pair of date-only strings.
pub fn require_date_range(
    start: &Value,
    end: &Value,
    operation: &str,
) -> Result<(NaiveDate, NaiveDate), ValidationRejection> {
    validate_date_range(start, end, "startDate", "endDate")
        .map_err(|errors| rejection_for(operation, errors))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload setup before insert
// ─────────────────────────────────────────────────────────────────────────────

fn object_of(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

/// Prepare an account payload for insert. Active status is always forced on
/// and the running totals always start at zero, whatever the client sent.
pub fn setup_new_account(raw: &Value) -> Value {
    let mut obj = object_of(raw);

    obj.insert("activeStatus".to_string(), Value::Bool(true));
    obj.entry("moniker".to_string())
        .or_insert_with(|| Value::String("0000".to_string()));
    for key in ["cleared", "outstanding", "future"] {
        obj.insert(key.to_string(), Value::String("0.00".to_string()));
    }

    Value::Object(obj)
}

/// Prepare a transaction payload for insert: a GUID is minted when the
/// client did not supply one, active status is forced on and the optional
/// enums and texts receive their defaults.
pub fn setup_new_transaction(raw: &Value) -> Value {
    let mut obj = object_of(raw);

    let has_guid = matches!(obj.get("guid"), Some(Value::String(s)) if !s.trim().is_empty());
    if !has_guid {
        obj.insert("guid".to_string(), Value::String(Uuid::new_v4().to_string()));
    }

    obj.insert("activeStatus".to_string(), Value::Bool(true));
    obj.entry("transactionType".to_string())
        .or_insert_with(|| Value::String("undefined".to_string()));
    obj.entry("reoccurringType".to_string())
        .or_insert_with(|| Value::String("onetime".to_string()));
    obj.entry("category".to_string())
        .or_insert_with(|| Value::String(String::new()));
    obj.entry("notes".to_string())
        .or_insert_with(|| Value::String(String::new()));

    Value::Object(obj)
}

pub fn setup_new_payment(raw: &Value) -> Value {
    let mut obj = object_of(raw);
    obj.insert("activeStatus".to_string(), Value::Bool(true));
    Value::Object(obj)
}

pub fn setup_new_transfer(raw: &Value) -> Value {
    let mut obj = object_of(raw);
    obj.insert("activeStatus".to_string(), Value::Bool(true));
    Value::Object(obj)
}
