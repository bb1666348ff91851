//! Input sanitization functions
//!
//! Best-effort, non-failing normalization of untrusted input before any
//! structural validation runs. Field helpers clean individual values; the
//! entity functions (`user`, `account`, `transaction`, ...) normalize a raw
//! `serde_json::Value` into the shape the schema validator expects. None of
//! these functions reject input; they coerce or drop instead.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};
use std::str::FromStr;

use shared::FINANCIAL_LIMITS;

lazy_static! {
    /// Pattern to match HTML tags
    static ref HTML_TAG_PATTERN: Regex = Regex::new(r"<[^>]*>").unwrap();

    /// Pattern to match multiple whitespace characters
    static ref MULTI_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Pattern to match control characters (except newline and tab)
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();

    /// Pattern to match script-ish payloads worth reporting to security logs
    static ref MARKUP_INJECTION_PATTERN: Regex =
        Regex::new(r"(?i)(javascript:|on\w+\s*=|<script|<iframe|<object|<embed)").unwrap();
}

/// Trim leading and trailing whitespace from a string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trim a string in-place (modifies Option<String>)
pub fn trim_optional(value: &mut Option<String>) {
    if let Some(ref mut s) = value {
        *s = s.trim().to_string();
        if s.is_empty() {
            *value = None;
        }
    }
}

/// Normalize whitespace: collapse multiple spaces/newlines into single space
pub fn normalize_whitespace(value: &str) -> String {
    MULTI_WHITESPACE.replace_all(value.trim(), " ").to_string()
}

/// Strip all HTML tags from a string, keeping the visible text
pub fn strip_html(value: &str) -> String {
    HTML_TAG_PATTERN.replace_all(value, "").to_string()
}

/// Remove control characters from a string
pub fn remove_control_chars(value: &str) -> String {
    CONTROL_CHARS.replace_all(value, "").to_string()
}

/// Sanitize a free-text field: trim, remove control chars, strip HTML,
/// collapse runs of whitespace
pub fn sanitize_free_text(value: &str) -> String {
    let trimmed = trim(value);
    let no_control = remove_control_chars(&trimmed);
    let no_html = strip_html(&no_control);
    normalize_whitespace(&no_html)
}

/// Sanitize an account name: strip HTML, then keep only letters, digits,
/// underscores and hyphens.
///
/// Underscores and hyphens survive because the schema charset admits them;
/// a name that already passes validation must come back unchanged.
pub fn sanitize_account_name(value: &str) -> String {
    strip_html(value.trim())
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Sanitize a monetary amount: strip currency symbols, grouping commas and
/// whitespace, parse, and round to the allowed number of decimal places.
/// Anything unparseable coerces to zero.
pub fn sanitize_amount(value: &str) -> Decimal {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '$' | '€' | '£' | ','))
        .collect();
    match Decimal::from_str(&cleaned) {
        Ok(amount) => amount.round_dp_with_strategy(
            FINANCIAL_LIMITS.max_decimal_places,
            RoundingStrategy::MidpointAwayFromZero,
        ),
        Err(_) => Decimal::ZERO,
    }
}

/// Coerce a JSON value to a non-negative integer ID, if possible
pub fn sanitize_numeric_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|id| *id >= 0),
        Value::String(s) => s.trim().parse::<i64>().ok().filter(|id| *id >= 0),
        _ => None,
    }
}

/// Normalize a GUID string: trim whitespace and surrounding braces,
/// lowercase. Shape validation is the schema validator's job.
pub fn sanitize_guid(value: &str) -> String {
    value
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim()
        .to_lowercase()
}

/// Read a decimal out of a JSON string or number
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Report the paths of string fields that look like markup/script injection.
///
/// Used by the pipeline to feed the security log before sanitization wipes
/// the evidence; never affects the validation outcome.
pub fn markup_injection_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_injection_paths(value, String::new(), &mut paths);
    paths
}

fn collect_injection_paths(value: &Value, path: String, paths: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            if MARKUP_INJECTION_PATTERN.is_match(s) {
                paths.push(if path.is_empty() { "value".to_string() } else { path });
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                collect_injection_paths(item, format!("{}[{}]", path, i), paths);
            }
        }
        Value::Object(obj) => {
            for (key, v) in obj {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                collect_injection_paths(v, child, paths);
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Entity sanitizers: raw Value in, normalized Value out
// ───────────────────────────────────────────────────────────────────────────

/// Non-objects pass through untouched so the schema layer can report the
/// type mismatch instead of a wall of missing-field errors.
fn with_object(raw: &Value, f: impl FnOnce(&mut Map<String, Value>)) -> Value {
    match raw.as_object() {
        Some(obj) => {
            let mut obj = obj.clone();
            f(&mut obj);
            Value::Object(obj)
        }
        None => raw.clone(),
    }
}

fn apply_text(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        let cleaned = sanitize_free_text(s);
        obj.insert(key.to_string(), Value::String(cleaned));
    }
}

fn apply_account_name(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        let cleaned = sanitize_account_name(s);
        obj.insert(key.to_string(), Value::String(cleaned));
    }
}

/// Amounts come back as two-decimal strings; serde deserializes those into
/// `Decimal` exactly. Null and missing are left for the schema validator to
/// report; any other non-numeric value coerces to zero.
fn apply_amount(obj: &mut Map<String, Value>, key: &str) {
    let sanitized = match obj.get(key) {
        None | Some(Value::Null) => return,
        Some(Value::String(s)) => sanitize_amount(s),
        Some(Value::Number(n)) => sanitize_amount(&n.to_string()),
        Some(_) => Decimal::ZERO,
    };
    obj.insert(key.to_string(), Value::String(format!("{:.2}", sanitized)));
}

fn apply_numeric_id(obj: &mut Map<String, Value>, key: &str) {
    match obj.get(key) {
        None | Some(Value::Null) => {}
        Some(v) => match sanitize_numeric_id(v) {
            Some(id) => {
                obj.insert(key.to_string(), Value::Number(id.into()));
            }
            // Garbage IDs are dropped so optional ID fields fall back to None
            None => {
                obj.remove(key);
            }
        },
    }
}

fn apply_guid(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        let cleaned = sanitize_guid(s);
        obj.insert(key.to_string(), Value::String(cleaned));
    }
}

fn apply_date(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        let cleaned = trim(s);
        obj.insert(key.to_string(), Value::String(cleaned));
    }
}

/// Enum-valued fields are lowercased so `"Cleared"` and `"cleared"` validate
/// the same way
fn apply_enum_token(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        let cleaned = s.trim().to_lowercase();
        obj.insert(key.to_string(), Value::String(cleaned));
    }
}

fn apply_bool(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        match s.trim().to_lowercase().as_str() {
            "true" => {
                obj.insert(key.to_string(), Value::Bool(true));
            }
            "false" => {
                obj.insert(key.to_string(), Value::Bool(false));
            }
            _ => {}
        }
    }
}

/// Sanitize a raw user payload
pub fn user(raw: &Value) -> Value {
    with_object(raw, |obj| {
        apply_numeric_id(obj, "userId");
        apply_text(obj, "username");
        apply_text(obj, "firstName");
        apply_text(obj, "lastName");
        // Passwords are never rewritten; altering them would lock the user out
    })
}

/// Sanitize a raw account payload
pub fn account(raw: &Value) -> Value {
    with_object(raw, |obj| {
        apply_numeric_id(obj, "accountId");
        apply_account_name(obj, "accountNameOwner");
        apply_enum_token(obj, "accountType");
        apply_text(obj, "moniker");
        apply_bool(obj, "activeStatus");
        apply_amount(obj, "cleared");
        apply_amount(obj, "outstanding");
        apply_amount(obj, "future");
    })
}

/// Sanitize a raw transaction payload
pub fn transaction(raw: &Value) -> Value {
    with_object(raw, |obj| {
        apply_numeric_id(obj, "transactionId");
        apply_guid(obj, "guid");
        apply_account_name(obj, "accountNameOwner");
        apply_date(obj, "transactionDate");
        apply_text(obj, "description");
        apply_text(obj, "category");
        apply_amount(obj, "amount");
        apply_enum_token(obj, "transactionState");
        apply_enum_token(obj, "transactionType");
        apply_enum_token(obj, "reoccurringType");
        apply_text(obj, "notes");
        apply_bool(obj, "activeStatus");
    })
}

/// Sanitize a raw payment payload
pub fn payment(raw: &Value) -> Value {
    with_object(raw, |obj| {
        apply_numeric_id(obj, "paymentId");
        apply_account_name(obj, "sourceAccount");
        apply_account_name(obj, "destinationAccount");
        apply_date(obj, "transactionDate");
        apply_amount(obj, "amount");
        apply_guid(obj, "guidSource");
        apply_guid(obj, "guidDestination");
        apply_bool(obj, "activeStatus");
    })
}

/// Sanitize a raw transfer payload
pub fn transfer(raw: &Value) -> Value {
    with_object(raw, |obj| {
        apply_numeric_id(obj, "transferId");
        apply_account_name(obj, "sourceAccount");
        apply_account_name(obj, "destinationAccount");
        apply_date(obj, "transactionDate");
        apply_amount(obj, "amount");
        apply_guid(obj, "guidSource");
        apply_guid(obj, "guidDestination");
        apply_bool(obj, "activeStatus");
    })
}

/// Sanitize a raw category payload
pub fn category(raw: &Value) -> Value {
    with_object(raw, |obj| {
        apply_numeric_id(obj, "categoryId");
        apply_text(obj, "categoryName");
        apply_bool(obj, "activeStatus");
    })
}

/// Sanitize a raw description payload
pub fn description(raw: &Value) -> Value {
    with_object(raw, |obj| {
        apply_numeric_id(obj, "descriptionId");
        apply_text(obj, "descriptionName");
        apply_bool(obj, "activeStatus");
    })
}
