//! Business rules and the validation pipeline
//!
//! `DataValidator` owns the full pipeline for raw client input: injection
//! screening, sanitization, fixed financial boundaries, cross-field business
//! rules, then schema validation. Boundary failures return immediately
//! without running schema checks, so a transaction with an absurd amount
//! produces one pointed error instead of a wall of field messages.
//!
//! The security sink and the rate limiter are injected traits; production
//! wiring uses the `tracing` sink and the in-memory fixed-window limiter.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use shared::{
    Account, Category, Description, Payment, Transaction, Transfer, User, FINANCIAL_LIMITS,
};

use crate::dates::{
    parse_any_date, parse_local_date, today_local, validate_date_boundaries, DateBoundaryOptions,
    DateFormat,
};
use crate::error::{ErrorCode, ValidationError, ValidationResult};
use crate::rate_limit::{FixedWindowRateLimiter, RateLimiter};
use crate::sanitizers;
use crate::schema;
use crate::security::{SecurityLogger, TracingSecurityLogger};

/// Days either side of today before a transaction date is flagged as unusual
const UNUSUAL_DATE_WINDOW_DAYS: i64 = 180;

// ─────────────────────────────────────────────────────────────────────────────
// DataValidator
// ─────────────────────────────────────────────────────────────────────────────

pub struct DataValidator {
    security: Arc<dyn SecurityLogger>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator {
    pub fn new() -> Self {
        Self {
            security: Arc::new(TracingSecurityLogger),
            rate_limiter: Arc::new(FixedWindowRateLimiter::from_env()),
        }
    }

    pub fn with_security_logger(mut self, security: Arc<dyn SecurityLogger>) -> Self {
        self.security = security;
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    // ────────────────────────────────────────────────────────────────────────
    // Entity pipelines
    // ────────────────────────────────────────────────────────────────────────

    pub fn validate_user(&self, raw: &Value) -> ValidationResult<User> {
        self.flag_suspicious_input("validateUser", raw);
        let sanitized = sanitizers::user(raw);
        self.finish("validateUser", schema::validate_user(&sanitized))
    }

    pub fn validate_account(&self, raw: &Value) -> ValidationResult<Account> {
        self.flag_suspicious_input("validateAccount", raw);
        let sanitized = sanitizers::account(raw);
        self.finish("validateAccount", schema::validate_account(&sanitized))
    }

    pub fn validate_transaction(&self, raw: &Value) -> ValidationResult<Transaction> {
        self.flag_suspicious_input("validateTransaction", raw);
        let sanitized = sanitizers::transaction(raw);
        self.check_financial_boundaries("validateTransaction", &sanitized, DateFormat::Any)?;
        self.finish(
            "validateTransaction",
            schema::validate_transaction(&sanitized),
        )
    }

    pub fn validate_payment(&self, raw: &Value) -> ValidationResult<Payment> {
        self.flag_suspicious_input("validatePayment", raw);
        let sanitized = sanitizers::payment(raw);
        self.check_financial_boundaries("validatePayment", &sanitized, DateFormat::DateOnly)?;
        self.check_distinct_accounts("validatePayment", &sanitized)?;
        self.finish("validatePayment", schema::validate_payment(&sanitized))
    }

    pub fn validate_transfer(&self, raw: &Value) -> ValidationResult<Transfer> {
        self.flag_suspicious_input("validateTransfer", raw);
        let sanitized = sanitizers::transfer(raw);
        self.check_financial_boundaries("validateTransfer", &sanitized, DateFormat::DateOnly)?;
        self.check_distinct_accounts("validateTransfer", &sanitized)?;
        self.finish("validateTransfer", schema::validate_transfer(&sanitized))
    }

    pub fn validate_category(&self, raw: &Value) -> ValidationResult<Category> {
        self.flag_suspicious_input("validateCategory", raw);
        let sanitized = sanitizers::category(raw);
        self.finish("validateCategory", schema::validate_category(&sanitized))
    }

    pub fn validate_description(&self, raw: &Value) -> ValidationResult<Description> {
        self.flag_suspicious_input("validateDescription", raw);
        let sanitized = sanitizers::description(raw);
        self.finish(
            "validateDescription",
            schema::validate_description(&sanitized),
        )
    }

    // ────────────────────────────────────────────────────────────────────────
    // Collections and rate limits
    // ────────────────────────────────────────────────────────────────────────

    /// Validate every element of a JSON array, partitioning the outcome.
    ///
    /// One bad element never blocks the rest; the caller decides whether a
    /// partial batch is acceptable. An empty or non-array input is an error.
    pub fn validate_financial_array<T, F>(
        &self,
        items: &Value,
        validate: F,
    ) -> ValidationResult<FinancialArrayOutcome<T>>
    where
        F: Fn(&Value) -> ValidationResult<T>,
    {
        let entries = match items {
            Value::Array(entries) if !entries.is_empty() => entries,
            Value::Array(_) => {
                return Err(vec![ValidationError::new(
                    "items",
                    "must be a non-empty array",
                    ErrorCode::EmptyArray,
                )])
            }
            _ => {
                return Err(vec![ValidationError::new(
                    "items",
                    "must be an array",
                    ErrorCode::InvalidType,
                )])
            }
        };

        let mut outcome = FinancialArrayOutcome {
            valid_items: Vec::new(),
            invalid_items: Vec::new(),
        };
        for (index, entry) in entries.iter().enumerate() {
            match validate(entry) {
                Ok(item) => outcome.valid_items.push(item),
                Err(errors) => outcome.invalid_items.push(InvalidItem { index, errors }),
            }
        }
        Ok(outcome)
    }

    /// Count an attempt against `"{identifier}:{action}"` and reject once the
    /// window budget is spent.
    pub fn validate_rate_limit(&self, identifier: &str, action: &str) -> ValidationResult<()> {
        let key = format!("{}:{}", identifier, action);
        if self.rate_limiter.check_and_increment(&key) {
            return Ok(());
        }

        let errors = vec![ValidationError::new(
            "rateLimit",
            format!("too many {} attempts, please try again later", action),
            ErrorCode::RateLimitExceeded,
        )];
        self.security.log_validation_failure(action, &errors);
        Err(errors)
    }

    /// Advisory screening for a transaction that already passed validation.
    ///
    /// Returned entries are warnings, not rejections; callers surface them
    /// without blocking the write.
    pub fn screen_transaction(
        &self,
        transaction: &Transaction,
        recent: &[Transaction],
    ) -> Vec<ValidationError> {
        let mut warnings = Vec::new();

        if is_suspicious_amount(transaction.amount) {
            warnings.push(ValidationError::new(
                "amount",
                format!("unusual amount pattern detected: {}", transaction.amount),
                ErrorCode::SuspiciousAmount,
            ));
        }

        let days_in_past = (today_local() - transaction.transaction_date).num_days();
        if days_in_past > UNUSUAL_DATE_WINDOW_DAYS {
            warnings.push(ValidationError::new(
                "transactionDate",
                format!(
                    "is more than {} days in the past: {}",
                    UNUSUAL_DATE_WINDOW_DAYS, transaction.transaction_date
                ),
                ErrorCode::UnusualDate,
            ));
        }

        // A duplicate matches on account, amount, and date, never on
        // free-text fields.
        let duplicate = recent.iter().any(|existing| {
            existing.account_name_owner == transaction.account_name_owner
                && existing.transaction_date == transaction.transaction_date
                && existing.amount == transaction.amount
        });
        if duplicate {
            warnings.push(ValidationError::new(
                "transaction",
                format!(
                    "matches an existing transaction on {} for {}",
                    transaction.transaction_date, transaction.amount
                ),
                ErrorCode::PotentialDuplicate,
            ));
        }

        warnings
    }

    // ────────────────────────────────────────────────────────────────────────
    // Pipeline internals
    // ────────────────────────────────────────────────────────────────────────

    fn flag_suspicious_input(&self, operation: &str, raw: &Value) {
        let paths = sanitizers::markup_injection_paths(raw);
        if !paths.is_empty() {
            self.security.log_suspicious_input(operation, &paths);
        }
    }

    /// Fixed business boundaries, checked before any schema work. Only the
    /// fields that can be read are checked here; unreadable fields are left
    /// for schema validation to describe properly.
    fn check_financial_boundaries(
        &self,
        operation: &str,
        sanitized: &Value,
        date_format: DateFormat,
    ) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Some(amount) = sanitized.get("amount").and_then(sanitizers::decimal_from_value) {
            if amount.abs() > FINANCIAL_LIMITS.max_amount {
                errors.push(ValidationError::new(
                    "amount",
                    format!(
                        "exceeds the maximum allowed amount of {}, got: {}",
                        FINANCIAL_LIMITS.max_amount, amount
                    ),
                    ErrorCode::AmountTooLarge,
                ));
            }
        }

        if let Some(Value::String(raw_date)) = sanitized.get("transactionDate") {
            let parsed = match date_format {
                DateFormat::Any => parse_any_date(raw_date),
                DateFormat::DateOnly | DateFormat::Iso8601 => parse_local_date(raw_date),
            };
            if let Some(date) = parsed {
                if let Err(mut date_errors) =
                    validate_date_boundaries(date, "transactionDate", &DateBoundaryOptions::default())
                {
                    errors.append(&mut date_errors);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            self.security.log_validation_failure(operation, &errors);
            Err(errors)
        }
    }

    /// Payments and transfers must move money between two different accounts.
    /// Checked before schema so the rejection stands alone even when other
    /// fields are also wrong.
    fn check_distinct_accounts(&self, operation: &str, sanitized: &Value) -> ValidationResult<()> {
        let source = sanitized
            .get("sourceAccount")
            .and_then(Value::as_str)
            .unwrap_or("");
        let destination = sanitized
            .get("destinationAccount")
            .and_then(Value::as_str)
            .unwrap_or("");

        if !source.is_empty() && source == destination {
            let errors = vec![ValidationError::new(
                "destinationAccount",
                format!(
                    "source and destination accounts must differ, got: \"{}\" for both",
                    source
                ),
                ErrorCode::SameAccountError,
            )];
            self.security.log_validation_failure(operation, &errors);
            return Err(errors);
        }
        Ok(())
    }

    fn finish<T>(&self, operation: &str, result: ValidationResult<T>) -> ValidationResult<T> {
        if let Err(ref errors) = result {
            self.security.log_validation_failure(operation, errors);
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch outcome
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct FinancialArrayOutcome<T> {
    pub valid_items: Vec<T>,
    pub invalid_items: Vec<InvalidItem>,
}

impl<T> FinancialArrayOutcome<T> {
    pub fn is_all_valid(&self) -> bool {
        self.invalid_items.is_empty()
    }
}

#[derive(Debug)]
pub struct InvalidItem {
    pub index: usize,
    pub errors: Vec<ValidationError>,
}

/// Heuristic for amounts worth a second look: round multiples of 10,000 at
/// or above 100,000, and anything within a dollar of a watched reporting
/// threshold (10,000 or 9,999). Large amounts carrying sub-cent precision
/// are flagged too.
pub fn is_suspicious_amount(amount: Decimal) -> bool {
    let magnitude = amount.abs();
    let round_step = Decimal::new(10_000, 0);
    let large = Decimal::new(100_000, 0);
    let watched = [Decimal::new(10_000, 0), Decimal::new(9_999, 0)];

    if magnitude >= large && (magnitude % round_step).is_zero() {
        return true;
    }
    if watched
        .iter()
        .any(|&threshold| (magnitude - threshold).abs() <= Decimal::ONE)
    {
        return true;
    }
    if magnitude > large && magnitude.normalize().scale() > 2 {
        return true;
    }
    false
}
