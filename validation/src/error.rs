//! Core error value objects shared by every validation stage.
//!
//! A [`ValidationError`] binds a field name to a human-readable message and a
//! machine-readable [`ErrorCode`]. Field validators report a [`Violation`]
//! (message + code, no field yet); the [`ValidationBuilder`] binds field names
//! while collecting every violation in a pass, never stopping at the first.

use serde::{Deserialize, Serialize};

/// Outcome of any non-raising validation entry point.
///
/// `Err` is always non-empty; success and errors can never coexist.
pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

/// Machine-readable tag carried by every validation error.
///
/// The set is closed: codes serialize as SCREAMING_SNAKE_CASE strings and any
/// unrecognized code arriving from a foreign payload deserializes to
/// [`ErrorCode::Other`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    RequiredField,
    /// Generic failure, also the wrapper for internal inconsistencies
    ValidationError,
    InvalidType,
    MinLengthRequired,
    MaxLengthExceeded,
    InvalidCharacters,
    InvalidEnumValue,
    InvalidGuid,
    InvalidAccountName,
    InvalidNumericId,
    InvalidAmount,
    AmountTooLarge,
    AmountPrecisionExceeded,
    EmptyArray,
    DateRequired,
    DateEmpty,
    DateWrongType,
    DateFormatInvalid,
    DateTooOld,
    DateTooFuture,
    DateBeforeMin,
    DateAfterMax,
    DateRangeInvalid,
    SameAccountError,
    SuspiciousAmount,
    UnusualDate,
    PotentialDuplicate,
    RateLimitExceeded,
    /// Advisory tag attached by upstream layers; never produced here
    Notice,
    /// Catch-all for codes this build does not know
    #[serde(other)]
    Other,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredField => "REQUIRED_FIELD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidType => "INVALID_TYPE",
            Self::MinLengthRequired => "MIN_LENGTH_REQUIRED",
            Self::MaxLengthExceeded => "MAX_LENGTH_EXCEEDED",
            Self::InvalidCharacters => "INVALID_CHARACTERS",
            Self::InvalidEnumValue => "INVALID_ENUM_VALUE",
            Self::InvalidGuid => "INVALID_GUID",
            Self::InvalidAccountName => "INVALID_ACCOUNT_NAME",
            Self::InvalidNumericId => "INVALID_NUMERIC_ID",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE",
            Self::AmountPrecisionExceeded => "AMOUNT_PRECISION_EXCEEDED",
            Self::EmptyArray => "EMPTY_ARRAY",
            Self::DateRequired => "DATE_REQUIRED",
            Self::DateEmpty => "DATE_EMPTY",
            Self::DateWrongType => "DATE_WRONG_TYPE",
            Self::DateFormatInvalid => "DATE_FORMAT_INVALID",
            Self::DateTooOld => "DATE_TOO_OLD",
            Self::DateTooFuture => "DATE_TOO_FUTURE",
            Self::DateBeforeMin => "DATE_BEFORE_MIN",
            Self::DateAfterMax => "DATE_AFTER_MAX",
            Self::DateRangeInvalid => "DATE_RANGE_INVALID",
            Self::SameAccountError => "SAME_ACCOUNT_ERROR",
            Self::SuspiciousAmount => "SUSPICIOUS_AMOUNT",
            Self::UnusualDate => "UNUSUAL_DATE",
            Self::PotentialDuplicate => "POTENTIAL_DUPLICATE",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Notice => "NOTICE",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field-level violation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: ErrorCode,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: ErrorCode,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }

    /// The single error reported when the pipeline itself misbehaves.
    ///
    /// The caller-facing message stays generic; the detail belongs in the
    /// logs, never in front of the user.
    pub fn internal() -> Self {
        Self::new(
            "validation",
            "Validation could not be completed. Please try again.",
            ErrorCode::ValidationError,
        )
    }
}

/// A failure detected by a field validator, before it is bound to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub message: String,
    pub code: ErrorCode,
}

impl Violation {
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

/// Collects field errors across many checks without short-circuiting.
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<ValidationError>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Run a validation closure and record the violation against `field`.
    pub fn check<F>(&mut self, field: &str, validation: F) -> &mut Self
    where
        F: FnOnce() -> Result<(), Violation>,
    {
        if let Err(violation) = validation() {
            self.errors
                .push(ValidationError::new(field, violation.message, violation.code));
        }
        self
    }

    pub fn add_error(&mut self, field: &str, message: &str, code: ErrorCode) -> &mut Self {
        self.errors.push(ValidationError::new(field, message, code));
        self
    }

    /// Record an error when `condition` holds.
    pub fn check_condition(
        &mut self,
        condition: bool,
        field: &str,
        message: &str,
        code: ErrorCode,
    ) -> &mut Self {
        if condition {
            self.errors.push(ValidationError::new(field, message, code));
        }
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn build(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}
