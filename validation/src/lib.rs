//! Input Validation Engine
//!
//! This crate provides input validation, sanitization and error formatting
//! for the personal finance entities defined in `shared`.
//!
//! # Overview
//!
//! The validation system consists of four layers:
//!
//! 1. **Sanitizers** - Clean and normalize raw JSON before any checking
//! 2. **Validators** - Reusable field checks plus date handling
//! 3. **Rules** - `DataValidator`, the pipeline of sanitization, business
//!    boundaries and exhaustive schema validation
//! 4. **Mutations** - Raising entry points that turn failures into a
//!    400-shaped [`ValidationRejection`]
//!
//! # Usage
//!
//! ```ignore
//! use validation::{mutations, DataValidator};
//!
//! let validator = DataValidator::new();
//!
//! // Read path: collect every problem
//! let transaction = validator.validate_transaction(&raw)?;
//!
//! // Write path: raise a structured rejection
//! let prepared = mutations::setup_new_transaction(&raw);
//! let transaction = mutations::validate_insert(
//!     &prepared,
//!     |value| validator.validate_transaction(value),
//!     "insertTransaction",
//! )?;
//! ```
//!
//! # Validation Error Response
//!
//! When a mutation fails, the rejection serializes as:
//!
//! ```json
//! {
//!   "message": "insertTransaction validation failed: must be a valid decimal amount, got: \"abc\"",
//!   "validationErrors": [
//!     {"field": "amount", "message": "must be a valid decimal amount, got: \"abc\"", "code": "INVALID_AMOUNT"}
//!   ],
//!   "status": 400,
//!   "statusText": "Bad Request"
//! }
//! ```

pub mod dates;
pub mod error;
pub mod formatter;
pub mod mutations;
pub mod rate_limit;
pub mod rejection;
pub mod rules;
pub mod sanitizers;
pub mod schema;
pub mod security;
pub mod validators;

// Re-export commonly used items
pub use dates::{
    normalize_date, parse_local_date, validate_date_boundaries, validate_date_format,
    validate_date_range, DateBoundaryOptions, DateFormat,
};
pub use error::{ErrorCode, ValidationBuilder, ValidationError, ValidationResult, Violation};
pub use formatter::{
    create_error_report, error_severity, error_summary, format_field_name,
    format_validation_errors, group_errors_by_field, ErrorReport, Severity,
};
pub use rate_limit::{FixedWindowRateLimiter, RateLimiter};
pub use rejection::{MessageStyle, ValidationRejection};
pub use rules::{is_suspicious_amount, DataValidator, FinancialArrayOutcome, InvalidItem};
pub use sanitizers::{
    sanitize_account_name, sanitize_amount, sanitize_free_text, sanitize_guid, strip_html, trim,
    trim_optional,
};
pub use security::{SecurityLogger, TracingSecurityLogger};
pub use validators::{
    validate_account_name, validate_amount_precision, validate_amount_range, validate_enum,
    validate_guid, validate_length, validate_non_empty_array, validate_required,
};
