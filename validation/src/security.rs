//! Security event logging seam
//!
//! Validation failures and injection attempts are security signals, not just
//! user feedback. The sink is a trait so the host application can route
//! events to its own audit pipeline; the default forwards to `tracing`.
//!
//! Log entries carry field names and counts only. Error messages echo the
//! rejected input, so writing them to logs would leak user data.

use crate::error::ValidationError;

pub trait SecurityLogger: Send + Sync {
    fn log_validation_failure(&self, operation: &str, errors: &[ValidationError]);
    fn log_suspicious_input(&self, operation: &str, paths: &[String]);
}

/// Default sink that emits `tracing` warnings
#[derive(Debug, Clone, Default)]
pub struct TracingSecurityLogger;

impl SecurityLogger for TracingSecurityLogger {
    fn log_validation_failure(&self, operation: &str, errors: &[ValidationError]) {
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        tracing::warn!(
            operation,
            error_count = errors.len(),
            fields = ?fields,
            "validation failed"
        );
    }

    fn log_suspicious_input(&self, operation: &str, paths: &[String]) {
        tracing::warn!(operation, paths = ?paths, "markup injection detected in input");
    }
}
