//! Delivery failure model.
//!
//! A failed delivery never propagates out of the dispatcher. It is caught
//! at the delivery site, packaged into a [`FailureReport`], and handed to a
//! pluggable [`FailureSink`]. The remaining subscribers in the fan-out
//! round still receive the value: report all, abort none.
//!
//! # Error Code Convention
//!
//! Delivery errors use the `DELIVERY_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`DeliveryError::Failed`] | `DELIVERY_FAILED` | Yes |
//! | [`DeliveryError::Report`] | `DELIVERY_REPORTED` | Inherited from inner |
//!
//! # Pre-Shaped Reports
//!
//! A subscriber that already produced a well-formed [`FailureReport`] can
//! return it as [`DeliveryError::Report`]; the dispatcher forwards it to
//! the sink unwrapped instead of wrapping it a second time.
//!
//! # Example
//!
//! ```
//! use ripple_core::{DeliveryError, ErrorCode, FailureReport};
//! use serde_json::json;
//!
//! let err = DeliveryError::failed("downstream refused the value");
//! assert_eq!(err.code(), "DELIVERY_FAILED");
//! assert!(err.is_recoverable());
//!
//! let report = FailureReport::new(err, json!(42), "my-handler");
//! assert_eq!(report.subscriber, "my-handler");
//! assert!(report.message.contains("my-handler"));
//! ```

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error returned by a subscriber when delivery of one value fails.
///
/// These errors are always caught and isolated by the dispatcher; they
/// never abort a fan-out round and never reach the caller of `pull`.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum DeliveryError {
    /// Ordinary delivery failure with a human-readable reason.
    ///
    /// **Recoverable** - the same subscriber may accept the next event.
    #[error("delivery failed: {0}")]
    Failed(String),

    /// A failure that already carries its own [`FailureReport`].
    ///
    /// The dispatcher forwards the inner report to the sink as-is
    /// rather than double-wrapping it.
    #[error("{0}")]
    Report(Box<FailureReport>),
}

impl DeliveryError {
    /// Creates an ordinary delivery failure.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

impl ErrorCode for DeliveryError {
    fn code(&self) -> &'static str {
        match self {
            Self::Failed(_) => "DELIVERY_FAILED",
            Self::Report(_) => "DELIVERY_REPORTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Failed(_) => true,
            Self::Report(report) => report.error.is_recoverable(),
        }
    }
}

/// One failed delivery, packaged for the reporting sink.
///
/// Reports are ephemeral: the dispatcher builds one per failed delivery,
/// hands it to the [`FailureSink`], and drops it. Nothing is persisted
/// and nothing is retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    /// The error the subscriber returned.
    pub error: DeliveryError,
    /// Execution context at capture time (thread name or id).
    pub context: String,
    /// The event value whose delivery failed.
    pub value: Value,
    /// Attribution label of the failing subscriber
    /// (`"callback"`, `"sink-queue"`, or the handler id).
    pub subscriber: String,
    /// Formatted one-line summary.
    pub message: String,
}

impl FailureReport {
    /// Packages a failed delivery.
    ///
    /// Captures the current thread as the execution context and formats
    /// the summary message.
    #[must_use]
    pub fn new(error: DeliveryError, value: Value, subscriber: impl Into<String>) -> Self {
        let subscriber = subscriber.into();
        let context = current_context();
        let message = format!(
            "delivery to '{}' failed on {}: {} (value: {})",
            subscriber, context, error, value
        );
        Self {
            error,
            context,
            value,
            subscriber,
            message,
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Pluggable sink for failure reports.
///
/// The engine's default sink logs each report; embedding applications
/// substitute their own to surface failures elsewhere, and tests use a
/// capturing sink.
pub trait FailureSink: Send + Sync {
    /// Receives one failure report.
    fn report(&self, failure: &FailureReport);
}

/// Names the current thread for failure attribution.
fn current_context() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_error_codes;
    use serde_json::json;

    fn all_variants() -> Vec<DeliveryError> {
        vec![
            DeliveryError::failed("x"),
            DeliveryError::Report(Box::new(FailureReport::new(
                DeliveryError::failed("inner"),
                json!(null),
                "handler",
            ))),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "DELIVERY_");
    }

    #[test]
    fn failed_is_recoverable() {
        let err = DeliveryError::failed("busy");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("busy"));
    }

    #[test]
    fn report_inherits_recoverability() {
        let inner = FailureReport::new(DeliveryError::failed("transient"), json!(1), "h");
        assert!(DeliveryError::Report(Box::new(inner)).is_recoverable());
    }

    #[test]
    fn report_captures_value_and_subscriber() {
        let report = FailureReport::new(DeliveryError::failed("nope"), json!({"k": 1}), "dec");

        assert_eq!(report.subscriber, "dec");
        assert_eq!(report.value, json!({"k": 1}));
        assert!(report.message.contains("'dec'"));
        assert!(report.message.contains("nope"));
        assert!(!report.context.is_empty());
        assert_eq!(report.to_string(), report.message);
    }
}
