//! Unified error interface for ripple.
//!
//! This module provides the [`ErrorCode`] trait for standardized
//! error handling across both ripple crates.
//!
//! # Design
//!
//! All ripple error types implement [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: For programmatic error handling
//! - **Recoverability info**: For retry logic and user feedback
//!
//! # Example
//!
//! ```
//! use ripple_core::ErrorCode;
//!
//! #[derive(Debug)]
//! enum SinkError {
//!     Unavailable,
//!     Rejected(String),
//! }
//!
//! impl ErrorCode for SinkError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Unavailable => "SINK_UNAVAILABLE",
//!             Self::Rejected(_) => "SINK_REJECTED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Unavailable)
//!     }
//! }
//!
//! let err = SinkError::Unavailable;
//! assert_eq!(err.code(), "SINK_UNAVAILABLE");
//! assert!(err.is_recoverable());
//! ```

/// Unified error code interface for ripple errors.
///
/// Implement this trait for all error types to enable:
///
/// - Consistent error code format across crates
/// - Unified handling in the dispatcher and failure sinks
/// - Standardized logging
///
/// # Code Format
///
/// Error codes should be:
///
/// - **UPPER_SNAKE_CASE**: e.g., `"DELIVERY_FAILED"`
/// - **Namespace-prefixed**: e.g., `"ENGINE_UNSUPPORTED_SOURCE"`
/// - **Stable**: Codes should not change once defined (API contract)
///
/// # Recoverability
///
/// An error is recoverable if retrying the operation may succeed or the
/// caller can take corrective action. Wiring bugs (unsupported variants)
/// and self-sustaining graphs are never recoverable by retry.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// # Format
    ///
    /// - UPPER_SNAKE_CASE
    /// - Prefixed with domain (e.g., `"DELIVERY_"`, `"ENGINE_"`)
    /// - Stable across versions (breaking change if modified)
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    ///
    /// # Returns
    ///
    /// - `true`: Retry may succeed, or the caller can take corrective action
    /// - `false`: Retry will not help, requires code/config change
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows ripple conventions.
///
/// # Checks
///
/// 1. Code is UPPER_SNAKE_CASE
/// 2. Code starts with the expected prefix
/// 3. Code is not empty
///
/// # Panics
///
/// Panics with a descriptive message if validation fails.
///
/// # Example
///
/// ```
/// use ripple_core::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// enum MyError { Busy }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "MY_BUSY" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&MyError::Busy, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates multiple error codes at once.
///
/// Use this to verify all variants of an error enum.
///
/// # Example
///
/// ```
/// use ripple_core::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum MyError { A, B }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "MY_A",
///             Self::B => "MY_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[MyError::A, MyError::B], "MY_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Permanent => "TEST_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn error_code_trait() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Permanent.is_recoverable());
    }

    #[test]
    fn assert_error_codes_all_variants() {
        assert_error_codes(&[TestError::Transient, TestError::Permanent], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn assert_error_code_wrong_prefix() {
        assert_error_code(&TestError::Transient, "WRONG_");
    }

    #[test]
    fn upper_snake_case_rules() {
        assert!(is_upper_snake_case("DELIVERY_FAILED"));
        assert!(is_upper_snake_case("ENGINE_123"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("delivery_failed"));
        assert!(!is_upper_snake_case("_DELIVERY"));
        assert!(!is_upper_snake_case("DELIVERY__FAILED"));
    }
}
