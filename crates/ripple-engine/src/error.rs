//! Engine layer errors.
//!
//! These are the *fatal* failures of the propagation engine: wiring bugs
//! and the opt-in pass-limit guard. They surface as `Err` from `pull`,
//! `pull_all`, and `propagate`, and are never caught by the per-subscriber
//! delivery isolation - a subscriber failure is a data event; these signal
//! a broken configuration.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`EngineError::UnsupportedSource`] | `ENGINE_UNSUPPORTED_SOURCE` | No |
//! | [`EngineError::UnsupportedSubscriber`] | `ENGINE_UNSUPPORTED_SUBSCRIBER` | No |
//! | [`EngineError::PassLimitExceeded`] | `ENGINE_PASS_LIMIT_EXCEEDED` | No |

use ripple_core::ErrorCode;
use thiserror::Error;

/// Engine layer error.
///
/// # Example
///
/// ```
/// use ripple_core::ErrorCode;
/// use ripple_engine::EngineError;
///
/// let err = EngineError::PassLimitExceeded { passes: 100 };
/// assert_eq!(err.code(), "ENGINE_PASS_LIMIT_EXCEEDED");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// An event source variant the engine does not know how to pull from.
    ///
    /// Raised from the wildcard arm of the source dispatch; indicates a
    /// core/engine version mismatch or a wiring bug, never a data event.
    #[error("unsupported event source kind: {0}")]
    UnsupportedSource(String),

    /// A subscriber variant the engine does not know how to deliver to.
    #[error("unsupported subscriber kind: {0}")]
    UnsupportedSubscriber(String),

    /// The opt-in pass limit was exceeded before the graph went quiescent.
    ///
    /// The graph is self-sustaining: some subscriber keeps re-marking a
    /// source in the same graph as fresh. Raising the limit will not fix
    /// the wiring.
    #[error("propagation did not reach a fixed point within {passes} passes")]
    PassLimitExceeded {
        /// Number of full passes completed before giving up.
        passes: usize,
    },
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedSource(_) => "ENGINE_UNSUPPORTED_SOURCE",
            Self::UnsupportedSubscriber(_) => "ENGINE_UNSUPPORTED_SUBSCRIBER",
            Self::PassLimitExceeded { .. } => "ENGINE_PASS_LIMIT_EXCEEDED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
