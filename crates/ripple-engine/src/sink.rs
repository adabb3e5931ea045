//! Default failure sink.

use ripple_core::{ErrorCode, FailureReport, FailureSink};
use tracing::error;

/// Failure sink that logs each report through `tracing`.
///
/// This is the default sink for [`Dispatcher`](crate::Dispatcher) and
/// [`PropagationEngine`](crate::PropagationEngine). Embedding applications
/// that want failures somewhere other than the diagnostic log substitute
/// their own [`FailureSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl FailureSink for LogSink {
    fn report(&self, failure: &FailureReport) {
        error!(
            code = failure.error.code(),
            subscriber = %failure.subscriber,
            context = %failure.context,
            value = %failure.value,
            "{}",
            failure.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::DeliveryError;
    use serde_json::json;

    #[test]
    fn log_sink_does_not_panic() {
        let report = FailureReport::new(DeliveryError::failed("boom"), json!(1), "handler");
        LogSink.report(&report);
    }
}
