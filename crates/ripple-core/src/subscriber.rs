//! Subscriber sum type and handler trait.
//!
//! A [`Subscriber`] is anything that can receive one event value per
//! delivery: a callback closure, a sink queue, or a stateful
//! [`EventHandler`] object.
//!
//! # Delivery
//!
//! | Variant | Delivery | Can fail |
//! |---------|----------|----------|
//! | `Callback` | invoke closure with the value | Yes |
//! | `Sink` | `put(value)` (overwrite-oldest-on-full) | No |
//! | `Handler` | `on_event(&mut self, value)` | Yes |
//!
//! Like [`EventSource`](crate::EventSource), the enum is
//! `#[non_exhaustive]`: downstream matches carry a wildcard arm where the
//! engine raises its fatal unsupported-subscriber error.
//!
//! # Example
//!
//! ```
//! use ripple_core::{shared_queue, DeliveryError, EventHandler, Subscriber};
//! use serde_json::Value;
//!
//! struct Printer;
//!
//! impl EventHandler for Printer {
//!     fn id(&self) -> &str {
//!         "printer"
//!     }
//!
//!     fn on_event(&mut self, value: &Value) -> Result<(), DeliveryError> {
//!         println!("{value}");
//!         Ok(())
//!     }
//! }
//!
//! let subscribers = vec![
//!     Subscriber::callback(|_value| Ok(())),
//!     Subscriber::sink(shared_queue(8)),
//!     Subscriber::handler(Printer),
//! ];
//! assert_eq!(subscribers[2].label(), "printer");
//! ```

use crate::report::DeliveryError;
use crate::source::SharedQueue;
use serde_json::Value;
use std::fmt;

/// A stateful handler object receiving one event value per delivery.
///
/// The `id` attributes failures to this handler in
/// [`FailureReport`](crate::FailureReport)s; keep it stable and
/// human-readable.
pub trait EventHandler {
    /// Returns the handler's identifier.
    fn id(&self) -> &str;

    /// Handles one delivered event value.
    ///
    /// Errors are caught at the delivery site and reported; they never
    /// abort the fan-out round.
    fn on_event(&mut self, value: &Value) -> Result<(), DeliveryError>;
}

/// Boxed callback subscriber.
pub type CallbackFn = Box<dyn FnMut(&Value) -> Result<(), DeliveryError>>;

/// A sink that receives one event value per delivery.
#[non_exhaustive]
pub enum Subscriber {
    /// Invoke a closure with the value.
    Callback(CallbackFn),
    /// Put the value into a queue, evicting the oldest element when full.
    Sink(SharedQueue),
    /// Deliver to a stateful handler object.
    Handler(Box<dyn EventHandler>),
}

impl Subscriber {
    /// Wraps a closure as a subscriber.
    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(&Value) -> Result<(), DeliveryError> + 'static,
    {
        Self::Callback(Box::new(f))
    }

    /// Wraps a shared queue as a sink subscriber.
    #[must_use]
    pub fn sink(queue: SharedQueue) -> Self {
        Self::Sink(queue)
    }

    /// Wraps a handler object as a subscriber.
    pub fn handler<H>(handler: H) -> Self
    where
        H: EventHandler + 'static,
    {
        Self::Handler(Box::new(handler))
    }

    /// Returns an attribution label for failure reports and logs.
    ///
    /// `"callback"` and `"sink-queue"` for the anonymous variants, the
    /// handler's own id otherwise.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Callback(_) => "callback".to_string(),
            Self::Sink(_) => "sink-queue".to_string(),
            Self::Handler(handler) => handler.id().to_string(),
        }
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Subscriber::Callback"),
            Self::Sink(_) => f.write_str("Subscriber::Sink"),
            Self::Handler(handler) => write!(f, "Subscriber::Handler({})", handler.id()),
        }
    }
}
