//! Observers that receive posted events.

use super::AcquisitionEvent;

/// A sink that receives every event posted to an [`EventStream`](super::EventStream).
///
/// Implementations must not block for long: delivery is synchronous with
/// `post`. Closures of the form `Fn(&AcquisitionEvent)` implement this trait.
pub trait EventObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &AcquisitionEvent);
}

impl<F> EventObserver for F
where
    F: Fn(&AcquisitionEvent) + Send + Sync,
{
    fn on_event(&self, event: &AcquisitionEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`.
///
/// Failure events are logged at `error`, everything else at `info`. The host
/// decides where the records end up by installing a subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn on_event(&self, event: &AcquisitionEvent) {
        let name = event.name();
        let version = event.version().unwrap_or("-");
        if event.is_error() {
            tracing::error!(event = name, version, "{}", event);
        } else {
            tracing::info!(event = name, version, "{}", event);
        }
    }
}
