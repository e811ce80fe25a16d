//! The process-wide event stream.

use super::{AcquisitionEvent, EventObserver};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type ObserverList = Vec<(u64, Arc<dyn EventObserver>)>;

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    observers: RwLock<ObserverList>,
}

/// Publish point for [`AcquisitionEvent`]s.
///
/// Cloning an `EventStream` yields another handle to the same subscriber
/// list. `post` delivers synchronously, in subscription order, to the
/// observers subscribed at the moment of the call. A panicking observer is
/// isolated: remaining observers still receive the event and `post` returns
/// normally.
#[derive(Clone, Default)]
pub struct EventStream {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl EventStream {
    /// Create a stream with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe an observer. It receives every event posted after this call
    /// until the returned [`Subscription`] is unsubscribed.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: EventObserver + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        Subscription {
            id,
            stream: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to all current observers.
    pub fn post(&self, event: AcquisitionEvent) {
        // Snapshot so observers can (un)subscribe while we deliver.
        let snapshot: ObserverList = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        tracing::trace!(
            event = event.name(),
            observers = snapshot.len(),
            "posting acquisition event"
        );

        for (id, observer) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| observer.on_event(&event))).is_err() {
                tracing::warn!(
                    observer = id,
                    event = event.name(),
                    "event observer panicked; continuing delivery"
                );
            }
        }
    }

    /// Number of currently subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle returned by [`EventStream::subscribe`].
///
/// Dropping the handle leaves the observer subscribed; call
/// [`unsubscribe`](Self::unsubscribe) to detach it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    stream: Weak<Inner>,
}

impl Subscription {
    /// Detach the observer. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        let Some(inner) = self.stream.upgrade() else {
            return false;
        };
        let mut observers = inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(id, _)| *id != self.id);
        observers.len() != before
    }
}
