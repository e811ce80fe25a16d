//! Acquisition events and the stream that publishes them.
//!
//! Every step of an acquisition posts an [`AcquisitionEvent`] to an
//! [`EventStream`]. The stream is an explicit context object: create one per
//! host session, clone it into each component, and subscribe sinks to it.
//!
//! # Example
//!
//! ```rust
//! use dotnet_acquisition::{AcquisitionEvent, EventStream};
//!
//! let events = EventStream::new();
//! let subscription = events.subscribe(|event: &AcquisitionEvent| {
//!     println!("{}", event);
//! });
//!
//! events.post(AcquisitionEvent::MissingNativeDependencies);
//! subscription.unsubscribe();
//! ```

mod event;
mod observer;
mod stream;

pub use event::{AcquisitionEvent, OutputChannel};
pub use observer::{EventObserver, TracingObserver};
pub use stream::{EventStream, Subscription};
