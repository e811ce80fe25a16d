//! # dotnet-acquisition
//!
//! Runs the .NET install script on behalf of a host application and turns
//! its outcome into structured events and a classified result.
//!
//! ## Features
//!
//! - `AcquisitionInvoker` builds the platform-correct install command, runs
//!   it with a timeout and output cap, and classifies the outcome
//! - `FailureKind` separates offline machines, installer errors, stray
//!   stderr output and invocation failures
//! - `EventStream` publishes an `AcquisitionEvent` for every step
//! - `NativeDependencyProber` detects missing shared libraries on Linux
//!
//! ## Example
//!
//! ```rust,no_run
//! use dotnet_acquisition::{AcquisitionInvoker, EventStream, InstallRequest, TracingObserver};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let events = EventStream::new();
//!     events.subscribe(TracingObserver);
//!
//!     let request = InstallRequest::new("8.0.100", "/opt/dotnet", "/opt/dotnet/dotnet")
//!         .expect("valid version");
//!     let invoker = AcquisitionInvoker::new(events);
//!     if let Err(e) = invoker.install(&request).await {
//!         eprintln!("{:?}: {}", e.kind(), e);
//!     }
//! }
//! ```

mod connectivity;
mod dependencies;
mod events;
mod install;
mod options;
mod platform;
mod request;

pub use connectivity::{ConnectivityProbe, ProbeError, TcpConnectivityProbe};
pub use dependencies::{
    signal_indicates_missing_dependencies, DependencyPrompt, LogPrompt, NativeDependencyProber,
    MISSING_DEPENDENCIES_MESSAGE,
};
pub use events::{AcquisitionEvent, EventObserver, EventStream, OutputChannel, Subscription, TracingObserver};
pub use install::{
    build_install_command, classify_outcome, quote_install_dir, AcquisitionError,
    AcquisitionInvoker, FailureClassifier, FailureKind, InvocationError, LocatorError,
    PathScriptLocator, ProcessError, ProcessOutcome, ProcessRunner, ResolvedCommand,
    ScriptLocator, ShellRunner,
};
pub use options::AcquisitionOptions;
pub use platform::{Platform, PlatformCapabilities, QuotingStyle};
pub use request::{InstallRequest, RequestError};
