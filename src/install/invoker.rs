//! Installer invocation for one acquisition request.
//!
//! This module provides [`AcquisitionInvoker`], which builds the install
//! command, runs it and classifies the result.

use super::classify::terminal_event;
use super::{
    build_install_command, AcquisitionError, FailureClassifier, InvocationError, PathScriptLocator,
    ProcessRunner, ScriptLocator, ShellRunner,
};
use crate::connectivity::{ConnectivityProbe, TcpConnectivityProbe};
use crate::{AcquisitionOptions, EventStream, InstallRequest, Platform};
use std::sync::Arc;

/// Runs the installer script for install requests.
///
/// The invoker holds no per-request state; one instance may serve many
/// concurrent requests.
///
/// # Example
///
/// ```rust,no_run
/// use dotnet_acquisition::{AcquisitionInvoker, EventStream, InstallRequest, TracingObserver};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let events = EventStream::new();
///     events.subscribe(TracingObserver);
///
///     let invoker = AcquisitionInvoker::new(events);
///     let request = InstallRequest::new("6.0.100", "/opt/dotnet", "/opt/dotnet/dotnet").unwrap();
///
///     match invoker.install(&request).await {
///         Ok(()) => println!("Installed .NET {}", request.version()),
///         Err(e) => println!("Failed: {}. Fix: {}", e, e.fix_suggestion()),
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AcquisitionInvoker {
    locator: Arc<dyn ScriptLocator>,
    runner: Arc<dyn ProcessRunner>,
    classifier: FailureClassifier,
    events: EventStream,
    platform: Platform,
}

impl AcquisitionInvoker {
    /// An invoker for the current platform with the default collaborators:
    /// [`PathScriptLocator`], [`ShellRunner`] and [`TcpConnectivityProbe`].
    pub fn new(events: EventStream) -> Self {
        let platform = Platform::current();
        let options = AcquisitionOptions::default();
        Self::with_parts(
            platform,
            &options,
            Arc::new(PathScriptLocator::new(platform)),
            Arc::new(ShellRunner::new(&options)),
            Arc::new(TcpConnectivityProbe::default()),
            events,
        )
    }

    /// An invoker with explicit collaborators.
    pub fn with_parts(
        platform: Platform,
        options: &AcquisitionOptions,
        locator: Arc<dyn ScriptLocator>,
        runner: Arc<dyn ProcessRunner>,
        probe: Arc<dyn ConnectivityProbe>,
        events: EventStream,
    ) -> Self {
        Self {
            locator,
            runner,
            classifier: FailureClassifier::new(probe, options.probe_timeout, events.clone()),
            events,
            platform,
        }
    }

    /// Install the runtime described by `request`.
    ///
    /// Exactly one terminal event is posted before this returns. On failure
    /// the error carries the classified [`FailureKind`](crate::FailureKind).
    pub async fn install(&self, request: &InstallRequest) -> Result<(), AcquisitionError> {
        tracing::info!(
            version = request.version(),
            install_dir = %request.install_dir().display(),
            "installing .NET"
        );

        let outcome = match self.invoke(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(version = request.version(), error = %e, "install script could not be invoked");
                let result = Err(AcquisitionError::UnexpectedInvocation(e));
                self.events.post(terminal_event(request, &result));
                return result;
            }
        };

        self.classifier.classify(&outcome, request).await
    }

    async fn invoke(&self, request: &InstallRequest) -> Result<super::ProcessOutcome, InvocationError> {
        let command = build_install_command(
            self.locator.as_ref(),
            request.version(),
            request.install_dir(),
            self.platform,
        )
        .await?;

        self.runner.run(&command, self.platform).await
    }
}
