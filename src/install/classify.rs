//! Failure classification of installer outcomes.
//!
//! Decision order, first match wins:
//!
//! 1. non-empty stdout: post a `ScriptOutput` event
//! 2. non-empty stderr: post a `ScriptOutput` event on the stderr channel
//! 3. process error: probe the network, then `Offline` or `InstallerReportedError`
//! 4. non-empty stderr without process error: `InstallerProducedStderr`
//! 5. otherwise: success
//!
//! Steps 1 and 2 are informational and always run. Exactly one terminal
//! event follows them.

use super::{AcquisitionError, ProcessOutcome};
use crate::connectivity::ConnectivityProbe;
use crate::events::{AcquisitionEvent, EventStream, OutputChannel};
use crate::InstallRequest;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Classify a recorded outcome given the reachability answer.
///
/// Pure: the same outcome and `online` value always give the same result.
/// `online` is only consulted when the process reported an error.
///
/// A clean exit that wrote to stderr is classified as a failure, matching
/// the installer's "silent on success" contract. Installers that print
/// progress to stderr will therefore fail here.
pub fn classify_outcome(outcome: &ProcessOutcome, online: bool) -> Result<(), AcquisitionError> {
    match &outcome.error {
        Some(source) if !online => Err(AcquisitionError::Offline {
            source: source.clone(),
        }),
        Some(source) => Err(AcquisitionError::InstallerReportedError {
            source: source.clone(),
            stdout: outcome.stdout.clone(),
            stderr: outcome.stderr.clone(),
        }),
        None if !outcome.stderr.is_empty() => Err(AcquisitionError::InstallerProducedStderr {
            stderr: outcome.stderr.clone(),
        }),
        None => Ok(()),
    }
}

/// The terminal event that reports `result` for `request`.
pub(crate) fn terminal_event(
    request: &InstallRequest,
    result: &Result<(), AcquisitionError>,
) -> AcquisitionEvent {
    let version = request.version().to_string();
    match result {
        Ok(()) => AcquisitionEvent::Completed {
            version,
            dotnet_path: request.dotnet_path().to_path_buf(),
        },
        Err(error @ AcquisitionError::Offline { .. }) => AcquisitionEvent::OfflineFailure {
            version,
            error: error.to_string(),
        },
        Err(AcquisitionError::InstallerReportedError { source, .. }) => {
            AcquisitionEvent::InstallError {
                version,
                error: source.to_string(),
            }
        }
        Err(AcquisitionError::InstallerProducedStderr { stderr }) => {
            AcquisitionEvent::ScriptError {
                version,
                error: stderr.clone(),
            }
        }
        Err(error @ AcquisitionError::UnexpectedInvocation(_)) => {
            AcquisitionEvent::UnexpectedError {
                version,
                error: error.to_string(),
            }
        }
    }
}

/// Turns process outcomes into events and classified results.
#[derive(Clone)]
pub struct FailureClassifier {
    probe: Arc<dyn ConnectivityProbe>,
    probe_timeout: Duration,
    events: EventStream,
}

impl FailureClassifier {
    /// Create a classifier posting to `events`.
    pub fn new(probe: Arc<dyn ConnectivityProbe>, probe_timeout: Duration, events: EventStream) -> Self {
        Self {
            probe,
            probe_timeout,
            events,
        }
    }

    /// Post output events and the terminal event for `outcome`, and return
    /// the classified result.
    pub async fn classify(
        &self,
        outcome: &ProcessOutcome,
        request: &InstallRequest,
    ) -> Result<(), AcquisitionError> {
        for (channel, text) in [
            (OutputChannel::Stdout, &outcome.stdout),
            (OutputChannel::Stderr, &outcome.stderr),
        ] {
            if !text.is_empty() {
                self.events.post(AcquisitionEvent::ScriptOutput {
                    version: request.version().to_string(),
                    channel,
                    output: text.clone(),
                });
            }
        }

        let online = match &outcome.error {
            Some(_) => self.probe_online().await,
            None => true,
        };

        let result = classify_outcome(outcome, online);
        match &result {
            Ok(()) => tracing::info!(version = request.version(), "install script completed"),
            Err(e) => tracing::info!(
                version = request.version(),
                kind = ?e.kind(),
                "install script failed"
            ),
        }
        self.events.post(terminal_event(request, &result));
        result
    }

    /// Ask the probe whether we are online.
    ///
    /// A probe that errors, panics or times out counts as online, so a
    /// hard failure defaults to `InstallerReportedError`.
    async fn probe_online(&self) -> bool {
        let probe = AssertUnwindSafe(self.probe.is_online()).catch_unwind();
        match timeout(self.probe_timeout, probe).await {
            Ok(Ok(Ok(online))) => online,
            Ok(Ok(Err(e))) => {
                tracing::warn!(error = %e, "reachability probe failed; assuming online");
                true
            }
            Ok(Err(_)) => {
                tracing::warn!("reachability probe panicked; assuming online");
                true
            }
            Err(_) => {
                tracing::warn!(limit = ?self.probe_timeout, "reachability probe timed out; assuming online");
                true
            }
        }
    }
}
