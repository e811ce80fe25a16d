//! Detection of missing native dependencies on Linux.
//!
//! When the .NET host cannot load one of its shared libraries (ICU, OpenSSL,
//! libstdc++ ...) it aborts during start-up. Running a test command and
//! checking its termination signal is a cheap way to spot that and offer
//! the user a fix.

use crate::events::{AcquisitionEvent, EventStream};
use crate::Platform;
use std::process::Command;
use std::sync::Arc;

/// Message passed to the remediation prompt.
pub const MISSING_DEPENDENCIES_MESSAGE: &str = "Failed to run .NET tooling.";

/// Termination signal that indicates a failed native dependency load.
#[cfg(unix)]
const MISSING_DEPENDENCY_SIGNAL: i32 = libc::SIGABRT;

/// Offers the user a way to install missing native dependencies.
pub trait DependencyPrompt: Send + Sync {
    /// Show `message` and the remediation steps. Fire-and-forget.
    fn prompt_install(&self, message: &str);
}

/// A prompt that only logs; useful for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPrompt;

impl DependencyPrompt for LogPrompt {
    fn prompt_install(&self, message: &str) {
        tracing::warn!(
            "{} The .NET runtime could not load its native dependencies; \
             install them with your distribution's package manager.",
            message
        );
    }
}

/// Whether a termination signal indicates missing native dependencies.
///
/// # Example
///
/// ```rust
/// use dotnet_acquisition::signal_indicates_missing_dependencies;
///
/// assert!(!signal_indicates_missing_dependencies(None));
/// #[cfg(unix)]
/// assert!(signal_indicates_missing_dependencies(Some(libc::SIGABRT)));
/// ```
pub fn signal_indicates_missing_dependencies(signal: Option<i32>) -> bool {
    #[cfg(unix)]
    {
        signal == Some(MISSING_DEPENDENCY_SIGNAL)
    }
    #[cfg(not(unix))]
    {
        let _ = signal;
        false
    }
}

/// Runs test commands to detect missing native dependencies.
#[derive(Clone)]
pub struct NativeDependencyProber {
    platform: Platform,
    events: EventStream,
    prompt: Arc<dyn DependencyPrompt>,
}

impl NativeDependencyProber {
    /// Create a prober for `platform`.
    pub fn new(platform: Platform, events: EventStream, prompt: Arc<dyn DependencyPrompt>) -> Self {
        Self {
            platform,
            events,
            prompt,
        }
    }

    /// Run `command` synchronously and report whether its termination
    /// signal indicates missing native dependencies.
    ///
    /// Only the signal is inspected, never the exit code. Always `false` on
    /// platforms where the probe does not apply, and when the command cannot
    /// be started.
    pub fn probe(&self, command: &str, args: &[String]) -> bool {
        if !self.platform.capabilities().probes_native_dependencies {
            tracing::debug!(
                platform = self.platform.display_name(),
                "skipping native dependency probe"
            );
            return false;
        }

        let output = match Command::new(command).args(args).output() {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(command, error = %e, "dependency test command did not start");
                return false;
            }
        };

        let signal = termination_signal(&output.status);
        tracing::debug!(command, ?signal, "dependency test command finished");
        signal_indicates_missing_dependencies(signal)
    }

    /// Probe with `command` and, on a positive result, post
    /// [`AcquisitionEvent::MissingNativeDependencies`] and prompt the user.
    ///
    /// Returns whether remediation was offered. Nothing is installed here.
    pub fn ensure_dependencies(&self, command: &str, args: &[String]) -> bool {
        if !self.probe(command, args) {
            return false;
        }

        self.events.post(AcquisitionEvent::MissingNativeDependencies);
        self.prompt.prompt_install(MISSING_DEPENDENCIES_MESSAGE);
        true
    }
}

#[cfg(unix)]
fn termination_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}
