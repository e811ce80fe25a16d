//! Results of running the installer process.

use std::time::Duration;
use thiserror::Error;

/// Terminal error of an installer run that did produce a process.
///
/// Any of these variants counts as a hard process failure during
/// classification, including timeouts and output overflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProcessError {
    /// The installer exited with a non-zero code.
    #[error("Install script exited with code {code}")]
    NonZeroExit {
        /// Exit code reported by the shell.
        code: i32,
    },

    /// The installer was terminated by a signal.
    #[error("Install script was terminated by signal {signal}")]
    Signaled {
        /// Signal number.
        signal: i32,
    },

    /// The installer ran past its wall-clock limit and was killed.
    #[error("Install script timed out after {limit:?} and was killed")]
    TimedOut {
        /// Configured limit.
        limit: Duration,
    },

    /// The installer wrote more than the output cap and was killed.
    #[error("Install script output exceeded {limit} bytes")]
    OutputLimitExceeded {
        /// Configured cap in bytes.
        limit: usize,
    },

    /// Reading output or waiting on the process failed.
    #[error("I/O error while running install script: {0}")]
    Io(String),
}

/// The installer could not be invoked at all; no process outcome exists.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvocationError {
    /// The install command could not be built.
    #[error(transparent)]
    Locator(#[from] super::LocatorError),

    /// The shell process could not be spawned.
    #[error("Failed to start install script: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Captured result of one installer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Non-`None` if the process exited non-zero or was killed.
    pub error: Option<ProcessError>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutcome {
    /// Whether the process itself finished cleanly.
    pub fn exited_cleanly(&self) -> bool {
        self.error.is_none()
    }
}
