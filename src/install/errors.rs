//! Error types for acquisition operations.
//!
//! Every failed acquisition carries exactly one [`FailureKind`]. Each
//! [`AcquisitionError`] variant keeps its original cause and offers an
//! actionable fix suggestion.

use super::{InvocationError, ProcessError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four mutually exclusive ways an acquisition can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The installer failed and the network was unreachable.
    Offline,
    /// The installer process failed while the network was reachable.
    InstallerReportedError,
    /// The installer exited cleanly but wrote to stderr.
    InstallerProducedStderr,
    /// The installer could not be invoked at all.
    UnexpectedInvocationError,
}

/// Errors returned by [`AcquisitionInvoker::install`](crate::AcquisitionInvoker::install).
///
/// # Example
///
/// ```rust
/// use dotnet_acquisition::{AcquisitionError, FailureKind};
///
/// fn handle_error(error: AcquisitionError) {
///     eprintln!("Installation failed: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
///     if error.kind() == FailureKind::Offline {
///         eprintln!("(you appear to be offline)");
///     }
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AcquisitionError {
    /// The installer failed and no network connection was detected.
    #[error("No internet connection: Cannot install .NET")]
    Offline {
        /// The underlying process failure.
        #[source]
        source: ProcessError,
    },

    /// The installer process exited non-zero, was killed, timed out or
    /// overflowed the output cap.
    #[error("{source}")]
    InstallerReportedError {
        /// The process failure.
        #[source]
        source: ProcessError,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The installer exited cleanly but wrote to its error stream.
    #[error("Install script reported an error: {stderr}")]
    InstallerProducedStderr {
        /// Captured standard error.
        stderr: String,
    },

    /// The installer could not be invoked.
    #[error(transparent)]
    UnexpectedInvocation(#[from] InvocationError),
}

impl AcquisitionError {
    /// The classified failure kind.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Offline { .. } => FailureKind::Offline,
            Self::InstallerReportedError { .. } => FailureKind::InstallerReportedError,
            Self::InstallerProducedStderr { .. } => FailureKind::InstallerProducedStderr,
            Self::UnexpectedInvocation(_) => FailureKind::UnexpectedInvocationError,
        }
    }

    /// An actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dotnet_acquisition::{AcquisitionError, ProcessError};
    ///
    /// let error = AcquisitionError::Offline {
    ///     source: ProcessError::NonZeroExit { code: 1 },
    /// };
    /// assert!(error.fix_suggestion().contains("internet"));
    /// ```
    pub fn fix_suggestion(&self) -> &'static str {
        match self {
            Self::Offline { .. } => "Check your internet connection and try again",
            Self::InstallerReportedError {
                source: ProcessError::TimedOut { .. },
                ..
            } => "The install script timed out. Check your network speed and try again",
            Self::InstallerReportedError { .. } => {
                "See the install script output in the acquisition log for details"
            }
            Self::InstallerProducedStderr { .. } => {
                "The install script wrote errors; see the acquisition log for details"
            }
            Self::UnexpectedInvocation(InvocationError::Locator(_)) => {
                "The install script could not be obtained. Check that it is available and try again"
            }
            Self::UnexpectedInvocation(_) => {
                "The install script could not be started. Check that a shell is available"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::LocatorError;
    use std::error::Error as _;
    use std::time::Duration;

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            AcquisitionError::Offline {
                source: ProcessError::NonZeroExit { code: 1 },
            },
            AcquisitionError::InstallerReportedError {
                source: ProcessError::NonZeroExit { code: 1 },
                stdout: String::new(),
                stderr: String::new(),
            },
            AcquisitionError::InstallerProducedStderr {
                stderr: "boom".into(),
            },
            AcquisitionError::UnexpectedInvocation(InvocationError::Locator(
                LocatorError::Unavailable("x".into()),
            )),
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), 4);
        for error in &errors {
            assert!(!error.fix_suggestion().is_empty(), "{:?}", error);
        }
    }

    #[test]
    fn test_offline_display_and_source() {
        let error = AcquisitionError::Offline {
            source: ProcessError::NonZeroExit { code: 1 },
        };
        assert_eq!(error.to_string(), "No internet connection: Cannot install .NET");
        assert_eq!(
            error.source().unwrap().to_string(),
            "Install script exited with code 1"
        );
    }

    #[test]
    fn test_installer_error_displays_process_error() {
        let error = AcquisitionError::InstallerReportedError {
            source: ProcessError::TimedOut {
                limit: Duration::from_secs(30),
            },
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(error.to_string().contains("timed out"));
        assert!(error.fix_suggestion().contains("timed out"));
    }

    #[test]
    fn test_invocation_error_is_unmodified() {
        let error = AcquisitionError::from(InvocationError::Locator(LocatorError::Unavailable(
            "download failed".into(),
        )));
        assert_eq!(
            error.to_string(),
            "Failed to acquire install script: download failed"
        );
        assert!(matches!(
            error,
            AcquisitionError::UnexpectedInvocation(InvocationError::Locator(
                LocatorError::Unavailable(ref msg)
            )) if msg == "download failed"
        ));
    }
}
