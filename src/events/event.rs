//! The acquisition event record type.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Which output stream of the installer a [`AcquisitionEvent::ScriptOutput`]
/// came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// A structured event emitted by the acquisition pipeline.
///
/// Events are immutable value records. For one install attempt, zero or more
/// [`ScriptOutput`](Self::ScriptOutput) events are followed by exactly one
/// terminal event (see [`is_terminal`](Self::is_terminal)).
///
/// Causes are carried as rendered strings so events stay `Clone` and
/// serializable for log and telemetry sinks.
///
/// # Example
///
/// ```rust
/// use dotnet_acquisition::AcquisitionEvent;
/// use std::path::PathBuf;
///
/// let event = AcquisitionEvent::Completed {
///     version: "6.0.100".to_string(),
///     dotnet_path: PathBuf::from("/opt/dotnet/dotnet"),
/// };
/// assert!(event.is_terminal());
/// assert_eq!(event.name(), "DotnetAcquisitionCompleted");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, strum::IntoStaticStr)]
#[serde(tag = "event")]
#[non_exhaustive]
pub enum AcquisitionEvent {
    /// The installer finished silently with a zero exit.
    #[strum(serialize = "DotnetAcquisitionCompleted")]
    Completed {
        /// Requested version.
        version: String,
        /// Path of the installed runtime executable.
        dotnet_path: PathBuf,
    },

    /// The installer wrote to one of its output streams.
    #[strum(serialize = "DotnetAcquisitionScriptOutput")]
    ScriptOutput {
        /// Requested version.
        version: String,
        /// Stream the text was read from.
        channel: OutputChannel,
        /// Captured text.
        output: String,
    },

    /// The installer process failed while the network was reachable.
    #[strum(serialize = "DotnetAcquisitionInstallError")]
    InstallError {
        /// Requested version.
        version: String,
        /// Rendered process error.
        error: String,
    },

    /// The installer exited cleanly but wrote to stderr.
    #[strum(serialize = "DotnetAcquisitionScriptError")]
    ScriptError {
        /// Requested version.
        version: String,
        /// The stderr text.
        error: String,
    },

    /// The installer process failed and the network was unreachable.
    #[strum(serialize = "DotnetOfflineFailure")]
    OfflineFailure {
        /// Requested version.
        version: String,
        /// Rendered offline error.
        error: String,
    },

    /// The installer could not be invoked at all.
    #[strum(serialize = "DotnetAcquisitionUnexpectedError")]
    UnexpectedError {
        /// Requested version.
        version: String,
        /// Rendered invocation error.
        error: String,
    },

    /// A test command was killed by the missing shared library signal.
    #[strum(serialize = "DotnetAcquisitionMissingLinuxDependencies")]
    MissingNativeDependencies,
}

impl AcquisitionEvent {
    /// Stable event name, suitable for telemetry.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// The version this event refers to, if any.
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Completed { version, .. }
            | Self::ScriptOutput { version, .. }
            | Self::InstallError { version, .. }
            | Self::ScriptError { version, .. }
            | Self::OfflineFailure { version, .. }
            | Self::UnexpectedError { version, .. } => Some(version),
            Self::MissingNativeDependencies => None,
        }
    }

    /// Whether this event concludes an install attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. }
                | Self::InstallError { .. }
                | Self::ScriptError { .. }
                | Self::OfflineFailure { .. }
                | Self::UnexpectedError { .. }
        )
    }

    /// Whether this event reports a failure.
    pub fn is_error(&self) -> bool {
        self.is_terminal() && !matches!(self, Self::Completed { .. })
    }
}

impl fmt::Display for AcquisitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed {
                version,
                dotnet_path,
            } => write!(
                f,
                ".NET {} installed at {}",
                version,
                dotnet_path.display()
            ),
            Self::ScriptOutput {
                channel: OutputChannel::Stdout,
                output,
                ..
            } => write!(f, "{}", output),
            Self::ScriptOutput {
                channel: OutputChannel::Stderr,
                output,
                ..
            } => write!(f, "STDERR: {}", output),
            Self::InstallError { version, error } => {
                write!(f, ".NET {} installation failed: {}", version, error)
            }
            Self::ScriptError { version, error } => {
                write!(f, ".NET {} install script reported: {}", version, error)
            }
            Self::OfflineFailure { version, error } => {
                write!(f, ".NET {} installation failed: {}", version, error)
            }
            Self::UnexpectedError { version, error } => write!(
                f,
                ".NET {} installation failed unexpectedly: {}",
                version, error
            ),
            Self::MissingNativeDependencies => {
                write!(f, "Missing native dependencies for .NET on Linux")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(channel: OutputChannel, text: &str) -> AcquisitionEvent {
        AcquisitionEvent::ScriptOutput {
            version: "6.0.100".to_string(),
            channel,
            output: text.to_string(),
        }
    }

    #[test]
    fn test_script_output_is_not_terminal() {
        assert!(!output(OutputChannel::Stdout, "Installed.").is_terminal());
        assert!(!output(OutputChannel::Stderr, "warning").is_error());
    }

    #[test]
    fn test_failure_events_are_terminal_errors() {
        let failures = [
            AcquisitionEvent::InstallError {
                version: "6.0.100".into(),
                error: "exit 1".into(),
            },
            AcquisitionEvent::ScriptError {
                version: "6.0.100".into(),
                error: "oops".into(),
            },
            AcquisitionEvent::OfflineFailure {
                version: "6.0.100".into(),
                error: "offline".into(),
            },
            AcquisitionEvent::UnexpectedError {
                version: "6.0.100".into(),
                error: "spawn".into(),
            },
        ];
        for event in failures {
            assert!(event.is_terminal(), "{:?}", event);
            assert!(event.is_error(), "{:?}", event);
            assert_eq!(event.version(), Some("6.0.100"));
        }
    }

    #[test]
    fn test_completed_is_terminal_not_error() {
        let event = AcquisitionEvent::Completed {
            version: "8.0.0".into(),
            dotnet_path: PathBuf::from("/opt/dotnet/dotnet"),
        };
        assert!(event.is_terminal());
        assert!(!event.is_error());
    }

    #[test]
    fn test_missing_dependencies_has_no_version() {
        let event = AcquisitionEvent::MissingNativeDependencies;
        assert_eq!(event.version(), None);
        assert!(!event.is_terminal());
        assert_eq!(event.name(), "DotnetAcquisitionMissingLinuxDependencies");
    }

    #[test]
    fn test_stderr_display_is_prefixed() {
        assert_eq!(output(OutputChannel::Stdout, "ok").to_string(), "ok");
        assert_eq!(
            output(OutputChannel::Stderr, "bad").to_string(),
            "STDERR: bad"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(output(OutputChannel::Stderr, "bad")).unwrap();
        assert_eq!(json["event"], "ScriptOutput");
        assert_eq!(json["channel"], "stderr");
        assert_eq!(json["output"], "bad");

        let json = serde_json::to_value(AcquisitionEvent::MissingNativeDependencies).unwrap();
        assert_eq!(json["event"], "MissingNativeDependencies");
    }
}
