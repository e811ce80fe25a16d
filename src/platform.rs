//! Platform detection and the per-platform capability table.
//!
//! Every platform-dependent decision in the crate (path quoting, shell
//! wrapping, whether the native dependency probe applies) is read from
//! [`PlatformCapabilities`]. Adding a platform means adding one arm to
//! [`Platform::capabilities`].

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// The platform family an acquisition runs on.
///
/// # Example
///
/// ```rust
/// use dotnet_acquisition::Platform;
///
/// let platform = Platform::current();
/// println!("{} (probe deps: {})", platform.display_name(),
///     platform.capabilities().probes_native_dependencies);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[non_exhaustive]
pub enum Platform {
    /// Windows family; the installer is a PowerShell script.
    Windows,
    /// Linux; the installer is a bash script.
    Linux,
    /// Any other Unix-like platform (macOS, BSDs).
    Other,
}

/// How the install directory is quoted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotingStyle {
    /// Double embedded `'` and wrap the whole value in single quotes.
    SingleQuoteEscaped,
    /// Wrap the value in double quotes as-is.
    DoubleQuoted,
}

/// Capabilities that drive command construction and probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Quoting applied to the install directory argument.
    pub quoting: QuotingStyle,
    /// Prefix that hands the script to an elevated scripting host, if any.
    pub shell_prefix: Option<&'static str>,
    /// Default shell program and the flag that makes it run a command line.
    pub default_shell: (&'static str, &'static str),
    /// Whether the native dependency probe runs at all.
    pub probes_native_dependencies: bool,
    /// File name of the installer script.
    pub install_script_name: &'static str,
}

const POWERSHELL_PREFIX: &str = "powershell.exe -ExecutionPolicy unrestricted -File";

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Look up the capability row for this platform.
    pub fn capabilities(&self) -> PlatformCapabilities {
        match self {
            Self::Windows => PlatformCapabilities {
                quoting: QuotingStyle::SingleQuoteEscaped,
                shell_prefix: Some(POWERSHELL_PREFIX),
                default_shell: ("cmd", "/C"),
                probes_native_dependencies: false,
                install_script_name: "dotnet-install.ps1",
            },
            Self::Linux => PlatformCapabilities {
                quoting: QuotingStyle::DoubleQuoted,
                shell_prefix: None,
                default_shell: ("sh", "-c"),
                probes_native_dependencies: true,
                install_script_name: "dotnet-install.sh",
            },
            Self::Other => PlatformCapabilities {
                quoting: QuotingStyle::DoubleQuoted,
                shell_prefix: None,
                default_shell: ("sh", "-c"),
                probes_native_dependencies: false,
                install_script_name: "dotnet-install.sh",
            },
        }
    }

    /// Human-readable platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::Other => "Unix",
        }
    }

    /// Iterator over all known platforms.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}
