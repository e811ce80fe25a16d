//! Install command construction.

use super::{LocatorError, ScriptLocator};
use crate::platform::{Platform, QuotingStyle};
use std::path::{Path, PathBuf};

/// Runtime variant passed to the installer's `-Runtime` flag.
const RUNTIME_KIND: &str = "dotnet";

/// A fully resolved installer invocation.
///
/// Arguments are already quoted for the target shell. Use
/// [`command_line`](Self::command_line) for the script invocation itself and
/// [`shell_line`](Self::shell_line) for what the default shell executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    /// Path to the installer script.
    pub executable_path: PathBuf,
    /// Ordered, pre-quoted arguments.
    pub arguments: Vec<String>,
    /// Scripting host prefix, e.g. PowerShell on Windows.
    pub shell_prefix: Option<String>,
}

impl ResolvedCommand {
    /// `"<script>" <args...>`
    pub fn command_line(&self) -> String {
        let mut line = format!("\"{}\"", self.executable_path.display());
        for arg in &self.arguments {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// The command line with the scripting host prefix applied, if any.
    pub fn shell_line(&self) -> String {
        match &self.shell_prefix {
            Some(prefix) => format!("{} {}", prefix, self.command_line()),
            None => self.command_line(),
        }
    }
}

/// Quote an install directory so it survives the platform shell.
///
/// # Example
///
/// ```rust
/// use dotnet_acquisition::{quote_install_dir, QuotingStyle};
/// use std::path::Path;
///
/// let dir = Path::new(r"C:\Users\O'Brien\dotnet");
/// assert_eq!(
///     quote_install_dir(dir, QuotingStyle::SingleQuoteEscaped),
///     r"'C:\Users\O''Brien\dotnet'"
/// );
/// ```
pub fn quote_install_dir(install_dir: &Path, style: QuotingStyle) -> String {
    let raw = install_dir.to_string_lossy();
    match style {
        QuotingStyle::SingleQuoteEscaped => format!("'{}'", raw.replace('\'', "''")),
        QuotingStyle::DoubleQuoted => format!("\"{}\"", raw),
    }
}

/// Build the installer invocation for `version` into `install_dir`.
///
/// Resolves the script through `locator`; a locator failure propagates
/// unchanged. The version is passed through exactly as given.
pub async fn build_install_command(
    locator: &dyn ScriptLocator,
    version: &str,
    install_dir: &Path,
    platform: Platform,
) -> Result<ResolvedCommand, LocatorError> {
    let caps = platform.capabilities();
    let arguments = vec![
        "-InstallDir".to_string(),
        quote_install_dir(install_dir, caps.quoting),
        "-Runtime".to_string(),
        RUNTIME_KIND.to_string(),
        "-Version".to_string(),
        version.to_string(),
    ];

    let executable_path = locator.install_script_path().await?;

    Ok(ResolvedCommand {
        executable_path,
        arguments,
        shell_prefix: caps.shell_prefix.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedLocator(Result<PathBuf, LocatorError>);

    #[async_trait]
    impl ScriptLocator for FixedLocator {
        async fn install_script_path(&self) -> Result<PathBuf, LocatorError> {
            self.0.clone()
        }
    }

    fn script() -> FixedLocator {
        FixedLocator(Ok(PathBuf::from("/tmp/dotnet-install.sh")))
    }

    #[test]
    fn test_apostrophe_doubled_on_windows() {
        let quoted = quote_install_dir(
            Path::new("C:\\it's here"),
            QuotingStyle::SingleQuoteEscaped,
        );
        assert_eq!(quoted, "'C:\\it''s here'");
    }

    #[test]
    fn test_apostrophe_untouched_elsewhere() {
        let quoted = quote_install_dir(Path::new("/home/o'neil/dotnet"), QuotingStyle::DoubleQuoted);
        assert_eq!(quoted, "\"/home/o'neil/dotnet\"");
    }

    #[tokio::test]
    async fn test_linux_command_line() {
        let cmd = build_install_command(&script(), "6.0.100", Path::new("/opt/dotnet"), Platform::Linux)
            .await
            .unwrap();
        assert_eq!(
            cmd.command_line(),
            "\"/tmp/dotnet-install.sh\" -InstallDir \"/opt/dotnet\" -Runtime dotnet -Version 6.0.100"
        );
        assert_eq!(cmd.shell_line(), cmd.command_line());
    }

    #[tokio::test]
    async fn test_windows_is_wrapped_in_powershell() {
        let locator = FixedLocator(Ok(PathBuf::from("C:\\scripts\\dotnet-install.ps1")));
        let cmd = build_install_command(&locator, "8.0", Path::new("C:\\O'Brien"), Platform::Windows)
            .await
            .unwrap();
        assert_eq!(cmd.arguments[1], "'C:\\O''Brien'");
        assert!(cmd
            .shell_line()
            .starts_with("powershell.exe -ExecutionPolicy unrestricted -File \"C:\\scripts\\dotnet-install.ps1\""));
    }

    #[tokio::test]
    async fn test_argument_order_is_stable() {
        let cmd = build_install_command(&script(), "7.0.0-rc.1", Path::new("/x"), Platform::Other)
            .await
            .unwrap();
        assert_eq!(
            cmd.arguments,
            vec!["-InstallDir", "\"/x\"", "-Runtime", "dotnet", "-Version", "7.0.0-rc.1"]
        );
        assert!(cmd.shell_prefix.is_none());
    }

    #[tokio::test]
    async fn test_locator_error_propagates_unchanged() {
        let locator = FixedLocator(Err(LocatorError::Unavailable("dns failure".into())));
        let err = build_install_command(&locator, "6.0.100", Path::new("/opt"), Platform::Linux)
            .await
            .unwrap_err();
        assert_eq!(err, LocatorError::Unavailable("dns failure".into()));
    }
}
