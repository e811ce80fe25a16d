//! The install request handed to the invoker.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while constructing an [`InstallRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RequestError {
    /// The version is empty or an unresolved alias such as `latest`.
    #[error("Cannot acquire .NET version \"{0}\". Please provide a valid version.")]
    InvalidVersion(String),
}

/// One request to install a .NET runtime version.
///
/// The version is passed to the installer verbatim; resolving channels to
/// concrete versions happens before a request is built.
///
/// # Example
///
/// ```rust
/// use dotnet_acquisition::InstallRequest;
///
/// let request = InstallRequest::new("6.0.100", "/opt/dotnet", "/opt/dotnet/dotnet").unwrap();
/// assert_eq!(request.version(), "6.0.100");
///
/// assert!(InstallRequest::new("latest", "/opt/dotnet", "/opt/dotnet/dotnet").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallRequest {
    version: String,
    install_dir: PathBuf,
    dotnet_path: PathBuf,
}

impl InstallRequest {
    /// Build a request, rejecting empty and `latest` versions.
    pub fn new(
        version: impl Into<String>,
        install_dir: impl Into<PathBuf>,
        dotnet_path: impl Into<PathBuf>,
    ) -> Result<Self, RequestError> {
        let version = version.into();
        if version.trim().is_empty() || version == "latest" {
            return Err(RequestError::InvalidVersion(version));
        }
        Ok(Self {
            version,
            install_dir: install_dir.into(),
            dotnet_path: dotnet_path.into(),
        })
    }

    /// Requested version or channel.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory the installer writes into.
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Path of the runtime executable once installed.
    pub fn dotnet_path(&self) -> &Path {
        &self.dotnet_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let request = InstallRequest::new("8.0", "/opt/dotnet", "/opt/dotnet/dotnet").unwrap();
        assert_eq!(request.version(), "8.0");
        assert_eq!(request.install_dir(), Path::new("/opt/dotnet"));
        assert_eq!(request.dotnet_path(), Path::new("/opt/dotnet/dotnet"));
    }

    #[test]
    fn test_rejects_latest_and_empty() {
        for version in ["latest", "", "   "] {
            let err = InstallRequest::new(version, "/opt", "/opt/dotnet").unwrap_err();
            assert_eq!(err, RequestError::InvalidVersion(version.to_string()));
        }
    }

    #[test]
    fn test_error_message() {
        let err = InstallRequest::new("latest", "/opt", "/opt/dotnet").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot acquire .NET version \"latest\". Please provide a valid version."
        );
    }

    #[test]
    fn test_version_is_not_normalized() {
        let request = InstallRequest::new(" 6.0.100 ", "/opt", "/opt/dotnet").unwrap();
        assert_eq!(request.version(), " 6.0.100 ");
    }
}
