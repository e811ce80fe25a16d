//! Install script lookup.

use crate::Platform;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Fallback directories checked after the explicit directory and PATH.
const FALLBACK_DIRS: &[&str] = &["/usr/local/share/dotnet", "/usr/share/dotnet"];

/// Errors raised while resolving the install script path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LocatorError {
    /// The script could not be found anywhere searched.
    #[error("Install script {name} not found")]
    NotFound {
        /// Script file name that was searched for.
        name: String,
    },

    /// The locator failed for another reason (e.g. a download error).
    #[error("Failed to acquire install script: {0}")]
    Unavailable(String),
}

/// Resolves the on-disk path of the installer script.
///
/// Implementations may download or cache the script; that work is theirs.
#[async_trait]
pub trait ScriptLocator: Send + Sync {
    /// Path to the installer script for the current platform.
    async fn install_script_path(&self) -> Result<PathBuf, LocatorError>;
}

/// Finds a pre-placed install script by name.
///
/// Lookup order:
///
/// 1. the configured directory, if any
/// 2. `PATH`, via the `which` crate
/// 3. common system locations
#[derive(Debug, Clone)]
pub struct PathScriptLocator {
    script_name: &'static str,
    search_dir: Option<PathBuf>,
}

impl PathScriptLocator {
    /// Locate the script that `platform` uses.
    pub fn new(platform: Platform) -> Self {
        Self {
            script_name: platform.capabilities().install_script_name,
            search_dir: None,
        }
    }

    /// Check `dir` before anything else.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    fn find(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.search_dir {
            let path = dir.join(self.script_name);
            if path.is_file() {
                return Some(path);
            }
        }

        if let Ok(path) = which::which(self.script_name) {
            return Some(path);
        }

        FALLBACK_DIRS
            .iter()
            .map(|dir| PathBuf::from(dir).join(self.script_name))
            .find(|path| path.is_file())
    }
}

#[async_trait]
impl ScriptLocator for PathScriptLocator {
    async fn install_script_path(&self) -> Result<PathBuf, LocatorError> {
        match self.find() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "located install script");
                Ok(path)
            }
            None => Err(LocatorError::NotFound {
                name: self.script_name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finds_script_in_search_dir() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("dotnet-install.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        let locator = PathScriptLocator::new(Platform::Linux).with_search_dir(dir.path());
        assert_eq!(locator.install_script_path().await.unwrap(), script);
    }

    #[tokio::test]
    async fn test_missing_script_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let locator = PathScriptLocator {
            script_name: "definitely-not-a-real-install-script-12345.sh",
            search_dir: Some(dir.path().to_path_buf()),
        };
        let err = locator.install_script_path().await.unwrap_err();
        assert!(matches!(err, LocatorError::NotFound { .. }));
        assert!(err.to_string().contains("definitely-not-a-real"));
    }

    #[test]
    fn test_script_name_follows_platform() {
        assert_eq!(
            PathScriptLocator::new(Platform::Windows).script_name,
            "dotnet-install.ps1"
        );
        assert_eq!(
            PathScriptLocator::new(Platform::Other).script_name,
            "dotnet-install.sh"
        );
    }
}
