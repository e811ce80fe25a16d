//! Acquisition options configuration.
//!
//! This module provides the [`AcquisitionOptions`] struct that bounds the
//! installer subprocess and the reachability probe.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration options for one acquisition invoker.
///
/// # Default Behavior
///
/// - installer timeout: 30 seconds, after which the process is killed
/// - output cap: 500 KiB of combined stdout and stderr
/// - reachability probe timeout: 3 seconds
///
/// # Example
///
/// ```rust
/// use dotnet_acquisition::AcquisitionOptions;
/// use std::time::Duration;
///
/// let opts = AcquisitionOptions {
///     timeout: Duration::from_secs(120),
///     ..Default::default()
/// };
/// assert_eq!(opts.max_buffer_bytes, 500 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionOptions {
    /// Wall-clock limit for the installer process.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Maximum combined bytes of stdout and stderr to capture. Exceeding it
    /// kills the installer and fails the run.
    ///
    /// Default: 500 KiB
    pub max_buffer_bytes: usize,

    /// Limit for the network reachability probe. A probe that does not
    /// answer in time is treated as "online".
    ///
    /// Default: 3 seconds
    pub probe_timeout: Duration,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_buffer_bytes: 500 * 1024,
            probe_timeout: Duration::from_secs(3),
        }
    }
}
