//! Network reachability probing.
//!
//! The probe is consulted only after the installer has failed, to tell an
//! offline machine apart from a broken install.

use async_trait::async_trait;
use futures::future::select_ok;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Endpoints raced by [`TcpConnectivityProbe::default`].
const DEFAULT_ENDPOINTS: &[&str] = &[
    "dotnetcli.azureedge.net:443",
    "builds.dotnet.microsoft.com:443",
    "1.1.1.1:443",
];

/// Per-endpoint connect limit.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Failure of the probe itself, as opposed to a negative answer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// The probe was configured without any endpoint.
    #[error("No endpoints configured for the reachability probe")]
    NoEndpoints,
}

/// Best-effort check of external network connectivity.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// `Ok(false)` means the network is unreachable.
    async fn is_online(&self) -> Result<bool, ProbeError>;
}

/// Reports online if a TCP connection to any configured endpoint succeeds.
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    endpoints: Vec<String>,
    connect_timeout: Duration,
}

impl TcpConnectivityProbe {
    /// Probe the given `host:port` endpoints.
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    /// Override the per-endpoint connect limit.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

impl Default for TcpConnectivityProbe {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINTS.iter().copied())
    }
}

#[async_trait]
impl ConnectivityProbe for TcpConnectivityProbe {
    async fn is_online(&self) -> Result<bool, ProbeError> {
        if self.endpoints.is_empty() {
            return Err(ProbeError::NoEndpoints);
        }

        let attempts = self.endpoints.iter().map(|endpoint| {
            Box::pin(async move {
                match timeout(self.connect_timeout, TcpStream::connect(endpoint.as_str())).await {
                    Ok(Ok(_)) => Ok(endpoint.as_str()),
                    Ok(Err(_)) | Err(_) => Err(()),
                }
            })
        });

        match select_ok(attempts).await {
            Ok((endpoint, _)) => {
                tracing::debug!(endpoint, "reachability probe connected");
                Ok(true)
            }
            Err(()) => {
                tracing::debug!("reachability probe found no reachable endpoint");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_empty_endpoints_is_probe_error() {
        let probe = TcpConnectivityProbe::new(Vec::<String>::new());
        assert!(matches!(probe.is_online().await, Err(ProbeError::NoEndpoints)));
    }

    #[tokio::test]
    async fn test_local_listener_is_online() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let probe = TcpConnectivityProbe::new([addr.to_string()]);
        assert!(probe.is_online().await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_port_is_offline() {
        // Bind then drop to get a port nothing listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let probe = TcpConnectivityProbe::new([addr.to_string()])
            .with_connect_timeout(Duration::from_millis(500));
        assert!(!probe.is_online().await.unwrap());
    }
}
