//! Client builder.
//!
//! [`ClientBuilder`] turns a textual target and an [`Auth`] into a connected
//! [`Client`]. Resolution and socket setup together are bounded by the
//! request timeout.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bytes::Bytes;

use crate::client::retry::Retry;
use crate::client::{Auth, ClientConfig};
use crate::error::{Error, Result};
use crate::transport::{MAX_UDP_PAYLOAD, UdpTransport};

use super::Client;

/// Default SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for constructing SNMP clients.
///
/// # Example
///
/// ```rust,no_run
/// use snmp_get::{Auth, ClientBuilder, Retry};
/// use std::time::Duration;
///
/// # async fn example() -> snmp_get::Result<()> {
/// let client = ClientBuilder::new("192.168.1.1", Auth::v2c("public"))
///     .timeout(Duration::from_millis(2000))
///     .retry(1)
///     .connect()
///     .await?;
/// # client.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    target: String,
    auth: Auth,
    port: u16,
    timeout: Duration,
    retry: Retry,
}

impl ClientBuilder {
    /// Create a new client builder.
    ///
    /// `target` is a host name or address, with or without a port:
    /// `10.0.0.5`, `10.0.0.5:1161`, `switch1`, `::1` or `[::1]:1161`.
    pub fn new(target: impl Into<String>, auth: impl Into<Auth>) -> Self {
        Self {
            target: target.into(),
            auth: auth.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            retry: Retry::default(),
        }
    }

    /// Port used when the target does not name one (default: 161).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the request timeout (default: 5 seconds).
    ///
    /// This is the time to wait for a response before retrying or failing,
    /// and also the limit on opening the session.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration (default: 3 retries, no backoff).
    pub fn retry(mut self, retry: impl Into<Retry>) -> Self {
        self.retry = retry.into();
        self
    }

    /// Resolve the target to a socket address.
    async fn resolve_target(&self) -> Result<SocketAddr> {
        let target = self.target.trim();
        if target.is_empty() {
            return Err(Error::Config("empty target address".into()));
        }

        if let Ok(addr) = target.parse::<SocketAddr>() {
            return Ok(addr);
        }
        if let Ok(ip) = target.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let resolved = match target.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => {
                let port: u16 = port.parse().map_err(|_| {
                    Error::Config(format!("invalid port in address '{}'", self.target))
                })?;
                tokio::net::lookup_host((host, port)).await
            }
            _ => tokio::net::lookup_host((target, self.port)).await,
        };

        resolved
            .map_err(|e| Error::Config(format!("could not resolve address '{}': {}", self.target, e)))?
            .next()
            .ok_or_else(|| Error::Config(format!("could not resolve address '{}'", self.target)))
    }

    /// Build ClientConfig from the builder settings.
    fn build_config(&self) -> ClientConfig {
        ClientConfig {
            version: self.auth.version(),
            community: Bytes::copy_from_slice(self.auth.community().as_bytes()),
            timeout: self.timeout,
            retry: self.retry.clone(),
            max_message_size: MAX_UDP_PAYLOAD,
        }
    }

    /// Resolve the target and connect a UDP socket to it.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if resolution and setup take longer than the
    /// timeout, [`Error::Config`] for an unresolvable target, and
    /// [`Error::Io`] if the socket cannot be created.
    pub async fn connect(self) -> Result<Client<UdpTransport>> {
        let open = async {
            let addr = self.resolve_target().await?;
            tracing::debug!(target: "snmp_get::client", { snmp.target = %addr, snmp.version = %self.auth.version() }, "opening session");
            UdpTransport::connect(addr).await
        };

        let transport = match tokio::time::timeout(self.timeout, open).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!(target: "snmp_get::client", { target = %self.target, timeout = ?self.timeout }, "session open timed out");
                return Err(Error::Timeout {
                    target: None,
                    elapsed: self.timeout,
                    request_id: 0,
                    retries: 0,
                });
            }
        };

        Ok(Client::new(transport, self.build_config()))
    }
}
