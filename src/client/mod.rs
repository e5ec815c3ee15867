//! SNMP client implementation.

mod auth;
mod builder;
mod retry;

pub use auth::{Auth, CommunityVersion};
pub use builder::{ClientBuilder, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use retry::{Backoff, Retry};

use crate::error::{DecodeErrorKind, Error, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::transport::{MAX_UDP_PAYLOAD, Transport, UdpTransport};
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{Span, instrument};

impl Client<UdpTransport> {
    /// Create a new SNMP client builder.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use snmp_get::{Auth, Client, Retry};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> snmp_get::Result<()> {
    /// let client = Client::builder("192.168.1.1", Auth::v1("public"))
    ///     .timeout(Duration::from_secs(2))
    ///     .retry(Retry::fixed(1, Duration::ZERO))
    ///     .connect()
    ///     .await?;
    /// # client.close().await;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(target: impl Into<String>, auth: impl Into<Auth>) -> ClientBuilder {
        ClientBuilder::new(target, auth)
    }
}

/// SNMP client bound to one agent.
///
/// A client is one session: it is opened, used for any number of requests
/// one at a time, then consumed by [`Client::close`].
pub struct Client<T: Transport> {
    transport: T,
    config: ClientConfig,
    next_request_id: AtomicI32,
}

/// Client configuration.
///
/// Most users should use [`ClientBuilder`] rather than constructing this directly.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// SNMP version (default: V1)
    pub version: Version,
    /// Community string (default: "public")
    pub community: Bytes,
    /// Time to wait for a response to each attempt (default: 5 seconds)
    pub timeout: Duration,
    /// Retry configuration (default: 3 retries, no backoff)
    pub retry: Retry,
    /// Largest request that will be sent (default: 65507, the UDP payload limit)
    pub max_message_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: Version::V1,
            community: Bytes::from_static(b"public"),
            timeout: Duration::from_secs(5),
            retry: Retry::default(),
            max_message_size: MAX_UDP_PAYLOAD,
        }
    }
}

/// Starting request-id, varied per process so that a restarted client does
/// not accept replies meant for its predecessor.
fn initial_request_id() -> i32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(0);
    let seed = nanos ^ std::process::id().rotate_left(16);
    // Keep it positive and leave headroom before wrapping.
    ((seed & 0x3FFF_FFFF) as i32).max(1)
}

impl<T: Transport> Client<T> {
    /// Create a new client with the given transport and config.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            next_request_id: AtomicI32::new(initial_request_id()),
        }
    }

    /// Get the peer (target) address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.transport.peer_addr()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Generate next request ID. Wraps back to 1, never yields zero or a negative id.
    fn next_request_id(&self) -> i32 {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        if id <= 0 {
            self.next_request_id.store(2, Ordering::Relaxed);
            1
        } else {
            id
        }
    }

    /// Send an encoded request and wait for its response.
    ///
    /// Each attempt waits up to the configured timeout. Datagrams that carry
    /// another request-id are dropped without ending the attempt. Only
    /// timeouts are retried.
    #[instrument(
        level = "debug",
        skip(self, data),
        fields(
            snmp.target = %self.peer_addr(),
            snmp.request_id = request_id,
            snmp.attempt = tracing::field::Empty,
            snmp.elapsed_ms = tracing::field::Empty,
        )
    )]
    async fn send_and_recv(&self, request_id: i32, data: &[u8]) -> Result<Pdu> {
        let start = Instant::now();
        let timeout = self.config.timeout;
        let max_attempts = self.config.retry.max_attempts;

        for attempt in 0..=max_attempts {
            Span::current().record("snmp.attempt", attempt);
            if attempt > 0 {
                tracing::debug!(target: "snmp_get::client", "retrying request");
            }

            tracing::trace!(target: "snmp_get::client", { snmp.bytes = data.len() }, "sending request");
            self.transport.send(data).await?;

            let deadline = Instant::now() + timeout;
            let outcome = loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break None;
                }

                let response_data = match self.transport.recv(request_id, remaining).await {
                    Ok((data, _source)) => data,
                    Err(e) if e.is_timeout() => break None,
                    Err(e) => {
                        Span::current()
                            .record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
                        return Err(e);
                    }
                };
                tracing::trace!(target: "snmp_get::client", { snmp.bytes = response_data.len() }, "received response");

                match self.check_response(request_id, response_data) {
                    Err(Error::RequestIdMismatch { expected, actual }) => {
                        tracing::debug!(target: "snmp_get::client", { expected_request_id = expected, actual_request_id = actual }, "discarding stale response");
                        continue;
                    }
                    other => break Some(other),
                }
            };

            if let Some(result) = outcome {
                Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
                return result;
            }

            if attempt < max_attempts {
                let delay = self.config.retry.compute_delay(attempt);
                if !delay.is_zero() {
                    tracing::debug!(target: "snmp_get::client", { delay_ms = delay.as_millis() as u64 }, "backing off");
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let elapsed = start.elapsed();
        Span::current().record("snmp.elapsed_ms", elapsed.as_millis() as u64);
        tracing::debug!(target: "snmp_get::client", { request_id, peer = %self.peer_addr(), ?elapsed, retries = max_attempts }, "request timed out");
        Err(Error::Timeout {
            target: Some(self.peer_addr()),
            elapsed,
            request_id,
            retries: max_attempts,
        })
    }

    /// Decode a datagram and match it against the outstanding request.
    fn check_response(&self, request_id: i32, data: Bytes) -> Result<Pdu> {
        let response = CommunityMessage::decode(data)?;

        let expected = self.config.version;
        if response.version != expected {
            tracing::debug!(target: "snmp_get::client", { expected_version = %expected, response_version = %response.version, peer = %self.peer_addr() }, "version mismatch in response");
            return Err(Error::VersionMismatch {
                expected,
                actual: response.version,
            });
        }

        let pdu = response.into_pdu();
        if pdu.request_id != request_id {
            return Err(Error::RequestIdMismatch {
                expected: request_id,
                actual: pdu.request_id,
            });
        }

        if pdu.is_error() {
            let status = pdu.error_status_enum();
            // error_index is 1-based; 0 means the error applies to the whole PDU
            let oid = (pdu.error_index as usize)
                .checked_sub(1)
                .and_then(|idx| pdu.varbinds.get(idx))
                .map(|vb| vb.oid.clone());

            return Err(Error::Snmp {
                target: Some(self.peer_addr()),
                status,
                index: pdu.error_index.max(0) as u32,
                oid,
            });
        }

        Ok(pdu)
    }

    /// Send a GET and wait for the response PDU.
    async fn send_request(&self, pdu: Pdu) -> Result<Pdu> {
        tracing::debug!(target: "snmp_get::client", { snmp.pdu_type = ?pdu.pdu_type, snmp.varbind_count = pdu.varbinds.len() }, "sending {} request", pdu.pdu_type);

        let request_id = pdu.request_id;
        let message =
            CommunityMessage::new(self.config.version, self.config.community.clone(), pdu);
        let data = message.encode();

        if data.len() > self.config.max_message_size {
            return Err(Error::MessageTooLarge {
                size: data.len(),
                max: self.config.max_message_size,
            });
        }

        let response = self.send_and_recv(request_id, &data).await?;

        tracing::debug!(target: "snmp_get::client", { snmp.pdu_type = ?response.pdu_type, snmp.varbind_count = response.varbinds.len() }, "received {} response", response.pdu_type);

        Ok(response)
    }

    /// GET a single OID.
    #[instrument(skip(self), err(level = "debug"), fields(snmp.target = %self.peer_addr(), snmp.oid = %oid))]
    pub async fn get(&self, oid: &Oid) -> Result<VarBind> {
        let response = self.get_varbinds(vec![VarBind::null(oid.clone())]).await?;

        response.into_iter().next().ok_or_else(|| {
            tracing::debug!(target: "snmp_get::client", { peer = %self.peer_addr(), kind = %DecodeErrorKind::EmptyResponse }, "empty GET response");
            Error::decode(0, DecodeErrorKind::EmptyResponse)
        })
    }

    /// GET with a prepared binding list.
    ///
    /// The list is moved into the request and the agent's bindings are
    /// returned in its place, in the agent's order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use snmp_get::{Auth, Client, VarBind, oid};
    /// # async fn example() -> snmp_get::Result<()> {
    /// # let client = Client::builder("127.0.0.1", Auth::v2c("public")).connect().await?;
    /// let results = client
    ///     .get_varbinds(vec![
    ///         VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
    ///         VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)),
    ///     ])
    ///     .await?;
    /// # client.close().await;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, varbinds), err(level = "debug"), fields(snmp.target = %self.peer_addr(), snmp.oid_count = varbinds.len()))]
    pub async fn get_varbinds(&self, varbinds: Vec<VarBind>) -> Result<Vec<VarBind>> {
        let request_id = self.next_request_id();
        let pdu = Pdu::with_varbinds(request_id, varbinds);
        let response = self.send_request(pdu).await?;
        Ok(response.varbinds)
    }

    /// End the session and release the transport.
    pub async fn close(self) {
        tracing::debug!(target: "snmp_get::client", { snmp.target = %self.peer_addr() }, "closing session");
        self.transport.close().await;
    }
}
