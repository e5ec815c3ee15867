//! Transport layer abstraction.
//!
//! The client talks to an agent through [`Transport`]; [`UdpTransport`] is
//! the production implementation and `MockTransport` (behind the `testing`
//! feature) the scripted one.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Client-side transport to a single agent.
pub trait Transport: Send + Sync {
    /// Send one encoded request.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `timeout` for the next datagram from the peer.
    ///
    /// `request_id` is the id of the request being waited on, used only for
    /// error context: the transport does not filter on it, so the caller
    /// must discard stale responses itself.
    ///
    /// Returns the datagram and the address it came from.
    fn recv(
        &self,
        request_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send;

    /// The agent this transport sends to.
    fn peer_addr(&self) -> SocketAddr;

    fn local_addr(&self) -> SocketAddr;

    /// Release the transport. Called once when the session ends.
    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}
