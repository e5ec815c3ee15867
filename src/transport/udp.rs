//! UDP transport.

use super::Transport;
use crate::error::{Error, Result};
use crate::util::bind_ephemeral_udp_socket;
use bytes::Bytes;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Largest UDP payload over IPv4, and so the largest SNMP message.
pub const MAX_UDP_PAYLOAD: usize = 65507;

/// A connected UDP socket to one agent.
///
/// Connecting filters datagrams from other sources in the kernel.
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral socket of the target's address family and connect it.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        tracing::debug!(target: "snmp_get::transport", { snmp.target = %target }, "connecting UDP transport");

        let io_err = |e| Error::io(Some(target), e);
        let socket = bind_ephemeral_udp_socket(target).await.map_err(io_err)?;
        socket.connect(target).await.map_err(io_err)?;
        let local_addr = socket.local_addr().map_err(io_err)?;

        tracing::debug!(target: "snmp_get::transport", { snmp.target = %target, snmp.local_addr = %local_addr }, "UDP transport connected");

        Ok(Self {
            socket,
            target,
            local_addr,
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(target: "snmp_get::transport", { snmp.target = %self.target, snmp.bytes = data.len() }, "UDP send");
        self.socket
            .send(data)
            .await
            .map_err(|e| Error::io(Some(self.target), e))?;
        Ok(())
    }

    async fn recv(&self, request_id: i32, recv_timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let mut buf = vec![0u8; MAX_UDP_PAYLOAD];

        match timeout(recv_timeout, self.socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                buf.truncate(len);
                tracing::trace!(target: "snmp_get::transport", { snmp.target = %self.target, snmp.bytes = len }, "UDP recv");
                Ok((Bytes::from(buf), self.target))
            }
            Ok(Err(e)) => {
                // ICMP port unreachable surfaces here as ECONNREFUSED on a connected socket
                tracing::debug!(target: "snmp_get::transport", { snmp.target = %self.target, error = %e }, "UDP recv error");
                Err(Error::io(Some(self.target), e))
            }
            Err(_) => Err(Error::Timeout {
                target: Some(self.target),
                elapsed: recv_timeout,
                request_id,
                retries: 0,
            }),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    async fn close(&self) {
        tracing::debug!(target: "snmp_get::transport", { snmp.target = %self.target, snmp.local_addr = %self.local_addr }, "UDP transport closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_and_receive_over_loopback() {
        let agent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let agent_addr = agent.local_addr().unwrap();

        let transport = UdpTransport::connect(agent_addr).await.unwrap();
        assert_eq!(transport.peer_addr(), agent_addr);
        assert!(transport.local_addr().ip().is_unspecified() || transport.local_addr().ip().is_loopback());

        transport.send(b"ping").await.unwrap();
        let mut buf = [0u8; 16];
        let (n, from) = agent.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");

        agent.send_to(b"pong", from).await.unwrap();
        let (data, source) = transport.recv(1, Duration::from_secs(2)).await.unwrap();
        assert_eq!(data.as_ref(), b"pong");
        assert_eq!(source, agent_addr);
    }

    #[tokio::test]
    async fn recv_times_out() {
        let agent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::connect(agent.local_addr().unwrap())
            .await
            .unwrap();

        let err = transport
            .recv(42, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { request_id: 42, .. }));
    }
}
