//! Socket helpers.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Bind a non-blocking UDP socket to `addr` and hand it to tokio.
///
/// IPv6 sockets are v6-only, so an IPv4 target never ends up on a mapped address.
pub(crate) fn bind_udp_socket(addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(true)?;
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;

    UdpSocket::from_std(socket.into())
}

/// Bind an ephemeral port on the wildcard address of `target`'s family.
pub(crate) async fn bind_ephemeral_udp_socket(target: SocketAddr) -> io::Result<UdpSocket> {
    let bind_addr = if target.is_ipv6() {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    };

    bind_udp_socket(bind_addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ephemeral_ipv4() {
        let target: SocketAddr = "192.0.2.1:161".parse().unwrap();
        let socket = bind_ephemeral_udp_socket(target).await.unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.is_ipv4());
        assert_ne!(local.port(), 0);
    }

    #[tokio::test]
    async fn loopback_ipv4() {
        let socket = bind_udp_socket("127.0.0.1:0".parse().unwrap()).unwrap();
        assert!(socket.local_addr().unwrap().ip().is_loopback());
    }
}
