//! Host networking helpers.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};

/// Create a broadcast-capable UDP socket bound to all interfaces.
///
/// The port is exclusive unless `reuse_port` is set, so a second server on
/// the same port fails to bind instead of silently missing announcements.
pub fn create_discovery_socket(
    port: u16,
    reuse_port: bool,
) -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    if reuse_port {
        socket.set_reuse_address(true)?;
        #[cfg(unix)]
        socket.set_reuse_port(true)?;
    }

    socket.set_broadcast(true)?;

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// First non-loopback IPv4 address of this host, if any.
pub fn host_ipv4() -> Option<Ipv4Addr> {
    let interfaces = match get_if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            log::warn!("Discovery System: Failed to enumerate interfaces: {}", e);
            return None;
        }
    };

    interfaces
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .find_map(|iface| match iface.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
}

/// Address advertised in outgoing requests.
///
/// An explicit override wins; otherwise the host address is detected, and an
/// empty string is used when none can be found.
pub fn advertised_ip(override_ip: Option<Ipv4Addr>) -> String {
    override_ip
        .or_else(host_ipv4)
        .map(|ip| ip.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        assert_eq!(advertised_ip(Some(Ipv4Addr::new(10, 0, 0, 7))), "10.0.0.7");
    }

    #[test]
    fn test_host_ipv4_is_not_loopback() {
        if let Some(ip) = host_ipv4() {
            assert!(!ip.is_loopback());
        }
    }

    #[tokio::test]
    async fn test_discovery_socket_binds_ephemeral_port() {
        let socket = create_discovery_socket(0, false).unwrap();
        let socket = tokio::net::UdpSocket::from_std(socket).unwrap();
        assert_ne!(socket.local_addr().unwrap().port(), 0);
        assert!(socket.broadcast().unwrap());
    }

    #[test]
    fn test_exclusive_port_rejects_second_bind() {
        let first = create_discovery_socket(0, false).unwrap();
        let port = first.local_addr().unwrap().port();

        let second = create_discovery_socket(port, false);
        assert_eq!(
            second.unwrap_err().kind(),
            std::io::ErrorKind::AddrInUse
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_reuse_port_allows_shared_bind() {
        let first = create_discovery_socket(0, true).unwrap();
        let port = first.local_addr().unwrap().port();

        assert!(create_discovery_socket(port, true).is_ok());
    }
}
