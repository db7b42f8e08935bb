//! Local network address resolution
//!
//! Finds the address a phone on the same network should use to reach this
//! machine. The outbound interface is learned by "connecting" a UDP socket
//! to a public address: no datagram is sent, the kernel only picks a route
//! and a source address.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

/// Address used when no routable interface can be found
pub const FALLBACK_IP: &str = "127.0.0.1";

/// Hostname used when the OS hostname is unavailable
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// Public address used only to select the outbound interface
const PROBE_ADDR: (Ipv4Addr, u16) = (Ipv4Addr::new(8, 8, 8, 8), 1);

/// Snapshot of this host's network identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Local IPv4 address of the outbound interface
    pub ip: String,
    /// Machine hostname
    pub hostname: String,
    /// Base URL phone clients should use
    pub url: String,
}

impl NetworkInfo {
    /// Resolve the current network info for a server listening on `port`
    ///
    /// Never fails; see [`local_ip`] and [`hostname`] for the fallbacks.
    pub fn resolve(port: u16) -> Self {
        let ip = local_ip();
        Self::from_parts(ip, hostname(), port)
    }

    /// Build network info from already known parts
    pub fn from_parts(ip: impl Into<String>, hostname: impl Into<String>, port: u16) -> Self {
        let ip = ip.into();
        let url = format!("http://{}:{}", ip, port);
        Self {
            ip,
            hostname: hostname.into(),
            url,
        }
    }
}

/// Local IP of the interface that routes to the public internet
///
/// Falls back to [`FALLBACK_IP`] when there is no route or the socket
/// reports an unspecified address.
pub fn local_ip() -> String {
    match probe_local_addr() {
        Ok(addr) if !addr.ip().is_unspecified() => addr.ip().to_string(),
        Ok(addr) => {
            tracing::debug!("Probe returned unspecified address {}", addr);
            FALLBACK_IP.to_string()
        }
        Err(e) => {
            tracing::debug!("Local IP probe failed: {}", e);
            FALLBACK_IP.to_string()
        }
    }
}

fn probe_local_addr() -> std::io::Result<SocketAddr> {
    let socket = UdpSocket::bind((IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0))?;
    socket.connect(PROBE_ADDR)?;
    socket.local_addr()
}

/// OS hostname, or [`FALLBACK_HOSTNAME`]
pub fn hostname() -> String {
    ::hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| FALLBACK_HOSTNAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_is_ipv4() {
        let ip = local_ip();
        assert!(!ip.is_empty());
        assert!(ip.parse::<Ipv4Addr>().is_ok(), "not an IPv4 address: {ip}");
    }

    #[test]
    fn test_hostname_non_empty() {
        let name = hostname();
        assert!(!name.is_empty());
        assert!(!name.contains(char::is_whitespace));
    }

    #[test]
    fn test_resolve_shape() {
        let info = NetworkInfo::resolve(5000);
        assert!(info.ip.parse::<Ipv4Addr>().is_ok());
        assert!(!info.hostname.is_empty());
        assert_eq!(info.url, format!("http://{}:5000", info.ip));
    }

    #[test]
    fn test_from_parts_url() {
        let info = NetworkInfo::from_parts("192.168.1.20", "desk", 8080);
        assert_eq!(info.url, "http://192.168.1.20:8080");
        assert_eq!(info.hostname, "desk");
    }

    #[test]
    fn test_network_info_serialize() {
        let info = NetworkInfo::from_parts(FALLBACK_IP, FALLBACK_HOSTNAME, 5000);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["ip"], "127.0.0.1");
        assert_eq!(json["hostname"], "localhost");
        assert_eq!(json["url"], "http://127.0.0.1:5000");
    }
}
