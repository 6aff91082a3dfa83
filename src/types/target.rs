//! Scan targets.
//!
//! A host is accepted only as a literal IPv4 or IPv6 address. No name
//! resolution is ever attempted.

use crate::error::{ScanError, ScanResult};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// One `host:port` endpoint to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    /// The host address.
    pub ip: IpAddr,
    /// The TCP port.
    pub port: u16,
}

impl Target {
    /// Create a new target.
    pub const fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }

    /// The socket address to connect to.
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SocketAddr brackets IPv6 hosts.
        write!(f, "{}", self.socket_addr())
    }
}

impl From<SocketAddr> for Target {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

/// Parse a host string as a literal IP address. The string must be the
/// address and nothing else; surrounding whitespace is rejected.
pub fn parse_host(host: &str) -> ScanResult<IpAddr> {
    host.parse::<IpAddr>()
        .map_err(|_| ScanError::InvalidAddress(host.to_string()))
}
