use bytes::Bytes;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// A peer listed in a tracker reply.
///
/// `ip` and `peer_id` come straight from byte strings in the reply and are
/// not guaranteed to be UTF-8. `ip` may be an IPv4/IPv6 literal or a DNS
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub ip: Bytes,
    pub peer_id: Bytes,
    pub port: u16,
}

impl Peer {
    pub fn new(ip: impl Into<Bytes>, peer_id: impl Into<Bytes>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            peer_id: peer_id.into(),
            port,
        }
    }

    /// Returns the IP field as text, if it is valid UTF-8.
    pub fn ip_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.ip).ok()
    }

    /// Returns the peer's socket address if `ip` is an IP literal.
    ///
    /// Host names are not resolved.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        let ip: IpAddr = self.ip_str()?.parse().ok()?;
        Some(SocketAddr::new(ip, self.port))
    }
}

/// Formats as `ip:port (peer id)` with non-printable bytes escaped.
impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({})",
            self.ip.escape_ascii(),
            self.port,
            self.peer_id.escape_ascii()
        )
    }
}

/// A successful tracker reply: how long to wait before the next announce
/// and who is in the swarm.
///
/// Only `interval` and `peers` are required; the rest are filled in when the
/// tracker sends them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerResponse {
    /// Seconds the client should wait between announces.
    pub interval: u32,
    /// Peers in the order the tracker listed them.
    pub peers: Vec<Peer>,
    pub min_interval: Option<u32>,
    /// Number of seeders.
    pub complete: Option<u32>,
    /// Number of leechers.
    pub incomplete: Option<u32>,
    pub warning_message: Option<String>,
    pub tracker_id: Option<Bytes>,
}

impl PeerResponse {
    pub fn new(interval: u32, peers: Vec<Peer>) -> Self {
        Self {
            interval,
            peers,
            min_interval: None,
            complete: None,
            incomplete: None,
            warning_message: None,
            tracker_id: None,
        }
    }

    pub fn socket_addrs(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.peers.iter().filter_map(Peer::socket_addr)
    }
}
