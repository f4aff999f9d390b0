use std::io;
use std::net::IpAddr;
use std::time::Instant;

use crate::config::IpVersion;
use crate::probe::Probe;

/// Source of a received datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Responder {
    /// Source address parsed as an IP address
    Addr(IpAddr),
    /// Datagram arrived but its source could not be parsed
    Unparsable,
}

/// Outbound connection carrying one probe
pub trait Outbound {
    /// Set IPv4 TTL or IPv6 unicast hop limit
    fn set_hop_limit(&mut self, ttl: u8) -> io::Result<()>;

    fn send(&mut self, payload: &[u8]) -> io::Result<usize>;
}

/// Wildcard-bound ICMP/ICMPv6 listener
pub trait Inbound {
    /// Arm the receive deadline
    fn set_deadline(&mut self, deadline: Instant) -> io::Result<()>;

    /// Block for exactly one datagram or until the deadline passes.
    ///
    /// A deadline expiry surfaces as an `Err` of kind `WouldBlock` or
    /// `TimedOut`.
    fn recv_one(&mut self) -> io::Result<Responder>;
}

/// Socket factory the prober opens a fresh pair from on every TTL.
///
/// Both handles are dropped at the end of the probe, which is what releases
/// the underlying sockets.
pub trait Transport {
    type Out: Outbound;
    type In: Inbound;

    /// Connect an outbound socket to `destination` suited to `probe`
    fn open_outbound(&self, destination: IpAddr, probe: &Probe) -> io::Result<Self::Out>;

    /// Open the ICMP listener for `version`
    fn open_inbound(&self, version: IpVersion) -> io::Result<Self::In>;
}
