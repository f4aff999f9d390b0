use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::mem::MaybeUninit;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{Duration, Instant};

use crate::config::{IpVersion, ProbeProtocol};
use crate::probe::transport::{Inbound, Outbound, Responder, Transport};
use crate::probe::Probe;

/// Receive buffer sized to the Ethernet MTU
const RECV_BUFFER_SIZE: usize = 1500;

/// Smallest read timeout the kernel can represent as non-zero
const MIN_READ_TIMEOUT: Duration = Duration::from_micros(1);

fn domain_for(ipv6: bool) -> Domain {
    if ipv6 { Domain::IPV6 } else { Domain::IPV4 }
}

fn icmp_protocol(ipv6: bool) -> Protocol {
    if ipv6 {
        Protocol::ICMPV6
    } else {
        Protocol::ICMPV4
    }
}

/// Create a raw ICMP socket
pub fn create_raw_icmp_socket(ipv6: bool) -> io::Result<Socket> {
    let socket = Socket::new(domain_for(ipv6), Type::RAW, Some(icmp_protocol(ipv6)))?;
    socket.set_nonblocking(false)?;
    Ok(socket)
}

/// Create an unprivileged ICMP socket (SOCK_DGRAM)
///
/// Works on Linux when the group is inside net.ipv4.ping_group_range.
pub fn create_dgram_icmp_socket(ipv6: bool) -> io::Result<Socket> {
    let socket = Socket::new(domain_for(ipv6), Type::DGRAM, Some(icmp_protocol(ipv6)))?;
    socket.set_nonblocking(false)?;
    Ok(socket)
}

/// Create an ICMP socket, preferring RAW and falling back to DGRAM
pub fn create_icmp_socket(ipv6: bool) -> io::Result<Socket> {
    match create_raw_icmp_socket(ipv6) {
        Ok(socket) => Ok(socket),
        Err(raw_err) => {
            tracing::debug!(error = %raw_err, "raw ICMP socket unavailable, trying DGRAM");
            // Report the RAW error if DGRAM fails too; it names the real fix
            create_dgram_icmp_socket(ipv6).map_err(|_| raw_err)
        }
    }
}

/// Create a DGRAM UDP socket for sending probes
pub fn create_udp_socket(ipv6: bool) -> io::Result<Socket> {
    let socket = Socket::new(domain_for(ipv6), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_nonblocking(false)?;
    Ok(socket)
}

/// Wildcard address for an IP version
pub fn unspecified(version: IpVersion) -> IpAddr {
    match version {
        IpVersion::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpVersion::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    }
}

/// Set TTL (IPv4) or unicast hop limit (IPv6) on a socket
pub fn set_ttl(socket: &Socket, ttl: u8, ipv6: bool) -> io::Result<()> {
    if ipv6 {
        socket.set_unicast_hops_v6(ttl as u32)
    } else {
        socket.set_ttl(ttl as u32)
    }
}

/// Outbound probe socket, connected to the destination
#[derive(Debug)]
pub struct SendSocket {
    socket: Socket,
    ipv6: bool,
}

impl Outbound for SendSocket {
    fn set_hop_limit(&mut self, ttl: u8) -> io::Result<()> {
        set_ttl(&self.socket, ttl, self.ipv6)
    }

    fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
        self.socket.send(payload)
    }
}

/// ICMP listener bound to the wildcard address
#[derive(Debug)]
pub struct RecvSocket {
    socket: Socket,
    deadline: Option<Instant>,
}

impl Inbound for RecvSocket {
    fn set_deadline(&mut self, deadline: Instant) -> io::Result<()> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        self.socket.set_read_timeout(Some(read_timeout(remaining)))?;
        self.deadline = Some(deadline);
        Ok(())
    }

    fn recv_one(&mut self) -> io::Result<Responder> {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(io::Error::from(io::ErrorKind::TimedOut));
        }

        let mut buffer = [MaybeUninit::<u8>::uninit(); RECV_BUFFER_SIZE];
        let (len, source) = self.socket.recv_from(&mut buffer)?;
        tracing::trace!(len, "received ICMP datagram");

        Ok(source
            .as_socket()
            .map(|addr: SocketAddr| Responder::Addr(addr.ip()))
            .unwrap_or(Responder::Unparsable))
    }
}

/// Read timeout for the time left before a deadline.
///
/// A timeval of zero means "block forever", so anything that would round
/// down to it is raised to one microsecond.
fn read_timeout(remaining: Duration) -> Duration {
    remaining.max(MIN_READ_TIMEOUT)
}

/// Transport backed by real sockets (needs CAP_NET_RAW or root for RAW ICMP)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTransport;

impl Transport for SystemTransport {
    type Out = SendSocket;
    type In = RecvSocket;

    fn open_outbound(&self, destination: IpAddr, probe: &Probe) -> io::Result<SendSocket> {
        let ipv6 = probe.ip_version.is_ipv6();
        let socket = match probe.protocol {
            ProbeProtocol::Icmp => create_icmp_socket(ipv6)?,
            ProbeProtocol::Udp => create_udp_socket(ipv6)?,
        };
        let addr = SocketAddr::new(destination, probe.port);
        socket.connect(&SockAddr::from(addr))?;
        Ok(SendSocket { socket, ipv6 })
    }

    /// The listener must be RAW: a DGRAM ICMP socket only sees echo replies
    /// for its own ident, never Time Exceeded or Port Unreachable.
    fn open_inbound(&self, version: IpVersion) -> io::Result<RecvSocket> {
        let socket = create_raw_icmp_socket(version.is_ipv6())?;
        let _ = socket.set_recv_buffer_size(256 * 1024);
        let addr = SocketAddr::new(unspecified(version), 0);
        socket.bind(&SockAddr::from(addr))?;
        Ok(RecvSocket {
            socket,
            deadline: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspecified_matches_version() {
        assert_eq!(unspecified(IpVersion::V4), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(unspecified(IpVersion::V6), IpAddr::V6(Ipv6Addr::UNSPECIFIED));
    }

    #[test]
    fn test_read_timeout_never_zero() {
        assert_eq!(read_timeout(Duration::ZERO), MIN_READ_TIMEOUT);
        assert_eq!(read_timeout(Duration::from_nanos(999)), MIN_READ_TIMEOUT);
        assert_eq!(read_timeout(Duration::from_millis(5)), Duration::from_millis(5));
    }

    #[test]
    fn test_expired_deadline_times_out_without_blocking() {
        let Ok(socket) = create_udp_socket(false) else {
            return;
        };
        let mut listener = RecvSocket {
            socket,
            deadline: None,
        };
        listener.set_deadline(Instant::now()).unwrap();
        let err = listener.recv_one().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_listener_is_raw_or_refused() {
        // Without CAP_NET_RAW the listener must fail rather than fall back
        // to a DGRAM socket that never sees Time Exceeded
        match SystemTransport.open_inbound(IpVersion::V4) {
            Ok(listener) => assert_eq!(listener.socket.r#type().unwrap(), Type::RAW),
            Err(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
        }
    }

    #[test]
    fn test_udp_socket_accepts_ttl() {
        // UDP DGRAM sockets need no privileges
        let socket = create_udp_socket(false).unwrap();
        set_ttl(&socket, 7, false).unwrap();
        assert_eq!(socket.ttl().unwrap(), 7);
    }
}
