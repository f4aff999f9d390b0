use crate::config::{IpVersion, ProbeProtocol};
use crate::error::TraceError;
use crate::probe::icmp::{ECHO_SEQUENCE, build_echo_request, random_identifier};
use crate::probe::udp::{PROBE_MARKER, build_udp_payload};

/// Constant probe sent at every TTL of a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub protocol: ProbeProtocol,
    pub ip_version: IpVersion,
    /// Destination port (UDP only, 0 for ICMP)
    pub port: u16,
    pub bytes: Vec<u8>,
}

/// Build the probe for a protocol and IP version
///
/// ICMP probes get a fresh random identifier on every call.
pub fn build_probe(
    protocol: ProbeProtocol,
    ip_version: IpVersion,
    udp_port: u16,
) -> Result<Probe, TraceError> {
    let (bytes, port) = match protocol {
        ProbeProtocol::Icmp => {
            let identifier = random_identifier();
            tracing::debug!(identifier, "building ICMP echo request");
            let bytes = build_echo_request(
                identifier,
                ECHO_SEQUENCE,
                PROBE_MARKER,
                ip_version.is_ipv6(),
            )?;
            (bytes, 0)
        }
        ProbeProtocol::Udp => (build_udp_payload(), udp_port),
    };

    Ok(Probe {
        protocol,
        ip_version,
        port,
        bytes,
    })
}
