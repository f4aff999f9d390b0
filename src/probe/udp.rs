/// Marker carried by UDP probes and ICMP echo payloads
pub const PROBE_MARKER: &[u8] = b"TABS";

/// Build the UDP probe payload
///
/// Routers only quote the first bytes of the datagram back in Time Exceeded,
/// so the payload stays tiny.
pub fn build_udp_payload() -> Vec<u8> {
    PROBE_MARKER.to_vec()
}
