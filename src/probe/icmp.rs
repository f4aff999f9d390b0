use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{IcmpCode, IcmpPacket, IcmpType, IcmpTypes, checksum};

use crate::error::TraceError;

/// ICMP header size (fixed)
pub const ICMP_HEADER_SIZE: usize = 8;
/// ICMPv6 Echo Request type
pub const ICMPV6_ECHO_REQUEST: u8 = 128;
/// Sequence number carried by every echo request
pub const ECHO_SEQUENCE: u16 = 1;

/// Pick a random identifier for the ICMP identification field
pub fn random_identifier() -> u16 {
    rand::random()
}

/// Build an ICMP Echo Request carrying `data`
///
/// Set ipv6=true to build an ICMPv6 Echo Request. The ICMPv6 checksum covers
/// a pseudo-header with the source address, so it is left to the kernel.
pub fn build_echo_request(
    identifier: u16,
    sequence: u16,
    data: &[u8],
    ipv6: bool,
) -> Result<Vec<u8>, TraceError> {
    let mut buffer = vec![0u8; ICMP_HEADER_SIZE + data.len()];

    let mut packet = MutableEchoRequestPacket::new(&mut buffer)
        .ok_or_else(|| TraceError::ProbeBuild("echo request buffer too small".into()))?;

    if ipv6 {
        packet.set_icmp_type(IcmpType::new(ICMPV6_ECHO_REQUEST));
    } else {
        packet.set_icmp_type(IcmpTypes::EchoRequest);
    }
    packet.set_icmp_code(IcmpCode::new(0));
    packet.set_identifier(identifier);
    packet.set_sequence_number(sequence);
    packet.set_payload(data);

    if !ipv6 {
        let cksum = IcmpPacket::new(&buffer)
            .map(|icmp| checksum(&icmp))
            .ok_or_else(|| TraceError::ProbeBuild("ICMP header truncated".into()))?;
        buffer[2..4].copy_from_slice(&cksum.to_be_bytes());
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 1071 sum over the whole message folds to 0xFFFF when valid
    fn checksum_ok(data: &[u8]) -> bool {
        let mut sum: u32 = data
            .chunks(2)
            .map(|c| u16::from_be_bytes([c[0], *c.get(1).unwrap_or(&0)]) as u32)
            .sum();
        while sum >> 16 != 0 {
            sum = (sum & 0xFFFF) + (sum >> 16);
        }
        sum == 0xFFFF
    }

    #[test]
    fn test_build_echo_request() {
        let packet = build_echo_request(1234, 1, b"TABS", false).unwrap();
        assert_eq!(packet.len(), ICMP_HEADER_SIZE + 4);
        assert_eq!(packet[0], 8); // Echo Request type
        assert_eq!(packet[1], 0); // Code
        assert_eq!(u16::from_be_bytes([packet[4], packet[5]]), 1234);
        assert_eq!(u16::from_be_bytes([packet[6], packet[7]]), 1);
        assert_eq!(&packet[8..], b"TABS");
        assert!(checksum_ok(&packet));
    }

    #[test]
    fn test_build_echo_request_ipv6() {
        let packet = build_echo_request(1234, 1, b"TABS", true).unwrap();
        assert_eq!(packet[0], 128); // ICMPv6 Echo Request type
        assert_eq!(packet[1], 0); // Code
        assert_eq!(&packet[2..4], &[0, 0]); // filled in by the kernel
    }

    #[test]
    fn test_build_echo_request_empty_payload() {
        let packet = build_echo_request(7, 1, &[], false).unwrap();
        assert_eq!(packet.len(), ICMP_HEADER_SIZE);
        assert!(checksum_ok(&packet));
    }
}
