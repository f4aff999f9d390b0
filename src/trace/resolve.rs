use std::net::{IpAddr, ToSocketAddrs};

use crate::config::IpVersion;
use crate::error::TraceError;

fn matches_version(ip: &IpAddr, version: IpVersion) -> bool {
    match version {
        IpVersion::V4 => ip.is_ipv4(),
        IpVersion::V6 => ip.is_ipv6(),
    }
}

/// Resolve a hostname or literal address to one address of `version`
pub fn resolve_target(target: &str, version: IpVersion) -> Result<IpAddr, TraceError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(TraceError::resolution(target, "no destination given"));
    }

    // Try parsing as IP address first
    if let Ok(ip) = target.parse::<IpAddr>() {
        let ip = ip.to_canonical();
        if !matches_version(&ip, version) {
            return Err(TraceError::resolution(
                target,
                format!("address is not IPv{}", version.number()),
            ));
        }
        return Ok(ip);
    }

    // Resolve hostname
    let addrs = (target, 0)
        .to_socket_addrs()
        .map_err(|e| TraceError::resolution(target, e.to_string()))?;

    addrs
        .map(|s| s.ip().to_canonical())
        .find(|ip| matches_version(ip, version))
        .ok_or_else(|| {
            TraceError::resolution(target, format!("no IPv{} addresses found", version.number()))
        })
}
