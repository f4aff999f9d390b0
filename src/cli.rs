use clap::Parser;
use std::time::Duration;

use crate::config::{Config, IpVersion, ProbeProtocol};
use crate::prefs::Prefs;

/// Hop-by-hop traceroute that reports the largest latency jump along the path
#[derive(Parser, Debug, Clone)]
#[command(name = "hoptrace")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Destination host (IP address or hostname)
    pub destination: String,

    /// Maximum TTL (hops) [default: 30]
    #[arg(short = 'm', long = "max-ttl")]
    pub max_ttl: Option<u8>,

    /// First TTL to probe [default: 1]
    #[arg(short = 'f', long = "first-hop")]
    pub first_hop: Option<u8>,

    /// Probe protocol (icmp, udp) [default: icmp]
    #[arg(short = 'p', long = "protocol")]
    pub protocol: Option<String>,

    /// Shorthand for --protocol udp
    #[arg(short = 'u', long = "udp", conflicts_with = "protocol")]
    pub udp: bool,

    /// Destination port for UDP probes [default: 33454]
    #[arg(long = "port")]
    pub port: Option<u16>,

    /// Use IPv6
    #[arg(short = '6', long = "ipv6")]
    pub ipv6: bool,

    /// Per-probe timeout in seconds [default: 3]
    #[arg(long = "timeout")]
    pub timeout: Option<f64>,

    /// Skip reverse DNS lookups
    #[arg(long = "no-dns")]
    pub no_dns: bool,

    /// Output JSON instead of hop lines
    #[arg(long = "json")]
    pub json: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Merge flags over preferences over built-in defaults, then validate
    pub fn to_config(&self, prefs: &Prefs) -> Result<Config, String> {
        let defaults = Config::default();

        let protocol = if self.udp {
            ProbeProtocol::Udp
        } else if let Some(ref name) = self.protocol {
            name.parse()?
        } else {
            prefs.protocol.unwrap_or(defaults.protocol)
        };

        let ip_version = if self.ipv6 {
            IpVersion::V6
        } else {
            prefs.ip_version.unwrap_or(defaults.ip_version)
        };

        let timeout_secs = self
            .timeout
            .or(prefs.timeout)
            .unwrap_or(defaults.timeout.as_secs_f64());
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err("Timeout must be positive".into());
        }
        let timeout = Duration::try_from_secs_f64(timeout_secs).map_err(|e| e.to_string())?;

        let config = Config {
            first_hop: self.first_hop.or(prefs.first_hop).unwrap_or(defaults.first_hop),
            max_ttl: self.max_ttl.or(prefs.max_ttl).unwrap_or(defaults.max_ttl),
            timeout,
            protocol,
            ip_version,
            port: self.port.or(prefs.port).unwrap_or(defaults.port),
            dns_enabled: !self.no_dns && prefs.dns.unwrap_or(defaults.dns_enabled),
        };

        if config.max_ttl == 0 {
            return Err("Max TTL must be at least 1".into());
        }
        if config.first_hop == 0 {
            return Err("First hop must be at least 1".into());
        }
        if config.first_hop > config.max_ttl {
            return Err(format!(
                "First hop ({}) cannot exceed max TTL ({})",
                config.first_hop, config.max_ttl
            ));
        }
        if config.protocol == ProbeProtocol::Udp && config.port == 0 {
            return Err("UDP port must be non-zero".into());
        }

        Ok(config)
    }
}
