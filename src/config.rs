use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default UDP destination port (outside the usual service range)
pub const DEFAULT_UDP_PORT: u16 = 33454;

/// Probe protocol type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeProtocol {
    #[default]
    Icmp,
    Udp,
}

impl FromStr for ProbeProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "icmp" => Ok(Self::Icmp),
            "udp" => Ok(Self::Udp),
            _ => Err(format!("Unknown protocol: {}. Use icmp or udp", s)),
        }
    }
}

impl fmt::Display for ProbeProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Icmp => f.write_str("icmp"),
            Self::Udp => f.write_str("udp"),
        }
    }
}

/// IP version used for resolution, probing and listening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IpVersion {
    #[default]
    #[serde(rename = "4")]
    V4,
    #[serde(rename = "6")]
    V6,
}

impl IpVersion {
    pub fn is_ipv6(self) -> bool {
        self == Self::V6
    }

    pub fn number(self) -> u8 {
        match self {
            Self::V4 => 4,
            Self::V6 => 6,
        }
    }
}

/// Immutable trace configuration, handed to the tracer at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// First TTL probed
    pub first_hop: u8,
    /// Last TTL probed (inclusive)
    pub max_ttl: u8,
    /// Per-probe timeout
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
    /// Probe protocol
    pub protocol: ProbeProtocol,
    /// IP version
    pub ip_version: IpVersion,
    /// Destination port for UDP probes
    pub port: u16,
    /// Enable reverse DNS lookups
    pub dns_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_hop: 1,
            max_ttl: 30,
            timeout: Duration::from_secs(3),
            protocol: ProbeProtocol::Icmp,
            ip_version: IpVersion::V4,
            port: DEFAULT_UDP_PORT,
            dns_enabled: true,
        }
    }
}

impl Config {
    /// Number of TTLs the trace may probe
    pub fn hop_budget(&self) -> usize {
        if self.first_hop > self.max_ttl {
            0
        } else {
            (self.max_ttl - self.first_hop) as usize + 1
        }
    }
}

/// Serde helper for Duration
pub(crate) mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
