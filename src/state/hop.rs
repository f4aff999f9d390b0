use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use crate::config::{Config, duration_serde};

/// Why a hop has no responder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HopFailure {
    /// Nothing arrived before the deadline (or the read failed)
    Timeout,
    /// A datagram arrived but its source address could not be parsed
    MalformedResponder,
}

impl fmt::Display for HopFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::MalformedResponder => f.write_str("malformed responder"),
        }
    }
}

/// Outcome of the single probe sent at one TTL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub ttl: u8,
    pub responder: Option<IpAddr>,
    /// Reverse DNS names, only ever set alongside `responder`
    pub names: Vec<String>,
    #[serde(with = "duration_serde")]
    pub latency: Duration,
    pub failure: Option<HopFailure>,
}

impl Hop {
    /// Hop that received a response from `responder`
    pub fn responded(ttl: u8, responder: IpAddr, names: Vec<String>, latency: Duration) -> Self {
        Self {
            ttl,
            responder: Some(responder),
            names,
            latency,
            failure: None,
        }
    }

    /// Hop without a usable response
    pub fn failed(ttl: u8, failure: HopFailure, latency: Duration) -> Self {
        Self {
            ttl,
            responder: None,
            names: Vec::new(),
            latency,
            failure: Some(failure),
        }
    }

    pub fn has_responder(&self) -> bool {
        self.responder.is_some()
    }

    /// True if this hop's responder is `addr`.
    ///
    /// IPv4-mapped IPv6 addresses compare equal to their IPv4 form; an absent
    /// responder never matches.
    pub fn is_from(&self, addr: IpAddr) -> bool {
        self.responder
            .is_some_and(|ip| ip.to_canonical() == addr.to_canonical())
    }
}

/// Destination being traced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub original: String,
    pub resolved: IpAddr,
}

impl Target {
    pub fn new(original: String, resolved: IpAddr) -> Self {
        Self { original, resolved }
    }
}

/// Ordered hops of one trace run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    pub target: Target,
    pub started_at: DateTime<Utc>,
    pub config: Config,
    pub hops: Vec<Hop>,
    /// Destination answered within the hop budget
    pub destination_reached: bool,
}

impl TraceResult {
    pub fn new(target: Target, config: Config) -> Self {
        let capacity = config.hop_budget();
        Self {
            target,
            started_at: Utc::now(),
            config,
            hops: Vec::with_capacity(capacity),
            destination_reached: false,
        }
    }

    /// Get hop by TTL
    pub fn hop(&self, ttl: u8) -> Option<&Hop> {
        self.hops.iter().find(|h| h.ttl == ttl)
    }

    /// Hops that received a response, in TTL order
    pub fn responding_hops(&self) -> impl Iterator<Item = &Hop> {
        self.hops.iter().filter(|h| h.has_responder())
    }

    /// TTL at which the destination answered
    pub fn dest_ttl(&self) -> Option<u8> {
        if self.destination_reached {
            self.hops.last().map(|h| h.ttl)
        } else {
            None
        }
    }
}
