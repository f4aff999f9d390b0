use std::time::Duration;

use crate::state::Hop;

/// Largest latency increase between consecutive responding hops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyJump<'a> {
    /// Later latency minus earlier latency (zero when there is no pair)
    pub delta: Duration,
    /// Hops bounding the jump, in TTL order
    pub pair: Option<(&'a Hop, &'a Hop)>,
}

impl LatencyJump<'_> {
    fn none() -> Self {
        Self {
            delta: Duration::ZERO,
            pair: None,
        }
    }
}

/// Find the biggest latency jump between adjacent responding hops.
///
/// Hops without a responder are dropped first, so two hops separated only
/// by timeouts count as adjacent. Ties keep the left-most pair, and a pair
/// only qualifies if latency actually grows.
pub fn largest_jump(hops: &[Hop]) -> LatencyJump<'_> {
    let responding: Vec<&Hop> = hops.iter().filter(|h| h.has_responder()).collect();

    let mut best = LatencyJump::none();
    for pair in responding.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        let delta = later.latency.saturating_sub(earlier.latency);
        if delta > best.delta {
            best = LatencyJump {
                delta,
                pair: Some((earlier, later)),
            };
        }
    }
    best
}
