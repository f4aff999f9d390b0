use crate::config::Config;
use crate::state::{Hop, Target};

/// Receives trace progress as it happens
pub trait TraceObserver {
    /// Destination resolved, about to probe the first TTL
    fn on_start(&mut self, _target: &Target, _config: &Config) {}

    fn on_hop(&mut self, hop: &Hop);

    /// Returning true stops the trace after the current hop
    fn interrupted(&self) -> bool {
        false
    }
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct Silent;

impl TraceObserver for Silent {
    fn on_hop(&mut self, _hop: &Hop) {}
}

/// Collects hops in the order they were reported
impl TraceObserver for Vec<Hop> {
    fn on_hop(&mut self, hop: &Hop) {
        self.push(hop.clone());
    }
}
