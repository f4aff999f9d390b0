use crate::config::Config;
use crate::error::TraceError;
use crate::lookup::ReverseDns;
use crate::probe::{Transport, build_probe};
use crate::state::{Target, TraceResult};
use crate::trace::observer::TraceObserver;
use crate::trace::prober::probe_hop;
use crate::trace::resolve::resolve_target;

/// Drives the TTL loop for one destination at a time.
///
/// Probing is strictly sequential: each TTL gets exactly one probe, and the
/// next TTL starts only after the previous reply or deadline.
pub struct Tracer<T, D> {
    config: Config,
    transport: T,
    dns: D,
}

impl<T: Transport, D: ReverseDns> Tracer<T, D> {
    pub fn new(config: Config, transport: T, dns: D) -> Self {
        Self {
            config,
            transport,
            dns,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Trace the route to `destination`.
    ///
    /// `observer` sees every hop as soon as it is probed. The loop ends when
    /// a hop's responder is the resolved destination, after `max_ttl`, or
    /// when the observer reports it was interrupted.
    pub fn trace<O>(&self, destination: &str, observer: &mut O) -> Result<TraceResult, TraceError>
    where
        O: TraceObserver + ?Sized,
    {
        let resolved = resolve_target(destination, self.config.ip_version)?;
        tracing::info!(%destination, %resolved, "resolved destination");

        let probe = build_probe(
            self.config.protocol,
            self.config.ip_version,
            self.config.port,
        )?;

        let target = Target::new(destination.to_string(), resolved);
        observer.on_start(&target, &self.config);
        let mut result = TraceResult::new(target, self.config.clone());

        for ttl in self.config.first_hop..=self.config.max_ttl {
            let hop = probe_hop(
                &self.transport,
                &self.dns,
                resolved,
                ttl,
                &probe,
                self.config.timeout,
            )?;
            observer.on_hop(&hop);

            let reached = hop.is_from(resolved);
            result.hops.push(hop);
            if reached {
                result.destination_reached = true;
                break;
            }
            if observer.interrupted() {
                tracing::warn!(ttl, "observer interrupted the trace");
                break;
            }
        }

        tracing::info!(
            hops = result.hops.len(),
            reached = result.destination_reached,
            "trace finished"
        );
        Ok(result)
    }
}
