use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use crate::error::{SetupStage, TraceError};
use crate::lookup::ReverseDns;
use crate::probe::{Inbound, Outbound, Probe, Responder, Transport};
use crate::state::{Hop, HopFailure};

/// Send `probe` to `destination` with the given TTL and wait for one reply.
///
/// Socket setup problems abort the trace. A missed deadline, a read error or
/// an unparsable source address only mark this hop as failed.
pub fn probe_hop<T, D>(
    transport: &T,
    dns: &D,
    destination: IpAddr,
    ttl: u8,
    probe: &Probe,
    timeout: Duration,
) -> Result<Hop, TraceError>
where
    T: Transport + ?Sized,
    D: ReverseDns + ?Sized,
{
    // Both handles drop when this function returns, on every path
    let mut outbound = transport
        .open_outbound(destination, probe)
        .map_err(TraceError::setup(SetupStage::OpenOutbound))?;
    outbound
        .set_hop_limit(ttl)
        .map_err(TraceError::setup(SetupStage::SetTtl))?;

    let mut inbound = transport
        .open_inbound(probe.ip_version)
        .map_err(TraceError::setup(SetupStage::OpenInbound))?;

    let start = Instant::now();
    outbound
        .send(&probe.bytes)
        .map_err(TraceError::setup(SetupStage::Send))?;
    inbound
        .set_deadline(start + timeout)
        .map_err(TraceError::setup(SetupStage::Deadline))?;

    let received = inbound.recv_one();
    let latency = start.elapsed();

    let hop = match received {
        Ok(Responder::Addr(ip)) => {
            let names = dns.reverse_names(ip);
            Hop::responded(ttl, ip, names, latency)
        }
        Ok(Responder::Unparsable) => {
            tracing::debug!(ttl, "response with unparsable source address");
            Hop::failed(ttl, HopFailure::MalformedResponder, latency)
        }
        Err(e) => {
            if !is_timeout(&e) {
                tracing::debug!(ttl, error = %e, "receive failed, treating as timeout");
            }
            Hop::failed(ttl, HopFailure::Timeout, latency)
        }
    };

    tracing::debug!(ttl, responder = ?hop.responder, ?latency, "hop probed");
    Ok(hop)
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
