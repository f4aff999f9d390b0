use serde::Serialize;
use std::io::Write;
use std::net::IpAddr;

use crate::state::TraceResult;
use crate::trace::LatencyJump;

#[derive(Serialize)]
struct JumpJson {
    /// Seconds
    delta: f64,
    from_ttl: Option<u8>,
    to_ttl: Option<u8>,
    from: Option<IpAddr>,
    to: Option<IpAddr>,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    #[serde(flatten)]
    trace: &'a TraceResult,
    largest_jump: JumpJson,
}

/// Write the trace and its latency jump as one pretty-printed JSON document
pub fn export_json<W: Write>(
    result: &TraceResult,
    jump: &LatencyJump<'_>,
    writer: W,
) -> anyhow::Result<()> {
    let (earlier, later) = jump.pair.unzip();
    let report = ReportJson {
        trace: result,
        largest_jump: JumpJson {
            delta: jump.delta.as_secs_f64(),
            from_ttl: earlier.map(|h| h.ttl),
            to_ttl: later.map(|h| h.ttl),
            from: earlier.and_then(|h| h.responder),
            to: later.and_then(|h| h.responder),
        },
    };
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}
