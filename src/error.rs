use std::fmt;
use std::io;

/// Stage of per-probe socket setup that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// Opening the outbound send connection
    OpenOutbound,
    /// Setting IP_TTL / IPV6_UNICAST_HOPS on the outbound connection
    SetTtl,
    /// Opening the inbound ICMP listener
    OpenInbound,
    /// Writing the probe payload
    Send,
    /// Arming the receive deadline on the listener
    Deadline,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OpenOutbound => "open outbound connection",
            Self::SetTtl => "set TTL/hop limit",
            Self::OpenInbound => "open ICMP listener",
            Self::Send => "send probe",
            Self::Deadline => "set receive deadline",
        };
        f.write_str(label)
    }
}

/// Errors that abort a whole trace.
///
/// Per-hop conditions (timeouts, unparsable responders) never show up here;
/// they are recorded on the [`Hop`](crate::state::Hop) as a
/// [`HopFailure`](crate::state::HopFailure) and the trace keeps going.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// Destination could not be resolved for the requested IP version
    #[error("Failed to resolve '{target}': {reason}")]
    Resolution { target: String, reason: String },

    /// Probe payload could not be serialized
    #[error("Failed to build probe: {0}")]
    ProbeBuild(String),

    /// Socket setup failed (privileges or environment, not the network)
    #[error("Failed to {stage}: {source}")]
    TransportSetup {
        stage: SetupStage,
        #[source]
        source: io::Error,
    },
}

impl TraceError {
    pub(crate) fn resolution(target: &str, reason: impl Into<String>) -> Self {
        Self::Resolution {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn setup(stage: SetupStage) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::TransportSetup { stage, source }
    }

    /// Hint printed after permission failures
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TransportSetup { source, .. }
                if source.kind() == io::ErrorKind::PermissionDenied =>
            {
                Some(
                    "Raw sockets need elevated privileges.\n\
                     Fix options:\n\
                     \u{2022} Run with sudo: sudo hoptrace <destination>\n\
                     \u{2022} Add capability: sudo setcap cap_net_raw+ep $(which hoptrace)",
                )
            }
            _ => None,
        }
    }
}
