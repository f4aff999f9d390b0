// Public API - data types, tracer, and output
pub mod config;
pub mod error;
pub mod export;
pub mod lookup;
pub mod probe;
pub mod state;
pub mod trace;

// Binary support
pub mod cli;
pub mod logging;
pub mod prefs;

pub use config::{Config, IpVersion, ProbeProtocol};
pub use error::{SetupStage, TraceError};
pub use state::{Hop, HopFailure, Target, TraceResult};
pub use trace::{LatencyJump, TraceObserver, Tracer, largest_jump};
