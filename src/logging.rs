use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when RUST_LOG is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "hoptrace=debug" } else { "warn" }
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// trace output.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A second init (e.g. from tests) is harmless
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
