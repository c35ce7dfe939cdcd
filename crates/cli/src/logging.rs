//! Tracing subscriber setup
//!
//! Logs go to stderr so the CSV can be piped from stdout.

use tracing_subscriber::EnvFilter;

/// Default filter for the given verbosity and config debug flag
pub fn default_directive(verbose: u8, debug: bool) -> &'static str {
    match (verbose, debug) {
        (0, false) => "info",
        (0, true) | (1, _) => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the flags.
pub fn init(verbose: u8, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, debug)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
