//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber.
///
/// The level defaults to `warn`, or `debug` with `verbose`. `RUST_LOG`
/// overrides both. Stdout is left alone so `--json` output stays clean.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
