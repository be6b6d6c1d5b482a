use tracing_subscriber::EnvFilter;

/// Initialise logging to stderr. The default level is `info`, or `debug` when `verbose` is set. When verbose, the
/// level can be overridden via the `RUST_LOG` environment variable.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
