use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so they never mix with the progress output.
/// `RUST_LOG` takes precedence over `verbose`.
pub fn initialize_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let format = tracing_subscriber::fmt::format()
        .without_time()
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .with_writer(std::io::stderr)
        .try_init();
}
