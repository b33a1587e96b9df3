use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays clean for `--json`.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug for this
/// binary with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "warn,insertrank=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
