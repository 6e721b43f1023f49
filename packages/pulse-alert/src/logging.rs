use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: `RUST_LOG` if set, otherwise info for
/// this crate and warn for dependencies. Output goes to stderr.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pulse_alert=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}
