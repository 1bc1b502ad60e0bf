use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// Identifiers go to stdout, so all log output is written to stderr. The
/// filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_file(true),
        )
        .init();
}
