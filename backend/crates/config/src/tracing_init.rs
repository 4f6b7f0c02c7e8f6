use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set so a single module can be turned up without
/// touching the service config; otherwise `log_level` (from `LOG_LEVEL`)
/// applies. An unparsable directive falls back to `info`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
