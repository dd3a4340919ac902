use keepsake_core::{Error, Result, KEEPSAKE_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing system for a host application
///
/// The filter is read from `KEEPSAKE_LOG`, then `RUST_LOG`, defaulting to
/// `info`. Output goes to stderr without ANSI colors.
pub fn init() -> Result<()> {
    let filter = build_filter();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::configuration(format!("failed to install tracing subscriber: {e}")))
}

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env(KEEPSAKE_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
