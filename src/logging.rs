use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

use crate::constants::defaults;

/// Logs to stderr, so that stdout only carries reports.
/// Verbosity is taken from `RUST_LOG`, e.g. `RUST_LOG=october_rs=debug`
/// prints every external command.
pub(crate) fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(defaults::LOG_FILTER));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    if let Err(err) = tracing_subscriber::registry().with(stderr_layer).try_init() {
        eprintln!("failed to initialize logging: {err}");
    }
}
