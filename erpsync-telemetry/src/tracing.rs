use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the global tracing subscriber for a sync binary.
///
/// Logs go to stdout through a non-blocking writer so that a crashing job still
/// flushes its failure cause before exiting. The returned [`WorkerGuard`] must be
/// kept alive for the lifetime of the process, otherwise buffered log lines are
/// dropped.
///
/// The filter defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init_tracing(service_name: &str) -> Result<WorkerGuard, TryInitError> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_target(false),
        )
        .try_init()?;

    ::tracing::info!(service = service_name, "tracing initialized");

    Ok(guard)
}
