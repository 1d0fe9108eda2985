//! Nightly ERP-to-warehouse sync job binary.
//!
//! Initializes tracing, loads the job configuration, and drives one sync run to
//! completion. Exits with code 0 on full success and code 1 on any failure, with
//! the failure cause written to the log stream before exit.

use erpsync_config::shared::SyncJobConfig;
use erpsync_telemetry::tracing::init_tracing;
use tracing::error;

mod core;

fn main() {
    let _log_flusher = match init_tracing(env!("CARGO_BIN_NAME")) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialize tracing: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run() {
        error!("sync job failed: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = load_sync_config()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(core::start_sync(config))
}

/// Loads and validates the sync job configuration.
fn load_sync_config() -> anyhow::Result<SyncJobConfig> {
    let config = erpsync_config::load_config::<SyncJobConfig>()?;
    config.validate()?;

    Ok(config)
}
