use erpsync::client::HttpSourceClient;
use erpsync::run::SyncJob;
use erpsync::warehouse::PostgresWarehouse;
use erpsync_config::shared::SyncJobConfig;
use tracing::info;

/// Builds the source client and warehouse connection and runs one sync to completion.
pub async fn start_sync(config: SyncJobConfig) -> anyhow::Result<()> {
    let client = HttpSourceClient::new(&config.source)?;
    let warehouse = PostgresWarehouse::connect(&config.warehouse).await?;

    let job = SyncJob::new(client, warehouse, config.lookback_days);
    let report = job.run().await?;

    for table in &report.tables {
        info!(table = %table.table, rows = table.fetched_rows, "table synchronized");
    }
    info!("ERP to warehouse sync job completed successfully");

    Ok(())
}
