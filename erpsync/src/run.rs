//! Orchestration of one end-to-end sync run.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::client::SourceClient;
use crate::entity::{EntityMapping, LoadStrategy, dimension_mappings, fact_mappings};
use crate::error::SyncResult;
use crate::mapper::map_batch;
use crate::warehouse::Warehouse;

/// Outcome of one table's load within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    /// Destination table name.
    pub table: String,
    /// Number of records fetched from the source for this table.
    pub fetched_rows: usize,
}

/// Report of one completed sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Per-table outcomes, in load order.
    pub tables: Vec<TableReport>,
}

/// Drives one sync run to completion.
///
/// Dimension entities are refreshed wholesale first, then fact entities are merged
/// incrementally using a single cutoff of `now - lookback window`. Entities are
/// processed strictly sequentially; the first failure aborts the remainder of the
/// run and becomes the run's terminal error.
pub struct SyncJob<C, W> {
    client: C,
    warehouse: W,
    lookback_days: u32,
}

impl<C, W> SyncJob<C, W>
where
    C: SourceClient,
    W: Warehouse,
{
    pub fn new(client: C, warehouse: W, lookback_days: u32) -> Self {
        Self {
            client,
            warehouse,
            lookback_days,
        }
    }

    /// Runs the full sync sequence and returns the per-table report.
    pub async fn run(&self) -> SyncResult<RunReport> {
        info!("starting ERP to warehouse sync run");
        let mut report = RunReport { tables: Vec::new() };

        for mapping in dimension_mappings() {
            report.tables.push(self.load_entity(&mapping, None).await?);
        }

        let cutoff = Utc::now() - Duration::days(i64::from(self.lookback_days));
        info!(%cutoff, lookback_days = self.lookback_days, "computed incremental cutoff");

        for mapping in fact_mappings() {
            report
                .tables
                .push(self.load_entity(&mapping, Some(cutoff)).await?);
        }

        info!("sync run completed successfully");
        Ok(report)
    }

    async fn load_entity(
        &self,
        mapping: &EntityMapping,
        modified_since: Option<DateTime<Utc>>,
    ) -> SyncResult<TableReport> {
        info!(entity = mapping.name, "loading entity");

        let items = self.client.fetch(mapping.api_path, modified_since).await?;
        let rows = map_batch(mapping, &items)?;
        let schema = mapping.table_schema();

        match mapping.strategy {
            LoadStrategy::FullRefresh => self.warehouse.replace_all(&schema, rows).await?,
            LoadStrategy::MergeByKey => self.warehouse.merge_rows(&schema, rows).await?,
        }

        Ok(TableReport {
            table: schema.name,
            fetched_rows: items.len(),
        })
    }
}
