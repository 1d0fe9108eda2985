use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{SyncError, SyncResult};
use crate::failpoints::MERGE_AFTER_DELETE;
use crate::types::{Row, TableSchema};
use crate::warehouse::Warehouse;
use crate::warehouse::staging::StagedKeySet;

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Vec<Row>>,
    fail_after_delete: bool,
}

/// In-memory warehouse for testing and development purposes.
///
/// [`MemoryWarehouse`] applies the same load semantics as the Postgres
/// implementation, including the text rendering used for key equality, so merge
/// behavior can be verified without a database. All data is held in memory and is
/// lost when the process terminates.
#[derive(Debug, Clone, Default)]
pub struct MemoryWarehouse {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryWarehouse {
    /// Creates a new empty memory warehouse.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the rows currently stored for a table.
    pub async fn table_rows(&self, table: &str) -> Vec<Row> {
        let inner = self.inner.lock().await;
        inner.tables.get(table).cloned().unwrap_or_default()
    }

    /// Seeds a table with pre-existing rows, for tests that need prior state.
    pub async fn seed_table(&self, table: &str, rows: Vec<Row>) {
        let mut inner = self.inner.lock().await;
        inner.tables.insert(table.to_string(), rows);
    }

    /// Makes the next merge fail between its delete and insert steps.
    ///
    /// Used to verify that an aborted merge leaves the destination in its
    /// pre-call state.
    pub async fn fail_next_merge(&self) {
        let mut inner = self.inner.lock().await;
        inner.fail_after_delete = true;
    }
}

impl Warehouse for MemoryWarehouse {
    async fn replace_all(&self, schema: &TableSchema, rows: Vec<Row>) -> SyncResult<()> {
        if rows.is_empty() {
            warn!(table = %schema.name, "no rows fetched, leaving table untouched");
            return Ok(());
        }

        let mut inner = self.inner.lock().await;
        info!(table = %schema.name, rows = rows.len(), "replacing table contents");
        inner.tables.insert(schema.name.clone(), rows);

        Ok(())
    }

    async fn merge_rows(&self, schema: &TableSchema, rows: Vec<Row>) -> SyncResult<()> {
        if rows.is_empty() {
            warn!(table = %schema.name, "no rows fetched, skipping incremental merge");
            return Ok(());
        }

        let staged = StagedKeySet::for_table(schema)?;
        let stale: BTreeSet<Vec<String>> = staged.distinct_keys(&rows).into_iter().collect();

        let mut inner = self.inner.lock().await;

        // Work on a scratch copy so an induced failure leaves the table untouched,
        // mirroring the transactional rollback of the Postgres implementation.
        let mut table = inner.tables.get(schema.name.as_str()).cloned().unwrap_or_default();
        table.retain(|row| !stale.contains(&row.key_text(staged.key_indices())));

        if inner.fail_after_delete {
            inner.fail_after_delete = false;
            return Err(SyncError::Failpoint(MERGE_AFTER_DELETE));
        }

        info!(
            table = %schema.name,
            rows = rows.len(),
            staged_keys = stale.len(),
            "merging batch into table"
        );
        table.extend(rows);
        inner.tables.insert(schema.name.clone(), table);

        Ok(())
    }
}
