//! Warehouse loaders: full-refresh dimension loads and incremental fact merges.

use std::future::Future;

use crate::error::SyncResult;
use crate::types::{Row, TableSchema};

pub mod memory;
pub mod postgres;
pub mod staging;

pub use memory::MemoryWarehouse;
pub use postgres::PostgresWarehouse;
pub use staging::StagedKeySet;

/// Trait for destinations that can load mapped batches into warehouse tables.
///
/// Both operations are all-or-nothing with respect to the destination table:
/// either the whole batch becomes visible atomically, or the table is left in its
/// pre-call state. Concurrent external readers must never observe an intermediate
/// state. Empty batches are a no-op for both operations, logged at warning level.
pub trait Warehouse {
    /// Atomically replaces the full contents of a reference table with the batch.
    fn replace_all(
        &self,
        schema: &TableSchema,
        rows: Vec<Row>,
    ) -> impl Future<Output = SyncResult<()>> + Send;

    /// Atomically merges the batch into a fact table by primary key.
    ///
    /// Prior versions of the batch's keys are deleted and every batch row is
    /// inserted; rows whose key is absent from the batch are left untouched.
    /// Duplicate keys within one batch are all inserted, with no last-write-wins
    /// resolution at this layer.
    fn merge_rows(
        &self,
        schema: &TableSchema,
        rows: Vec<Row>,
    ) -> impl Future<Output = SyncResult<()>> + Send;
}
