use erpsync_config::shared::WarehouseConnectionConfig;
use pg_escape::quote_identifier;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{info, warn};

use crate::error::SyncResult;
use crate::failpoints::{MERGE_AFTER_DELETE, sync_fail_point};
use crate::types::{Cell, Row, TableSchema};
use crate::warehouse::Warehouse;
use crate::warehouse::staging::StagedKeySet;

const NUM_POOL_CONNECTIONS: u32 = 1;

/// Rows per INSERT statement, keeping bind counts well below the Postgres limit.
const INSERT_CHUNK_ROWS: usize = 1000;

/// Warehouse implementation backed by a Postgres database.
///
/// Each load runs in a single transaction, so the reporting layer never observes a
/// truncated-but-not-reloaded dimension or a deleted-but-not-reinserted fact key.
#[derive(Debug, Clone)]
pub struct PostgresWarehouse {
    pool: PgPool,
}

impl PostgresWarehouse {
    /// Connects to the configured warehouse database.
    pub async fn connect(config: &WarehouseConnectionConfig) -> SyncResult<Self> {
        let options: PgConnectOptions = config.connect_options();

        let pool = PgPoolOptions::new()
            .max_connections(NUM_POOL_CONNECTIONS)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool, mainly for tests against a provisioned database.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_rows(
        tx: &mut Transaction<'_, Postgres>,
        schema: &TableSchema,
        rows: &[Row],
    ) -> SyncResult<()> {
        let prefix = insert_prefix(schema);

        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(&prefix);
            builder.push_values(chunk, |mut values, row| {
                for cell in row.values() {
                    match cell {
                        // An untyped NULL keyword avoids binding a text-typed null
                        // against non-text columns.
                        Cell::Null => {
                            values.push("NULL");
                        }
                        Cell::Bool(value) => {
                            values.push_bind(*value);
                        }
                        Cell::I64(value) => {
                            values.push_bind(*value);
                        }
                        Cell::F64(value) => {
                            values.push_bind(*value);
                        }
                        Cell::String(value) => {
                            values.push_bind(value.clone());
                        }
                        Cell::Date(value) => {
                            values.push_bind(*value);
                        }
                        Cell::TimestampTz(value) => {
                            values.push_bind(*value);
                        }
                    }
                }
            });

            builder.build().execute(&mut **tx).await?;
        }

        Ok(())
    }
}

/// Insert-statement prefix listing the destination columns in schema order.
fn insert_prefix(schema: &TableSchema) -> String {
    let columns = schema
        .columns
        .iter()
        .map(|column| quote_identifier(&column.name).into_owned())
        .collect::<Vec<_>>()
        .join(", ");

    format!("INSERT INTO {} ({}) ", quote_identifier(&schema.name), columns)
}

impl Warehouse for PostgresWarehouse {
    async fn replace_all(&self, schema: &TableSchema, rows: Vec<Row>) -> SyncResult<()> {
        if rows.is_empty() {
            warn!(table = %schema.name, "no rows fetched, leaving table untouched");
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "TRUNCATE TABLE {}",
            quote_identifier(&schema.name)
        ))
        .execute(&mut *tx)
        .await?;
        Self::insert_rows(&mut tx, schema, &rows).await?;

        tx.commit().await?;
        info!(table = %schema.name, rows = rows.len(), "full refresh committed");

        Ok(())
    }

    async fn merge_rows(&self, schema: &TableSchema, rows: Vec<Row>) -> SyncResult<()> {
        if rows.is_empty() {
            warn!(table = %schema.name, "no rows fetched, skipping incremental merge");
            return Ok(());
        }

        let staged = StagedKeySet::for_table(schema)?;
        let keys = staged.distinct_keys(&rows);

        // The transaction rolls back on drop, so any failure below leaves the
        // destination in its pre-call state and expires the staging table.
        let mut tx = self.pool.begin().await?;

        sqlx::query(&staged.create_sql()).execute(&mut *tx).await?;
        for chunk in keys.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<'_, Postgres> =
                QueryBuilder::new(staged.insert_prefix());
            builder.push_values(chunk, |mut values, key| {
                for part in key {
                    values.push_bind(part.clone());
                }
            });
            builder.build().execute(&mut *tx).await?;
        }

        sqlx::query(&staged.delete_sql(&schema.name))
            .execute(&mut *tx)
            .await?;
        sync_fail_point(MERGE_AFTER_DELETE)?;
        Self::insert_rows(&mut tx, schema, &rows).await?;

        tx.commit().await?;
        info!(
            table = %schema.name,
            rows = rows.len(),
            staged_keys = keys.len(),
            "incremental merge committed"
        );

        Ok(())
    }
}
