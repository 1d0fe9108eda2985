use std::collections::BTreeSet;

use pg_escape::quote_identifier;

use crate::error::{SyncError, SyncResult};
use crate::types::{Row, TableSchema};

/// Transient set of primary-key values driving the delete step of a merge.
///
/// The staged set materializes as a transaction-scoped temporary table with one
/// `TEXT` column per key column. It is created inside the merge transaction with
/// `ON COMMIT DROP`, so it cannot outlive the transaction on any exit path and is
/// never visible to other sessions. Key values are staged as text and matched
/// against the destination columns cast to text; [`crate::types::Cell::to_key_text`]
/// defines the rendering on the batch side.
#[derive(Debug)]
pub struct StagedKeySet {
    stage_name: String,
    key_columns: Vec<String>,
    key_indices: Vec<usize>,
}

impl StagedKeySet {
    /// Builds the staged key set definition for a fact table schema.
    ///
    /// Fails when the schema declares no primary-key columns.
    pub fn for_table(schema: &TableSchema) -> SyncResult<Self> {
        let key_indices = schema.primary_key_indices();
        if key_indices.is_empty() {
            return Err(SyncError::MissingPrimaryKey(schema.name.clone()));
        }

        let key_columns = key_indices
            .iter()
            .map(|&index| schema.columns[index].name.clone())
            .collect();

        Ok(Self {
            stage_name: format!("{}_merge_keys", schema.name),
            key_columns,
            key_indices,
        })
    }

    /// Returns the name of the temporary staging table.
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Returns the indices of the key columns within the destination schema.
    pub fn key_indices(&self) -> &[usize] {
        &self.key_indices
    }

    /// Projects the batch onto the key columns and de-duplicates the key tuples.
    ///
    /// Two rows sharing a key map to one staged key, so each stale destination row
    /// is deleted exactly once. Returned in deterministic order.
    pub fn distinct_keys(&self, rows: &[Row]) -> Vec<Vec<String>> {
        let mut keys = BTreeSet::new();
        for row in rows {
            keys.insert(row.key_text(&self.key_indices));
        }

        keys.into_iter().collect()
    }

    /// DDL creating the transaction-scoped staging table.
    pub fn create_sql(&self) -> String {
        let columns = self
            .key_columns
            .iter()
            .map(|column| format!("{} TEXT", quote_identifier(column)))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "CREATE TEMPORARY TABLE {} ({}) ON COMMIT DROP",
            quote_identifier(&self.stage_name),
            columns
        )
    }

    /// Insert-statement prefix for staging the key tuples.
    pub fn insert_prefix(&self) -> String {
        let columns = self
            .key_columns
            .iter()
            .map(|column| quote_identifier(column).into_owned())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "INSERT INTO {} ({}) ",
            quote_identifier(&self.stage_name),
            columns
        )
    }

    /// Join-style delete removing destination rows whose key is staged.
    ///
    /// A destination row survives only if its key tuple is absent from the staged
    /// set.
    pub fn delete_sql(&self, destination: &str) -> String {
        let join = self
            .key_columns
            .iter()
            .map(|column| {
                let column = quote_identifier(column);
                format!("t.{column}::text = k.{column}")
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        format!(
            "DELETE FROM {} AS t USING {} AS k WHERE {}",
            quote_identifier(destination),
            quote_identifier(&self.stage_name),
            join
        )
    }
}
