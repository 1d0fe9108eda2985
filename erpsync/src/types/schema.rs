/// Warehouse column types supported by the sync job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    BigInt,
    DoublePrecision,
    Text,
    Date,
    TimestampTz,
}

/// Schema of one destination column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    /// Name of the column in the destination table.
    pub name: String,
    /// Destination type the mapped values must conform to.
    pub typ: ColumnType,
    /// Whether the column accepts explicit nulls from the source.
    pub nullable: bool,
    /// Whether the column is part of the table's primary key.
    pub primary_key: bool,
}

impl ColumnSchema {
    pub fn new(
        name: impl Into<String>,
        typ: ColumnType,
        nullable: bool,
        primary_key: bool,
    ) -> Self {
        Self {
            name: name.into(),
            typ,
            nullable,
            primary_key,
        }
    }
}

/// Schema of one destination table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Name of the table in the warehouse.
    pub name: String,
    /// Columns in destination order.
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Returns the indices of the primary-key columns, in column order.
    pub fn primary_key_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.primary_key)
            .map(|(index, _)| index)
            .collect()
    }
}
