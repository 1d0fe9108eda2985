mod cell;
mod row;
mod schema;

pub use cell::Cell;
pub use row::Row;
pub use schema::{ColumnSchema, ColumnType, TableSchema};
