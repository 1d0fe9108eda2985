//! Pure mapping of source API records onto destination rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::client::SourceItem;
use crate::entity::EntityMapping;
use crate::error::{SyncError, SyncResult};
use crate::types::{Cell, ColumnSchema, ColumnType, Row};

/// Maps a fetched batch onto the destination column set of the given entity.
///
/// Renames source fields to destination columns, projects down to exactly the
/// destination columns in order, and drops any extra source fields. Fails before
/// any warehouse write is attempted when a destination column has no corresponding
/// source field in a record, or when a value cannot be converted to the column type.
pub fn map_batch(mapping: &EntityMapping, items: &[SourceItem]) -> SyncResult<Vec<Row>> {
    items
        .iter()
        .map(|item| map_item(mapping, item))
        .collect()
}

fn map_item(mapping: &EntityMapping, item: &SourceItem) -> SyncResult<Row> {
    let mut values = Vec::with_capacity(mapping.fields.len());

    for field in &mapping.fields {
        let value = item
            .get(field.source_field)
            .ok_or_else(|| SyncError::MissingField {
                table: mapping.table.to_string(),
                column: field.column.name.clone(),
                field: field.source_field.to_string(),
            })?;

        values.push(convert_value(mapping.table, &field.column, value)?);
    }

    Ok(Row::new(values))
}

/// Converts one JSON value into a typed cell for the given destination column.
///
/// An explicit JSON `null` maps to [`Cell::Null`] for nullable columns; a missing
/// field is handled by the caller as a mapping error, which keeps "no value" and
/// "schema drift" distinguishable.
fn convert_value(table: &str, column: &ColumnSchema, value: &Value) -> SyncResult<Cell> {
    if value.is_null() {
        if !column.nullable {
            return Err(invalid_value(table, column, "null value for non-nullable column"));
        }
        return Ok(Cell::Null);
    }

    match column.typ {
        ColumnType::Bool => value
            .as_bool()
            .map(Cell::Bool)
            .ok_or_else(|| invalid_value(table, column, &format!("expected a boolean, got {value}"))),
        ColumnType::BigInt => value
            .as_i64()
            .map(Cell::I64)
            .ok_or_else(|| invalid_value(table, column, &format!("expected an integer, got {value}"))),
        ColumnType::DoublePrecision => value
            .as_f64()
            .map(Cell::F64)
            .ok_or_else(|| invalid_value(table, column, &format!("expected a number, got {value}"))),
        // The source is loosely typed, so scalar values are stringified for text columns.
        ColumnType::Text => match value {
            Value::String(text) => Ok(Cell::String(text.clone())),
            Value::Number(number) => Ok(Cell::String(number.to_string())),
            Value::Bool(flag) => Ok(Cell::String(flag.to_string())),
            other => Err(invalid_value(table, column, &format!("expected a scalar, got {other}"))),
        },
        ColumnType::Date => {
            let text = value
                .as_str()
                .ok_or_else(|| invalid_value(table, column, &format!("expected a date string, got {value}")))?;
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Cell::Date)
                .map_err(|err| invalid_value(table, column, &format!("invalid date `{text}`: {err}")))
        }
        ColumnType::TimestampTz => {
            let text = value.as_str().ok_or_else(|| {
                invalid_value(table, column, &format!("expected a timestamp string, got {value}"))
            })?;
            DateTime::parse_from_rfc3339(text)
                .map(|timestamp| Cell::TimestampTz(timestamp.with_timezone(&Utc)))
                .map_err(|err| invalid_value(table, column, &format!("invalid timestamp `{text}`: {err}")))
        }
    }
}

fn invalid_value(table: &str, column: &ColumnSchema, reason: &str) -> SyncError {
    SyncError::InvalidValue {
        table: table.to_string(),
        column: column.name.clone(),
        reason: reason.to_string(),
    }
}
