//! Catalog of the ERP entities synchronized into the warehouse.
//!
//! Each entity is described declaratively: its API path, its destination table, the
//! load strategy, and the mapping from source field names to destination columns.
//! Dimension entities are refreshed wholesale each run; fact entities are merged
//! incrementally by primary key.

use crate::types::{ColumnSchema, ColumnType, TableSchema};

/// How a batch of an entity is loaded into its destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Atomically replace the full contents of the table.
    FullRefresh,
    /// Delete-then-insert merge keyed on the table's primary key.
    MergeByKey,
}

/// Mapping of one source field onto one destination column.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    /// Name of the field in the source API payload.
    pub source_field: &'static str,
    /// Destination column the field maps onto.
    pub column: ColumnSchema,
}

/// Full description of one synchronized entity.
#[derive(Debug, Clone)]
pub struct EntityMapping {
    /// Logical entity name used in logs.
    pub name: &'static str,
    /// API path the entity is fetched from.
    pub api_path: &'static str,
    /// Destination table name.
    pub table: &'static str,
    /// Load strategy applied to the entity's batches.
    pub strategy: LoadStrategy,
    /// Source-to-destination field mappings, in destination column order.
    pub fields: Vec<FieldMapping>,
}

impl EntityMapping {
    /// Returns the destination table schema implied by the field mappings.
    pub fn table_schema(&self) -> TableSchema {
        TableSchema::new(
            self.table,
            self.fields.iter().map(|field| field.column.clone()).collect(),
        )
    }
}

fn field(
    source_field: &'static str,
    column: &'static str,
    typ: ColumnType,
    nullable: bool,
) -> FieldMapping {
    FieldMapping {
        source_field,
        column: ColumnSchema::new(column, typ, nullable, false),
    }
}

fn key_field(source_field: &'static str, column: &'static str, typ: ColumnType) -> FieldMapping {
    FieldMapping {
        source_field,
        column: ColumnSchema::new(column, typ, false, true),
    }
}

/// Returns the dimension entities, refreshed wholesale each run.
pub fn dimension_mappings() -> Vec<EntityMapping> {
    vec![
        EntityMapping {
            name: "customers",
            api_path: "/v1/customers",
            table: "Customers",
            strategy: LoadStrategy::FullRefresh,
            fields: vec![
                field("code", "CustomerCode", ColumnType::Text, false),
                field("name", "CustomerName", ColumnType::Text, false),
                field("region", "Region", ColumnType::Text, true),
            ],
        },
        EntityMapping {
            name: "parts",
            api_path: "/v1/parts",
            table: "Parts",
            strategy: LoadStrategy::FullRefresh,
            fields: vec![
                field("number", "PartNumber", ColumnType::Text, false),
                field("name", "PartName", ColumnType::Text, false),
                field("stdCost", "StdCostPerUnit", ColumnType::DoublePrecision, false),
                field(
                    "stdPrice",
                    "StdSellPricePerUnit",
                    ColumnType::DoublePrecision,
                    false,
                ),
                field(
                    "stdHours",
                    "StdHoursPerUnit",
                    ColumnType::DoublePrecision,
                    false,
                ),
            ],
        },
        EntityMapping {
            name: "machines",
            api_path: "/v1/machines",
            table: "Machines",
            strategy: LoadStrategy::FullRefresh,
            fields: vec![
                field("code", "MachineCode", ColumnType::Text, false),
                field("name", "MachineName", ColumnType::Text, false),
                field("group", "MachineGroup", ColumnType::Text, true),
            ],
        },
    ]
}

/// Returns the fact entities, merged incrementally by primary key.
pub fn fact_mappings() -> Vec<EntityMapping> {
    vec![
        EntityMapping {
            name: "sales_orders",
            api_path: "/v1/salesorders",
            table: "SalesOrders",
            strategy: LoadStrategy::MergeByKey,
            fields: vec![
                key_field("salesOrderId", "SalesOrderID", ColumnType::Text),
                key_field("lineId", "SalesOrderLineID", ColumnType::BigInt),
                field("customerId", "CustomerID", ColumnType::Text, false),
                field("partId", "PartID", ColumnType::Text, false),
                field("orderDate", "OrderDate", ColumnType::Date, false),
                field("promiseDate", "PromiseDate", ColumnType::Date, true),
                field("shipDate", "ShipDate", ColumnType::Date, true),
                field("orderQty", "OrderQty", ColumnType::BigInt, false),
                field("shipQty", "ShipQty", ColumnType::BigInt, true),
                field("unitPrice", "UnitPrice", ColumnType::DoublePrecision, false),
            ],
        },
        EntityMapping {
            name: "job_orders",
            api_path: "/v1/joborders",
            table: "JobOrders",
            strategy: LoadStrategy::MergeByKey,
            fields: vec![
                key_field("jobId", "JobOrderID", ColumnType::Text),
                field("partId", "PartID", ColumnType::Text, false),
                field("machineId", "MachineID", ColumnType::Text, false),
                field("salesOrderId", "SalesOrderID", ColumnType::Text, true),
                field("plannedQty", "PlannedQty", ColumnType::BigInt, false),
                field("completedQty", "CompletedQty", ColumnType::BigInt, false),
                field("scrapQty", "ScrapQty", ColumnType::BigInt, false),
                field(
                    "stdHoursPerUnit",
                    "StdHoursPerUnit",
                    ColumnType::DoublePrecision,
                    false,
                ),
                field("actualHours", "ActualHours", ColumnType::DoublePrecision, false),
                field(
                    "downtimeHours",
                    "DowntimeHours",
                    ColumnType::DoublePrecision,
                    false,
                ),
                field("start", "JobStartDate", ColumnType::TimestampTz, false),
                field("end", "JobEndDate", ColumnType::TimestampTz, true),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_orders_have_a_composite_key() {
        let mapping = fact_mappings()
            .into_iter()
            .find(|mapping| mapping.table == "SalesOrders")
            .unwrap();
        let schema = mapping.table_schema();

        let key_columns: Vec<_> = schema
            .primary_key_indices()
            .into_iter()
            .map(|index| schema.columns[index].name.clone())
            .collect();
        assert_eq!(key_columns, vec!["SalesOrderID", "SalesOrderLineID"]);
    }

    #[test]
    fn test_job_orders_have_a_single_key() {
        let mapping = fact_mappings()
            .into_iter()
            .find(|mapping| mapping.table == "JobOrders")
            .unwrap();

        assert_eq!(mapping.table_schema().primary_key_indices(), vec![0]);
    }

    #[test]
    fn test_dimensions_have_no_key_and_full_refresh() {
        for mapping in dimension_mappings() {
            assert_eq!(mapping.strategy, LoadStrategy::FullRefresh);
            assert!(mapping.table_schema().primary_key_indices().is_empty());
        }
    }

    #[test]
    fn test_schema_columns_follow_mapping_order() {
        let mappings = dimension_mappings();
        let schema = mappings[0].table_schema();

        let names: Vec<_> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["CustomerCode", "CustomerName", "Region"]);
    }
}
