//! End-to-end sync run tests over the in-memory warehouse.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use erpsync::client::{SourceClient, SourceItem};
use erpsync::entity::fact_mappings;
use erpsync::error::{SyncError, SyncResult};
use erpsync::mapper::map_batch;
use erpsync::run::SyncJob;
use erpsync::types::Cell;
use erpsync::warehouse::MemoryWarehouse;

/// Source client serving canned responses, recording every fetch it receives.
#[derive(Clone, Default)]
struct StaticSource {
    responses: Arc<HashMap<String, Vec<SourceItem>>>,
    failing_path: Option<&'static str>,
    calls: Arc<Mutex<Vec<(String, Option<DateTime<Utc>>)>>>,
}

impl StaticSource {
    fn new(responses: HashMap<String, Vec<SourceItem>>) -> Self {
        Self {
            responses: Arc::new(responses),
            ..Default::default()
        }
    }

    fn failing_on(mut self, path: &'static str) -> Self {
        self.failing_path = Some(path);
        self
    }

    async fn calls(&self) -> Vec<(String, Option<DateTime<Utc>>)> {
        self.calls.lock().await.clone()
    }
}

impl SourceClient for StaticSource {
    async fn fetch(
        &self,
        path: &str,
        modified_since: Option<DateTime<Utc>>,
    ) -> SyncResult<Vec<SourceItem>> {
        self.calls
            .lock()
            .await
            .push((path.to_string(), modified_since));

        if self.failing_path == Some(path) {
            return Err(SyncError::SourceStatus {
                path: path.to_string(),
                status: 500,
                body: "internal error".to_string(),
            });
        }

        Ok(self.responses.get(path).cloned().unwrap_or_default())
    }
}

fn item(value: Value) -> SourceItem {
    value.as_object().cloned().unwrap()
}

fn customer_item(code: &str) -> SourceItem {
    item(json!({"code": code, "name": format!("Customer {code}"), "region": "EMEA"}))
}

fn part_item(number: &str) -> SourceItem {
    item(json!({
        "number": number,
        "name": format!("Part {number}"),
        "stdCost": 12.5,
        "stdPrice": 19.0,
        "stdHours": 0.4,
    }))
}

fn machine_item(code: &str) -> SourceItem {
    item(json!({"code": code, "name": format!("Machine {code}"), "group": "CNC"}))
}

fn sales_order_item(order: &str, line: i64) -> SourceItem {
    item(json!({
        "salesOrderId": order,
        "lineId": line,
        "customerId": "C1",
        "partId": "P1",
        "orderDate": "2026-08-20",
        "promiseDate": "2026-09-01",
        "shipDate": null,
        "orderQty": 100,
        "shipQty": null,
        "unitPrice": 19.0,
    }))
}

fn job_order_item(job: &str, completed_qty: i64) -> SourceItem {
    item(json!({
        "jobId": job,
        "partId": "P1",
        "machineId": "M1",
        "salesOrderId": "SO-1",
        "plannedQty": 100,
        "completedQty": completed_qty,
        "scrapQty": 2,
        "stdHoursPerUnit": 0.4,
        "actualHours": 42.0,
        "downtimeHours": 1.5,
        "start": "2026-08-21T06:00:00Z",
        "end": null,
    }))
}

fn full_responses() -> HashMap<String, Vec<SourceItem>> {
    HashMap::from([
        ("/v1/customers".to_string(), vec![customer_item("C1")]),
        ("/v1/parts".to_string(), vec![part_item("P1")]),
        ("/v1/machines".to_string(), vec![machine_item("M1")]),
        (
            "/v1/salesorders".to_string(),
            vec![sales_order_item("SO-1", 1), sales_order_item("SO-1", 2)],
        ),
        ("/v1/joborders".to_string(), vec![job_order_item("J1", 10)]),
    ])
}

#[tokio::test]
async fn test_full_run_loads_every_entity() {
    let source = StaticSource::new(full_responses());
    let warehouse = MemoryWarehouse::new();
    let job = SyncJob::new(source, warehouse.clone(), 7);

    let report = job.run().await.unwrap();

    let tables: Vec<_> = report
        .tables
        .iter()
        .map(|table| (table.table.as_str(), table.fetched_rows))
        .collect();
    assert_eq!(
        tables,
        vec![
            ("Customers", 1),
            ("Parts", 1),
            ("Machines", 1),
            ("SalesOrders", 2),
            ("JobOrders", 1),
        ]
    );

    let customers = warehouse.table_rows("Customers").await;
    assert_eq!(
        customers[0].values()[0],
        Cell::String("C1".to_string())
    );
    assert_eq!(warehouse.table_rows("SalesOrders").await.len(), 2);
}

#[tokio::test]
async fn test_dimensions_fetch_unfiltered_and_facts_use_the_cutoff() {
    let source = StaticSource::new(full_responses());
    let job = SyncJob::new(source.clone(), MemoryWarehouse::new(), 7);

    job.run().await.unwrap();

    let calls = source.calls().await;
    assert_eq!(calls.len(), 5);
    for (path, modified_since) in &calls {
        let is_fact = path == "/v1/salesorders" || path == "/v1/joborders";
        assert_eq!(modified_since.is_some(), is_fact, "path {path}");
    }

    // Both facts share the single per-run cutoff.
    assert_eq!(calls[3].1, calls[4].1);
}

#[tokio::test]
async fn test_empty_customers_batch_leaves_the_table_untouched() {
    let mut responses = full_responses();
    responses.insert("/v1/customers".to_string(), vec![]);
    let source = StaticSource::new(responses);
    let warehouse = MemoryWarehouse::new();

    let existing = vec![erpsync::types::Row::new(vec![
        Cell::String("C9".to_string()),
        Cell::String("Old Customer".to_string()),
        Cell::String("APAC".to_string()),
    ])];
    warehouse.seed_table("Customers", existing.clone()).await;

    let report = SyncJob::new(source, warehouse.clone(), 7).run().await.unwrap();

    // The empty batch is skipped with a warning and the run proceeds to Parts.
    assert_eq!(warehouse.table_rows("Customers").await, existing);
    assert_eq!(report.tables[0].fetched_rows, 0);
    assert_eq!(warehouse.table_rows("Parts").await.len(), 1);
}

#[tokio::test]
async fn test_a_failing_entity_aborts_the_remainder_of_the_run() {
    let source = StaticSource::new(full_responses()).failing_on("/v1/parts");
    let warehouse = MemoryWarehouse::new();

    let result = SyncJob::new(source.clone(), warehouse.clone(), 7).run().await;

    assert!(matches!(result, Err(SyncError::SourceStatus { status: 500, .. })));

    // Customers loaded before the failure; nothing after Parts was attempted.
    assert_eq!(warehouse.table_rows("Customers").await.len(), 1);
    assert!(warehouse.table_rows("Machines").await.is_empty());
    let paths: Vec<_> = source.calls().await.into_iter().map(|(path, _)| path).collect();
    assert_eq!(paths, vec!["/v1/customers", "/v1/parts"]);
}

#[tokio::test]
async fn test_merge_replaces_the_stale_job_order_version() {
    let job_orders = fact_mappings()
        .into_iter()
        .find(|mapping| mapping.table == "JobOrders")
        .unwrap();
    let warehouse = MemoryWarehouse::new();

    // Pre-existing J1 with CompletedQty 5 from an earlier run.
    let stale = map_batch(&job_orders, &[job_order_item("J1", 5)]).unwrap();
    warehouse.seed_table("JobOrders", stale).await;

    let source = StaticSource::new(full_responses());
    SyncJob::new(source, warehouse.clone(), 7).run().await.unwrap();

    let rows = warehouse.table_rows("JobOrders").await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values()[0], Cell::String("J1".to_string()));
    assert_eq!(rows[0].values()[5], Cell::I64(10));
}
