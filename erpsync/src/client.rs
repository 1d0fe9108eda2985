//! HTTP client for the source ERP API.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use erpsync_config::shared::SourceApiConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::error::{SyncError, SyncResult};

/// One record as returned by the source API: a JSON object of named fields.
pub type SourceItem = Map<String, Value>;

/// Trait for clients that can fetch batches of records from the source system.
///
/// A fetch returns the raw item list for one entity; an empty list is a valid
/// batch of size zero, not an error.
pub trait SourceClient {
    /// Fetches all items of the entity at `path`, optionally filtered to records
    /// modified after `modified_since`.
    fn fetch(
        &self,
        path: &str,
        modified_since: Option<DateTime<Utc>>,
    ) -> impl Future<Output = SyncResult<Vec<SourceItem>>> + Send;
}

/// Source client issuing authenticated GET requests against the ERP REST API.
#[derive(Debug, Clone)]
pub struct HttpSourceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: erpsync_config::SerializableSecretString,
}

impl HttpSourceClient {
    /// Creates a client for the configured source API with a per-request timeout.
    pub fn new(config: &SourceApiConfig) -> SyncResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl SourceClient for HttpSourceClient {
    async fn fetch(
        &self,
        path: &str,
        modified_since: Option<DateTime<Utc>>,
    ) -> SyncResult<Vec<SourceItem>> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        info!(%url, "requesting source endpoint");

        let mut request = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()))
            .header(ACCEPT, "application/json");

        if let Some(cutoff) = modified_since {
            request = request.query(&[(
                "modifiedSince",
                cutoff.to_rfc3339_opts(SecondsFormat::Secs, true),
            )]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "source API returned an error");
            return Err(SyncError::SourceStatus {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        let items = unwrap_items(path, payload)?;
        info!(rows = items.len(), path, "received source batch");

        Ok(items)
    }
}

/// Normalizes the source payload into a list of record objects.
///
/// The API answers either with a bare JSON array or with an envelope object whose
/// `items` field holds the array.
fn unwrap_items(path: &str, payload: Value) -> SyncResult<Vec<SourceItem>> {
    let list = match payload {
        Value::Array(list) => list,
        Value::Object(mut envelope) => match envelope.remove("items") {
            Some(Value::Array(list)) => list,
            Some(_) => {
                return Err(SyncError::SourcePayload {
                    path: path.to_string(),
                    reason: "`items` is not an array".to_string(),
                });
            }
            None => {
                return Err(SyncError::SourcePayload {
                    path: path.to_string(),
                    reason: "object payload without an `items` array".to_string(),
                });
            }
        },
        other => {
            return Err(SyncError::SourcePayload {
                path: path.to_string(),
                reason: format!("expected an array or envelope object, got {other}"),
            });
        }
    };

    list.into_iter()
        .map(|value| match value {
            Value::Object(item) => Ok(item),
            other => Err(SyncError::SourcePayload {
                path: path.to_string(),
                reason: format!("expected item objects, got {other}"),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bare_array_payload() {
        let items = unwrap_items("/v1/customers", json!([{"code": "C1"}, {"code": "C2"}])).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["code"], json!("C1"));
    }

    #[test]
    fn test_envelope_payload() {
        let items =
            unwrap_items("/v1/customers", json!({"items": [{"code": "C1"}], "total": 1})).unwrap();

        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_empty_items_is_a_valid_batch() {
        let items = unwrap_items("/v1/customers", json!({"items": []})).unwrap();

        assert!(items.is_empty());
    }

    #[test]
    fn test_envelope_without_items_is_rejected() {
        let result = unwrap_items("/v1/customers", json!({"rows": []}));

        assert!(matches!(result, Err(SyncError::SourcePayload { .. })));
    }

    #[test]
    fn test_non_object_items_are_rejected() {
        let result = unwrap_items("/v1/customers", json!([1, 2, 3]));

        assert!(matches!(result, Err(SyncError::SourcePayload { .. })));
    }
}
