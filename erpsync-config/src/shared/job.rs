use serde::Deserialize;

use crate::shared::{SourceApiConfig, ValidationError, WarehouseConnectionConfig};

const fn default_lookback_days() -> u32 {
    7
}

/// Complete configuration for one sync job run.
///
/// Aggregates the source API settings, the warehouse connection, and the
/// incremental lookback window. Typically loaded at startup via
/// [`crate::load_config`].
///
/// This intentionally does not implement `Serialize` to avoid accidentally
/// leaking secrets in the config into serialized forms.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncJobConfig {
    /// Configuration for the upstream ERP API.
    pub source: SourceApiConfig,
    /// Configuration for the destination warehouse.
    pub warehouse: WarehouseConnectionConfig,
    /// Number of days before "now" used to filter incremental fact fetches.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl SyncJobConfig {
    /// Validates the complete sync job configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lookback_days == 0 {
            return Err(ValidationError::LookbackDaysZero);
        }
        if self.source.base_url.is_empty() {
            return Err(ValidationError::EmptyBaseUrl);
        }
        if self.warehouse.host.is_empty() {
            return Err(ValidationError::EmptyWarehouseHost);
        }

        Ok(())
    }
}
