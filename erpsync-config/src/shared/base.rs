use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The incremental lookback window cannot be zero days.
    #[error("`lookback_days` cannot be zero")]
    LookbackDaysZero,
    /// The source API base URL must be set.
    #[error("`source.base_url` cannot be empty")]
    EmptyBaseUrl,
    /// The warehouse host must be set.
    #[error("`warehouse.host` cannot be empty")]
    EmptyWarehouseHost,
}
