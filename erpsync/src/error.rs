//! Error types for the sync library.

use thiserror::Error;

/// Errors that can occur during a sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Transport-level error while talking to the source API.
    #[error("source API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source API answered with a non-success status.
    #[error("source API returned status {status} for `{path}`: {body}")]
    SourceStatus {
        path: String,
        status: u16,
        body: String,
    },

    /// The source API answered with a payload shape we cannot interpret.
    #[error("unexpected source payload for `{path}`: {reason}")]
    SourcePayload { path: String, reason: String },

    /// A destination column has no corresponding field in a fetched record.
    #[error("missing source field `{field}` for column `{column}` of `{table}`")]
    MissingField {
        table: String,
        column: String,
        field: String,
    },

    /// A fetched value cannot be converted to the destination column type.
    #[error("invalid value for column `{column}` of `{table}`: {reason}")]
    InvalidValue {
        table: String,
        column: String,
        reason: String,
    },

    /// A fact table schema declares no primary-key columns.
    #[error("missing primary key for table: {0}")]
    MissingPrimaryKey(String),

    /// Error from the warehouse database.
    #[error("warehouse error: {0}")]
    Warehouse(#[from] sqlx::Error),

    /// An induced failure from a fail point.
    #[error("fail point `{0}` triggered")]
    Failpoint(&'static str),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
