//! Telemetry initialization for sync binaries.

pub mod tracing;
