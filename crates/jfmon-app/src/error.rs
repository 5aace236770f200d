//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Instrument client error: {0}")]
    Client(#[from] jfmon_client::ClientError),

    #[error("Synchronization error: {0}")]
    Sync(#[from] jfmon_sync::SyncError),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] jfmon_dashboard::DashboardError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] jfmon_telemetry::TelemetryError),

    #[error("Task failed: {0}")]
    Task(String),
}

pub type AppResult<T> = Result<T, AppError>;
