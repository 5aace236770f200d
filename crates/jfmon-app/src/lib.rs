//! JUNGFRAU detector status dashboard.
//!
//! Wires the instrument client, the synchronization drivers and the
//! dashboard HTTP surface into one process:
//! - Status, spot-sequence and preview-frame tasks on their own intervals
//! - Operator dashboard API and Prometheus metrics
//! - Graceful shutdown cancelling every task together

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, TelemetryConfig};
pub use error::{AppError, AppResult};
