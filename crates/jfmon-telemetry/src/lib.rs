//! Prometheus metrics and structured logging for the status dashboard.
//!
//! - Structured logging with tracing (JSON in production)
//! - Poll outcome, link state and diagnostics fetch metrics
//! - Text exposition for the `/metrics` route

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::{encode_metrics, Metrics, PollOutcome, PollTask};
