//! HTTP surface for the JUNGFRAU status dashboard.
//!
//! Serves the shared view state to a browser front-end and accepts the
//! operator's display controls:
//!
//! - `GET /api/snapshot`: full state, last known values included
//! - `GET /api/view`: "server not running" notice or live panels
//! - `PUT /api/controls/{contrast,logarithmic,expert_mode}`
//! - `PUT /api/command/initialize`: fire-and-forget re-initialization
//! - `GET /metrics`: Prometheus text format

mod config;
mod error;
mod server;
mod state;
mod types;

pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult};
pub use server::{create_router, run_server};
pub use state::DashboardState;
pub use types::{ContrastRequest, DashboardSnapshot, ToggleRequest};
