//! Dashboard API types.
//!
//! These types are used for JSON serialization in the REST API.

use jfmon_core::{DiagnosticsState, DisplayControls, ModulePanel, ParameterRow};
use serde::{Deserialize, Serialize};

/// Full view-state snapshot.
///
/// Unlike `DashboardView` this always carries the last known values, with
/// `connected` telling the client whether they are current.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Timestamp when snapshot was taken (Unix milliseconds).
    pub timestamp_ms: i64,
    /// View state revision; changes on every mutation.
    pub revision: u64,
    pub title: String,
    pub connected: bool,
    pub daq_state: String,
    /// When the shown status was received (Unix milliseconds).
    pub status_received_ms: Option<i64>,
    /// Parameter rows; expert rows only in expert mode.
    pub parameters: Vec<ParameterRow>,
    /// Module panels in display order.
    pub modules: Vec<ModulePanel>,
    pub controls: DisplayControls,
    pub frame_index: u64,
    pub preview_url: String,
    pub diagnostics: DiagnosticsState,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ContrastRequest {
    pub contrast: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ToggleRequest {
    pub enabled: bool,
}
