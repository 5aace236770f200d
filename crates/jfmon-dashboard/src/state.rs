//! Dashboard state management.
//!
//! `DashboardState` couples the shared view state with what the HTTP
//! surface needs to render it and to forward operator commands.

use std::sync::Arc;

use chrono::Utc;
use jfmon_client::InstrumentApi;
use jfmon_core::{DashboardView, DisplayControls, ModulePanel, PreviewEndpoint};
use jfmon_sync::ViewStateHandle;
use jfmon_telemetry::{Metrics, PollOutcome};
use tracing::{info, warn};

use crate::types::DashboardSnapshot;

#[derive(Clone)]
pub struct DashboardState {
    view: ViewStateHandle,
    api: Arc<dyn InstrumentApi>,
    preview: PreviewEndpoint,
    title: String,
}

impl DashboardState {
    pub fn new(
        view: ViewStateHandle,
        api: Arc<dyn InstrumentApi>,
        preview: PreviewEndpoint,
        title: impl Into<String>,
    ) -> Self {
        Self {
            view,
            api,
            preview,
            title: title.into(),
        }
    }

    /// Collect a full snapshot of the current state.
    pub fn collect_snapshot(&self) -> DashboardSnapshot {
        let timestamp_ms = Utc::now().timestamp_millis();

        self.view.read(|state| {
            let controls = *state.controls();
            let parameters = state
                .parameters()
                .iter()
                .filter(|row| controls.expert_mode || !row.expert)
                .cloned()
                .collect();
            let modules = state
                .modules()
                .map(|bank| bank.in_display_order().map(ModulePanel::from).collect())
                .unwrap_or_default();

            DashboardSnapshot {
                timestamp_ms,
                revision: state.revision(),
                title: self.title.clone(),
                connected: state.is_connected(),
                daq_state: state.daq_state().to_string(),
                status_received_ms: state
                    .last_known_status()
                    .map(|s| s.received_at.timestamp_millis()),
                parameters,
                modules,
                controls,
                frame_index: state.frame_index(),
                preview_url: state.preview_url(&self.preview),
                diagnostics: state.diagnostics().clone(),
            }
        })
    }

    /// Structural view: notice while disconnected, live panels otherwise.
    pub fn view(&self) -> DashboardView {
        self.view
            .read(|state| DashboardView::from_state(state, &self.title, &self.preview))
    }

    pub fn set_contrast(&self, contrast: f64) -> jfmon_core::Result<DisplayControls> {
        self.view.set_contrast(contrast)?;
        Ok(self.controls())
    }

    pub fn set_logarithmic(&self, logarithmic: bool) -> DisplayControls {
        self.view.set_logarithmic(logarithmic);
        self.controls()
    }

    pub fn set_expert_mode(&self, expert_mode: bool) -> DisplayControls {
        self.view.set_expert_mode(expert_mode);
        self.controls()
    }

    fn controls(&self) -> DisplayControls {
        self.view.read(|state| *state.controls())
    }

    /// Send the re-initialization command in the background.
    ///
    /// The outcome is logged and counted but never reported to the caller.
    pub fn trigger_initialize(&self) {
        let api = self.api.clone();
        tokio::spawn(async move {
            match api.send_initialize().await {
                Ok(()) => {
                    info!("Instrument initialize command sent");
                    Metrics::initialize_command(PollOutcome::Success);
                }
                Err(e) => {
                    warn!(error = %e, "Instrument initialize command failed");
                    Metrics::initialize_command(PollOutcome::Failure);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jfmon_client::MockInstrumentApi;
    use jfmon_core::{InstrumentStatus, StatusPayload, NOT_CONNECTED};
    use serde_json::json;

    fn dashboard() -> (ViewStateHandle, DashboardState) {
        let view = ViewStateHandle::default();
        let state = DashboardState::new(
            view.clone(),
            Arc::new(MockInstrumentApi::new()),
            PreviewEndpoint::new("http://localhost:5232"),
            "JUNGFRAU 4M",
        );
        (view, state)
    }

    fn connect(view: &ViewStateHandle) {
        let payload = StatusPayload {
            state: Some(json!("Idle")),
            frame_time: Some(json!(0.001)),
            frame_time_detector: Some(json!(0.0009)),
            bad_pixels: Some(json!([0, 1, 2, 3, 4, 5, 6, 7])),
            ..StatusPayload::default()
        };
        view.apply_status(InstrumentStatus::from_payload(&payload, Utc::now()));
    }

    #[test]
    fn test_snapshot_before_first_poll() {
        let (_view, state) = dashboard();
        let snapshot = state.collect_snapshot();

        assert!(!snapshot.connected);
        assert_eq!(snapshot.daq_state, NOT_CONNECTED);
        assert!(snapshot.parameters.is_empty());
        assert!(snapshot.modules.is_empty());
        assert_eq!(snapshot.preview_url, "http://localhost:5232/preview/10/0");
    }

    #[test]
    fn test_snapshot_keeps_stale_values_while_disconnected() {
        let (view, state) = dashboard();
        connect(&view);
        view.apply_status_failure();

        let snapshot = state.collect_snapshot();
        assert!(!snapshot.connected);
        assert_eq!(snapshot.daq_state, "Idle");
        assert_eq!(snapshot.modules.len(), 8);
        assert_eq!(snapshot.modules[0].name, "Module 6");
        assert!(snapshot.status_received_ms.is_some());
        assert!(!state.view().is_live());
    }

    #[test]
    fn test_expert_rows_follow_expert_mode() {
        let (view, state) = dashboard();
        connect(&view);

        let has_internal =
            |s: &DashboardState| s.collect_snapshot().parameters.iter().any(|r| r.expert);
        assert!(!has_internal(&state));

        let controls = state.set_expert_mode(true);
        assert!(controls.expert_mode);
        assert!(has_internal(&state));
    }

    #[test]
    fn test_controls_update_preview_url() {
        let (_view, state) = dashboard();
        state.set_logarithmic(true);
        let controls = state.set_contrast(0.5).unwrap();

        assert_eq!(controls.contrast, 1.0);
        assert_eq!(
            state.collect_snapshot().preview_url,
            "http://localhost:5232/preview_log/1/0"
        );
    }
}
