//! Structural view handed to the presentation layer.
//!
//! While the instrument is unreachable the only thing to render is a notice;
//! the live panels exist only in the `Live` variant, so a renderer cannot
//! show stale parameters or modules as current.

use serde::Serialize;

use crate::module::ModuleSummary;
use crate::payload::ResolutionPoint;
use crate::preview::PreviewEndpoint;
use crate::status::ParameterRow;
use crate::view_state::{LinkState, ViewState};

/// Notice shown while the status endpoint is unreachable.
pub const SERVER_NOT_RUNNING: &str = "JUNGFRAU server not running";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    ServerNotRunning { notice: String },
    Live(LiveView),
}

/// Everything the connected dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveView {
    pub title: String,
    pub daq_state: String,
    pub expert_mode: bool,
    /// Parameter rows, with expert rows removed unless expert mode is on.
    pub parameters: Vec<ParameterRow>,
    /// Module panels in display order.
    pub modules: Vec<ModulePanel>,
    pub preview_url: String,
    pub contrast: f64,
    pub logarithmic: bool,
    pub spots_per_angle: Vec<f64>,
    pub resolution_series: Vec<ResolutionPoint>,
}

/// Pre-formatted module panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePanel {
    pub name: String,
    pub bad_pixels: String,
    pub mean_pedestal_g0: String,
    pub mean_pedestal_g1: String,
    pub mean_pedestal_g2: String,
}

impl From<&ModuleSummary> for ModulePanel {
    fn from(module: &ModuleSummary) -> Self {
        Self {
            name: module.name.clone(),
            bad_pixels: module.bad_pixels_display(),
            mean_pedestal_g0: module.pedestal_display(0),
            mean_pedestal_g1: module.pedestal_display(1),
            mean_pedestal_g2: module.pedestal_display(2),
        }
    }
}

impl DashboardView {
    pub fn from_state(state: &ViewState, title: &str, preview: &PreviewEndpoint) -> Self {
        let status = match state.link() {
            LinkState::Connected { status } => status,
            LinkState::Disconnected { .. } => {
                return Self::ServerNotRunning {
                    notice: SERVER_NOT_RUNNING.to_string(),
                }
            }
        };

        let controls = state.controls();
        let diagnostics = state.diagnostics();

        Self::Live(LiveView {
            title: title.to_string(),
            daq_state: status.daq_state.clone(),
            expert_mode: controls.expert_mode,
            parameters: status
                .parameters
                .iter()
                .filter(|row| controls.expert_mode || !row.expert)
                .cloned()
                .collect(),
            modules: status.modules.in_display_order().map(ModulePanel::from).collect(),
            preview_url: state.preview_url(preview),
            contrast: controls.contrast,
            logarithmic: controls.logarithmic,
            spots_per_angle: diagnostics.spots_per_angle.clone(),
            resolution_series: diagnostics.resolution_series.clone(),
        })
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::StatusPayload;
    use crate::status::InstrumentStatus;
    use chrono::Utc;
    use serde_json::json;

    fn connected_state() -> ViewState {
        let payload: StatusPayload = serde_json::from_value(json!({
            "state": "Idle",
            "frame_time": 0.0005,
            "frame_time_detector": 0.0005,
            "bad_pixels": [0, 1, 2, 3, 4, 5, 6, 7],
        }))
        .unwrap();
        let mut state = ViewState::default();
        state.apply_status(InstrumentStatus::from_payload(&payload, Utc::now()));
        state
    }

    #[test]
    fn test_disconnected_renders_notice_only() {
        let mut state = connected_state();
        state.apply_status_failure();

        let view = DashboardView::from_state(&state, "JUNGFRAU 4M", &PreviewEndpoint::new("http://det"));
        assert_eq!(
            view,
            DashboardView::ServerNotRunning {
                notice: SERVER_NOT_RUNNING.to_string()
            }
        );
        assert!(!view.is_live());
    }

    #[test]
    fn test_expert_rows_hidden_unless_expert_mode() {
        let mut state = connected_state();
        let preview = PreviewEndpoint::new("http://det");

        let DashboardView::Live(live) = DashboardView::from_state(&state, "JF", &preview) else {
            panic!("expected live view");
        };
        assert!(live.parameters.iter().all(|r| !r.expert));

        state.set_expert_mode(true);
        let DashboardView::Live(live) = DashboardView::from_state(&state, "JF", &preview) else {
            panic!("expected live view");
        };
        assert!(live.parameters.iter().any(|r| r.label == "Frame time (internal)"));
    }

    #[test]
    fn test_module_panels_in_display_order() {
        let state = connected_state();
        let DashboardView::Live(live) =
            DashboardView::from_state(&state, "JF", &PreviewEndpoint::new("http://det"))
        else {
            panic!("expected live view");
        };

        let names: Vec<&str> = live.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Module 6", "Module 7", "Module 4", "Module 5", "Module 2", "Module 3", "Module 0", "Module 1"]
        );
        assert_eq!(live.modules[0].bad_pixels, "6");
        assert_eq!(live.preview_url, "http://det/preview/10/0");
    }

    #[test]
    fn test_view_serializes_with_tag() {
        let state = ViewState::default();
        let view = DashboardView::from_state(&state, "JF", &PreviewEndpoint::new("http://det"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "server_not_running");
    }
}
