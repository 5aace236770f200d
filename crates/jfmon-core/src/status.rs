//! Instrument status derived from a status payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::{display_scalar, display_time, display_with_unit};
use crate::module::ModuleBank;
use crate::payload::StatusPayload;

/// One human-formatted row of the parameter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRow {
    pub label: String,
    pub value: String,
    /// Shown only in expert mode.
    pub expert: bool,
}

impl ParameterRow {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            expert: false,
        }
    }

    fn expert(label: &str, value: String) -> Self {
        Self {
            expert: true,
            ..Self::new(label, value)
        }
    }
}

/// Everything the dashboard shows about the instrument, as of one
/// successful status poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentStatus {
    pub daq_state: String,
    pub parameters: Vec<ParameterRow>,
    pub modules: ModuleBank,
    pub received_at: DateTime<Utc>,
}

impl InstrumentStatus {
    /// Build the display rows and module summaries from a payload.
    pub fn from_payload(payload: &StatusPayload, received_at: DateTime<Utc>) -> Self {
        let modules = ModuleBank::from_arrays(
            payload.bad_pixels.as_ref(),
            [
                payload.pedestal_g0_mean.as_ref(),
                payload.pedestal_g1_mean.as_ref(),
                payload.pedestal_g2_mean.as_ref(),
            ],
        );

        Self {
            daq_state: display_scalar(payload.state.as_ref()),
            parameters: parameter_rows(payload),
            modules,
            received_at,
        }
    }
}

fn parameter_rows(p: &StatusPayload) -> Vec<ParameterRow> {
    fn v(field: &Option<Value>) -> Option<&Value> {
        field.as_ref()
    }

    vec![
        ParameterRow::new("Frame time", display_time(v(&p.frame_time))),
        ParameterRow::expert("Frame time (internal)", display_time(v(&p.frame_time_detector))),
        ParameterRow::new("Count time", display_time(v(&p.count_time))),
        ParameterRow::expert("Count time (internal)", display_time(v(&p.count_time_detector))),
        ParameterRow::new("Frame summation", display_scalar(v(&p.summation))),
        ParameterRow::new("Compression", display_scalar(v(&p.compression))),
        ParameterRow::new("Photon energy", display_with_unit(v(&p.photon_energy), "eV")),
        ParameterRow::new("Detector distance", display_with_unit(v(&p.detector_distance), "mm")),
        ParameterRow::new("Beam center X", display_with_unit(v(&p.beam_center_x), "pixel")),
        ParameterRow::new("Beam center Y", display_with_unit(v(&p.beam_center_y), "pixel")),
        ParameterRow::new("Beamline delay", display_time(v(&p.beamline_delay))),
        ParameterRow::new("Shutter delay", display_time(v(&p.shutter_delay))),
        ParameterRow::new("Pedestal G0 frames", display_scalar(v(&p.pedestal_g0_frames))),
        ParameterRow::new("Pedestal G1 frames", display_scalar(v(&p.pedestal_g1_frames))),
        ParameterRow::new("Pedestal G2 frames", display_scalar(v(&p.pedestal_g2_frames))),
        ParameterRow::new("Tracking ID", display_scalar(v(&p.tracking_id))),
        ParameterRow::new(
            "Resolution limit (edge)",
            display_with_unit(v(&p.resolution_limit_edge), "A"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleId;
    use serde_json::json;

    fn payload() -> StatusPayload {
        serde_json::from_value(json!({
            "state": "Idle",
            "frame_time": 0.0005,
            "frame_time_detector": 0.0005,
            "count_time": 0.00047,
            "count_time_detector": 0.00047,
            "summation": 1,
            "compression": "bslz4",
            "photon_energy": 12400.0,
            "detector_distance": 100.5,
            "beam_center_x": 1090,
            "beam_center_y": 1136,
            "beamline_delay": 0.002,
            "shutter_delay": 0.0,
            "pedestalG0_frames": 2000,
            "pedestalG1_frames": 1000,
            "pedestalG2_frames": 1000,
            "trackingID": "run-7",
            "resolution_limit_edge": 1.85,
            "bad_pixels": [1, 2, 3, 4, 5, 6, 7, 8],
            "pedestalG0_mean": [3000.0, 0.0, 3000.0, 3000.0, 3000.0, 3000.0, 12.3456789, 3000.0],
            "pedestalG1_mean": [14000.0, 14000.0, 14000.0, 14000.0, 14000.0, 14000.0, 14000.0, 14000.0],
            "pedestalG2_mean": [14500.0, 14500.0, 14500.0, 14500.0, 14500.0, 14500.0, 14500.0, 14500.0]
        }))
        .unwrap()
    }

    fn row<'a>(status: &'a InstrumentStatus, label: &str) -> &'a ParameterRow {
        status
            .parameters
            .iter()
            .find(|r| r.label == label)
            .unwrap_or_else(|| panic!("missing row {label}"))
    }

    #[test]
    fn test_rows_from_payload() {
        let status = InstrumentStatus::from_payload(&payload(), Utc::now());

        assert_eq!(status.daq_state, "Idle");
        assert_eq!(row(&status, "Frame time").value, "500 us");
        assert_eq!(row(&status, "Count time").value, "470 us");
        assert_eq!(row(&status, "Frame summation").value, "1");
        assert_eq!(row(&status, "Compression").value, "bslz4");
        assert_eq!(row(&status, "Photon energy").value, "12400 eV");
        assert_eq!(row(&status, "Beamline delay").value, "2.00 ms");
        assert_eq!(row(&status, "Tracking ID").value, "run-7");
        assert_eq!(row(&status, "Resolution limit (edge)").value, "1.85 A");
    }

    #[test]
    fn test_internal_timings_are_expert_rows() {
        let status = InstrumentStatus::from_payload(&payload(), Utc::now());
        let expert: Vec<&str> = status
            .parameters
            .iter()
            .filter(|r| r.expert)
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(expert, vec!["Frame time (internal)", "Count time (internal)"]);
    }

    #[test]
    fn test_modules_from_payload() {
        let status = InstrumentStatus::from_payload(&payload(), Utc::now());

        let m1 = status.modules.get(ModuleId::new(1).unwrap());
        assert_eq!(m1.pedestal_display(0), "0");

        let m6 = status.modules.get(ModuleId::new(6).unwrap());
        assert_eq!(m6.bad_pixels_display(), "7");
        assert_eq!(m6.pedestal_display(0), "12.346");
        assert_eq!(m6.pedestal_display(2), "14500");
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let status = InstrumentStatus::from_payload(&StatusPayload::default(), Utc::now());
        assert_eq!(status.daq_state, "n/a");
        assert!(status.parameters.iter().all(|r| r.value == "n/a"));
        assert!(status.modules.iter().all(|m| m.bad_pixels.is_none()));
    }
}
