//! Wire payloads returned by the instrument HTTP API.
//!
//! Scalar status fields are kept as raw JSON values: the dashboard only
//! checks for presence and renders what the server sends.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Status endpoint body.
///
/// The photon energy is read from `photon_energy` (eV) only; the older
/// `energy_in_keV` name is not consulted.
///
/// Decoding accepts a JSON object only. A `null` field decodes as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusPayload {
    pub state: Option<Value>,
    pub frame_time: Option<Value>,
    pub frame_time_detector: Option<Value>,
    pub count_time: Option<Value>,
    pub count_time_detector: Option<Value>,
    pub summation: Option<Value>,
    pub compression: Option<Value>,
    pub beam_center_x: Option<Value>,
    pub beam_center_y: Option<Value>,
    pub detector_distance: Option<Value>,
    pub beamline_delay: Option<Value>,
    pub shutter_delay: Option<Value>,
    pub photon_energy: Option<Value>,
    #[serde(rename = "pedestalG0_frames")]
    pub pedestal_g0_frames: Option<Value>,
    #[serde(rename = "pedestalG1_frames")]
    pub pedestal_g1_frames: Option<Value>,
    #[serde(rename = "pedestalG2_frames")]
    pub pedestal_g2_frames: Option<Value>,
    #[serde(rename = "trackingID")]
    pub tracking_id: Option<Value>,
    pub resolution_limit_edge: Option<Value>,
    /// Bad pixel count per physical module.
    pub bad_pixels: Option<Value>,
    #[serde(rename = "pedestalG0_mean")]
    pub pedestal_g0_mean: Option<Value>,
    #[serde(rename = "pedestalG1_mean")]
    pub pedestal_g1_mean: Option<Value>,
    #[serde(rename = "pedestalG2_mean")]
    pub pedestal_g2_mean: Option<Value>,
}

impl<'de> Deserialize<'de> for StatusPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut take = |key: &str| fields.remove(key).filter(|v| !v.is_null());

        Ok(Self {
            state: take("state"),
            frame_time: take("frame_time"),
            frame_time_detector: take("frame_time_detector"),
            count_time: take("count_time"),
            count_time_detector: take("count_time_detector"),
            summation: take("summation"),
            compression: take("compression"),
            beam_center_x: take("beam_center_x"),
            beam_center_y: take("beam_center_y"),
            detector_distance: take("detector_distance"),
            beamline_delay: take("beamline_delay"),
            shutter_delay: take("shutter_delay"),
            photon_energy: take("photon_energy"),
            pedestal_g0_frames: take("pedestalG0_frames"),
            pedestal_g1_frames: take("pedestalG1_frames"),
            pedestal_g2_frames: take("pedestalG2_frames"),
            tracking_id: take("trackingID"),
            resolution_limit_edge: take("resolution_limit_edge"),
            bad_pixels: take("bad_pixels"),
            pedestal_g0_mean: take("pedestalG0_mean"),
            pedestal_g1_mean: take("pedestalG1_mean"),
            pedestal_g2_mean: take("pedestalG2_mean"),
        })
    }
}

/// Spot-finding sequence counter. Incremented by the server whenever the
/// spot statistics are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotSequence {
    pub sequence: i64,
}

/// Number of spots per rotation angle bin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotsPerAngle {
    pub count: Vec<f64>,
}

/// Mean intensity by resolution shell, as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionProfile {
    pub one_over_d2: Vec<f64>,
    #[serde(rename = "log_meanI")]
    pub log_mean_i: Vec<f64>,
}

/// One point of the resolution-vs-intensity series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionPoint {
    /// 1/d^2 in A^-2.
    pub x: f64,
    /// log(<I>).
    pub y: f64,
}

impl ResolutionProfile {
    /// Pair the parallel arrays into points.
    ///
    /// Arrays of different length are rejected.
    pub fn into_points(self) -> Result<Vec<ResolutionPoint>> {
        if self.one_over_d2.len() != self.log_mean_i.len() {
            return Err(CoreError::ResolutionLengthMismatch {
                x_len: self.one_over_d2.len(),
                y_len: self.log_mean_i.len(),
            });
        }

        Ok(self
            .one_over_d2
            .into_iter()
            .zip(self.log_mean_i)
            .map(|(x, y)| ResolutionPoint { x, y })
            .collect())
    }
}
