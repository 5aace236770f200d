//! The shared dashboard view state.
//!
//! `ViewState` is the single record the three synchronization drivers write
//! and the presentation layer reads. Each mutation is a small, total
//! operation so that the drivers can apply them under one lock.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::module::ModuleBank;
use crate::payload::ResolutionPoint;
use crate::preview::{FrameCounter, PreviewEndpoint};
use crate::status::{InstrumentStatus, ParameterRow};

/// State label shown before the first successful poll.
pub const NOT_CONNECTED: &str = "Not connected";

pub const CONTRAST_MIN: f64 = 1.0;
pub const CONTRAST_MAX: f64 = 200.0;
pub const CONTRAST_DEFAULT: f64 = 10.0;

/// Connectivity to the instrument status endpoint.
///
/// A failed poll keeps the last status around as `last_known` so it can be
/// shown again once the link returns, but it is never presented as current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "link", rename_all = "snake_case")]
pub enum LinkState {
    Disconnected { last_known: Option<InstrumentStatus> },
    Connected { status: InstrumentStatus },
}

impl Default for LinkState {
    fn default() -> Self {
        Self::Disconnected { last_known: None }
    }
}

/// Result of applying a status poll outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    Established,
    Lost,
    Unchanged,
}

/// User-controlled display inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayControls {
    pub contrast: f64,
    pub logarithmic: bool,
    pub expert_mode: bool,
}

impl Default for DisplayControls {
    fn default() -> Self {
        Self {
            contrast: CONTRAST_DEFAULT,
            logarithmic: false,
            expert_mode: false,
        }
    }
}

/// Spot-finding diagnostics and the sequence they were fetched for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsState {
    /// Last observed server sequence; `None` until the first observation.
    pub sequence: Option<i64>,
    pub spots_per_angle: Vec<f64>,
    pub resolution_series: Vec<ResolutionPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    link: LinkState,
    controls: DisplayControls,
    frames: FrameCounter,
    diagnostics: DiagnosticsState,
    /// Incremented on every mutation.
    revision: u64,
}

impl ViewState {
    /// Fresh state with the given frame counter and initial controls.
    pub fn new(frames: FrameCounter, controls: DisplayControls) -> Self {
        Self {
            link: LinkState::default(),
            controls,
            frames,
            diagnostics: DiagnosticsState::default(),
            revision: 0,
        }
    }

    // --- link state -------------------------------------------------------

    /// Apply a successful status poll. Rows and modules are replaced
    /// wholesale.
    pub fn apply_status(&mut self, status: InstrumentStatus) -> LinkChange {
        let was_connected = self.is_connected();
        self.link = LinkState::Connected { status };
        self.bump();

        if was_connected {
            LinkChange::Unchanged
        } else {
            LinkChange::Established
        }
    }

    /// Apply a failed status poll. The last status is retained as stale.
    pub fn apply_status_failure(&mut self) -> LinkChange {
        let previous = std::mem::take(&mut self.link);
        let (link, change) = match previous {
            LinkState::Connected { status } => (
                LinkState::Disconnected {
                    last_known: Some(status),
                },
                LinkChange::Lost,
            ),
            disconnected @ LinkState::Disconnected { .. } => (disconnected, LinkChange::Unchanged),
        };
        self.link = link;
        self.bump();
        change
    }

    pub fn link(&self) -> &LinkState {
        &self.link
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.link, LinkState::Connected { .. })
    }

    /// Current status; `None` while disconnected.
    pub fn current_status(&self) -> Option<&InstrumentStatus> {
        match &self.link {
            LinkState::Connected { status } => Some(status),
            LinkState::Disconnected { .. } => None,
        }
    }

    /// Last status received, current or stale.
    pub fn last_known_status(&self) -> Option<&InstrumentStatus> {
        match &self.link {
            LinkState::Connected { status } => Some(status),
            LinkState::Disconnected { last_known } => last_known.as_ref(),
        }
    }

    /// Last known instrument state label (stale while disconnected).
    pub fn daq_state(&self) -> &str {
        self.last_known_status()
            .map(|s| s.daq_state.as_str())
            .unwrap_or(NOT_CONNECTED)
    }

    /// Last known parameter rows (stale while disconnected).
    pub fn parameters(&self) -> &[ParameterRow] {
        self.last_known_status()
            .map(|s| s.parameters.as_slice())
            .unwrap_or(&[])
    }

    /// Last known module summaries (stale while disconnected).
    pub fn modules(&self) -> Option<&ModuleBank> {
        self.last_known_status().map(|s| &s.modules)
    }

    // --- diagnostics ------------------------------------------------------

    /// Record an observed sequence number.
    ///
    /// Returns `true` when it differs from the last one (including the first
    /// observation and any decrease), meaning the series must be refetched.
    pub fn observe_sequence(&mut self, sequence: i64) -> bool {
        if self.diagnostics.sequence == Some(sequence) {
            return false;
        }
        self.diagnostics.sequence = Some(sequence);
        self.bump();
        true
    }

    pub fn replace_spots_per_angle(&mut self, counts: Vec<f64>) {
        self.diagnostics.spots_per_angle = counts;
        self.bump();
    }

    pub fn replace_resolution_series(&mut self, points: Vec<ResolutionPoint>) {
        self.diagnostics.resolution_series = points;
        self.bump();
    }

    pub fn diagnostics(&self) -> &DiagnosticsState {
        &self.diagnostics
    }

    // --- frames and controls ----------------------------------------------

    /// Advance the preview frame index and return it.
    pub fn advance_frame(&mut self) -> u64 {
        let index = self.frames.advance();
        self.bump();
        index
    }

    pub fn frame_index(&self) -> u64 {
        self.frames.index()
    }

    pub fn frames(&self) -> &FrameCounter {
        &self.frames
    }

    /// Set the preview contrast, clamped to the slider range.
    pub fn set_contrast(&mut self, contrast: f64) -> Result<f64> {
        if !contrast.is_finite() {
            return Err(CoreError::InvalidContrast(contrast));
        }
        self.controls.contrast = contrast.clamp(CONTRAST_MIN, CONTRAST_MAX);
        self.bump();
        Ok(self.controls.contrast)
    }

    pub fn set_logarithmic(&mut self, logarithmic: bool) {
        self.controls.logarithmic = logarithmic;
        self.bump();
    }

    pub fn set_expert_mode(&mut self, expert_mode: bool) {
        self.controls.expert_mode = expert_mode;
        self.bump();
    }

    pub fn controls(&self) -> &DisplayControls {
        &self.controls
    }

    /// URL of the preview frame for the current controls and frame index.
    pub fn preview_url(&self, endpoint: &PreviewEndpoint) -> String {
        endpoint.url(
            self.controls.contrast,
            self.controls.logarithmic,
            self.frames.index(),
        )
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
