//! Core domain types for the JUNGFRAU status dashboard.
//!
//! This crate provides the state that the synchronization drivers write and
//! the presentation layer reads:
//! - `ViewState`: the single shared record (link state, controls, frames, diagnostics)
//! - `InstrumentStatus`: display rows and module summaries derived from a status payload
//! - `ModuleBank`: the eight detector modules keyed by physical number
//! - `format_time`, `format_pedestal`: unit-scaled, significant-digit rendering
//! - `PreviewEndpoint`: preview image URL construction

pub mod error;
pub mod format;
pub mod module;
pub mod payload;
pub mod preview;
pub mod status;
pub mod view;
pub mod view_state;

pub use error::{CoreError, Result};
pub use format::{format_pedestal, format_time, to_precision, MISSING_VALUE};
pub use module::{display_order, ModuleBank, ModuleId, ModuleSummary, GAIN_STAGES, MODULE_COUNT};
pub use payload::{ResolutionPoint, ResolutionProfile, SpotSequence, SpotsPerAngle, StatusPayload};
pub use preview::{build_preview_url, FrameCounter, PreviewEndpoint, DEFAULT_FRAME_MODULUS};
pub use status::{InstrumentStatus, ParameterRow};
pub use view::{DashboardView, LiveView, ModulePanel, SERVER_NOT_RUNNING};
pub use view_state::{
    DiagnosticsState, DisplayControls, LinkChange, LinkState, ViewState,
    CONTRAST_DEFAULT, CONTRAST_MAX, CONTRAST_MIN, NOT_CONNECTED,
};
