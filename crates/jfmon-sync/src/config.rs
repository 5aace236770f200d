//! Synchronization schedule and initial display settings.

use std::time::Duration;

use jfmon_core::{
    DisplayControls, FrameCounter, ViewState, CONTRAST_DEFAULT, DEFAULT_FRAME_MODULUS,
};
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Poll intervals and the initial view state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Status poll interval in milliseconds.
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
    /// Spot sequence check interval in milliseconds.
    #[serde(default = "default_sequence_interval_ms")]
    pub sequence_interval_ms: u64,
    /// Preview frame advance interval in milliseconds.
    #[serde(default = "default_image_interval_ms")]
    pub image_interval_ms: u64,
    /// Frame index wraps at this value. 0 = never wrap.
    #[serde(default = "default_frame_modulus")]
    pub frame_modulus: u64,
    #[serde(default)]
    pub initial_frame: u64,
    /// Initial preview contrast (clamped to the slider range).
    #[serde(default = "default_contrast")]
    pub contrast: f64,
    #[serde(default)]
    pub logarithmic: bool,
    #[serde(default)]
    pub expert_mode: bool,
}

fn default_status_interval_ms() -> u64 {
    1_000
}

fn default_sequence_interval_ms() -> u64 {
    1_000
}

fn default_image_interval_ms() -> u64 {
    500
}

fn default_frame_modulus() -> u64 {
    DEFAULT_FRAME_MODULUS
}

fn default_contrast() -> f64 {
    CONTRAST_DEFAULT
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: default_status_interval_ms(),
            sequence_interval_ms: default_sequence_interval_ms(),
            image_interval_ms: default_image_interval_ms(),
            frame_modulus: default_frame_modulus(),
            initial_frame: 0,
            contrast: default_contrast(),
            logarithmic: false,
            expert_mode: false,
        }
    }
}

impl SyncConfig {
    /// Reject zero intervals.
    pub fn validate(&self) -> SyncResult<()> {
        for (task, ms) in [
            ("status", self.status_interval_ms),
            ("sequence", self.sequence_interval_ms),
            ("image", self.image_interval_ms),
        ] {
            if ms == 0 {
                return Err(SyncError::InvalidInterval { task });
            }
        }
        Ok(())
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn sequence_interval(&self) -> Duration {
        Duration::from_millis(self.sequence_interval_ms)
    }

    pub fn image_interval(&self) -> Duration {
        Duration::from_millis(self.image_interval_ms)
    }

    pub fn frame_counter(&self) -> SyncResult<FrameCounter> {
        if self.frame_modulus == 0 {
            return Ok(FrameCounter::unbounded());
        }
        Ok(FrameCounter::starting_at(
            self.initial_frame,
            self.frame_modulus,
        )?)
    }

    /// Build the disconnected view state the drivers start from.
    pub fn initial_state(&self) -> SyncResult<ViewState> {
        let mut state = ViewState::new(
            self.frame_counter()?,
            DisplayControls {
                logarithmic: self.logarithmic,
                expert_mode: self.expert_mode,
                ..DisplayControls::default()
            },
        );
        state.set_contrast(self.contrast)?;
        Ok(state)
    }
}
