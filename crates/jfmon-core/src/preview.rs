//! Preview image addressing.
//!
//! The writer renders the latest frame as JPEG on request. The dashboard
//! never fetches it itself; it only produces the URL for the image element,
//! with a frame index in the path so that every tick requests a fresh image.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Default wrap-around point of the frame index.
pub const DEFAULT_FRAME_MODULUS: u64 = 256_000;

/// Build the URL of a preview frame.
///
/// `base_url` is the writer's preview root (no trailing slash).
pub fn build_preview_url(base_url: &str, contrast: f64, logarithmic: bool, frame_index: u64) -> String {
    let mode = if logarithmic { "preview_log" } else { "preview" };
    format!("{base_url}/{mode}/{contrast}/{frame_index}")
}

/// Location of the preview image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewEndpoint {
    base_url: String,
}

impl PreviewEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, contrast: f64, logarithmic: bool, frame_index: u64) -> String {
        build_preview_url(&self.base_url, contrast, logarithmic, frame_index)
    }
}

/// Wrapping frame counter, always in `[0, modulus)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounter {
    index: u64,
    modulus: u64,
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self {
            index: 0,
            modulus: DEFAULT_FRAME_MODULUS,
        }
    }
}

impl FrameCounter {
    /// Create a counter starting at zero.
    pub fn new(modulus: u64) -> Result<Self> {
        Self::starting_at(0, modulus)
    }

    /// Create a counter starting at `initial` (reduced modulo `modulus`).
    pub fn starting_at(initial: u64, modulus: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(CoreError::InvalidModulus(modulus));
        }
        Ok(Self {
            index: initial % modulus,
            modulus,
        })
    }

    /// Counter that effectively never wraps.
    pub fn unbounded() -> Self {
        Self {
            index: 0,
            modulus: u64::MAX,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Advance by one frame and return the new index.
    pub fn advance(&mut self) -> u64 {
        // index < modulus <= u64::MAX, so the increment cannot overflow.
        self.index = (self.index + 1) % self.modulus;
        self.index
    }
}
