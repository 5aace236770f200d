//! Preview frame cycling.

use jfmon_telemetry::Metrics;
use tracing::trace;

use crate::state::ViewStateHandle;

/// Advances the wrapping preview frame index. Performs no I/O; the preview
/// URL is derived from the frame index and the display controls on read.
#[derive(Debug, Clone)]
pub struct ImageCycleDriver {
    state: ViewStateHandle,
}

impl ImageCycleDriver {
    pub fn new(state: ViewStateHandle) -> Self {
        Self { state }
    }

    /// Advance one frame and return the new index.
    pub fn tick(&self) -> u64 {
        let index = self.state.advance_frame();
        Metrics::frame_index(index);
        trace!(frame = index, "Preview frame advanced");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jfmon_core::{DisplayControls, FrameCounter, PreviewEndpoint, ViewState};

    fn driver(initial: u64, modulus: u64) -> (ViewStateHandle, ImageCycleDriver) {
        let frames = FrameCounter::starting_at(initial, modulus).unwrap();
        let state = ViewStateHandle::new(ViewState::new(frames, DisplayControls::default()));
        (state.clone(), ImageCycleDriver::new(state))
    }

    #[test]
    fn test_k_ticks_wrap_at_modulus() {
        let (initial, modulus) = (3, 10);
        let (state, driver) = driver(initial, modulus);

        for k in 1..=25u64 {
            let index = driver.tick();
            assert_eq!(index, (initial + k) % modulus);
            assert!(index < modulus);
        }
        assert_eq!(state.frame_index(), (initial + 25) % modulus);
    }

    #[test]
    fn test_preview_url_follows_frame_and_controls() {
        let (state, driver) = driver(0, 256_000);
        let endpoint = PreviewEndpoint::new("http://localhost:5232");

        driver.tick();
        driver.tick();
        state.set_logarithmic(true);
        state.set_contrast(25.0).unwrap();

        assert_eq!(
            state.read(|s| s.preview_url(&endpoint)),
            "http://localhost:5232/preview_log/25/2"
        );
    }
}
