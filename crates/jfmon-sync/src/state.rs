//! Shared, lock-guarded view state.

use std::sync::Arc;

use jfmon_core::{InstrumentStatus, LinkChange, ResolutionPoint, ViewState};
use parking_lot::RwLock;

/// Cloneable handle to the single `ViewState` record.
///
/// Drivers and user input only go through the mutation methods, each of
/// which holds the write lock for one `ViewState` operation. Readers take
/// a snapshot or borrow under the read lock.
#[derive(Debug, Clone, Default)]
pub struct ViewStateHandle {
    inner: Arc<RwLock<ViewState>>,
}

impl ViewStateHandle {
    pub fn new(state: ViewState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.inner.read().clone()
    }

    /// Run `f` against the current state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn apply_status(&self, status: InstrumentStatus) -> LinkChange {
        self.inner.write().apply_status(status)
    }

    pub fn apply_status_failure(&self) -> LinkChange {
        self.inner.write().apply_status_failure()
    }

    pub fn observe_sequence(&self, sequence: i64) -> bool {
        self.inner.write().observe_sequence(sequence)
    }

    pub fn replace_spots_per_angle(&self, counts: Vec<f64>) {
        self.inner.write().replace_spots_per_angle(counts);
    }

    pub fn replace_resolution_series(&self, points: Vec<ResolutionPoint>) {
        self.inner.write().replace_resolution_series(points);
    }

    pub fn advance_frame(&self) -> u64 {
        self.inner.write().advance_frame()
    }

    pub fn set_contrast(&self, contrast: f64) -> jfmon_core::Result<f64> {
        self.inner.write().set_contrast(contrast)
    }

    pub fn set_logarithmic(&self, logarithmic: bool) {
        self.inner.write().set_logarithmic(logarithmic);
    }

    pub fn set_expert_mode(&self, expert_mode: bool) {
        self.inner.write().set_expert_mode(expert_mode);
    }

    pub fn is_connected(&self) -> bool {
        self.inner.read().is_connected()
    }

    pub fn frame_index(&self) -> u64 {
        self.inner.read().frame_index()
    }

    pub fn revision(&self) -> u64 {
        self.inner.read().revision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let handle = ViewStateHandle::default();
        let other = handle.clone();

        other.advance_frame();
        other.set_logarithmic(true);

        assert_eq!(handle.frame_index(), 1);
        assert!(handle.read(|s| s.controls().logarithmic));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let handle = ViewStateHandle::default();
        let before = handle.snapshot();
        handle.observe_sequence(4);

        assert_eq!(before.diagnostics().sequence, None);
        assert_eq!(handle.snapshot().diagnostics().sequence, Some(4));
        assert!(handle.revision() > before.revision());
    }
}
